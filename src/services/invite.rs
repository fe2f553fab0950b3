//! Organization invite lifecycle: create, resend (token rotation), accept,
//! revoke, list.
//!
//! Invite-by-email: acceptance requires a logged-in account whose email
//! matches the invite. Only the keyed hash of the invite token is stored;
//! the plaintext is returned exactly once on create and on resend.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use sea_orm::{ConnectionTrait, TransactionSession, TransactionTrait};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{Invite, InviteRole, InviteStatus, OrgMember, OrgRole, User};
use crate::services::clock::Clock;
use crate::services::hasher::KeyedHasher;
use crate::services::rbac;

/// Pending invites stay valid this long; rotation resets the window.
pub const INVITE_TTL_DAYS: i64 = 7;

/// Type tag prefixed to every generated invite token.
const TOKEN_TAG: &str = "oi_";
/// Bytes of randomness in a generated token (256 bits).
const TOKEN_RANDOM_BYTES: usize = 32;
/// Length of the token prefix stored for operator display.
const TOKEN_PREFIX_LENGTH: usize = 10;

/// Generate a new plaintext invite token.
pub fn generate_token() -> String {
    let random: [u8; TOKEN_RANDOM_BYTES] = rand::random();
    format!("{}{}", TOKEN_TAG, URL_SAFE_NO_PAD.encode(random))
}

/// Normalize an invitee email for storage and matching.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Relative accept link handed back with the plaintext token.
pub fn build_invite_link(invite_id: Uuid, token: &str) -> String {
    format!(
        "/api/v1/organizations/invites/{}/accept?token={}",
        invite_id, token
    )
}

fn token_prefix(token: &str) -> String {
    token.chars().take(TOKEN_PREFIX_LENGTH).collect()
}

/// Create an invite. Caller must be org admin/owner. Rejects emails that
/// already belong to a member and duplicate pending invites; the partial
/// unique index closes the race the pre-check leaves open.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    hasher: &KeyedHasher,
    organization_id: Uuid,
    caller: &User,
    email: &str,
    role: InviteRole,
) -> AppResult<(Invite, String)> {
    let org = rbac::require_org_role(db, organization_id, caller.id, OrgRole::Admin).await?;

    let email = normalize_email(email);

    // Prevent inviting existing members (the owner included)
    if let Some(user) = db::users::find_by_email(db, &email).await? {
        let is_member = org.owner_id == user.id
            || db::organization_members::find(db, organization_id, user.id)
                .await?
                .is_some();
        if is_member {
            return Err(AppError::Conflict(
                "User is already an organization member".to_string(),
            ));
        }
    }

    // Prevent duplicate pending invite
    if db::organization_invites::find_pending(db, organization_id, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Pending invite already exists".to_string(),
        ));
    }

    let now = clock.now();
    let token = generate_token();

    let invite = Invite {
        id: Uuid::new_v4(),
        organization_id,
        email,
        role,
        status: InviteStatus::Pending,
        token_prefix: token_prefix(&token),
        token_hash: hasher.digest(&token),
        expires_at: now + Duration::days(INVITE_TTL_DAYS),
        invited_by_user_id: Some(caller.id),
        accepted_by_user_id: None,
        created_at: now,
        accepted_at: None,
        revoked_at: None,
    };

    db::organization_invites::insert(db, &invite).await?;

    Ok((invite, token))
}

/// Rotate the token of a pending invite and extend its expiry. Caller must
/// be org admin/owner. The previous token is permanently invalid the instant
/// the rotation commits; the guard on `status = 'pending'` means each caller
/// is handed exactly the token its own rotation wrote.
pub async fn resend<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    hasher: &KeyedHasher,
    invite_id: Uuid,
    caller: &User,
) -> AppResult<(Invite, String)> {
    let invite = find_invite(db, invite_id).await?;

    rbac::require_org_role(db, invite.organization_id, caller.id, OrgRole::Admin).await?;

    if invite.status != InviteStatus::Pending {
        return Err(AppError::Conflict(format!("Invite is {}", invite.status)));
    }

    let token = generate_token();
    let expires_at = clock.now() + Duration::days(INVITE_TTL_DAYS);

    let rows = db::organization_invites::rotate_pending(
        db,
        invite.id,
        &hasher.digest(&token),
        &token_prefix(&token),
        expires_at,
    )
    .await?;

    if rows == 0 {
        // Lost the race against an accept/revoke between read and write
        let current = find_invite(db, invite_id).await?;
        return Err(AppError::Conflict(format!("Invite is {}", current.status)));
    }

    let invite = find_invite(db, invite_id).await?;
    Ok((invite, token))
}

/// Accept an invite with proof of token possession.
///
/// Check order matters: the token is verified (constant time) before status
/// or expiry are revealed, so a wrong token cannot probe invite state.
/// Membership insert and the status flip commit in one transaction.
pub async fn accept<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    clock: &Clock,
    hasher: &KeyedHasher,
    invite_id: Uuid,
    token: &str,
    current_user: &User,
) -> AppResult<Invite> {
    let invite = find_invite(db, invite_id).await?;

    if !hasher.verify(token, &invite.token_hash) {
        return Err(AppError::Forbidden("Invalid invite token".to_string()));
    }

    if invite.status != InviteStatus::Pending {
        return Err(AppError::Conflict(format!("Invite is {}", invite.status)));
    }

    let now = clock.now();
    if invite.is_expired(now) {
        return Err(AppError::Gone("Invite expired".to_string()));
    }

    if invite.email != normalize_email(&current_user.email) {
        return Err(AppError::Forbidden(
            "Invite email does not match your account".to_string(),
        ));
    }

    let txn = db.begin().await?;

    let existing =
        db::organization_members::find(&txn, invite.organization_id, current_user.id).await?;
    if existing.is_none() {
        let member = OrgMember {
            id: Uuid::new_v4(),
            organization_id: invite.organization_id,
            user_id: current_user.id,
            role: invite.role.granted_org_role(),
            created_at: now,
        };
        db::organization_members::insert(&txn, &member).await?;
    }

    let rows =
        db::organization_invites::mark_accepted_pending(&txn, invite.id, current_user.id, now)
            .await?;
    if rows == 0 {
        // A concurrent accept/revoke won; abort so the membership insert
        // does not survive a half-accepted state.
        txn.rollback().await?;
        return Err(AppError::Conflict("Invite is no longer pending".to_string()));
    }

    txn.commit().await?;

    find_invite(db, invite_id).await
}

/// Revoke a pending invite. Caller must be org admin/owner.
pub async fn revoke<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    invite_id: Uuid,
    caller: &User,
) -> AppResult<Invite> {
    let invite = find_invite(db, invite_id).await?;

    rbac::require_org_role(db, invite.organization_id, caller.id, OrgRole::Admin).await?;

    if invite.status != InviteStatus::Pending {
        return Err(AppError::Conflict(format!("Invite is {}", invite.status)));
    }

    let rows = db::organization_invites::mark_revoked_pending(db, invite.id, clock.now()).await?;
    if rows == 0 {
        let current = find_invite(db, invite_id).await?;
        return Err(AppError::Conflict(format!("Invite is {}", current.status)));
    }

    find_invite(db, invite_id).await
}

/// List an organization's invites (any status), newest first. Caller must be
/// org admin/owner. Responses built from these rows carry no token material.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    caller: &User,
) -> AppResult<Vec<Invite>> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Admin).await?;

    db::organization_invites::list_for_organization(db, organization_id).await
}

async fn find_invite<C: ConnectionTrait>(db: &C, invite_id: Uuid) -> AppResult<Invite> {
    db::organization_invites::find_by_id(db, invite_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invite".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use secrecy::SecretString;

    fn test_hasher() -> KeyedHasher {
        KeyedHasher::new(SecretString::from("test-pepper"))
    }

    fn test_user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Bob".to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn invite_model(
        token_hash: &str,
        status: &str,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> crate::entity::organization_invite::Model {
        crate::entity::organization_invite::Model {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            email: email.to_string(),
            role: "member".to_string(),
            status: status.to_string(),
            token_prefix: "oi_abcdefg".to_string(),
            token_hash: token_hash.to_string(),
            expires_at,
            invited_by_user_id: None,
            accepted_by_user_id: None,
            created_at: Utc::now(),
            accepted_at: None,
            revoked_at: None,
        }
    }

    #[test]
    fn test_generated_tokens_are_tagged_and_distinct() {
        let a = generate_token();
        let b = generate_token();

        assert!(a.starts_with(TOKEN_TAG));
        assert_eq!(a.len(), TOKEN_TAG.len() + 43);
        assert_ne!(a, b);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Bob@Example.COM "), "bob@example.com");
    }

    #[test]
    fn test_invite_link_format() {
        let id = Uuid::new_v4();
        let link = build_invite_link(id, "oi_tok");
        assert_eq!(
            link,
            format!("/api/v1/organizations/invites/{}/accept?token=oi_tok", id)
        );
    }

    #[tokio::test]
    async fn test_accept_wrong_token_is_forbidden_before_status_leaks() {
        // Invite is already accepted, but a wrong token must see Forbidden,
        // not Conflict: token validity is checked first.
        let hasher = test_hasher();
        let model = invite_model(
            &hasher.digest("oi_right"),
            "accepted",
            "bob@example.com",
            Utc::now() + Duration::days(1),
        );
        let invite_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let result = accept(
            &db,
            &Clock::system(),
            &hasher,
            invite_id,
            "oi_wrong",
            &test_user("bob@example.com"),
        )
        .await;
        match result {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Invalid invite token"),
            other => panic!("expected Forbidden, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_accept_non_pending_with_right_token_is_conflict() {
        let hasher = test_hasher();
        let model = invite_model(
            &hasher.digest("oi_right"),
            "accepted",
            "bob@example.com",
            Utc::now() + Duration::days(1),
        );
        let invite_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let result = accept(
            &db,
            &Clock::system(),
            &hasher,
            invite_id,
            "oi_right",
            &test_user("bob@example.com"),
        )
        .await;
        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Invite is accepted"),
            other => panic!("expected Conflict, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_accept_expired_invite_is_gone() {
        let hasher = test_hasher();
        let now = Utc::now();
        let model = invite_model(
            &hasher.digest("oi_right"),
            "pending",
            "bob@example.com",
            now - Duration::seconds(1),
        );
        let invite_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let result = accept(
            &db,
            &Clock::fixed(now),
            &hasher,
            invite_id,
            "oi_right",
            &test_user("bob@example.com"),
        )
        .await;
        assert!(matches!(result, Err(AppError::Gone(_))));
    }

    #[tokio::test]
    async fn test_accept_email_mismatch_is_forbidden() {
        let hasher = test_hasher();
        let model = invite_model(
            &hasher.digest("oi_right"),
            "pending",
            "bob@example.com",
            Utc::now() + Duration::days(1),
        );
        let invite_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let result = accept(
            &db,
            &Clock::system(),
            &hasher,
            invite_id,
            "oi_right",
            &test_user("mallory@example.com"),
        )
        .await;
        match result {
            Err(AppError::Forbidden(msg)) => {
                assert_eq!(msg, "Invite email does not match your account")
            }
            other => panic!("expected Forbidden, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_accept_matches_email_case_insensitively() {
        let hasher = test_hasher();
        let model = invite_model(
            &hasher.digest("oi_right"),
            "pending",
            "bob@example.com",
            Utc::now() + Duration::days(1),
        );
        let invite_id = model.id;
        let accepted = {
            let mut m = model.clone();
            m.status = "accepted".to_string();
            m
        };

        let user = test_user("Bob@Example.com");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // load invite
            .append_query_results([vec![model]])
            // membership lookup inside the transaction: none yet
            .append_query_results([Vec::<crate::entity::organization_member::Model>::new()])
            // membership insert + conditional status flip
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            // reload after commit
            .append_query_results([vec![accepted]])
            .into_connection();

        let invite = accept(&db, &Clock::system(), &hasher, invite_id, "oi_right", &user)
            .await
            .unwrap();
        assert_eq!(invite.status, InviteStatus::Accepted);
    }

    #[tokio::test]
    async fn test_second_pending_invite_for_same_email_is_conflict() {
        let hasher = test_hasher();
        let caller_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let org = crate::entity::organization::Model {
            id: org_id,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            owner_id: caller_id,
            created_at: Utc::now(),
        };

        let mut pending = invite_model(
            &hasher.digest("oi_first"),
            "pending",
            "bob@example.com",
            Utc::now() + Duration::days(7),
        );
        pending.organization_id = org_id;

        let caller = User {
            id: caller_id,
            name: "Owner".to_string(),
            email: "owner@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };

        // Org lookup (owner override), no account for the email, then the
        // existing pending invite.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![org]])
            .append_query_results([Vec::<crate::entity::user::Model>::new()])
            .append_query_results([vec![pending]])
            .into_connection();

        let result = create(
            &db,
            &Clock::system(),
            &hasher,
            org_id,
            &caller,
            "Bob@Example.com",
            InviteRole::Member,
        )
        .await;
        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Pending invite already exists"),
            other => panic!("expected Conflict, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_resend_non_pending_invite_is_conflict() {
        let hasher = test_hasher();
        let caller_id = Uuid::new_v4();
        let model = invite_model(
            &hasher.digest("oi_old"),
            "revoked",
            "bob@example.com",
            Utc::now(),
        );
        let invite_id = model.id;
        let org_id = model.organization_id;

        let caller = User {
            id: caller_id,
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };

        let org = crate::entity::organization::Model {
            id: org_id,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            owner_id: caller_id,
            created_at: Utc::now(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .append_query_results([vec![org]])
            .into_connection();

        let result = resend(&db, &Clock::system(), &hasher, invite_id, &caller).await;
        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Invite is revoked"),
            other => panic!("expected Conflict, got {:?}", other.err()),
        }
    }
}
