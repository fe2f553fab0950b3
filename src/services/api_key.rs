//! API key lifecycle: issue, authenticate, scope-check, revoke, delete.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{ADMIN_KEY_SCOPE, ApiKey, DEFAULT_KEY_SCOPE, MachinePrincipal, Project};
use crate::services::clock::Clock;
use crate::services::hasher::KeyedHasher;

/// Type tag prefixed to every generated key.
const KEY_TAG: &str = "ak_";
/// Bytes of randomness in a generated key (256 bits).
const KEY_RANDOM_BYTES: usize = 32;
/// Length of the key prefix stored for identification.
const KEY_PREFIX_LENGTH: usize = 8;

/// Generate a new plaintext API key: type tag + URL-safe base64 of 256
/// random bits.
pub fn generate_secret() -> String {
    let random: [u8; KEY_RANDOM_BYTES] = rand::random();
    format!("{}{}", KEY_TAG, URL_SAFE_NO_PAD.encode(random))
}

/// Issue a new API key for a project. The caller has already been authorized
/// (project admin or org admin/owner). Returns the stored row and the
/// plaintext secret - the only time it is ever available.
pub async fn issue<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    hasher: &KeyedHasher,
    project: &Project,
    name: &str,
    scope: Option<String>,
    expires_at: Option<DateTime<Utc>>,
) -> AppResult<(ApiKey, String)> {
    let secret = generate_secret();
    let key_hash = hasher.digest(&secret);

    // Vanishingly unlikely, but a hash collision must surface as a retryable
    // failure, never silent reuse. The unique index is the backstop for the
    // window between this check and the insert.
    if db::api_keys::find_by_hash(db, &key_hash).await?.is_some() {
        return Err(AppError::Internal(
            "API key hash collision on generation".to_string(),
        ));
    }

    let key = ApiKey {
        id: Uuid::new_v4(),
        project_id: project.id,
        name: name.to_string(),
        key_prefix: secret.chars().take(KEY_PREFIX_LENGTH).collect(),
        key_hash,
        scope: scope.unwrap_or_else(|| DEFAULT_KEY_SCOPE.to_string()),
        created_at: clock.now(),
        last_used_at: None,
        expires_at,
        revoked_at: None,
    };

    db::api_keys::insert(db, &key).await?;

    Ok((key, secret))
}

/// Issue the first key of a fresh project. Requires the project to have zero
/// existing keys and forces scope "admin".
pub async fn issue_bootstrap<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    hasher: &KeyedHasher,
    project: &Project,
    name: &str,
    expires_at: Option<DateTime<Utc>>,
) -> AppResult<(ApiKey, String)> {
    let existing = db::api_keys::count_for_project(db, project.id).await?;
    if existing > 0 {
        return Err(AppError::Conflict(
            "Project already has API keys".to_string(),
        ));
    }

    issue(
        db,
        clock,
        hasher,
        project,
        name,
        Some(ADMIN_KEY_SCOPE.to_string()),
        expires_at,
    )
    .await
}

/// Authenticate a raw API key and resolve its project.
///
/// Lookup is by keyed hash via the unique index. The last-used touch is
/// best-effort: a failure to persist it is logged and never fails the
/// request.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    hasher: &KeyedHasher,
    raw_key: &str,
) -> AppResult<MachinePrincipal> {
    let key_hash = hasher.digest(raw_key);

    let key = db::api_keys::find_by_hash(db, &key_hash)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid API key".to_string()))?;

    if key.is_revoked() {
        return Err(AppError::Unauthorized(
            "API key has been revoked".to_string(),
        ));
    }

    let now = clock.now();
    if key.is_expired(now) {
        return Err(AppError::Unauthorized("API key has expired".to_string()));
    }

    if let Err(e) = db::api_keys::touch_last_used(db, key.id, now).await {
        tracing::warn!(key_id = %key.id, "failed to update last_used_at: {}", e);
    }

    let project = db::projects::find_by_id(db, key.project_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Project not found for API key".to_string()))?;

    Ok(MachinePrincipal { key, project })
}

/// Require an exact scope match on an authenticated key. Scopes are flat
/// tags, not a hierarchy: "admin" does not imply anything else.
pub fn require_scope(key: &ApiKey, required_scope: &str) -> AppResult<()> {
    if key.scope == required_scope {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Requires API key scope: {}",
            required_scope
        )))
    }
}

/// Revoke a key belonging to a project. Idempotent: revoking an
/// already-revoked key succeeds without touching the row again.
pub async fn revoke<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    project_id: Uuid,
    key_id: Uuid,
) -> AppResult<ApiKey> {
    let key = find_project_key(db, project_id, key_id).await?;

    if key.is_revoked() {
        return Ok(key);
    }

    let now = clock.now();
    db::api_keys::mark_revoked(db, key.id, now).await?;

    // Re-read rather than patching in memory: a concurrent revoke may have
    // won, and its timestamp is the one that stuck.
    find_project_key(db, project_id, key_id).await
}

/// Hard delete a key belonging to a project.
pub async fn delete<C: ConnectionTrait>(db: &C, project_id: Uuid, key_id: Uuid) -> AppResult<()> {
    let key = find_project_key(db, project_id, key_id).await?;

    db::api_keys::delete(db, key.id).await?;

    Ok(())
}

/// List a project's keys, newest first.
pub async fn list<C: ConnectionTrait>(db: &C, project_id: Uuid) -> AppResult<Vec<ApiKey>> {
    db::api_keys::list_for_project(db, project_id).await
}

/// Load a key and check it belongs to the given project.
async fn find_project_key<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    key_id: Uuid,
) -> AppResult<ApiKey> {
    let key = db::api_keys::find_by_id(db, key_id)
        .await?
        .ok_or_else(|| AppError::NotFound("API key".to_string()))?;

    if key.project_id != project_id {
        return Err(AppError::NotFound("API key".to_string()));
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use secrecy::SecretString;

    fn test_hasher() -> KeyedHasher {
        KeyedHasher::new(SecretString::from("test-pepper"))
    }

    fn key_model(
        project_id: Uuid,
        key_hash: &str,
        expires_at: Option<DateTime<Utc>>,
        revoked_at: Option<DateTime<Utc>>,
    ) -> crate::entity::api_key::Model {
        crate::entity::api_key::Model {
            id: Uuid::new_v4(),
            project_id,
            name: "CI".to_string(),
            key_prefix: "ak_abcde".to_string(),
            key_hash: key_hash.to_string(),
            scope: DEFAULT_KEY_SCOPE.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            expires_at,
            revoked_at,
        }
    }

    fn project_model(id: Uuid) -> crate::entity::project::Model {
        crate::entity::project::Model {
            id,
            organization_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "P".to_string(),
            slug: "p".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generated_secrets_are_tagged_and_distinct() {
        let a = generate_secret();
        let b = generate_secret();

        assert!(a.starts_with(KEY_TAG));
        // 32 bytes of randomness -> 43 chars of unpadded URL-safe base64
        assert_eq!(a.len(), KEY_TAG.len() + 43);
        assert_ne!(a, b);
        assert!(!a.contains('+') && !a.contains('/') && !a.contains('='));
    }

    #[test]
    fn test_require_scope_is_exact_match() {
        let now = Utc::now();
        let key = ApiKey {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: "CI".to_string(),
            key_prefix: "ak_abcde".to_string(),
            key_hash: "0".repeat(64),
            scope: "admin".to_string(),
            created_at: now,
            last_used_at: None,
            expires_at: None,
            revoked_at: None,
        };

        assert!(require_scope(&key, "admin").is_ok());
        assert!(matches!(
            require_scope(&key, "read"),
            Err(AppError::Forbidden(_))
        ));
        // No hierarchy: "admin" does not imply "default"
        assert!(require_scope(&key, DEFAULT_KEY_SCOPE).is_err());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_key_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::entity::api_key::Model>::new()])
            .into_connection();

        let result = authenticate(&db, &Clock::system(), &test_hasher(), "ak_unknown").await;
        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid API key"),
            other => panic!("expected Unauthorized, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_authenticate_revoked_key_is_unauthorized() {
        let hasher = test_hasher();
        let raw = "ak_revoked";
        let model = key_model(Uuid::new_v4(), &hasher.digest(raw), None, Some(Utc::now()));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let result = authenticate(&db, &Clock::system(), &hasher, raw).await;
        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "API key has been revoked"),
            other => panic!("expected Unauthorized, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_authenticate_expired_key_is_unauthorized() {
        // Hash lookup succeeds; expiry is what rejects the key.
        let hasher = test_hasher();
        let raw = "ak_expired";
        let now = Utc::now();
        let model = key_model(
            Uuid::new_v4(),
            &hasher.digest(raw),
            Some(now - Duration::seconds(1)),
            None,
        );

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let result = authenticate(&db, &Clock::fixed(now), &hasher, raw).await;
        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "API key has expired"),
            other => panic!("expected Unauthorized, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_authenticate_valid_key_resolves_project() {
        let hasher = test_hasher();
        let raw = "ak_valid";
        let project_id = Uuid::new_v4();
        let model = key_model(project_id, &hasher.digest(raw), None, None);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![project_model(project_id)]])
            .into_connection();

        let principal = authenticate(&db, &Clock::system(), &hasher, raw)
            .await
            .unwrap();
        assert_eq!(principal.project.id, project_id);
        assert_eq!(principal.key.project_id, project_id);
    }

    #[tokio::test]
    async fn test_revoke_already_revoked_is_a_no_op() {
        let project_id = Uuid::new_v4();
        let revoked_at = Utc::now() - Duration::hours(1);
        let model = key_model(project_id, &"0".repeat(64), None, Some(revoked_at));
        let key_id = model.id;

        // No exec results registered: a second revoke must not issue an
        // UPDATE at all.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let key = revoke(&db, &Clock::system(), project_id, key_id).await.unwrap();
        assert_eq!(key.revoked_at, Some(revoked_at));
    }

    #[tokio::test]
    async fn test_key_from_another_project_is_not_found() {
        let model = key_model(Uuid::new_v4(), &"0".repeat(64), None, None);
        let key_id = model.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();

        let result = revoke(&db, &Clock::system(), Uuid::new_v4(), key_id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
