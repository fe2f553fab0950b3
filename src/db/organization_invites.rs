//! Database operations for organization invites.
//!
//! State transitions (rotate, accept, revoke) are conditional updates guarded
//! on `status = 'pending'`. A zero row count means another caller won the
//! transition; the service layer reports that as a conflict instead of
//! clobbering the row.

use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Invite, InviteRole, InviteStatus};

/// Insert a new invite.
pub async fn insert<C: ConnectionTrait>(db: &C, invite: &Invite) -> AppResult<()> {
    let model = crate::entity::organization_invite::ActiveModel {
        id: Set(invite.id),
        organization_id: Set(invite.organization_id),
        email: Set(invite.email.clone()),
        role: Set(invite.role.as_str().to_string()),
        status: Set(invite.status.as_str().to_string()),
        token_prefix: Set(invite.token_prefix.clone()),
        token_hash: Set(invite.token_hash.clone()),
        expires_at: Set(invite.expires_at),
        invited_by_user_id: Set(invite.invited_by_user_id),
        accepted_by_user_id: Set(invite.accepted_by_user_id),
        created_at: Set(invite.created_at),
        accepted_at: Set(invite.accepted_at),
        revoked_at: Set(invite.revoked_at),
    };

    crate::entity::organization_invite::Entity::insert(model)
        .exec(db)
        .await?;

    Ok(())
}

/// Find an invite by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Invite>> {
    let result = crate::entity::organization_invite::Entity::find_by_id(id)
        .one(db)
        .await?;

    result.map(model_to_invite).transpose()
}

/// Find a pending invite for (organization, email).
pub async fn find_pending<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    email: &str,
) -> AppResult<Option<Invite>> {
    let result = crate::entity::organization_invite::Entity::find()
        .filter(
            crate::entity::organization_invite::Column::OrganizationId.eq(organization_id),
        )
        .filter(crate::entity::organization_invite::Column::Email.eq(email))
        .filter(
            crate::entity::organization_invite::Column::Status
                .eq(InviteStatus::Pending.as_str()),
        )
        .one(db)
        .await?;

    result.map(model_to_invite).transpose()
}

/// List all invites for an organization (any status), newest first.
pub async fn list_for_organization<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
) -> AppResult<Vec<Invite>> {
    let results = crate::entity::organization_invite::Entity::find()
        .filter(
            crate::entity::organization_invite::Column::OrganizationId.eq(organization_id),
        )
        .order_by_desc(crate::entity::organization_invite::Column::CreatedAt)
        .all(db)
        .await?;

    results.into_iter().map(model_to_invite).collect()
}

/// Rotate the token of a pending invite: overwrite hash and prefix, extend
/// expiry. The old token stops validating the instant this update commits.
/// Returns the number of rows changed; zero means the invite is not pending.
pub async fn rotate_pending<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    token_hash: &str,
    token_prefix: &str,
    expires_at: DateTime<Utc>,
) -> AppResult<u64> {
    let result = crate::entity::organization_invite::Entity::update_many()
        .col_expr(
            crate::entity::organization_invite::Column::TokenHash,
            Expr::value(token_hash),
        )
        .col_expr(
            crate::entity::organization_invite::Column::TokenPrefix,
            Expr::value(token_prefix),
        )
        .col_expr(
            crate::entity::organization_invite::Column::ExpiresAt,
            Expr::value(expires_at),
        )
        .filter(crate::entity::organization_invite::Column::Id.eq(id))
        .filter(
            crate::entity::organization_invite::Column::Status
                .eq(InviteStatus::Pending.as_str()),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Flip a pending invite to accepted. Returns the number of rows changed;
/// zero means the invite is not pending.
pub async fn mark_accepted_pending<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    accepted_by: Uuid,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let result = crate::entity::organization_invite::Entity::update_many()
        .col_expr(
            crate::entity::organization_invite::Column::Status,
            Expr::value(InviteStatus::Accepted.as_str()),
        )
        .col_expr(
            crate::entity::organization_invite::Column::AcceptedByUserId,
            Expr::value(Some(accepted_by)),
        )
        .col_expr(
            crate::entity::organization_invite::Column::AcceptedAt,
            Expr::value(Some(now)),
        )
        .filter(crate::entity::organization_invite::Column::Id.eq(id))
        .filter(
            crate::entity::organization_invite::Column::Status
                .eq(InviteStatus::Pending.as_str()),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Flip a pending invite to revoked. Returns the number of rows changed;
/// zero means the invite is not pending.
pub async fn mark_revoked_pending<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let result = crate::entity::organization_invite::Entity::update_many()
        .col_expr(
            crate::entity::organization_invite::Column::Status,
            Expr::value(InviteStatus::Revoked.as_str()),
        )
        .col_expr(
            crate::entity::organization_invite::Column::RevokedAt,
            Expr::value(Some(now)),
        )
        .filter(crate::entity::organization_invite::Column::Id.eq(id))
        .filter(
            crate::entity::organization_invite::Column::Status
                .eq(InviteStatus::Pending.as_str()),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

fn model_to_invite(m: crate::entity::organization_invite::Model) -> AppResult<Invite> {
    let role = InviteRole::parse(&m.role).ok_or_else(|| {
        AppError::Database(format!(
            "invalid role '{}' in organization_invites row {}",
            m.role, m.id
        ))
    })?;
    let status = InviteStatus::parse(&m.status).ok_or_else(|| {
        AppError::Database(format!(
            "invalid status '{}' in organization_invites row {}",
            m.status, m.id
        ))
    })?;

    Ok(Invite {
        id: m.id,
        organization_id: m.organization_id,
        email: m.email,
        role,
        status,
        token_prefix: m.token_prefix,
        token_hash: m.token_hash,
        expires_at: m.expires_at,
        invited_by_user_id: m.invited_by_user_id,
        accepted_by_user_id: m.accepted_by_user_id,
        created_at: m.created_at,
        accepted_at: m.accepted_at,
        revoked_at: m.revoked_at,
    })
}
