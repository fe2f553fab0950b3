//! Organization lifecycle.

use sea_orm::{ConnectionTrait, TransactionSession, TransactionTrait};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{Organization, OrgMember, OrgRole, User};
use crate::services::clock::Clock;
use crate::services::rbac;

/// Create an organization. The creator becomes its owner and receives an
/// explicit owner-role membership row in the same transaction.
pub async fn create<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    clock: &Clock,
    caller: &User,
    name: &str,
    slug: &str,
) -> AppResult<Organization> {
    if db::organizations::find_by_slug(db, slug).await?.is_some() {
        return Err(AppError::Conflict("Slug already exists".to_string()));
    }

    let now = clock.now();
    let org = Organization {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: slug.to_string(),
        owner_id: caller.id,
        created_at: now,
    };

    let txn = db.begin().await?;

    db::organizations::insert(&txn, &org).await?;

    let member = OrgMember {
        id: Uuid::new_v4(),
        organization_id: org.id,
        user_id: caller.id,
        role: OrgRole::Owner,
        created_at: now,
    };
    db::organization_members::insert(&txn, &member).await?;

    txn.commit().await?;

    Ok(org)
}

/// List the organizations the caller belongs to, newest first.
pub async fn list_mine<C: ConnectionTrait>(db: &C, caller: &User) -> AppResult<Vec<Organization>> {
    db::organizations::list_for_user(db, caller.id).await
}

/// Fetch one organization; caller must be a member (or the owner).
pub async fn get<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    caller: &User,
) -> AppResult<Organization> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Member).await
}
