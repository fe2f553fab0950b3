//! Project lifecycle.

use sea_orm::{ConnectionTrait, TransactionSession, TransactionTrait};
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{OrgRole, Project, ProjectMember, ProjectRole, User};
use crate::services::clock::Clock;
use crate::services::rbac;

/// Create a project under an organization. Caller must be org admin/owner.
/// The creator is recorded as `owner_id` and becomes an explicit project
/// admin member in the same transaction. The owning organization is fixed at
/// creation and never changes.
pub async fn create<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    clock: &Clock,
    organization_id: Uuid,
    caller: &User,
    name: &str,
    slug: &str,
) -> AppResult<Project> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Admin).await?;

    if db::projects::find_by_slug(db, slug).await?.is_some() {
        return Err(AppError::Conflict("Slug already exists".to_string()));
    }

    let now = clock.now();
    let project = Project {
        id: Uuid::new_v4(),
        organization_id,
        owner_id: caller.id,
        name: name.to_string(),
        slug: slug.to_string(),
        created_at: now,
    };

    let txn = db.begin().await?;

    db::projects::insert(&txn, &project).await?;

    let member = ProjectMember {
        project_id: project.id,
        user_id: caller.id,
        role: ProjectRole::Admin,
        created_at: now,
    };
    db::project_members::insert(&txn, &member).await?;

    txn.commit().await?;

    Ok(project)
}

/// List the projects the caller belongs to, newest first.
pub async fn list_mine<C: ConnectionTrait>(db: &C, caller: &User) -> AppResult<Vec<Project>> {
    db::projects::list_for_user(db, caller.id).await
}

/// List an organization's projects; caller must be an org member.
pub async fn list_for_organization<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    caller: &User,
) -> AppResult<Vec<Project>> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Member).await?;

    db::projects::list_for_organization(db, organization_id).await
}

/// Fetch one project; caller must be a project member (or org owner).
pub async fn get<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    caller: &User,
) -> AppResult<Project> {
    rbac::require_project_role(db, project_id, caller.id, ProjectRole::Member).await
}
