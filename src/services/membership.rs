//! Organization and project member management.
//!
//! Policy lives here, not in the stores: adds are idempotent upserts (an
//! existing row gets the new role), removals of absent rows are no-ops, and
//! project membership is only open to users already inside the owning
//! organization.

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{OrgMember, OrgRole, ProjectMember, ProjectRole, User};
use crate::services::clock::Clock;
use crate::services::rbac;

// ---------------------------------------------------------------------------
// Organization members
// ---------------------------------------------------------------------------

/// Add a user to an organization, or update their role if already a member.
/// Caller must be org admin/owner.
pub async fn add_org_member<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    organization_id: Uuid,
    caller: &User,
    target_user_id: Uuid,
    role: OrgRole,
) -> AppResult<OrgMember> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Admin).await?;

    db::users::find_by_id(db, target_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    if let Some(existing) = db::organization_members::find(db, organization_id, target_user_id)
        .await?
    {
        if existing.role != role {
            db::organization_members::update_role(db, organization_id, target_user_id, role)
                .await?;
        }
        return Ok(OrgMember { role, ..existing });
    }

    let member = OrgMember {
        id: Uuid::new_v4(),
        organization_id,
        user_id: target_user_id,
        role,
        created_at: clock.now(),
    };
    db::organization_members::insert(db, &member).await?;

    Ok(member)
}

/// Change an existing organization member's role. Caller must be org
/// admin/owner.
pub async fn update_org_member_role<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    caller: &User,
    target_user_id: Uuid,
    role: OrgRole,
) -> AppResult<OrgMember> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Admin).await?;

    let rows =
        db::organization_members::update_role(db, organization_id, target_user_id, role).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Organization member".to_string()));
    }

    db::organization_members::find(db, organization_id, target_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization member".to_string()))
}

/// Remove a user from an organization. Idempotent: removing a non-member is
/// a no-op. Caller must be org admin/owner.
pub async fn remove_org_member<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    caller: &User,
    target_user_id: Uuid,
) -> AppResult<()> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Admin).await?;

    db::organization_members::delete(db, organization_id, target_user_id).await?;

    Ok(())
}

/// List an organization's members, oldest first. Caller must be a member.
pub async fn list_org_members<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    caller: &User,
) -> AppResult<Vec<OrgMember>> {
    rbac::require_org_role(db, organization_id, caller.id, OrgRole::Member).await?;

    db::organization_members::list_for_organization(db, organization_id).await
}

// ---------------------------------------------------------------------------
// Project members
// ---------------------------------------------------------------------------

/// Add a user to a project, or update their role if already a member.
/// Caller must hold project-manage rights. The target must already belong to
/// the owning organization; cross-tenant membership is disallowed.
pub async fn add_project_member<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    project_id: Uuid,
    caller: &User,
    target_user_id: Uuid,
    role: ProjectRole,
) -> AppResult<ProjectMember> {
    let project = rbac::require_project_manage(db, project_id, caller.id).await?;

    db::users::find_by_id(db, target_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    let org = db::organizations::find_by_id(db, project.organization_id)
        .await?
        .ok_or_else(|| {
            AppError::Database(format!(
                "project {} references missing organization {}",
                project.id, project.organization_id
            ))
        })?;

    let in_org = org.owner_id == target_user_id
        || db::organization_members::find(db, org.id, target_user_id)
            .await?
            .is_some();
    if !in_org {
        return Err(AppError::Conflict(
            "User is not a member of the owning organization".to_string(),
        ));
    }

    if let Some(existing) = db::project_members::find(db, project_id, target_user_id).await? {
        if existing.role != role {
            db::project_members::update_role(db, project_id, target_user_id, role).await?;
        }
        return Ok(ProjectMember { role, ..existing });
    }

    let member = ProjectMember {
        project_id,
        user_id: target_user_id,
        role,
        created_at: clock.now(),
    };
    db::project_members::insert(db, &member).await?;

    Ok(member)
}

/// Change an existing project member's role. Caller must hold project-manage
/// rights.
pub async fn update_project_member_role<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    caller: &User,
    target_user_id: Uuid,
    role: ProjectRole,
) -> AppResult<ProjectMember> {
    rbac::require_project_manage(db, project_id, caller.id).await?;

    let rows = db::project_members::update_role(db, project_id, target_user_id, role).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Project member".to_string()));
    }

    db::project_members::find(db, project_id, target_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project member".to_string()))
}

/// Remove a user from a project. Idempotent: removing a non-member is a
/// no-op. Caller must hold project-manage rights.
pub async fn remove_project_member<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    caller: &User,
    target_user_id: Uuid,
) -> AppResult<()> {
    rbac::require_project_manage(db, project_id, caller.id).await?;

    db::project_members::delete(db, project_id, target_user_id).await?;

    Ok(())
}

/// List a project's members, oldest first. Open to project members and to
/// admins/owners of the owning organization.
pub async fn list_project_members<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    caller: &User,
) -> AppResult<Vec<ProjectMember>> {
    let project = db::projects::find_by_id(db, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

    let project_role = rbac::resolve_project_role(db, &project, caller.id).await?;
    if project_role.is_none() {
        let org = db::organizations::find_by_id(db, project.organization_id)
            .await?
            .ok_or_else(|| {
                AppError::Database(format!(
                    "project {} references missing organization {}",
                    project.id, project.organization_id
                ))
            })?;
        let org_role = rbac::resolve_org_role(db, &org, caller.id).await?;
        if org_role < Some(OrgRole::Admin) {
            return Err(AppError::Forbidden("Not a project member".to_string()));
        }
    }

    db::project_members::list_for_project(db, project_id).await
}

/// The caller's own membership row in a project. Requires an explicit row;
/// the org-owner override grants access but has no row to return.
pub async fn my_project_membership<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    caller: &User,
) -> AppResult<ProjectMember> {
    rbac::require_project_role(db, project_id, caller.id, ProjectRole::Member).await?;

    db::project_members::find(db, project_id, caller.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project membership".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_user(id: Uuid) -> User {
        User {
            id,
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn project_model(id: Uuid, organization_id: Uuid) -> crate::entity::project::Model {
        crate::entity::project::Model {
            id,
            organization_id,
            owner_id: Uuid::new_v4(),
            name: "P".to_string(),
            slug: "p".to_string(),
            created_at: Utc::now(),
        }
    }

    fn org_model(id: Uuid, owner_id: Uuid) -> crate::entity::organization::Model {
        crate::entity::organization::Model {
            id,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            owner_id,
            created_at: Utc::now(),
        }
    }

    fn user_model(id: Uuid) -> crate::entity::user::Model {
        crate::entity::user::Model {
            id,
            name: "Target".to_string(),
            email: "target@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_cross_tenant_project_member_is_conflict() {
        let caller_id = Uuid::new_v4();
        let target_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();

        // Caller is the org owner (manage gate passes on the override);
        // target exists but holds no org membership.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(project_id, org_id)]])
            .append_query_results([vec![org_model(org_id, caller_id)]])
            .append_query_results([vec![user_model(target_id)]])
            .append_query_results([vec![org_model(org_id, caller_id)]])
            .append_query_results([Vec::<crate::entity::organization_member::Model>::new()])
            .into_connection();

        let result = add_project_member(
            &db,
            &Clock::system(),
            project_id,
            &test_user(caller_id),
            target_id,
            ProjectRole::Member,
        )
        .await;
        match result {
            Err(AppError::Conflict(msg)) => {
                assert_eq!(msg, "User is not a member of the owning organization")
            }
            other => panic!("expected Conflict, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_remove_absent_project_member_is_a_no_op() {
        let caller_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project_model(project_id, org_id)]])
            .append_query_results([vec![org_model(org_id, caller_id)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result =
            remove_project_member(&db, project_id, &test_user(caller_id), Uuid::new_v4()).await;
        assert!(result.is_ok());
    }
}
