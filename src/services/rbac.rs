//! Role-based access control.
//!
//! Resolves a principal's effective role in an organization or project and
//! enforces minimum-role checks. Ownership is a standing override: the
//! organization owner resolves to the highest rank in the organization and to
//! admin in every project under it, with no membership row required.
//!
//! Checks are read-only. Callers that mutate run the check and the write on
//! the same connection/transaction and guard state transitions with
//! conditional updates.

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{Organization, OrgRole, Project, ProjectRole};

/// Resolve a user's effective role in an organization, owner override
/// included. `None` means no role at all.
pub async fn resolve_org_role<C: ConnectionTrait>(
    db: &C,
    org: &Organization,
    user_id: Uuid,
) -> AppResult<Option<OrgRole>> {
    if org.owner_id == user_id {
        return Ok(Some(OrgRole::Owner));
    }

    let membership = db::organization_members::find(db, org.id, user_id).await?;
    Ok(membership.map(|m| m.role))
}

/// Load an organization and require the user to hold at least `min_role` in it.
pub async fn require_org_role<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    user_id: Uuid,
    min_role: OrgRole,
) -> AppResult<Organization> {
    let org = db::organizations::find_by_id(db, organization_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Organization".to_string()))?;

    match resolve_org_role(db, &org, user_id).await? {
        None => Err(AppError::Forbidden(
            "Not an organization member".to_string(),
        )),
        Some(role) if role < min_role => Err(AppError::Forbidden(format!(
            "Requires org role: {}",
            min_role
        ))),
        Some(_) => Ok(org),
    }
}

/// Resolve a user's effective role in a project. The owner of the owning
/// organization resolves to admin without a membership row; there is no other
/// inheritance from organization roles here.
pub async fn resolve_project_role<C: ConnectionTrait>(
    db: &C,
    project: &Project,
    user_id: Uuid,
) -> AppResult<Option<ProjectRole>> {
    let org = db::organizations::find_by_id(db, project.organization_id)
        .await?
        .ok_or_else(|| {
            AppError::Database(format!(
                "project {} references missing organization {}",
                project.id, project.organization_id
            ))
        })?;

    if org.owner_id == user_id {
        return Ok(Some(ProjectRole::Admin));
    }

    let membership = db::project_members::find(db, project.id, user_id).await?;
    Ok(membership.map(|m| m.role))
}

/// Load a project and require the user to hold at least `min_role` in it.
pub async fn require_project_role<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    user_id: Uuid,
    min_role: ProjectRole,
) -> AppResult<Project> {
    let project = db::projects::find_by_id(db, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

    match resolve_project_role(db, &project, user_id).await? {
        None => Err(AppError::Forbidden("Not a project member".to_string())),
        Some(role) if role < min_role => Err(AppError::Forbidden(format!(
            "Requires project role: {}",
            min_role
        ))),
        Some(_) => Ok(project),
    }
}

/// Load a project and require management rights over it: project admin, or
/// admin/owner of the owning organization. This is the gate for
/// project-member management and API key issuance.
pub async fn require_project_manage<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    user_id: Uuid,
) -> AppResult<Project> {
    let project = db::projects::find_by_id(db, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

    let org = db::organizations::find_by_id(db, project.organization_id)
        .await?
        .ok_or_else(|| {
            AppError::Database(format!(
                "project {} references missing organization {}",
                project.id, project.organization_id
            ))
        })?;

    if resolve_org_role(db, &org, user_id).await? >= Some(OrgRole::Admin) {
        return Ok(project);
    }

    let membership = db::project_members::find(db, project.id, user_id).await?;
    match membership.map(|m| m.role) {
        Some(ProjectRole::Admin) => Ok(project),
        _ => Err(AppError::Forbidden(
            "Requires project admin or organization admin".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn org_model(id: Uuid, owner_id: Uuid) -> crate::entity::organization::Model {
        crate::entity::organization::Model {
            id,
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            owner_id,
            created_at: Utc::now(),
        }
    }

    fn member_model(
        organization_id: Uuid,
        user_id: Uuid,
        role: &str,
    ) -> crate::entity::organization_member::Model {
        crate::entity::organization_member::Model {
            id: Uuid::new_v4(),
            organization_id,
            user_id,
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_owner_passes_without_membership_row() {
        let org_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();

        // Only the organization lookup runs; the owner override short-circuits
        // the membership query.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![org_model(org_id, owner_id)]])
            .into_connection();

        let org = require_org_role(&db, org_id, owner_id, OrgRole::Owner)
            .await
            .unwrap();
        assert_eq!(org.id, org_id);
    }

    #[tokio::test]
    async fn test_non_member_is_forbidden() {
        let org_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![org_model(org_id, Uuid::new_v4())]])
            .append_query_results([Vec::<crate::entity::organization_member::Model>::new()])
            .into_connection();

        let result = require_org_role(&db, org_id, user_id, OrgRole::Member).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_member_below_min_role_is_forbidden() {
        let org_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![org_model(org_id, Uuid::new_v4())]])
            .append_query_results([vec![member_model(org_id, user_id, "member")]])
            .into_connection();

        let result = require_org_role(&db, org_id, user_id, OrgRole::Admin).await;
        match result {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Requires org role: admin"),
            other => panic!("expected Forbidden, got {:?}", other.map(|o| o.id)),
        }
    }

    #[tokio::test]
    async fn test_admin_passes_admin_check() {
        let org_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![org_model(org_id, Uuid::new_v4())]])
            .append_query_results([vec![member_model(org_id, user_id, "admin")]])
            .into_connection();

        assert!(
            require_org_role(&db, org_id, user_id, OrgRole::Admin)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_missing_org_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::entity::organization::Model>::new()])
            .into_connection();

        let result = require_org_role(&db, Uuid::new_v4(), Uuid::new_v4(), OrgRole::Member).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_org_owner_is_admin_in_every_project_under_it() {
        let org_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();

        let project = crate::entity::project::Model {
            id: project_id,
            organization_id: org_id,
            owner_id: Uuid::new_v4(),
            name: "P".to_string(),
            slug: "p".to_string(),
            created_at: Utc::now(),
        };

        // Project lookup, then organization lookup; owner override skips the
        // project membership query.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![project]])
            .append_query_results([vec![org_model(org_id, owner_id)]])
            .into_connection();

        let project = require_project_role(&db, project_id, owner_id, ProjectRole::Admin)
            .await
            .unwrap();
        assert_eq!(project.id, project_id);
    }
}
