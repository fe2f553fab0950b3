//! Database operations for project memberships.

use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ProjectMember, ProjectRole};

/// Insert a new membership row.
pub async fn insert<C: ConnectionTrait>(db: &C, member: &ProjectMember) -> AppResult<()> {
    let model = crate::entity::project_member::ActiveModel {
        project_id: Set(member.project_id),
        user_id: Set(member.user_id),
        role: Set(member.role.as_str().to_string()),
        created_at: Set(member.created_at),
    };

    crate::entity::project_member::Entity::insert(model)
        .exec(db)
        .await?;

    Ok(())
}

/// Find a membership row for a user in a project.
pub async fn find<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<ProjectMember>> {
    let result = crate::entity::project_member::Entity::find()
        .filter(crate::entity::project_member::Column::ProjectId.eq(project_id))
        .filter(crate::entity::project_member::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    result.map(model_to_member).transpose()
}

/// Update the role of an existing membership row.
pub async fn update_role<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    user_id: Uuid,
    role: ProjectRole,
) -> AppResult<u64> {
    let result = crate::entity::project_member::Entity::update_many()
        .col_expr(
            crate::entity::project_member::Column::Role,
            Expr::value(role.as_str()),
        )
        .filter(crate::entity::project_member::Column::ProjectId.eq(project_id))
        .filter(crate::entity::project_member::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete a membership row. Returns the number of rows removed.
pub async fn delete<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
    user_id: Uuid,
) -> AppResult<u64> {
    let result = crate::entity::project_member::Entity::delete_many()
        .filter(crate::entity::project_member::Column::ProjectId.eq(project_id))
        .filter(crate::entity::project_member::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// List all members of a project, oldest first.
pub async fn list_for_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> AppResult<Vec<ProjectMember>> {
    let results = crate::entity::project_member::Entity::find()
        .filter(crate::entity::project_member::Column::ProjectId.eq(project_id))
        .order_by_asc(crate::entity::project_member::Column::CreatedAt)
        .all(db)
        .await?;

    results.into_iter().map(model_to_member).collect()
}

fn model_to_member(m: crate::entity::project_member::Model) -> AppResult<ProjectMember> {
    let role = ProjectRole::parse(&m.role).ok_or_else(|| {
        AppError::Database(format!(
            "invalid role '{}' in project_members row ({}, {})",
            m.role, m.project_id, m.user_id
        ))
    })?;

    Ok(ProjectMember {
        project_id: m.project_id,
        user_id: m.user_id,
        role,
        created_at: m.created_at,
    })
}
