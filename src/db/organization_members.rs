//! Database operations for organization memberships.

use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{OrgMember, OrgRole};

/// Insert a new membership row.
pub async fn insert<C: ConnectionTrait>(db: &C, member: &OrgMember) -> AppResult<()> {
    let model = crate::entity::organization_member::ActiveModel {
        id: Set(member.id),
        organization_id: Set(member.organization_id),
        user_id: Set(member.user_id),
        role: Set(member.role.as_str().to_string()),
        created_at: Set(member.created_at),
    };

    crate::entity::organization_member::Entity::insert(model)
        .exec(db)
        .await?;

    Ok(())
}

/// Find a membership row for a user in an organization.
pub async fn find<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<OrgMember>> {
    let result = crate::entity::organization_member::Entity::find()
        .filter(crate::entity::organization_member::Column::OrganizationId.eq(organization_id))
        .filter(crate::entity::organization_member::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    result.map(model_to_member).transpose()
}

/// Update the role of an existing membership row.
pub async fn update_role<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    user_id: Uuid,
    role: OrgRole,
) -> AppResult<u64> {
    let result = crate::entity::organization_member::Entity::update_many()
        .col_expr(
            crate::entity::organization_member::Column::Role,
            Expr::value(role.as_str()),
        )
        .filter(crate::entity::organization_member::Column::OrganizationId.eq(organization_id))
        .filter(crate::entity::organization_member::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete a membership row. Returns the number of rows removed.
pub async fn delete<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    user_id: Uuid,
) -> AppResult<u64> {
    let result = crate::entity::organization_member::Entity::delete_many()
        .filter(crate::entity::organization_member::Column::OrganizationId.eq(organization_id))
        .filter(crate::entity::organization_member::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// List all members of an organization, oldest first.
pub async fn list_for_organization<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
) -> AppResult<Vec<OrgMember>> {
    let results = crate::entity::organization_member::Entity::find()
        .filter(crate::entity::organization_member::Column::OrganizationId.eq(organization_id))
        .order_by_asc(crate::entity::organization_member::Column::CreatedAt)
        .all(db)
        .await?;

    results.into_iter().map(model_to_member).collect()
}

fn model_to_member(m: crate::entity::organization_member::Model) -> AppResult<OrgMember> {
    let role = OrgRole::parse(&m.role).ok_or_else(|| {
        AppError::Database(format!(
            "invalid role '{}' in organization_members row {}",
            m.role, m.id
        ))
    })?;

    Ok(OrgMember {
        id: m.id,
        organization_id: m.organization_id,
        user_id: m.user_id,
        role,
        created_at: m.created_at,
    })
}
