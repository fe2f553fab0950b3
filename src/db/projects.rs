//! Database operations for projects.

use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Project;

/// Insert a new project.
pub async fn insert<C: ConnectionTrait>(db: &C, project: &Project) -> AppResult<()> {
    let model = crate::entity::project::ActiveModel {
        id: Set(project.id),
        organization_id: Set(project.organization_id),
        owner_id: Set(project.owner_id),
        name: Set(project.name.clone()),
        slug: Set(project.slug.clone()),
        created_at: Set(project.created_at),
    };

    crate::entity::project::Entity::insert(model)
        .exec(db)
        .await?;

    Ok(())
}

/// Find a project by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Project>> {
    let result = crate::entity::project::Entity::find_by_id(id).one(db).await?;

    Ok(result.map(model_to_project))
}

/// Find a project by slug.
pub async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> AppResult<Option<Project>> {
    let result = crate::entity::project::Entity::find()
        .filter(crate::entity::project::Column::Slug.eq(slug))
        .one(db)
        .await?;

    Ok(result.map(model_to_project))
}

/// List all projects under an organization, newest first.
pub async fn list_for_organization<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
) -> AppResult<Vec<Project>> {
    let results = crate::entity::project::Entity::find()
        .filter(crate::entity::project::Column::OrganizationId.eq(organization_id))
        .order_by_desc(crate::entity::project::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results.into_iter().map(model_to_project).collect())
}

/// List the projects a user belongs to (as project member or creator),
/// newest first.
pub async fn list_for_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Vec<Project>> {
    let member_project_ids: Vec<Uuid> = crate::entity::project_member::Entity::find()
        .filter(crate::entity::project_member::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.project_id)
        .collect();

    let results = crate::entity::project::Entity::find()
        .filter(
            Condition::any()
                .add(crate::entity::project::Column::OwnerId.eq(user_id))
                .add(crate::entity::project::Column::Id.is_in(member_project_ids)),
        )
        .order_by_desc(crate::entity::project::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results.into_iter().map(model_to_project).collect())
}

fn model_to_project(m: crate::entity::project::Model) -> Project {
    Project {
        id: m.id,
        organization_id: m.organization_id,
        owner_id: m.owner_id,
        name: m.name,
        slug: m.slug,
        created_at: m.created_at,
    }
}
