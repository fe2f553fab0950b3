//! Database operations for organizations.

use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Organization;

/// Insert a new organization.
pub async fn insert<C: ConnectionTrait>(db: &C, org: &Organization) -> AppResult<()> {
    let model = crate::entity::organization::ActiveModel {
        id: Set(org.id),
        name: Set(org.name.clone()),
        slug: Set(org.slug.clone()),
        owner_id: Set(org.owner_id),
        created_at: Set(org.created_at),
    };

    crate::entity::organization::Entity::insert(model)
        .exec(db)
        .await?;

    Ok(())
}

/// Find an organization by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Organization>> {
    let result = crate::entity::organization::Entity::find_by_id(id)
        .one(db)
        .await?;

    Ok(result.map(model_to_organization))
}

/// Find an organization by slug.
pub async fn find_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> AppResult<Option<Organization>> {
    let result = crate::entity::organization::Entity::find()
        .filter(crate::entity::organization::Column::Slug.eq(slug))
        .one(db)
        .await?;

    Ok(result.map(model_to_organization))
}

/// List the organizations a user belongs to (as member or owner), newest first.
pub async fn list_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<Vec<Organization>> {
    let member_org_ids: Vec<Uuid> = crate::entity::organization_member::Entity::find()
        .filter(crate::entity::organization_member::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.organization_id)
        .collect();

    let results = crate::entity::organization::Entity::find()
        .filter(
            Condition::any()
                .add(crate::entity::organization::Column::OwnerId.eq(user_id))
                .add(crate::entity::organization::Column::Id.is_in(member_org_ids)),
        )
        .order_by_desc(crate::entity::organization::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results.into_iter().map(model_to_organization).collect())
}

fn model_to_organization(m: crate::entity::organization::Model) -> Organization {
    Organization {
        id: m.id,
        name: m.name,
        slug: m.slug,
        owner_id: m.owner_id,
        created_at: m.created_at,
    }
}
