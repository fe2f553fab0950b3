//! Database operations for API keys.

use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::ApiKey;

/// Insert a new API key.
pub async fn insert<C: ConnectionTrait>(db: &C, key: &ApiKey) -> AppResult<()> {
    let model = crate::entity::api_key::ActiveModel {
        id: Set(key.id),
        project_id: Set(key.project_id),
        name: Set(key.name.clone()),
        key_prefix: Set(key.key_prefix.clone()),
        key_hash: Set(key.key_hash.clone()),
        scope: Set(key.scope.clone()),
        created_at: Set(key.created_at),
        last_used_at: Set(key.last_used_at),
        expires_at: Set(key.expires_at),
        revoked_at: Set(key.revoked_at),
    };

    crate::entity::api_key::Entity::insert(model).exec(db).await?;

    Ok(())
}

/// Find an API key by its keyed hash. O(1) point lookup via the unique index;
/// raw keys are never scanned or compared.
pub async fn find_by_hash<C: ConnectionTrait>(db: &C, key_hash: &str) -> AppResult<Option<ApiKey>> {
    let result = crate::entity::api_key::Entity::find()
        .filter(crate::entity::api_key::Column::KeyHash.eq(key_hash))
        .one(db)
        .await?;

    Ok(result.map(model_to_api_key))
}

/// Find an API key by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<ApiKey>> {
    let result = crate::entity::api_key::Entity::find_by_id(id).one(db).await?;

    Ok(result.map(model_to_api_key))
}

/// Count keys belonging to a project, revoked included.
pub async fn count_for_project<C: ConnectionTrait>(db: &C, project_id: Uuid) -> AppResult<u64> {
    let count = crate::entity::api_key::Entity::find()
        .filter(crate::entity::api_key::Column::ProjectId.eq(project_id))
        .count(db)
        .await?;

    Ok(count)
}

/// List all keys belonging to a project, newest first.
pub async fn list_for_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> AppResult<Vec<ApiKey>> {
    let results = crate::entity::api_key::Entity::find()
        .filter(crate::entity::api_key::Column::ProjectId.eq(project_id))
        .order_by_desc(crate::entity::api_key::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results.into_iter().map(model_to_api_key).collect())
}

/// Update last used timestamp.
pub async fn touch_last_used<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<()> {
    crate::entity::api_key::Entity::update_many()
        .col_expr(
            crate::entity::api_key::Column::LastUsedAt,
            Expr::value(Some(now)),
        )
        .filter(crate::entity::api_key::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(())
}

/// Set revoked_at on a key that is not yet revoked. Returns the number of
/// rows changed; zero means the key was already revoked (or absent).
pub async fn mark_revoked<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let result = crate::entity::api_key::Entity::update_many()
        .col_expr(
            crate::entity::api_key::Column::RevokedAt,
            Expr::value(Some(now)),
        )
        .filter(crate::entity::api_key::Column::Id.eq(id))
        .filter(crate::entity::api_key::Column::RevokedAt.is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Hard delete a key. Returns the number of rows removed.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<u64> {
    let result = crate::entity::api_key::Entity::delete_by_id(id).exec(db).await?;

    Ok(result.rows_affected)
}

fn model_to_api_key(m: crate::entity::api_key::Model) -> ApiKey {
    ApiKey {
        id: m.id,
        project_id: m.project_id,
        name: m.name,
        key_prefix: m.key_prefix,
        key_hash: m.key_hash,
        scope: m.scope,
        created_at: m.created_at,
        last_used_at: m.last_used_at,
        expires_at: m.expires_at,
        revoked_at: m.revoked_at,
    }
}
