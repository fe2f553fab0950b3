//! Database operations for users.

use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::User;

/// Insert a new user.
pub async fn insert<C: ConnectionTrait>(db: &C, user: &User) -> AppResult<()> {
    let model = crate::entity::user::ActiveModel {
        id: Set(user.id),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        created_at: Set(user.created_at),
    };

    crate::entity::user::Entity::insert(model).exec(db).await?;

    Ok(())
}

/// Find a user by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<User>> {
    let result = crate::entity::user::Entity::find_by_id(id).one(db).await?;

    Ok(result.map(model_to_user))
}

/// Find a user by email. Callers normalize the email first.
pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<Option<User>> {
    let result = crate::entity::user::Entity::find()
        .filter(crate::entity::user::Column::Email.eq(email))
        .one(db)
        .await?;

    Ok(result.map(model_to_user))
}

fn model_to_user(m: crate::entity::user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        created_at: m.created_at,
    }
}
