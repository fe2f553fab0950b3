//! Account registration and login.

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::services::clock::Clock;
use crate::services::hasher;
use crate::services::invite::normalize_email;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Register a new account. Emails are stored normalized (trimmed,
/// lowercased) so invite matching and login are case-insensitive.
pub async fn register<C: ConnectionTrait>(
    db: &C,
    clock: &Clock,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<User> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }

    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput(
            "A valid email address is required".to_string(),
        ));
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if db::users::find_by_email(db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email,
        password_hash: hasher::hash_password(password)?,
        created_at: clock.now(),
    };

    db::users::insert(db, &user).await?;

    Ok(user)
}

/// Verify credentials and return the account. A missing account and a wrong
/// password produce the same error; nothing reveals which one failed.
pub async fn login<C: ConnectionTrait>(db: &C, email: &str, password: &str) -> AppResult<User> {
    let email = normalize_email(email);

    match db::users::find_by_email(db, &email).await? {
        Some(user) if hasher::verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(AppError::Unauthorized("Invalid credentials".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = register(&db, &Clock::system(), "Bob", "bob@example.com", "short").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::entity::user::Model>::new()])
            .append_exec_results([sea_orm::MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let user = register(
            &db,
            &Clock::system(),
            "Bob",
            "  Bob@Example.COM ",
            "long enough password",
        )
        .await
        .unwrap();
        assert_eq!(user.email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let hash = hasher::hash_password("right password").unwrap();
        let known_user = crate::entity::user::Model {
            id: Uuid::new_v4(),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password_hash: hash,
            created_at: Utc::now(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::entity::user::Model>::new()])
            .append_query_results([vec![known_user]])
            .into_connection();

        let unknown = login(&db, "nobody@example.com", "whatever").await;
        let wrong = login(&db, "bob@example.com", "wrong password").await;

        match (unknown, wrong) {
            (Err(AppError::Unauthorized(a)), Err(AppError::Unauthorized(b))) => {
                assert_eq!(a, b);
            }
            other => panic!("expected two Unauthorized errors, got {:?}", other),
        }
    }
}
