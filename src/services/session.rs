//! Session bearer tokens.
//!
//! Signed, expiring HS256 tokens carrying the user id as subject. The signing
//! secret is injected from configuration; nothing here reads the environment.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::clock::Clock;

/// Issuer claim stamped on every session token.
pub const SESSION_ISSUER: &str = "atrium";

/// Session JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub iat: usize,
    pub exp: usize,
}

/// Sign a session token for a user.
pub fn issue(
    user_id: Uuid,
    secret: &SecretString,
    ttl_secs: u64,
    clock: &Clock,
) -> AppResult<String> {
    let now = clock.now();
    let exp = now + chrono::Duration::seconds(ttl_secs as i64);

    let claims = SessionClaims {
        sub: user_id.to_string(),
        iss: SESSION_ISSUER.to_string(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };

    let key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
}

/// Verify a session token and return the subject user id. Any failure -
/// bad signature, wrong issuer, expiry, malformed subject - is Unauthorized.
pub fn verify(token: &str, secret: &SecretString) -> AppResult<Uuid> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_aud = false;

    let token_data = decode::<SessionClaims>(token, &key, &validation)
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn secret() -> SecretString {
        SecretString::from("test-session-secret")
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue(user_id, &secret(), 3600, &Clock::system()).unwrap();

        assert_eq!(verify(&token, &secret()).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = issue(Uuid::new_v4(), &secret(), 3600, &Clock::system()).unwrap();

        let result = verify(&token, &SecretString::from("other-secret"));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_fails() {
        // Issue from a clock far enough in the past that the token is expired
        // even after the validator's default leeway.
        let past = Clock::fixed(Utc::now() - Duration::hours(2));
        let token = issue(Uuid::new_v4(), &secret(), 3600, &past).unwrap();

        let result = verify(&token, &secret());
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_garbage_token_fails() {
        let result = verify("not-a-jwt", &secret());
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
