//! Actix-web extractors for request authentication.
//!
//! Two principal kinds exist: a human user carrying a signed bearer token,
//! and a machine caller carrying a raw project API key.
//!
//! # Security
//! - Secret header values are wrapped in `SecretString` on extraction
//! - Secrets are never logged or exposed in debug output
//! - API key verification is a keyed-hash point lookup, never a scan

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};

use crate::config::{API_KEY_HEADER, Config};
use crate::db::{self, DbPool};
use crate::error::AppError;
use crate::models::{MachinePrincipal, User};
use crate::services::{self, Clock, KeyedHasher};

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

fn app_data<T: 'static>(req: &HttpRequest) -> Result<web::Data<T>, AppError> {
    req.app_data::<web::Data<T>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("Application state not configured".to_string()))
}

/// Extractor for the authenticated human user behind a bearer token.
///
/// Use this in handlers that require a logged-in account:
/// ```ignore
/// async fn protected_handler(user: CurrentUser) -> impl Responder {
///     // user.0 is the resolved User
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = app_data::<DbPool>(req);
        let config = app_data::<Config>(req);

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|s| SecretString::from(s.to_string()));

        Box::pin(async move {
            let pool = pool?;
            let config = config?;

            let token = token
                .ok_or_else(|| AppError::Unauthorized("Missing Bearer token".to_string()))?;

            let user_id =
                services::session::verify(token.expose_secret(), &config.session_secret)?;

            let user = db::users::find_by_id(pool.connection(), user_id)
                .await?
                .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

            Ok(CurrentUser(user))
        })
    }
}

/// Extractor for a machine caller authenticated by API key.
///
/// The key is resolved to its project; revoked and expired keys are rejected
/// before the handler runs.
pub struct ApiKeyAuth {
    pub principal: MachinePrincipal,
}

impl FromRequest for ApiKeyAuth {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = app_data::<DbPool>(req);
        let clock = app_data::<Clock>(req);
        let hasher = app_data::<KeyedHasher>(req);

        // Wrapped immediately; dropped (and zeroized) when extraction ends
        let provided_key = extract_secret_header(req, API_KEY_HEADER);

        Box::pin(async move {
            let pool = pool?;
            let clock = clock?;
            let hasher = hasher?;

            let key = provided_key.ok_or_else(|| {
                AppError::Unauthorized(format!(
                    "Missing API key. Provide {} header.",
                    API_KEY_HEADER
                ))
            })?;

            let principal = services::api_key::authenticate(
                pool.connection(),
                &clock,
                &hasher,
                key.expose_secret(),
            )
            .await?;

            Ok(ApiKeyAuth { principal })
        })
    }
}
