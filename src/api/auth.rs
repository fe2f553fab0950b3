//! Account registration, login, and identity endpoints.

use actix_web::{HttpResponse, get, post, web};

use crate::auth::CurrentUser;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::services::{self, Clock};

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(me);
}

/// Register a new account.
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
#[post("/auth/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
) -> AppResult<HttpResponse> {
    let user = services::account::register(
        pool.connection(),
        clock.get_ref(),
        &body.name,
        &body.email,
        &body.password,
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Log in and receive a bearer token.
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
#[post("/auth/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    clock: web::Data<Clock>,
) -> AppResult<HttpResponse> {
    let user = services::account::login(pool.connection(), &body.email, &body.password).await?;

    let token = services::session::issue(
        user.id,
        &config.session_secret,
        config.session_ttl_secs,
        clock.get_ref(),
    )?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

/// The authenticated account behind the presented bearer token.
///
/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/auth/me")]
pub async fn me(user: CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user.0)))
}
