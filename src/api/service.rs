//! Machine-principal endpoints, authenticated by API key.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::ApiKeyAuth;
use crate::error::AppResult;
use crate::models::ADMIN_KEY_SCOPE;
use crate::services::api_key::require_scope;

/// Configure service routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ping).service(whoami).service(admin_only);
}

/// Liveness probe for machine callers; any valid key passes.
///
/// GET /api/v1/service/ping
#[utoipa::path(
    get,
    path = "/api/v1/service/ping",
    tag = "Service",
    responses(
        (status = 200, description = "Key authenticated", body = PingResponse),
        (status = 401, description = "Missing, invalid, revoked, or expired key")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/service/ping")]
pub async fn ping(auth: ApiKeyAuth) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(PingResponse {
        ok: true,
        project_id: auth.principal.project.id,
        project_slug: auth.principal.project.slug,
        message: "API key authenticated successfully".to_string(),
    }))
}

/// Identity of the calling key and its project.
///
/// GET /api/v1/service/whoami
#[utoipa::path(
    get,
    path = "/api/v1/service/whoami",
    tag = "Service",
    responses(
        (status = 200, description = "Caller identity", body = WhoamiResponse),
        (status = 401, description = "Missing, invalid, revoked, or expired key")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/service/whoami")]
pub async fn whoami(auth: ApiKeyAuth) -> AppResult<HttpResponse> {
    let principal = auth.principal;
    Ok(HttpResponse::Ok().json(WhoamiResponse {
        project_id: principal.project.id,
        project_slug: principal.project.slug,
        project_name: principal.project.name,
        api_key_id: principal.key.id,
        scope: principal.key.scope,
    }))
}

/// Requires a key with scope "admin". Scope comparison is exact.
///
/// GET /api/v1/service/admin-only
#[utoipa::path(
    get,
    path = "/api/v1/service/admin-only",
    tag = "Service",
    responses(
        (status = 200, description = "Admin scope granted", body = AdminOnlyResponse),
        (status = 401, description = "Missing, invalid, revoked, or expired key"),
        (status = 403, description = "Key lacks the admin scope")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/service/admin-only")]
pub async fn admin_only(auth: ApiKeyAuth) -> AppResult<HttpResponse> {
    require_scope(&auth.principal.key, ADMIN_KEY_SCOPE)?;

    Ok(HttpResponse::Ok().json(AdminOnlyResponse {
        message: "Admin access granted".to_string(),
        project_slug: auth.principal.project.slug,
    }))
}

/// Ping response for machine callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    pub ok: bool,
    pub project_id: Uuid,
    pub project_slug: String,
    pub message: String,
}

/// Caller identity response.
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoamiResponse {
    pub project_id: Uuid,
    pub project_slug: String,
    pub project_name: String,
    pub api_key_id: Uuid,
    pub scope: String,
}

/// Admin-scope confirmation response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOnlyResponse {
    pub message: String,
    pub project_slug: String,
}
