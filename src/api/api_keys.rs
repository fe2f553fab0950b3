//! Project API key endpoints.
//!
//! All operations require project-manage rights: project admin, or
//! admin/owner of the owning organization. The plaintext key appears only in
//! the creation response.

use actix_web::{HttpResponse, delete, get, post, web};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ApiKeyCreatedResponse, ApiKeyListItem, CreateApiKeyRequest};
use crate::services::{self, Clock, KeyedHasher, rbac};

/// Configure API key routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_key)
        .service(create_bootstrap_key)
        .service(list_keys)
        .service(revoke_key)
        .service(delete_key);
}

fn created_response(key: crate::models::ApiKey, plaintext: String) -> HttpResponse {
    HttpResponse::Created().json(ApiKeyCreatedResponse {
        id: key.id,
        api_key: plaintext,
        name: key.name,
        key_prefix: key.key_prefix,
        scope: key.scope,
        expires_at: key.expires_at,
        created_at: key.created_at,
    })
}

/// Issue a new API key for a project. The full key is returned once and
/// never recoverable again.
///
/// POST /api/v1/projects/{project_id}/keys
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/keys",
    tag = "API Keys",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "Key created; plaintext returned once", body = ApiKeyCreatedResponse),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/projects/{project_id}/keys")]
pub async fn create_key(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateApiKeyRequest>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
    hasher: web::Data<KeyedHasher>,
) -> AppResult<HttpResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }

    let db = pool.connection();
    let project = rbac::require_project_manage(db, path.into_inner(), user.0.id).await?;

    let (key, plaintext) = services::api_key::issue(
        db,
        clock.get_ref(),
        hasher.get_ref(),
        &project,
        body.name.trim(),
        body.scope.clone(),
        body.expires_at,
    )
    .await?;

    Ok(created_response(key, plaintext))
}

/// Issue the first key of a fresh project. Fails if the project already has
/// keys; the issued key always carries scope "admin".
///
/// POST /api/v1/projects/{project_id}/keys/bootstrap
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/keys/bootstrap",
    tag = "API Keys",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "Bootstrap key created", body = ApiKeyCreatedResponse),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Project already has API keys")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/projects/{project_id}/keys/bootstrap")]
pub async fn create_bootstrap_key(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateApiKeyRequest>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
    hasher: web::Data<KeyedHasher>,
) -> AppResult<HttpResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }

    let db = pool.connection();
    let project = rbac::require_project_manage(db, path.into_inner(), user.0.id).await?;

    let (key, plaintext) = services::api_key::issue_bootstrap(
        db,
        clock.get_ref(),
        hasher.get_ref(),
        &project,
        body.name.trim(),
        body.expires_at,
    )
    .await?;

    Ok(created_response(key, plaintext))
}

/// List a project's keys, newest first, plaintext masked to the prefix.
///
/// GET /api/v1/projects/{project_id}/keys
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/keys",
    tag = "API Keys",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Keys", body = [ApiKeyListItem]),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/projects/{project_id}/keys")]
pub async fn list_keys(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let db = pool.connection();
    let project = rbac::require_project_manage(db, path.into_inner(), user.0.id).await?;

    let keys = services::api_key::list(db, project.id).await?;

    let items: Vec<ApiKeyListItem> = keys.into_iter().map(ApiKeyListItem::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// Revoke a key. Revoking an already-revoked key succeeds unchanged.
///
/// POST /api/v1/projects/{project_id}/keys/{key_id}/revoke
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/keys/{key_id}/revoke",
    tag = "API Keys",
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("key_id" = Uuid, Path, description = "API key ID")
    ),
    responses(
        (status = 200, description = "Key revoked", body = ApiKeyListItem),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project or key not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/projects/{project_id}/keys/{key_id}/revoke")]
pub async fn revoke_key(
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
) -> AppResult<HttpResponse> {
    let (project_id, key_id) = path.into_inner();

    let db = pool.connection();
    let project = rbac::require_project_manage(db, project_id, user.0.id).await?;

    let key = services::api_key::revoke(db, clock.get_ref(), project.id, key_id).await?;

    Ok(HttpResponse::Ok().json(ApiKeyListItem::from(key)))
}

/// Hard delete a key.
///
/// DELETE /api/v1/projects/{project_id}/keys/{key_id}
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}/keys/{key_id}",
    tag = "API Keys",
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("key_id" = Uuid, Path, description = "API key ID")
    ),
    responses(
        (status = 204, description = "Key deleted"),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project or key not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[delete("/projects/{project_id}/keys/{key_id}")]
pub async fn delete_key(
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (project_id, key_id) = path.into_inner();

    let db = pool.connection();
    let project = rbac::require_project_manage(db, project_id, user.0.id).await?;

    services::api_key::delete(db, project.id, key_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
