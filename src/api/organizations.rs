//! Organization endpoints.

use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateOrganizationRequest, OrganizationResponse};
use crate::services::{self, Clock};

/// Configure organization routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_organization)
        .service(list_my_organizations)
        .service(get_organization);
}

/// Create an organization. The caller becomes its owner.
///
/// POST /api/v1/organizations
#[utoipa::path(
    post,
    path = "/api/v1/organizations",
    tag = "Organizations",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = OrganizationResponse),
        (status = 409, description = "Slug already exists")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/organizations")]
pub async fn create_organization(
    user: CurrentUser,
    body: web::Json<CreateOrganizationRequest>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
) -> AppResult<HttpResponse> {
    let name = body.name.trim();
    let slug = body.slug.trim();
    if name.is_empty() || slug.is_empty() {
        return Err(AppError::InvalidInput(
            "Name and slug are required".to_string(),
        ));
    }

    let org =
        services::organization::create(pool.connection(), clock.get_ref(), &user.0, name, slug)
            .await?;

    Ok(HttpResponse::Created().json(OrganizationResponse::from(org)))
}

/// List the organizations the caller belongs to.
///
/// GET /api/v1/organizations
#[utoipa::path(
    get,
    path = "/api/v1/organizations",
    tag = "Organizations",
    responses(
        (status = 200, description = "Organizations", body = [OrganizationResponse])
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/organizations")]
pub async fn list_my_organizations(
    user: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let orgs = services::organization::list_mine(pool.connection(), &user.0).await?;

    let items: Vec<OrganizationResponse> =
        orgs.into_iter().map(OrganizationResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// Fetch a single organization. Caller must be a member.
///
/// GET /api/v1/organizations/{organization_id}
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{organization_id}",
    tag = "Organizations",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Organization", body = OrganizationResponse),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Organization not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/organizations/{organization_id}")]
pub async fn get_organization(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let org =
        services::organization::get(pool.connection(), path.into_inner(), &user.0).await?;

    Ok(HttpResponse::Ok().json(OrganizationResponse::from(org)))
}
