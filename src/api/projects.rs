//! Project endpoints.

use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateProjectRequest, ProjectResponse};
use crate::services::{self, Clock};

/// Configure project routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_project)
        .service(list_organization_projects)
        .service(list_my_projects)
        .service(get_project);
}

/// Create a project under an organization. Caller must be org admin/owner;
/// the creator becomes an explicit project admin member.
///
/// POST /api/v1/organizations/{organization_id}/projects
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{organization_id}/projects",
    tag = "Projects",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID")
    ),
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Organization not found"),
        (status = 409, description = "Slug already exists")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/organizations/{organization_id}/projects")]
pub async fn create_project(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateProjectRequest>,
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

    let project = services::project::create(
        pool.connection(),
        clock.get_ref(),
        path.into_inner(),
        &user.0,
        name,
        slug,
    )
    .await?;

    Ok(HttpResponse::Created().json(ProjectResponse::from(project)))
}

/// List an organization's projects. Caller must be an org member.
///
/// GET /api/v1/organizations/{organization_id}/projects
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{organization_id}/projects",
    tag = "Projects",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Projects", body = [ProjectResponse]),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Organization not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/organizations/{organization_id}/projects")]
pub async fn list_organization_projects(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let projects = services::project::list_for_organization(
        pool.connection(),
        path.into_inner(),
        &user.0,
    )
    .await?;

    let items: Vec<ProjectResponse> = projects.into_iter().map(ProjectResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// List the projects the caller belongs to.
///
/// GET /api/v1/projects
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    responses(
        (status = 200, description = "Projects", body = [ProjectResponse])
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/projects")]
pub async fn list_my_projects(
    user: CurrentUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let projects = services::project::list_mine(pool.connection(), &user.0).await?;

    let items: Vec<ProjectResponse> = projects.into_iter().map(ProjectResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// Fetch a single project. Caller must be a project member (or org owner).
///
/// GET /api/v1/projects/{project_id}
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}",
    tag = "Projects",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 403, description = "Not a project member"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/projects/{project_id}")]
pub async fn get_project(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let project = services::project::get(pool.connection(), path.into_inner(), &user.0).await?;

    Ok(HttpResponse::Ok().json(ProjectResponse::from(project)))
}
