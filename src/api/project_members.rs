//! Project member management endpoints.
//!
//! Management operations are open to project admins and to admins/owners of
//! the owning organization.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    AddProjectMemberRequest, ProjectMemberResponse, UpdateProjectMemberRequest,
};
use crate::services::{self, Clock};

/// Configure project member routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_project_members)
        .service(my_project_membership)
        .service(add_project_member)
        .service(update_project_member_role)
        .service(remove_project_member);
}

/// List a project's members.
///
/// GET /api/v1/projects/{project_id}/members
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/members",
    tag = "Project Members",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Members", body = [ProjectMemberResponse]),
        (status = 403, description = "Not a project member"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/projects/{project_id}/members")]
pub async fn list_project_members(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let members = services::membership::list_project_members(
        pool.connection(),
        path.into_inner(),
        &user.0,
    )
    .await?;

    let items: Vec<ProjectMemberResponse> = members
        .into_iter()
        .map(ProjectMemberResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

/// The caller's own membership row in a project.
///
/// GET /api/v1/projects/{project_id}/members/me
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/members/me",
    tag = "Project Members",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Own membership", body = ProjectMemberResponse),
        (status = 403, description = "Not a project member"),
        (status = 404, description = "No explicit membership row")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/projects/{project_id}/members/me")]
pub async fn my_project_membership(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let member = services::membership::my_project_membership(
        pool.connection(),
        path.into_inner(),
        &user.0,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ProjectMemberResponse::from(member)))
}

/// Add a member to a project, or update the role of an existing one. The
/// target must already belong to the owning organization.
///
/// POST /api/v1/projects/{project_id}/members
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/members",
    tag = "Project Members",
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    request_body = AddProjectMemberRequest,
    responses(
        (status = 200, description = "Member added or role updated", body = ProjectMemberResponse),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project or user not found"),
        (status = 409, description = "User is not a member of the owning organization")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/projects/{project_id}/members")]
pub async fn add_project_member(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<AddProjectMemberRequest>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
) -> AppResult<HttpResponse> {
    let member = services::membership::add_project_member(
        pool.connection(),
        clock.get_ref(),
        path.into_inner(),
        &user.0,
        body.user_id,
        body.role,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ProjectMemberResponse::from(member)))
}

/// Change a project member's role.
///
/// PATCH /api/v1/projects/{project_id}/members/{user_id}
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{project_id}/members/{user_id}",
    tag = "Project Members",
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("user_id" = Uuid, Path, description = "Member user ID")
    ),
    request_body = UpdateProjectMemberRequest,
    responses(
        (status = 200, description = "Role updated", body = ProjectMemberResponse),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project member not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[patch("/projects/{project_id}/members/{user_id}")]
pub async fn update_project_member_role(
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateProjectMemberRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (project_id, target_user_id) = path.into_inner();

    let member = services::membership::update_project_member_role(
        pool.connection(),
        project_id,
        &user.0,
        target_user_id,
        body.role,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ProjectMemberResponse::from(member)))
}

/// Remove a member from a project. Removing a non-member is a no-op.
///
/// DELETE /api/v1/projects/{project_id}/members/{user_id}
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}/members/{user_id}",
    tag = "Project Members",
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("user_id" = Uuid, Path, description = "Member user ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = RemoveProjectMemberResponse),
        (status = 403, description = "Requires project admin or organization admin"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[delete("/projects/{project_id}/members/{user_id}")]
pub async fn remove_project_member(
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (project_id, target_user_id) = path.into_inner();

    services::membership::remove_project_member(
        pool.connection(),
        project_id,
        &user.0,
        target_user_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(RemoveProjectMemberResponse {
        message: "Project member removed".to_string(),
    }))
}

/// Confirmation body for member removal.
#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveProjectMemberResponse {
    pub message: String,
}
