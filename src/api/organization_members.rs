//! Organization member management endpoints.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{AddOrgMemberRequest, OrgMemberResponse, UpdateOrgMemberRequest};
use crate::services::{self, Clock};

/// Configure organization member routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_members)
        .service(add_member)
        .service(update_member_role)
        .service(remove_member);
}

/// List an organization's members. Caller must be a member.
///
/// GET /api/v1/organizations/{organization_id}/members
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{organization_id}/members",
    tag = "Organization Members",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Members", body = [OrgMemberResponse]),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Organization not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/organizations/{organization_id}/members")]
pub async fn list_members(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let members =
        services::membership::list_org_members(pool.connection(), path.into_inner(), &user.0)
            .await?;

    let items: Vec<OrgMemberResponse> = members.into_iter().map(OrgMemberResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// Add a member to an organization, or update the role of an existing one.
/// Caller must be org admin/owner.
///
/// POST /api/v1/organizations/{organization_id}/members
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{organization_id}/members",
    tag = "Organization Members",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID")
    ),
    request_body = AddOrgMemberRequest,
    responses(
        (status = 200, description = "Member added or role updated", body = OrgMemberResponse),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Organization or user not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/organizations/{organization_id}/members")]
pub async fn add_member(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<AddOrgMemberRequest>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
) -> AppResult<HttpResponse> {
    let member = services::membership::add_org_member(
        pool.connection(),
        clock.get_ref(),
        path.into_inner(),
        &user.0,
        body.user_id,
        body.role.to_org_role(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(OrgMemberResponse::from(member)))
}

/// Change an organization member's role. Caller must be org admin/owner.
///
/// PATCH /api/v1/organizations/{organization_id}/members/{user_id}
#[utoipa::path(
    patch,
    path = "/api/v1/organizations/{organization_id}/members/{user_id}",
    tag = "Organization Members",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID"),
        ("user_id" = Uuid, Path, description = "Member user ID")
    ),
    request_body = UpdateOrgMemberRequest,
    responses(
        (status = 200, description = "Role updated", body = OrgMemberResponse),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Organization member not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[patch("/organizations/{organization_id}/members/{user_id}")]
pub async fn update_member_role(
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateOrgMemberRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (organization_id, target_user_id) = path.into_inner();

    let member = services::membership::update_org_member_role(
        pool.connection(),
        organization_id,
        &user.0,
        target_user_id,
        body.role.to_org_role(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(OrgMemberResponse::from(member)))
}

/// Remove a member from an organization. Removing a non-member is a no-op.
/// Caller must be org admin/owner.
///
/// DELETE /api/v1/organizations/{organization_id}/members/{user_id}
#[utoipa::path(
    delete,
    path = "/api/v1/organizations/{organization_id}/members/{user_id}",
    tag = "Organization Members",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID"),
        ("user_id" = Uuid, Path, description = "Member user ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = RemoveMemberResponse),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Organization not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[delete("/organizations/{organization_id}/members/{user_id}")]
pub async fn remove_member(
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (organization_id, target_user_id) = path.into_inner();

    services::membership::remove_org_member(
        pool.connection(),
        organization_id,
        &user.0,
        target_user_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(RemoveMemberResponse {
        message: "Member removed".to_string(),
    }))
}

/// Confirmation body for member removal.
#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveMemberResponse {
    pub message: String,
}
