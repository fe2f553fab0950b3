//! Organization invite endpoints.
//!
//! The plaintext invite token appears in exactly two responses: creation and
//! resend. Listings never carry token material.

use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    AcceptInviteQuery, CreateInviteRequest, InviteCreatedResponse, InviteResponse,
};
use crate::services::{self, Clock, KeyedHasher};
use crate::services::invite::build_invite_link;

/// Configure organization invite routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_invite)
        .service(list_invites)
        .service(resend_invite)
        .service(accept_invite)
        .service(revoke_invite);
}

/// Invite an email address into an organization. Caller must be org
/// admin/owner. The token and accept link are returned exactly once.
///
/// POST /api/v1/organizations/{organization_id}/invites
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{organization_id}/invites",
    tag = "Organization Invites",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID")
    ),
    request_body = CreateInviteRequest,
    responses(
        (status = 201, description = "Invite created; token returned once", body = InviteCreatedResponse),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Organization not found"),
        (status = 409, description = "Already a member, or pending invite exists")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/organizations/{organization_id}/invites")]
pub async fn create_invite(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateInviteRequest>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
    hasher: web::Data<KeyedHasher>,
) -> AppResult<HttpResponse> {
    let (invite, token) = services::invite::create(
        pool.connection(),
        clock.get_ref(),
        hasher.get_ref(),
        path.into_inner(),
        &user.0,
        &body.email,
        body.role,
    )
    .await?;

    let invite_link = build_invite_link(invite.id, &token);
    Ok(HttpResponse::Created().json(InviteCreatedResponse {
        invite: InviteResponse::from(invite),
        token,
        invite_link,
    }))
}

/// List an organization's invites (any status), newest first. Caller must be
/// org admin/owner.
///
/// GET /api/v1/organizations/{organization_id}/invites
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{organization_id}/invites",
    tag = "Organization Invites",
    params(
        ("organization_id" = Uuid, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Invites", body = [InviteResponse]),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Organization not found")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[get("/organizations/{organization_id}/invites")]
pub async fn list_invites(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let invites =
        services::invite::list(pool.connection(), path.into_inner(), &user.0).await?;

    let items: Vec<InviteResponse> = invites.into_iter().map(InviteResponse::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

/// Rotate a pending invite's token and extend its expiry. The previous token
/// becomes invalid immediately; the new one is returned once.
///
/// POST /api/v1/organizations/invites/{invite_id}/resend
#[utoipa::path(
    post,
    path = "/api/v1/organizations/invites/{invite_id}/resend",
    tag = "Organization Invites",
    params(
        ("invite_id" = Uuid, Path, description = "Invite ID")
    ),
    responses(
        (status = 200, description = "Token rotated; new token returned once", body = InviteCreatedResponse),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Invite not found"),
        (status = 409, description = "Invite is not pending")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/organizations/invites/{invite_id}/resend")]
pub async fn resend_invite(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
    hasher: web::Data<KeyedHasher>,
) -> AppResult<HttpResponse> {
    let (invite, token) = services::invite::resend(
        pool.connection(),
        clock.get_ref(),
        hasher.get_ref(),
        path.into_inner(),
        &user.0,
    )
    .await?;

    let invite_link = build_invite_link(invite.id, &token);
    Ok(HttpResponse::Ok().json(InviteCreatedResponse {
        invite: InviteResponse::from(invite),
        token,
        invite_link,
    }))
}

/// Accept an invite with its token. The caller's account email must match
/// the invite.
///
/// POST /api/v1/organizations/invites/{invite_id}/accept?token=...
#[utoipa::path(
    post,
    path = "/api/v1/organizations/invites/{invite_id}/accept",
    tag = "Organization Invites",
    params(
        ("invite_id" = Uuid, Path, description = "Invite ID"),
        ("token" = String, Query, description = "Plaintext invite token")
    ),
    responses(
        (status = 200, description = "Invite accepted", body = InviteResponse),
        (status = 403, description = "Invalid token or email mismatch"),
        (status = 404, description = "Invite not found"),
        (status = 409, description = "Invite is not pending"),
        (status = 410, description = "Invite expired")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/organizations/invites/{invite_id}/accept")]
pub async fn accept_invite(
    user: CurrentUser,
    path: web::Path<Uuid>,
    query: web::Query<AcceptInviteQuery>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
    hasher: web::Data<KeyedHasher>,
) -> AppResult<HttpResponse> {
    let invite = services::invite::accept(
        pool.connection(),
        clock.get_ref(),
        hasher.get_ref(),
        path.into_inner(),
        &query.token,
        &user.0,
    )
    .await?;

    Ok(HttpResponse::Ok().json(InviteResponse::from(invite)))
}

/// Revoke a pending invite. Caller must be org admin/owner.
///
/// POST /api/v1/organizations/invites/{invite_id}/revoke
#[utoipa::path(
    post,
    path = "/api/v1/organizations/invites/{invite_id}/revoke",
    tag = "Organization Invites",
    params(
        ("invite_id" = Uuid, Path, description = "Invite ID")
    ),
    responses(
        (status = 200, description = "Invite revoked", body = InviteResponse),
        (status = 403, description = "Requires org role: admin"),
        (status = 404, description = "Invite not found"),
        (status = 409, description = "Invite is not pending")
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[post("/organizations/invites/{invite_id}/revoke")]
pub async fn revoke_invite(
    user: CurrentUser,
    path: web::Path<Uuid>,
    pool: web::Data<DbPool>,
    clock: web::Data<Clock>,
) -> AppResult<HttpResponse> {
    let invite = services::invite::revoke(
        pool.connection(),
        clock.get_ref(),
        path.into_inner(),
        &user.0,
    )
    .await?;

    Ok(HttpResponse::Ok().json(InviteResponse::from(invite)))
}
