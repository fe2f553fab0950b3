//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atrium Server",
        version = "0.3.0",
        description = "Multi-tenant platform API: organizations, projects, role-based access control, project API keys, and organization invites"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::register,
        api::auth::login,
        api::auth::me,
        // Organization endpoints
        api::organizations::create_organization,
        api::organizations::list_my_organizations,
        api::organizations::get_organization,
        // Organization member endpoints
        api::organization_members::list_members,
        api::organization_members::add_member,
        api::organization_members::update_member_role,
        api::organization_members::remove_member,
        // Organization invite endpoints
        api::organization_invites::create_invite,
        api::organization_invites::list_invites,
        api::organization_invites::resend_invite,
        api::organization_invites::accept_invite,
        api::organization_invites::revoke_invite,
        // Project endpoints
        api::projects::create_project,
        api::projects::list_organization_projects,
        api::projects::list_my_projects,
        api::projects::get_project,
        // Project member endpoints
        api::project_members::list_project_members,
        api::project_members::my_project_membership,
        api::project_members::add_project_member,
        api::project_members::update_project_member_role,
        api::project_members::remove_project_member,
        // API key endpoints
        api::api_keys::create_key,
        api::api_keys::create_bootstrap_key,
        api::api_keys::list_keys,
        api::api_keys::revoke_key,
        api::api_keys::delete_key,
        // Service endpoints (machine principals)
        api::service::ping,
        api::service::whoami,
        api::service::admin_only,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth
            models::RegisterRequest,
            models::LoginRequest,
            models::TokenResponse,
            models::UserResponse,
            // Roles
            models::OrgRole,
            models::ProjectRole,
            models::InviteRole,
            models::InviteStatus,
            models::AssignableOrgRole,
            // Organizations
            models::CreateOrganizationRequest,
            models::OrganizationResponse,
            models::AddOrgMemberRequest,
            models::UpdateOrgMemberRequest,
            models::OrgMemberResponse,
            api::organization_members::RemoveMemberResponse,
            // Invites
            models::CreateInviteRequest,
            models::InviteResponse,
            models::InviteCreatedResponse,
            models::AcceptInviteQuery,
            // Projects
            models::CreateProjectRequest,
            models::ProjectResponse,
            models::AddProjectMemberRequest,
            models::UpdateProjectMemberRequest,
            models::ProjectMemberResponse,
            api::project_members::RemoveProjectMemberResponse,
            // API keys
            models::CreateApiKeyRequest,
            models::ApiKeyCreatedResponse,
            models::ApiKeyListItem,
            // Service
            api::service::PingResponse,
            api::service::WhoamiResponse,
            api::service::AdminOnlyResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login, and identity"),
        (name = "Organizations", description = "Organization management"),
        (name = "Organization Members", description = "Organization membership management"),
        (name = "Organization Invites", description = "Invite issuance, rotation, and acceptance"),
        (name = "Projects", description = "Project management"),
        (name = "Project Members", description = "Project membership management"),
        (name = "API Keys", description = "Project API key lifecycle"),
        (name = "Service", description = "Machine-principal endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer-token and API key security schemes.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-API-Key"),
                    ),
                ),
            );
        }
    }
}
