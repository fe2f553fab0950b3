//! API endpoint modules.

pub mod api_keys;
pub mod auth;
pub mod health;
pub mod openapi;
pub mod organization_invites;
pub mod organization_members;
pub mod organizations;
pub mod project_members;
pub mod projects;
pub mod service;

pub use api_keys::configure_routes as configure_api_key_routes;
pub use auth::configure_routes as configure_auth_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use organization_invites::configure_routes as configure_invite_routes;
pub use organization_members::configure_routes as configure_org_member_routes;
pub use organizations::configure_routes as configure_organization_routes;
pub use project_members::configure_routes as configure_project_member_routes;
pub use projects::configure_routes as configure_project_routes;
pub use service::configure_routes as configure_service_routes;
