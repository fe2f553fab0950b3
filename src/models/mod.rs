//! Domain models for the Atrium server.

pub mod api_key;
pub mod invite;
pub mod member;
pub mod organization;
pub mod project;
pub mod role;
pub mod user;

// Re-export commonly used types
pub use api_key::{
    ADMIN_KEY_SCOPE, ApiKey, ApiKeyCreatedResponse, ApiKeyListItem, CreateApiKeyRequest,
    DEFAULT_KEY_SCOPE, MachinePrincipal,
};
pub use invite::{
    AcceptInviteQuery, CreateInviteRequest, Invite, InviteCreatedResponse, InviteResponse,
};
pub use member::{
    AddOrgMemberRequest, AddProjectMemberRequest, AssignableOrgRole, OrgMember, OrgMemberResponse,
    ProjectMember, ProjectMemberResponse, UpdateOrgMemberRequest, UpdateProjectMemberRequest,
};
pub use organization::{CreateOrganizationRequest, Organization, OrganizationResponse};
pub use project::{CreateProjectRequest, Project, ProjectResponse};
pub use role::{InviteRole, InviteStatus, OrgRole, ProjectRole};
pub use user::{LoginRequest, RegisterRequest, TokenResponse, User, UserResponse};
