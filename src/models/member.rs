//! Organization and project membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::role::{OrgRole, ProjectRole};

/// Organization membership row. Unique per (organization, user).
#[derive(Debug, Clone)]
pub struct OrgMember {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: OrgRole,
    pub created_at: DateTime<Utc>,
}

/// Project membership row. The (project, user) pair is the primary key.
#[derive(Debug, Clone)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: ProjectRole,
    pub created_at: DateTime<Utc>,
}

/// Roles assignable through member-management endpoints. The `owner`
/// membership row is written only by organization creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssignableOrgRole {
    #[default]
    Member,
    Admin,
}

impl AssignableOrgRole {
    pub fn to_org_role(self) -> OrgRole {
        match self {
            Self::Member => OrgRole::Member,
            Self::Admin => OrgRole::Admin,
        }
    }
}

/// Request to add (or upsert) an organization member.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddOrgMemberRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub role: AssignableOrgRole,
}

/// Request to change an organization member's role.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrgMemberRequest {
    pub role: AssignableOrgRole,
}

/// Organization member response.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrgMemberResponse {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: OrgRole,
    pub created_at: DateTime<Utc>,
}

impl From<OrgMember> for OrgMemberResponse {
    fn from(m: OrgMember) -> Self {
        Self {
            organization_id: m.organization_id,
            user_id: m.user_id,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

/// Request to add (or upsert) a project member.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProjectMemberRequest {
    pub user_id: Uuid,
    #[serde(default = "default_project_role")]
    pub role: ProjectRole,
}

fn default_project_role() -> ProjectRole {
    ProjectRole::Member
}

/// Request to change a project member's role.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectMemberRequest {
    pub role: ProjectRole,
}

/// Project member response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectMemberResponse {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: ProjectRole,
    pub created_at: DateTime<Utc>,
}

impl From<ProjectMember> for ProjectMemberResponse {
    fn from(m: ProjectMember) -> Self {
        Self {
            project_id: m.project_id,
            user_id: m.user_id,
            role: m.role,
            created_at: m.created_at,
        }
    }
}
