//! Role and status vocabularies for organizations, projects, and invites.
//!
//! Each scope has its own closed enumeration; unknown strings are rejected at
//! the boundary. Within a scope, roles form a total order and an equal or
//! higher rank passes a minimum-role check.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role within an organization. Ordering: member < admin < owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Member,
    Admin,
    Owner,
}

impl OrgRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrgRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role within a project. Ordering: member < admin. Projects have no "owner"
/// role; the owning organization's owner passes project checks implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Member,
    Admin,
}

impl ProjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role carried by an organization invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InviteRole {
    #[default]
    Member,
    Admin,
}

impl InviteRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Organization role granted when an invite with this role is accepted.
    pub fn granted_org_role(&self) -> OrgRole {
        match self {
            Self::Admin => OrgRole::Admin,
            Self::Member => OrgRole::Member,
        }
    }
}

impl std::fmt::Display for InviteRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of an organization invite.
///
/// pending -> accepted and pending -> revoked are terminal; token rotation
/// keeps the invite pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Revoked,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Revoked => "revoked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "revoked" => Some(Self::Revoked),
            _ => None,
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_role_ordering() {
        assert!(OrgRole::Member < OrgRole::Admin);
        assert!(OrgRole::Admin < OrgRole::Owner);
        assert!(OrgRole::Owner >= OrgRole::Admin);
        assert!(OrgRole::Admin >= OrgRole::Admin);
    }

    #[test]
    fn test_project_role_ordering() {
        assert!(ProjectRole::Member < ProjectRole::Admin);
        assert!(ProjectRole::Admin >= ProjectRole::Member);
    }

    #[test]
    fn test_parse_round_trip() {
        for role in [OrgRole::Member, OrgRole::Admin, OrgRole::Owner] {
            assert_eq!(OrgRole::parse(role.as_str()), Some(role));
        }
        for role in [ProjectRole::Member, ProjectRole::Admin] {
            assert_eq!(ProjectRole::parse(role.as_str()), Some(role));
        }
        for status in [
            InviteStatus::Pending,
            InviteStatus::Accepted,
            InviteStatus::Revoked,
        ] {
            assert_eq!(InviteStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert_eq!(OrgRole::parse("superuser"), None);
        assert_eq!(ProjectRole::parse("owner"), None);
        assert_eq!(InviteRole::parse("owner"), None);
        assert_eq!(InviteStatus::parse("expired"), None);
    }

    #[test]
    fn test_invite_role_grants_org_role() {
        assert_eq!(InviteRole::Admin.granted_org_role(), OrgRole::Admin);
        assert_eq!(InviteRole::Member.granted_org_role(), OrgRole::Member);
    }
}
