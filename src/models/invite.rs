//! Organization invite models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::role::{InviteRole, InviteStatus};

/// Organization invite stored in database. Invite-by-email: acceptance
/// requires an account whose email matches the invite.
#[derive(Debug, Clone)]
pub struct Invite {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Normalized (trimmed, lowercased) invitee email
    pub email: String,
    pub role: InviteRole,
    pub status: InviteStatus,
    /// First characters of the plaintext token, for operator display
    pub token_prefix: String,
    /// Keyed hash of the plaintext token (unique)
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub invited_by_user_id: Option<Uuid>,
    pub accepted_by_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Invite {
    /// Check if the invite is expired at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Request to create an organization invite.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInviteRequest {
    pub email: String,
    #[serde(default)]
    pub role: InviteRole,
}

/// Invite response. Carries no token material.
#[derive(Debug, Serialize, ToSchema)]
pub struct InviteResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    pub role: InviteRole,
    pub status: InviteStatus,
    pub invited_by_user_id: Option<Uuid>,
    pub accepted_by_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl From<Invite> for InviteResponse {
    fn from(inv: Invite) -> Self {
        Self {
            id: inv.id,
            organization_id: inv.organization_id,
            email: inv.email,
            role: inv.role,
            status: inv.status,
            invited_by_user_id: inv.invited_by_user_id,
            accepted_by_user_id: inv.accepted_by_user_id,
            created_at: inv.created_at,
            expires_at: inv.expires_at,
            accepted_at: inv.accepted_at,
            revoked_at: inv.revoked_at,
        }
    }
}

/// Response when creating or resending an invite. The plaintext token is
/// returned only in these two cases, exactly once.
#[derive(Debug, Serialize, ToSchema)]
pub struct InviteCreatedResponse {
    #[serde(flatten)]
    pub invite: InviteResponse,
    pub token: String,
    pub invite_link: String,
}

/// Query parameters for accepting an invite.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AcceptInviteQuery {
    pub token: String,
}
