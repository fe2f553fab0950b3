//! API key models for machine authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::project::Project;

/// Default scope assigned to newly issued keys.
pub const DEFAULT_KEY_SCOPE: &str = "default";

/// Scope forced onto bootstrap keys.
pub const ADMIN_KEY_SCOPE: &str = "admin";

/// API key stored in database. The plaintext secret is generated once,
/// returned once, and never stored; only the keyed hash survives.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    /// First characters of the full key, for identification in listings
    pub key_prefix: String,
    /// Keyed hash of the full key (unique)
    pub key_hash: String,
    /// Free-form scope tag, compared by exact match
    pub scope: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Check if the key is revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if the key is expired at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Authenticated machine principal: a valid API key and its project.
#[derive(Debug, Clone)]
pub struct MachinePrincipal {
    pub key: ApiKey,
    pub project: Project,
}

/// Request to create a new API key.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub scope: Option<String>,
    /// Optional expiry instant; omitted keys never expire
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response when creating a new API key (includes the full key, shown once).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyCreatedResponse {
    pub id: Uuid,
    /// Full plaintext key - only returned at creation
    pub api_key: String,
    pub name: String,
    pub key_prefix: String,
    pub scope: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Response for listing API keys (key masked down to its prefix).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyListItem {
    pub id: Uuid,
    pub name: String,
    pub key_prefix: String,
    pub scope: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl From<ApiKey> for ApiKeyListItem {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            key_prefix: key.key_prefix,
            scope: key.scope,
            created_at: key.created_at,
            last_used_at: key.last_used_at,
            expires_at: key.expires_at,
            revoked_at: key.revoked_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_key(expires_at: Option<DateTime<Utc>>, revoked_at: Option<DateTime<Utc>>) -> ApiKey {
        let now = Utc::now();
        ApiKey {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: "CI".to_string(),
            key_prefix: "ak_abcde".to_string(),
            key_hash: "0".repeat(64),
            scope: DEFAULT_KEY_SCOPE.to_string(),
            created_at: now,
            last_used_at: None,
            expires_at,
            revoked_at,
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let key = test_key(Some(now), None);
        // expires_at <= now counts as expired
        assert!(key.is_expired(now));
        assert!(!key.is_expired(now - Duration::seconds(1)));
    }

    #[test]
    fn test_key_without_expiry_never_expires() {
        let key = test_key(None, None);
        assert!(!key.is_expired(Utc::now() + Duration::days(365 * 100)));
    }

    #[test]
    fn test_revoked_flag() {
        assert!(test_key(None, Some(Utc::now())).is_revoked());
        assert!(!test_key(None, None).is_revoked());
    }
}
