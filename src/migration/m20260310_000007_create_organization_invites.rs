//! Migration: Create organization_invites table.
//!
//! The partial unique index on (organization_id, email) WHERE status =
//! 'pending' enforces the single-pending-invite invariant under concurrent
//! creates; application pre-checks only supply the friendly error message.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE organization_invites (
                    id UUID PRIMARY KEY,
                    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
                    email VARCHAR(320) NOT NULL,
                    role VARCHAR(20) NOT NULL DEFAULT 'member'
                        CHECK (role IN ('member', 'admin')),
                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'accepted', 'revoked')),
                    token_prefix VARCHAR(12) NOT NULL,
                    token_hash VARCHAR(64) NOT NULL,
                    expires_at TIMESTAMPTZ NOT NULL,
                    invited_by_user_id UUID REFERENCES users(id) ON DELETE SET NULL,
                    accepted_by_user_id UUID REFERENCES users(id) ON DELETE SET NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    accepted_at TIMESTAMPTZ,
                    revoked_at TIMESTAMPTZ
                );

                CREATE UNIQUE INDEX idx_org_invites_token_hash
                    ON organization_invites(token_hash);

                -- At most one pending invite per (organization, email)
                CREATE UNIQUE INDEX idx_org_invites_pending_org_email
                    ON organization_invites(organization_id, email)
                    WHERE status = 'pending';

                CREATE INDEX idx_org_invites_organization_id
                    ON organization_invites(organization_id);
                CREATE INDEX idx_org_invites_email ON organization_invites(email);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS organization_invites CASCADE;")
            .await?;

        Ok(())
    }
}
