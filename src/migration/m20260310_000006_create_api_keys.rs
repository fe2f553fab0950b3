//! Migration: Create api_keys table.
//!
//! Machine credentials scoped to a project. Only the keyed hash of the
//! secret is stored; the unique index makes authentication an O(1) point
//! lookup and is the backstop against hash collisions at insert time.

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
                CREATE TABLE api_keys (
                    id UUID PRIMARY KEY,
                    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                    name VARCHAR(100) NOT NULL,
                    key_prefix VARCHAR(12) NOT NULL,
                    key_hash VARCHAR(64) NOT NULL,
                    scope VARCHAR(50) NOT NULL DEFAULT 'default',

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    last_used_at TIMESTAMPTZ,
                    expires_at TIMESTAMPTZ,
                    revoked_at TIMESTAMPTZ
                );

                CREATE UNIQUE INDEX idx_api_keys_key_hash ON api_keys(key_hash);
                CREATE INDEX idx_api_keys_project_id ON api_keys(project_id);

                -- Index for prefix lookup (showing key prefix in UI)
                CREATE INDEX idx_api_keys_key_prefix ON api_keys(key_prefix);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS api_keys CASCADE;")
            .await?;

        Ok(())
    }
}
