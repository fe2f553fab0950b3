//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260310_000001_create_users;
mod m20260310_000002_create_organizations;
mod m20260310_000003_create_organization_members;
mod m20260310_000004_create_projects;
mod m20260310_000005_create_project_members;
mod m20260310_000006_create_api_keys;
mod m20260310_000007_create_organization_invites;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260310_000001_create_users::Migration),
            Box::new(m20260310_000002_create_organizations::Migration),
            Box::new(m20260310_000003_create_organization_members::Migration),
            Box::new(m20260310_000004_create_projects::Migration),
            Box::new(m20260310_000005_create_project_members::Migration),
            Box::new(m20260310_000006_create_api_keys::Migration),
            Box::new(m20260310_000007_create_organization_invites::Migration),
        ]
    }
}
