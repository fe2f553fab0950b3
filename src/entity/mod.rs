//! SeaORM entity definitions for PostgreSQL database.

pub mod api_key;
pub mod organization;
pub mod organization_invite;
pub mod organization_member;
pub mod project;
pub mod project_member;
pub mod user;
