//! Business logic services.

pub mod account;
pub mod api_key;
pub mod clock;
pub mod hasher;
pub mod invite;
pub mod membership;
pub mod organization;
pub mod project;
pub mod rbac;
pub mod session;

pub use clock::Clock;
pub use hasher::KeyedHasher;
