//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum REST surface
//! - `memory` - Process-local repository
//! - `postgres` - sqlx-backed repository

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::InMemoryMembershipRepository;
pub use postgres::PostgresMembershipRepository;
