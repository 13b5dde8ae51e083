//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresMembershipRepository` - Memberships and their billing periods

mod membership_repository;

pub use membership_repository::PostgresMembershipRepository;
