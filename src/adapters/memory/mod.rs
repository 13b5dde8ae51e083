//! In-memory adapters - Process-local implementations of repository ports.

mod membership_repository;

pub use membership_repository::InMemoryMembershipRepository;
