//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `MembershipRepository` - Membership and period persistence
//! - `Clock` - Source of the current instant

mod clock;
mod membership_repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use membership_repository::MembershipRepository;
