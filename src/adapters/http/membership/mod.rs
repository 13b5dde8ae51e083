//! HTTP adapter for membership endpoints.
//!
//! Exposes the membership domain via REST API:
//! - `GET /memberships` - List memberships with their periods
//! - `POST /memberships` - Create a membership
//! - `GET /memberships/:id` - Get one membership
//! - `PUT /memberships/:id` - Update a membership
//! - `DELETE /memberships/:id` - Delete a membership
//! - `GET /memberships/:id/periods` - List billing periods
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{MembershipApiError, MembershipAppState};
pub use routes::membership_router;
