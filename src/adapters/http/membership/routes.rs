//! Route configuration for membership endpoints.
//!
//! Configures Axum router with membership-related routes.

use axum::routing::get;
use axum::Router;

use super::handlers::{
    create_membership, delete_membership, get_membership, health, list_memberships,
    list_periods, update_membership, MembershipAppState,
};

/// Creates the membership router with all endpoints.
///
/// Routes:
/// - `GET /memberships` - List memberships with their periods
/// - `POST /memberships` - Create a membership and generate its periods
/// - `GET /memberships/:id` - Get one membership with its periods
/// - `PUT /memberships/:id` - Partially update a membership
/// - `DELETE /memberships/:id` - Delete a membership
/// - `GET /memberships/:id/periods` - List the periods of a membership
/// - `GET /health` - Liveness probe
pub fn membership_router() -> Router<MembershipAppState> {
    Router::new()
        .route("/memberships", get(list_memberships).post(create_membership))
        .route(
            "/memberships/:id",
            get(get_membership)
                .put(update_membership)
                .delete(delete_membership),
        )
        .route("/memberships/:id/periods", get(list_periods))
        .route("/health", get(health))
}
