//! ListPeriodsHandler - Query handler for the billing periods of one
//! membership.

use std::sync::Arc;

use crate::domain::foundation::MembershipId;
use crate::domain::membership::{MembershipError, MembershipPeriod};
use crate::ports::MembershipRepository;

/// Query to list a membership's periods.
#[derive(Debug, Clone)]
pub struct ListPeriodsQuery {
    pub membership_id: MembershipId,
}

/// Result of successful listing. Empty for an unknown membership.
pub type ListPeriodsResult = Vec<MembershipPeriod>;

/// Handler for listing periods.
pub struct ListPeriodsHandler {
    repository: Arc<dyn MembershipRepository>,
}

impl ListPeriodsHandler {
    pub fn new(repository: Arc<dyn MembershipRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListPeriodsQuery) -> Result<ListPeriodsResult, MembershipError> {
        self.repository
            .list_periods(query.membership_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch periods of membership {}: {}",
                    query.membership_id,
                    e
                );
                MembershipError::period_fetch_failed(e)
            })
    }
}
