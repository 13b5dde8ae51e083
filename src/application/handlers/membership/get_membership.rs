//! GetMembershipHandler - Query handler for retrieving one membership.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MembershipId};
use crate::domain::membership::{MembershipError, MembershipWithPeriods};
use crate::ports::{Clock, MembershipRepository};

/// Query to get a membership by id.
#[derive(Debug, Clone)]
pub struct GetMembershipQuery {
    pub id: MembershipId,
}

/// Result of successful membership query. `None` means no such membership.
pub type GetMembershipResult = Option<MembershipWithPeriods>;

/// Handler for retrieving a membership and its periods.
pub struct GetMembershipHandler {
    repository: Arc<dyn MembershipRepository>,
    clock: Arc<dyn Clock>,
}

impl GetMembershipHandler {
    pub fn new(repository: Arc<dyn MembershipRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn handle(
        &self,
        query: GetMembershipQuery,
    ) -> Result<GetMembershipResult, MembershipError> {
        let Some(membership) = self
            .repository
            .get_membership(query.id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch membership {}: {}", query.id, e);
                MembershipError::fetch_failed(e)
            })?
        else {
            return Ok(None);
        };

        let periods = self.repository.list_periods(query.id).await.map_err(|e| {
            tracing::error!("Failed to fetch periods of membership {}: {}", query.id, e);
            MembershipError::fetch_failed(e)
        })?;

        let membership = membership.rederive(self.clock.now()).map_err(|e| {
            tracing::error!("Stored membership {} has no valid window: {}", query.id, e);
            MembershipError::fetch_failed(DomainError::from(e))
        })?;

        Ok(Some(MembershipWithPeriods { membership, periods }))
    }
}
