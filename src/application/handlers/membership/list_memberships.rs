//! ListMembershipsHandler - Query handler for listing every membership with
//! its billing periods.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::domain::foundation::DomainError;
use crate::domain::membership::{MembershipError, MembershipWithPeriods};
use crate::ports::{Clock, MembershipRepository};

/// Query to list all memberships.
#[derive(Debug, Clone, Default)]
pub struct ListMembershipsQuery;

/// Result of successful listing.
pub type ListMembershipsResult = Vec<MembershipWithPeriods>;

/// Handler for listing memberships.
///
/// Loads every membership, then the periods of each, and pairs them. A
/// failure of any single storage call fails the whole listing.
pub struct ListMembershipsHandler {
    repository: Arc<dyn MembershipRepository>,
    clock: Arc<dyn Clock>,
}

impl ListMembershipsHandler {
    pub fn new(repository: Arc<dyn MembershipRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn handle(
        &self,
        _query: ListMembershipsQuery,
    ) -> Result<ListMembershipsResult, MembershipError> {
        let memberships = self.repository.list_memberships().await.map_err(|e| {
            tracing::error!("Failed to list memberships: {}", e);
            MembershipError::fetch_failed(e)
        })?;

        let now = self.clock.now();
        let repository = &self.repository;
        let aggregates = memberships.into_iter().map(|membership| async move {
            let periods = repository.list_periods(membership.id).await?;
            Ok::<_, DomainError>(MembershipWithPeriods {
                membership: membership.rederive(now)?,
                periods,
            })
        });

        try_join_all(aggregates).await.map_err(|e| {
            tracing::error!("Failed to fetch periods while listing memberships: {}", e);
            MembershipError::fetch_failed(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock_repository::{
        stored_membership, stored_period, ts, MockMembershipRepository,
    };
    use super::*;
    use crate::domain::membership::MembershipState;
    use crate::ports::FixedClock;

    fn handler(repo: MockMembershipRepository) -> ListMembershipsHandler {
        ListMembershipsHandler::new(Arc::new(repo), Arc::new(FixedClock(ts(2024, 3, 15))))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn returns_empty_list_when_no_memberships() {
        let result = handler(MockMembershipRepository::new())
            .handle(ListMembershipsQuery)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn pairs_each_membership_with_its_periods() {
        let repo = MockMembershipRepository::new();
        repo.insert(stored_membership(1, ts(2024, 1, 1)));
        repo.insert(stored_membership(2, ts(2024, 2, 1)));
        repo.insert_period(stored_period(1, 1, ts(2024, 1, 1)));
        repo.insert_period(stored_period(2, 1, ts(2024, 2, 1)));
        repo.insert_period(stored_period(3, 2, ts(2024, 2, 1)));

        let result = handler(repo).handle(ListMembershipsQuery).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].membership.id.as_i32(), 1);
        assert_eq!(result[0].periods.len(), 2);
        assert_eq!(result[1].periods.len(), 1);
        assert!(result
            .iter()
            .all(|a| a.periods.iter().all(|p| p.membership_id == a.membership.id)));
    }

    #[tokio::test]
    async fn rederives_state_and_valid_until() {
        let repo = MockMembershipRepository::with_membership(stored_membership(1, ts(2024, 1, 1)));

        let result = handler(repo).handle(ListMembershipsQuery).await.unwrap();

        assert_eq!(result[0].membership.valid_until, ts(2024, 7, 1));
        assert_eq!(result[0].membership.state, MembershipState::Active);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fails_when_list_fails() {
        let repo = MockMembershipRepository {
            fail_list: true,
            ..Default::default()
        };

        let result = handler(repo).handle(ListMembershipsQuery).await;
        assert!(matches!(result, Err(MembershipError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn fails_when_any_period_fetch_fails() {
        let repo = MockMembershipRepository {
            fail_list_periods: true,
            ..Default::default()
        };
        repo.insert(stored_membership(1, ts(2024, 1, 1)));

        let err = handler(repo).handle(ListMembershipsQuery).await.unwrap_err();
        assert_eq!(err.code(), "MEMBERSHIP_FETCH_FAILED");
        assert!(err.cause().is_some());
    }
}
