//! CreateMembershipHandler - Command handler for creating a membership and
//! its billing periods.

use std::sync::Arc;

use crate::domain::membership::{
    MembershipDraft, MembershipError, MembershipInput, MembershipWithPeriods,
};
use crate::ports::{Clock, MembershipRepository};

/// Command to create a membership.
#[derive(Debug, Clone)]
pub struct CreateMembershipCommand {
    pub input: MembershipInput,
}

/// Result of successful creation.
pub type CreateMembershipResult = MembershipWithPeriods;

/// Handler for creating memberships.
///
/// Input is defaulted and validated before any storage call, including the
/// check that the billing window ends at a representable date. The
/// membership is stored first; its periods are then generated lazily from
/// the stored record and inserted one by one.
///
/// The two steps are not atomic. If a period insert fails, the membership
/// and the periods inserted before it stay stored and the failure is
/// reported as `PeriodCreationFailed`.
pub struct CreateMembershipHandler {
    repository: Arc<dyn MembershipRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateMembershipHandler {
    pub fn new(repository: Arc<dyn MembershipRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateMembershipCommand,
    ) -> Result<CreateMembershipResult, MembershipError> {
        // 1. Default, derive and validate
        let now = self.clock.now();
        let new_membership = MembershipDraft::from_input(cmd.input, now)
            .validated()
            .map_err(|code| {
                tracing::debug!("Rejected membership input: {}", code);
                MembershipError::ValidationFailed(code)
            })?;

        // 2. Persist the membership
        let membership = self
            .repository
            .create_membership(&new_membership)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create membership: {}", e);
                MembershipError::creation_failed(e)
            })?;

        // 3. Generate and persist periods against the stored id
        let total = membership.billing_periods;
        let mut periods = Vec::new();
        for period in membership.planned_periods() {
            let stored = self
                .repository
                .create_period(&period.for_membership(membership.id))
                .await
                .map_err(|e| {
                    tracing::warn!(
                        "Membership {} stored with {} of {} periods: {}",
                        membership.id,
                        periods.len(),
                        total,
                        e
                    );
                    MembershipError::period_creation_failed(e)
                })?;
            periods.push(stored);
        }

        tracing::debug!(
            "Created membership {} with {} periods",
            membership.id,
            periods.len()
        );

        Ok(MembershipWithPeriods { membership, periods })
    }
}
