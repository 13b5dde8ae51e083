//! UpdateMembershipHandler - Command handler for partially updating a
//! membership.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MembershipId};
use crate::domain::membership::{
    MembershipChanges, MembershipError, MembershipWithPeriods, ValidationCode,
};
use crate::ports::{Clock, MembershipRepository};

/// Command to update a membership.
#[derive(Debug, Clone)]
pub struct UpdateMembershipCommand {
    pub id: MembershipId,
    pub changes: MembershipChanges,
}

/// Result of successful update.
pub type UpdateMembershipResult = MembershipWithPeriods;

/// Handler for updating memberships.
///
/// Only existence is checked; the merged record is not run through the
/// validation rules. A merged window that would end outside the calendar
/// range is rejected as `invalidBillingPeriods` before anything is written. The derived `valid_until` and `state` of the merged
/// record are stored along with the changes. Existing periods are left
/// untouched.
pub struct UpdateMembershipHandler {
    repository: Arc<dyn MembershipRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateMembershipHandler {
    pub fn new(repository: Arc<dyn MembershipRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn handle(
        &self,
        cmd: UpdateMembershipCommand,
    ) -> Result<UpdateMembershipResult, MembershipError> {
        let id = cmd.id;
        let failed = |e: DomainError| {
            tracing::error!("Failed to update membership {}: {}", id, e);
            MembershipError::update_failed(e)
        };

        // 1. Confirm the membership exists
        let existing = self
            .repository
            .get_membership(id)
            .await
            .map_err(failed)?
            .ok_or(MembershipError::not_found(id))?;

        // 2. Merge and store, keeping derived fields consistent
        let now = self.clock.now();
        let merged = existing.merged_with(&cmd.changes, now).map_err(|e| {
            tracing::debug!("Rejected update of membership {}: {}", id, e);
            MembershipError::ValidationFailed(ValidationCode::InvalidBillingPeriods)
        })?;
        let changes = cmd.changes.with_derived(&merged);

        let updated = self
            .repository
            .update_membership(id, &changes)
            .await
            .map_err(failed)?
            .ok_or_else(|| {
                tracing::warn!("Membership {} disappeared during update", id);
                MembershipError::UpdateFailed { cause: None }
            })?;

        // 3. Re-fetch periods
        let periods = self.repository.list_periods(id).await.map_err(failed)?;

        let membership = updated
            .rederive(now)
            .map_err(|e| failed(DomainError::from(e)))?;

        Ok(MembershipWithPeriods { membership, periods })
    }
}
