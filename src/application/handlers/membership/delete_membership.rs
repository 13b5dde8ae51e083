//! DeleteMembershipHandler - Command handler for deleting a membership.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::MembershipId;
use crate::domain::membership::MembershipError;
use crate::ports::MembershipRepository;

/// Command to delete a membership.
#[derive(Debug, Clone)]
pub struct DeleteMembershipCommand {
    pub id: MembershipId,
}

/// Outcome of a delete that reached storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteMembershipResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteMembershipResult {
    fn deleted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn not_found() -> Self {
        Self {
            success: false,
            error: Some("Membership not found".to_string()),
        }
    }
}

/// Handler for deleting memberships.
///
/// Deleting an unknown id is reported as `success: false`, not as an error.
/// Periods are removed by storage along with the membership.
pub struct DeleteMembershipHandler {
    repository: Arc<dyn MembershipRepository>,
}

impl DeleteMembershipHandler {
    pub fn new(repository: Arc<dyn MembershipRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: DeleteMembershipCommand,
    ) -> Result<DeleteMembershipResult, MembershipError> {
        let deleted = self
            .repository
            .delete_membership(cmd.id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete membership {}: {}", cmd.id, e);
                MembershipError::delete_failed(e)
            })?;

        if deleted {
            tracing::debug!("Deleted membership {}", cmd.id);
            Ok(DeleteMembershipResult::deleted())
        } else {
            Ok(DeleteMembershipResult::not_found())
        }
    }
}
