//! Membership period entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{MembershipId, MembershipPeriodId, Timestamp};

use super::PeriodState;

/// One billing cycle of a membership, as stored.
///
/// The interval is half-open: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPeriod {
    pub id: MembershipPeriodId,
    pub uuid: Uuid,
    pub membership_id: MembershipId,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Free text; generated periods start as `planned`.
    pub state: String,
}

/// A generated period not yet tied to a stored membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPeriod {
    pub uuid: Uuid,
    pub start: Timestamp,
    pub end: Timestamp,
    pub state: PeriodState,
}

impl PlannedPeriod {
    /// Attaches the owning membership once its storage id is known.
    pub fn for_membership(self, membership_id: MembershipId) -> NewMembershipPeriod {
        NewMembershipPeriod {
            uuid: self.uuid,
            membership_id,
            start: self.start,
            end: self.end,
            state: self.state.as_str().to_string(),
        }
    }
}

/// Fields of a period to be persisted; storage assigns the `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMembershipPeriod {
    pub uuid: Uuid,
    pub membership_id: MembershipId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub state: String,
}

impl NewMembershipPeriod {
    /// Builds the stored representation with the id storage assigned.
    pub fn into_period(self, id: MembershipPeriodId) -> MembershipPeriod {
        MembershipPeriod {
            id,
            uuid: self.uuid,
            membership_id: self.membership_id,
            start: self.start,
            end: self.end,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_membership_attaches_owner_and_keeps_identity() {
        let planned = PlannedPeriod {
            uuid: Uuid::new_v4(),
            start: Timestamp::now().start_of_day(),
            end: Timestamp::now().start_of_day().checked_add_days(7).unwrap(),
            state: PeriodState::Planned,
        };
        let uuid = planned.uuid;

        let new_period = planned.for_membership(MembershipId::new(9));

        assert_eq!(new_period.membership_id, MembershipId::new(9));
        assert_eq!(new_period.uuid, uuid);
        assert_eq!(new_period.state, "planned");
    }
}
