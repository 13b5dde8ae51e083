//! Mock `MembershipRepository` shared by the handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, MembershipId, MembershipPeriodId, Timestamp,
};
use crate::domain::membership::{
    BillingInterval, Membership, MembershipChanges, MembershipPeriod, MembershipState,
    NewMembership, NewMembershipPeriod, PaymentMethod,
};
use crate::ports::MembershipRepository;

#[derive(Default)]
pub(super) struct MockState {
    pub memberships: Vec<Membership>,
    pub periods: Vec<MembershipPeriod>,
    pub next_membership_id: i32,
    pub next_period_id: i32,
    pub create_membership_calls: usize,
    pub create_period_calls: usize,
    pub update_calls: Vec<(MembershipId, MembershipChanges)>,
}

/// In-process repository with per-operation failure switches.
#[derive(Default)]
pub(super) struct MockMembershipRepository {
    pub state: Mutex<MockState>,
    pub fail_list: bool,
    pub fail_get: bool,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fail_delete: bool,
    pub fail_list_periods: bool,
    /// Fails the n-th period insert (zero-based) and every one after it.
    pub fail_create_period_from: Option<usize>,
}

impl MockMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_membership(membership: Membership) -> Self {
        let repo = Self::new();
        repo.insert(membership);
        repo
    }

    pub fn insert(&self, membership: Membership) {
        let mut state = self.state.lock().unwrap();
        state.next_membership_id = state.next_membership_id.max(membership.id.as_i32());
        state.memberships.push(membership);
    }

    pub fn insert_period(&self, period: MembershipPeriod) {
        let mut state = self.state.lock().unwrap();
        state.next_period_id = state.next_period_id.max(period.id.as_i32());
        state.periods.push(period);
    }

    pub fn membership_count(&self) -> usize {
        self.state.lock().unwrap().memberships.len()
    }

    pub fn period_count(&self) -> usize {
        self.state.lock().unwrap().periods.len()
    }

    pub fn create_membership_calls(&self) -> usize {
        self.state.lock().unwrap().create_membership_calls
    }

    pub fn create_period_calls(&self) -> usize {
        self.state.lock().unwrap().create_period_calls
    }

    pub fn update_calls(&self) -> Vec<(MembershipId, MembershipChanges)> {
        self.state.lock().unwrap().update_calls.clone()
    }
}

fn simulated(operation: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Simulated {} failure", operation),
    )
}

#[async_trait]
impl MembershipRepository for MockMembershipRepository {
    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError> {
        if self.fail_list {
            return Err(simulated("list"));
        }
        Ok(self.state.lock().unwrap().memberships.clone())
    }

    async fn get_membership(&self, id: MembershipId) -> Result<Option<Membership>, DomainError> {
        if self.fail_get {
            return Err(simulated("get"));
        }
        let state = self.state.lock().unwrap();
        Ok(state.memberships.iter().find(|m| m.id == id).cloned())
    }

    async fn create_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.create_membership_calls += 1;
        if self.fail_create {
            return Err(simulated("create"));
        }
        state.next_membership_id += 1;
        let stored = membership
            .clone()
            .into_membership(MembershipId::new(state.next_membership_id), Uuid::new_v4());
        state.memberships.push(stored.clone());
        Ok(stored)
    }

    async fn update_membership(
        &self,
        id: MembershipId,
        changes: &MembershipChanges,
    ) -> Result<Option<Membership>, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.update_calls.push((id, changes.clone()));
        if self.fail_update {
            return Err(simulated("update"));
        }
        let Some(existing) = state.memberships.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        // Mirrors storage: stores exactly what it is given.
        let mut updated = existing
            .merged_with(changes, existing.valid_from)
            .map_err(DomainError::from)?;
        if let Some(valid_until) = changes.valid_until {
            updated.valid_until = valid_until;
        }
        if let Some(s) = changes.state {
            updated.state = s;
        }
        *existing = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_membership(&self, id: MembershipId) -> Result<bool, DomainError> {
        if self.fail_delete {
            return Err(simulated("delete"));
        }
        let mut state = self.state.lock().unwrap();
        let before = state.memberships.len();
        state.memberships.retain(|m| m.id != id);
        state.periods.retain(|p| p.membership_id != id);
        Ok(state.memberships.len() < before)
    }

    async fn list_periods(
        &self,
        membership_id: MembershipId,
    ) -> Result<Vec<MembershipPeriod>, DomainError> {
        if self.fail_list_periods {
            return Err(simulated("list periods"));
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .periods
            .iter()
            .filter(|p| p.membership_id == membership_id)
            .cloned()
            .collect())
    }

    async fn create_period(
        &self,
        period: &NewMembershipPeriod,
    ) -> Result<MembershipPeriod, DomainError> {
        let mut state = self.state.lock().unwrap();
        let attempt = state.create_period_calls;
        state.create_period_calls += 1;
        if self.fail_create_period_from.is_some_and(|from| attempt >= from) {
            return Err(simulated("create period"));
        }
        state.next_period_id += 1;
        let stored = period
            .clone()
            .into_period(MembershipPeriodId::new(state.next_period_id));
        state.periods.push(stored.clone());
        Ok(stored)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fixtures
// ════════════════════════════════════════════════════════════════════════════

pub(super) fn ts(y: i32, m: u32, d: u32) -> Timestamp {
    use chrono::{TimeZone, Utc};
    Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
}

/// A stored six-month monthly membership starting on `valid_from`.
///
/// `valid_until` and `state` are deliberately stale so tests can observe
/// re-derivation.
pub(super) fn stored_membership(id: i32, valid_from: Timestamp) -> Membership {
    Membership {
        id: MembershipId::new(id),
        uuid: Uuid::new_v4(),
        name: "Gold Plan".to_string(),
        user_id: 2000,
        recurring_price: Decimal::from(40),
        valid_from,
        valid_until: valid_from,
        state: MembershipState::Pending,
        assigned_by: "Admin".to_string(),
        payment_method: Some(PaymentMethod::Card),
        billing_interval: BillingInterval::Monthly,
        billing_periods: 6,
    }
}

pub(super) fn stored_period(id: i32, membership_id: i32, start: Timestamp) -> MembershipPeriod {
    MembershipPeriod {
        id: MembershipPeriodId::new(id),
        uuid: Uuid::new_v4(),
        membership_id: MembershipId::new(membership_id),
        start,
        end: start.checked_add_months(1).unwrap(),
        state: "planned".to_string(),
    }
}
