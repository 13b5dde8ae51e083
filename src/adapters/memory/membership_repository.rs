//! In-memory implementation of MembershipRepository.
//!
//! Keeps memberships and periods in process memory. Used by the HTTP tests
//! and for running the service without a database.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, MembershipId, MembershipPeriodId,
};
use crate::domain::membership::{
    Membership, MembershipChanges, MembershipPeriod, NewMembership, NewMembershipPeriod,
};
use crate::ports::MembershipRepository;

#[derive(Default)]
struct Store {
    memberships: BTreeMap<MembershipId, Membership>,
    periods: BTreeMap<MembershipPeriodId, MembershipPeriod>,
    last_membership_id: i32,
    last_period_id: i32,
}

/// In-memory membership storage.
///
/// Features:
/// - Serial ids starting at 1, like a `SERIAL` column
/// - Deleting a membership cascades to its periods
/// - Inserting a period for an unknown membership is a constraint violation
#[derive(Default)]
pub struct InMemoryMembershipRepository {
    store: RwLock<Store>,
}

impl InMemoryMembershipRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, DomainError> {
        self.store.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, DomainError> {
        self.store.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Membership store lock poisoned")
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError> {
        Ok(self.read()?.memberships.values().cloned().collect())
    }

    async fn get_membership(&self, id: MembershipId) -> Result<Option<Membership>, DomainError> {
        Ok(self.read()?.memberships.get(&id).cloned())
    }

    async fn create_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, DomainError> {
        let mut store = self.write()?;
        store.last_membership_id += 1;
        let id = MembershipId::new(store.last_membership_id);
        let stored = membership.clone().into_membership(id, Uuid::new_v4());
        store.memberships.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_membership(
        &self,
        id: MembershipId,
        changes: &MembershipChanges,
    ) -> Result<Option<Membership>, DomainError> {
        let mut store = self.write()?;
        let Some(stored) = store.memberships.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            stored.name = name.clone();
        }
        if let Some(user_id) = changes.user_id {
            stored.user_id = user_id;
        }
        if let Some(price) = changes.recurring_price {
            stored.recurring_price = price;
        }
        if let Some(valid_from) = changes.valid_from {
            stored.valid_from = valid_from;
        }
        if let Some(valid_until) = changes.valid_until {
            stored.valid_until = valid_until;
        }
        if let Some(state) = changes.state {
            stored.state = state;
        }
        if let Some(assigned_by) = &changes.assigned_by {
            stored.assigned_by = assigned_by.clone();
        }
        if let Some(payment_method) = changes.payment_method {
            stored.payment_method = payment_method;
        }
        if let Some(interval) = changes.billing_interval {
            stored.billing_interval = interval;
        }
        if let Some(periods) = changes.billing_periods {
            stored.billing_periods = periods;
        }

        Ok(Some(stored.clone()))
    }

    async fn delete_membership(&self, id: MembershipId) -> Result<bool, DomainError> {
        let mut store = self.write()?;
        if store.memberships.remove(&id).is_none() {
            return Ok(false);
        }
        store.periods.retain(|_, period| period.membership_id != id);
        Ok(true)
    }

    async fn list_periods(
        &self,
        membership_id: MembershipId,
    ) -> Result<Vec<MembershipPeriod>, DomainError> {
        let mut periods: Vec<MembershipPeriod> = self
            .read()?
            .periods
            .values()
            .filter(|period| period.membership_id == membership_id)
            .cloned()
            .collect();
        periods.sort_by_key(|period| period.start);
        Ok(periods)
    }

    async fn create_period(
        &self,
        period: &NewMembershipPeriod,
    ) -> Result<MembershipPeriod, DomainError> {
        let mut store = self.write()?;
        if !store.memberships.contains_key(&period.membership_id) {
            return Err(DomainError::new(
                ErrorCode::ConstraintViolation,
                format!("Membership {} does not exist", period.membership_id),
            ));
        }
        store.last_period_id += 1;
        let id = MembershipPeriodId::new(store.last_period_id);
        let stored = period.clone().into_period(id);
        store.periods.insert(id, stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::membership::{
        BillingInterval, MembershipState, PaymentMethod, PeriodState, PlannedPeriod,
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    fn new_membership() -> NewMembership {
        NewMembership {
            name: "Gold Plan".to_string(),
            user_id: 2000,
            recurring_price: Decimal::from(40),
            valid_from: ts(2024, 1, 1),
            valid_until: ts(2024, 7, 1),
            state: MembershipState::Active,
            assigned_by: "Admin".to_string(),
            payment_method: Some(PaymentMethod::Card),
            billing_interval: BillingInterval::Monthly,
            billing_periods: 6,
        }
    }

    fn new_period(membership_id: MembershipId, start: Timestamp) -> NewMembershipPeriod {
        PlannedPeriod {
            uuid: Uuid::new_v4(),
            start,
            end: start.checked_add_months(1).unwrap(),
            state: PeriodState::Planned,
        }
        .for_membership(membership_id)
    }

    #[tokio::test]
    async fn assigns_serial_ids_and_unique_uuids() {
        let repo = InMemoryMembershipRepository::new();

        let first = repo.create_membership(&new_membership()).await.unwrap();
        let second = repo.create_membership(&new_membership()).await.unwrap();

        assert_eq!(first.id, MembershipId::new(1));
        assert_eq!(second.id, MembershipId::new(2));
        assert_ne!(first.uuid, second.uuid);
        assert_eq!(repo.list_memberships().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let repo = InMemoryMembershipRepository::new();
        assert!(repo.get_membership(MembershipId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_applies_present_fields() {
        let repo = InMemoryMembershipRepository::new();
        let created = repo.create_membership(&new_membership()).await.unwrap();
        let changes = MembershipChanges {
            name: Some("Silver Plan".to_string()),
            payment_method: Some(None),
            ..Default::default()
        };

        let updated = repo
            .update_membership(created.id, &changes)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Silver Plan");
        assert_eq!(updated.payment_method, None);
        assert_eq!(updated.uuid, created.uuid);
        assert_eq!(updated.billing_periods, 6);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let repo = InMemoryMembershipRepository::new();
        let result = repo
            .update_membership(MembershipId::new(5), &MembershipChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_cascades_to_periods() {
        let repo = InMemoryMembershipRepository::new();
        let kept = repo.create_membership(&new_membership()).await.unwrap();
        let removed = repo.create_membership(&new_membership()).await.unwrap();
        repo.create_period(&new_period(kept.id, ts(2024, 1, 1))).await.unwrap();
        repo.create_period(&new_period(removed.id, ts(2024, 1, 1))).await.unwrap();

        assert!(repo.delete_membership(removed.id).await.unwrap());

        assert!(repo.list_periods(removed.id).await.unwrap().is_empty());
        assert_eq!(repo.list_periods(kept.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_id_reports_false() {
        let repo = InMemoryMembershipRepository::new();
        assert!(!repo.delete_membership(MembershipId::new(3)).await.unwrap());
    }

    #[tokio::test]
    async fn periods_are_listed_by_start() {
        let repo = InMemoryMembershipRepository::new();
        let membership = repo.create_membership(&new_membership()).await.unwrap();
        repo.create_period(&new_period(membership.id, ts(2024, 3, 1))).await.unwrap();
        repo.create_period(&new_period(membership.id, ts(2024, 1, 1))).await.unwrap();

        let periods = repo.list_periods(membership.id).await.unwrap();

        assert_eq!(periods[0].start, ts(2024, 1, 1));
        assert_eq!(periods[1].start, ts(2024, 3, 1));
    }

    #[tokio::test]
    async fn period_for_unknown_membership_is_rejected() {
        let repo = InMemoryMembershipRepository::new();

        let err = repo
            .create_period(&new_period(MembershipId::new(9), ts(2024, 1, 1)))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConstraintViolation);
    }
}
