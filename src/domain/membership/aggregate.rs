//! Membership aggregate and its construction stages.
//!
//! A membership moves through three shapes:
//!
//! 1. [`MembershipInput`] - partial caller input, every field optional
//! 2. [`MembershipDraft`] - defaults applied and derived fields computed;
//!    may still be invalid
//! 3. [`NewMembership`] - a validated draft ready to be persisted, which
//!    storage turns into a [`Membership`] by assigning `id` and `uuid`
//!
//! # Derived fields
//!
//! `valid_until` and `state` are never taken from callers. They are
//! recomputed from `valid_from`, `billing_interval`, `billing_periods` and
//! the instant of evaluation every time a membership is built or read.
//! A window whose end falls outside the calendar range never reaches
//! storage: the draft leaves both fields empty and validation rejects it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{MembershipId, Timestamp};

use super::{
    compute_state, compute_valid_until, generate_periods, validate, BillingInterval,
    MembershipPeriod, MembershipState, PaymentMethod, PlannedPeriod, RequestedInterval,
    ScheduleOutOfRange, ValidationCode,
};

/// User that owns memberships created without an explicit `user_id`.
pub const DEFAULT_USER_ID: i32 = 2000;

/// Actor recorded when no `assigned_by` is supplied.
pub const DEFAULT_ASSIGNED_BY: &str = "Admin";

/// Partial creation input as supplied by a caller.
///
/// Empty strings and a zero `user_id` are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipInput {
    pub name: Option<String>,
    pub user_id: Option<i32>,
    pub recurring_price: Option<Decimal>,
    pub valid_from: Option<Timestamp>,
    pub assigned_by: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    /// Raw interval text; unrecognized values are reported by validation.
    pub billing_interval: Option<String>,
    pub billing_periods: Option<i32>,
}

/// Fully defaulted candidate membership, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipDraft {
    pub name: String,
    pub user_id: i32,
    pub recurring_price: Decimal,
    pub valid_from: Timestamp,
    /// `None` when the window end is not representable.
    pub valid_until: Option<Timestamp>,
    pub state: Option<MembershipState>,
    pub assigned_by: String,
    pub payment_method: Option<PaymentMethod>,
    pub billing_interval: RequestedInterval,
    pub billing_periods: i32,
}

impl MembershipDraft {
    /// Applies defaults to `input` and derives `valid_until` and `state`.
    ///
    /// `now` is used both as the default `valid_from` and as the instant the
    /// state is evaluated at.
    pub fn from_input(input: MembershipInput, now: Timestamp) -> Self {
        let valid_from = input.valid_from.unwrap_or(now);
        let billing_interval = non_empty(input.billing_interval)
            .map(|raw| RequestedInterval::parse(&raw))
            .unwrap_or_default();
        let billing_periods = input.billing_periods.unwrap_or(0);

        // An unrecognized interval never advances the window.
        let valid_until = match billing_interval.recognized() {
            Some(interval) => compute_valid_until(valid_from, interval, billing_periods).ok(),
            None => Some(valid_from),
        };

        Self {
            name: input.name.unwrap_or_default(),
            user_id: input.user_id.filter(|id| *id != 0).unwrap_or(DEFAULT_USER_ID),
            recurring_price: input.recurring_price.unwrap_or(Decimal::ZERO),
            valid_from,
            valid_until,
            state: valid_until.map(|until| compute_state(valid_from, until, now)),
            assigned_by: non_empty(input.assigned_by)
                .unwrap_or_else(|| DEFAULT_ASSIGNED_BY.to_string()),
            payment_method: input.payment_method,
            billing_interval,
            billing_periods,
        }
    }

    /// Validates the draft and, on success, returns the record to persist.
    ///
    /// # Errors
    ///
    /// Returns the code of the first rule the draft violates.
    pub fn validated(self) -> Result<NewMembership, ValidationCode> {
        validate(&self).into_result()?;

        let billing_interval = self
            .billing_interval
            .recognized()
            .ok_or(ValidationCode::InvalidBillingPeriods)?;
        let (valid_until, state) = self
            .valid_until
            .zip(self.state)
            .ok_or(ValidationCode::InvalidBillingPeriods)?;

        Ok(NewMembership {
            name: self.name,
            user_id: self.user_id,
            recurring_price: self.recurring_price,
            valid_from: self.valid_from,
            valid_until,
            state,
            assigned_by: self.assigned_by,
            payment_method: self.payment_method,
            billing_interval,
            billing_periods: self.billing_periods,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// A validated membership awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMembership {
    pub name: String,
    pub user_id: i32,
    pub recurring_price: Decimal,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub state: MembershipState,
    pub assigned_by: String,
    pub payment_method: Option<PaymentMethod>,
    pub billing_interval: BillingInterval,
    pub billing_periods: i32,
}

impl NewMembership {
    /// Builds the stored representation with the identity storage assigned.
    pub fn into_membership(self, id: MembershipId, uuid: Uuid) -> Membership {
        Membership {
            id,
            uuid,
            name: self.name,
            user_id: self.user_id,
            recurring_price: self.recurring_price,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            state: self.state,
            assigned_by: self.assigned_by,
            payment_method: self.payment_method,
            billing_interval: self.billing_interval,
            billing_periods: self.billing_periods,
        }
    }
}

/// Membership aggregate root.
///
/// # Invariants
///
/// - `uuid` is unique across all memberships and never changes
/// - `valid_until` equals `valid_from` advanced by `billing_periods` units
///   of `billing_interval`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub uuid: Uuid,
    pub name: String,
    pub user_id: i32,
    pub recurring_price: Decimal,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub state: MembershipState,
    pub assigned_by: String,
    pub payment_method: Option<PaymentMethod>,
    pub billing_interval: BillingInterval,
    pub billing_periods: i32,
}

impl Membership {
    /// Recomputes `valid_until` and `state` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleOutOfRange`] if the stored window cannot end at a
    /// representable instant.
    pub fn rederive(mut self, now: Timestamp) -> Result<Self, ScheduleOutOfRange> {
        self.valid_until =
            compute_valid_until(self.valid_from, self.billing_interval, self.billing_periods)?;
        self.state = compute_state(self.valid_from, self.valid_until, now);
        Ok(self)
    }

    /// Returns a copy with `changes` merged in and derived fields recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleOutOfRange`] if the merged window would end outside
    /// the calendar range.
    pub fn merged_with(
        &self,
        changes: &MembershipChanges,
        now: Timestamp,
    ) -> Result<Self, ScheduleOutOfRange> {
        let mut merged = self.clone();
        if let Some(name) = &changes.name {
            merged.name = name.clone();
        }
        if let Some(user_id) = changes.user_id {
            merged.user_id = user_id;
        }
        if let Some(price) = changes.recurring_price {
            merged.recurring_price = price;
        }
        if let Some(valid_from) = changes.valid_from {
            merged.valid_from = valid_from;
        }
        if let Some(assigned_by) = &changes.assigned_by {
            merged.assigned_by = assigned_by.clone();
        }
        if let Some(payment_method) = changes.payment_method {
            merged.payment_method = payment_method;
        }
        if let Some(interval) = changes.billing_interval {
            merged.billing_interval = interval;
        }
        if let Some(periods) = changes.billing_periods {
            merged.billing_periods = periods;
        }
        merged.rederive(now)
    }

    /// Generates this membership's period schedule one period at a time.
    pub fn planned_periods(&self) -> impl Iterator<Item = PlannedPeriod> {
        generate_periods(self.valid_from, self.billing_interval, self.billing_periods)
    }
}

/// Partial update of a stored membership.
///
/// Identity (`id`, `uuid`) is immutable. `valid_until` and `state` are
/// derived; the update handler fills them from the merged record so storage
/// stays consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipChanges {
    pub name: Option<String>,
    pub user_id: Option<i32>,
    pub recurring_price: Option<Decimal>,
    pub valid_from: Option<Timestamp>,
    pub assigned_by: Option<String>,
    /// `Some(None)` clears the payment method.
    pub payment_method: Option<Option<PaymentMethod>>,
    pub billing_interval: Option<BillingInterval>,
    pub billing_periods: Option<i32>,
    pub valid_until: Option<Timestamp>,
    pub state: Option<MembershipState>,
}

impl MembershipChanges {
    /// Attaches the derived fields of the merged record.
    pub fn with_derived(mut self, merged: &Membership) -> Self {
        self.valid_until = Some(merged.valid_until);
        self.state = Some(merged.state);
        self
    }
}

/// A membership together with its billing periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWithPeriods {
    pub membership: Membership,
    pub periods: Vec<MembershipPeriod>,
}
