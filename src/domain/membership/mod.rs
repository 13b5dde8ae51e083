//! Membership domain module.
//!
//! Membership records, their billing schedule, and the rules a membership
//! must satisfy before it is stored.
//!
//! # Module Structure
//!
//! - `aggregate` - Membership aggregate and its construction stages
//! - `billing_interval` - Billing cadence and date advancement
//! - `errors` - MembershipError taxonomy
//! - `payment_method` - Accepted payment methods
//! - `period` - Billing period entities
//! - `schedule` - valid_until and period generation
//! - `state` - Derived membership state
//! - `validation` - Ordered validation rules

mod aggregate;
mod billing_interval;
mod errors;
mod payment_method;
mod period;
mod schedule;
mod state;
mod validation;

pub use aggregate::{
    Membership, MembershipChanges, MembershipDraft, MembershipInput, MembershipWithPeriods,
    NewMembership, DEFAULT_ASSIGNED_BY, DEFAULT_USER_ID,
};
pub use billing_interval::{BillingInterval, RequestedInterval};
pub use errors::MembershipError;
pub use payment_method::PaymentMethod;
pub use period::{MembershipPeriod, NewMembershipPeriod, PlannedPeriod};
pub use schedule::{compute_valid_until, generate_periods, ScheduleOutOfRange};
pub use state::{compute_state, MembershipState, PeriodState};
pub use validation::{validate, ValidationCode, ValidationOutcome, CASH_PRICE_LIMIT};
