//! HTTP DTOs (Data Transfer Objects) for membership endpoints.
//!
//! These types define the JSON request/response structure for the membership API.
//! They serve as the boundary between HTTP and the application layer. Field
//! names are camelCase on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{MembershipId, MembershipPeriodId, Timestamp, ValidationError};
use crate::domain::membership::{
    BillingInterval, Membership, MembershipChanges, MembershipInput, MembershipPeriod,
    MembershipState, MembershipWithPeriods, PaymentMethod,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a membership. Every field is optional; defaults are
/// applied by the domain before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub recurring_price: Option<Decimal>,
    /// RFC 3339 instant or plain `YYYY-MM-DD` date.
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub assigned_by: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Kept as text so unrecognized intervals reach validation.
    #[serde(default)]
    pub billing_interval: Option<String>,
    #[serde(default)]
    pub billing_periods: Option<i32>,
}

impl TryFrom<CreateMembershipRequest> for MembershipInput {
    type Error = ValidationError;

    fn try_from(request: CreateMembershipRequest) -> Result<Self, Self::Error> {
        Ok(MembershipInput {
            name: request.name,
            user_id: request.user_id,
            recurring_price: request.recurring_price,
            valid_from: request
                .valid_from
                .as_deref()
                .map(|raw| parse_timestamp("validFrom", raw))
                .transpose()?,
            assigned_by: request.assigned_by,
            payment_method: request.payment_method,
            billing_interval: request.billing_interval,
            billing_periods: request.billing_periods,
        })
    }
}

/// Request to partially update a membership.
///
/// `id`, `uuid`, `validUntil` and `state` are not accepted; unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMembershipRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub recurring_price: Option<Decimal>,
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub assigned_by: Option<String>,
    /// Absent leaves the method unchanged; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub payment_method: Option<Option<PaymentMethod>>,
    #[serde(default)]
    pub billing_interval: Option<BillingInterval>,
    #[serde(default)]
    pub billing_periods: Option<i32>,
}

impl TryFrom<UpdateMembershipRequest> for MembershipChanges {
    type Error = ValidationError;

    fn try_from(request: UpdateMembershipRequest) -> Result<Self, Self::Error> {
        Ok(MembershipChanges {
            name: request.name,
            user_id: request.user_id,
            recurring_price: request.recurring_price,
            valid_from: request
                .valid_from
                .as_deref()
                .map(|raw| parse_timestamp("validFrom", raw))
                .transpose()?,
            assigned_by: request.assigned_by,
            payment_method: request.payment_method,
            billing_interval: request.billing_interval,
            billing_periods: request.billing_periods,
            valid_until: None,
            state: None,
        })
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses an RFC 3339 instant, or a calendar date taken as midnight UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<Timestamp, ValidationError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Timestamp::from_datetime(instant.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Timestamp::from_date)
        .map_err(|_| ValidationError::invalid_format(field, "expected an RFC 3339 date"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Membership as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
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

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self {
            id: membership.id,
            uuid: membership.uuid,
            name: membership.name,
            user_id: membership.user_id,
            recurring_price: membership.recurring_price,
            valid_from: membership.valid_from,
            valid_until: membership.valid_until,
            state: membership.state,
            assigned_by: membership.assigned_by,
            payment_method: membership.payment_method,
            billing_interval: membership.billing_interval,
            billing_periods: membership.billing_periods,
        }
    }
}

/// Billing period as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResponse {
    pub id: MembershipPeriodId,
    pub uuid: Uuid,
    pub membership_id: MembershipId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub state: String,
}

impl From<MembershipPeriod> for PeriodResponse {
    fn from(period: MembershipPeriod) -> Self {
        Self {
            id: period.id,
            uuid: period.uuid,
            membership_id: period.membership_id,
            start: period.start,
            end: period.end,
            state: period.state,
        }
    }
}

/// A membership paired with its billing periods.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipWithPeriodsResponse {
    pub membership: MembershipResponse,
    pub periods: Vec<PeriodResponse>,
}

impl From<MembershipWithPeriods> for MembershipWithPeriodsResponse {
    fn from(aggregate: MembershipWithPeriods) -> Self {
        Self {
            membership: MembershipResponse::from(aggregate.membership),
            periods: aggregate.periods.into_iter().map(PeriodResponse::from).collect(),
        }
    }
}

/// Response for the health probe.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Underlying cause; omitted in production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach details to the response.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
