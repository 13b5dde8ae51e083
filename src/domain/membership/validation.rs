//! Membership validation rules.
//!
//! Rules are evaluated in a fixed order and the first failing rule decides
//! the reported code:
//!
//! | # | Condition | Code |
//! |---|-----------|------|
//! | 1 | name empty, or price zero | `missingMandatoryFields` |
//! | 2 | price < 0 | `negativeRecurringPrice` |
//! | 3 | price > 100 and paid in cash | `cashPriceBelow100` |
//! | 4 | monthly and periods > 12 | `billingPeriodsMoreThan12Months` |
//! | 4 | monthly and periods < 6 | `billingPeriodsLessThan6Months` |
//! | 5 | yearly and periods > 10 | `billingPeriodsMoreThan10Years` |
//! | 5 | yearly and 3 < periods <= 10 | `billingPeriodsLessThan3Years` |
//! | 6 | unrecognized interval | `invalidBillingPeriods` |
//! | 7 | window end outside the calendar range | `invalidBillingPeriods` |
//!
//! Weekly memberships have no bound on their period count, only the
//! requirement that the window ends at a representable date.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BillingInterval, MembershipDraft, PaymentMethod, RequestedInterval};

/// Highest recurring price that may be paid in cash.
pub const CASH_PRICE_LIMIT: i64 = 100;

/// Identifies the first validation rule a draft violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationCode {
    #[serde(rename = "missingMandatoryFields")]
    MissingMandatoryFields,
    #[serde(rename = "negativeRecurringPrice")]
    NegativeRecurringPrice,
    #[serde(rename = "cashPriceBelow100")]
    CashPriceBelow100,
    #[serde(rename = "billingPeriodsMoreThan12Months")]
    BillingPeriodsMoreThan12Months,
    #[serde(rename = "billingPeriodsLessThan6Months")]
    BillingPeriodsLessThan6Months,
    #[serde(rename = "billingPeriodsMoreThan10Years")]
    BillingPeriodsMoreThan10Years,
    #[serde(rename = "billingPeriodsLessThan3Years")]
    BillingPeriodsLessThan3Years,
    #[serde(rename = "invalidBillingPeriods")]
    InvalidBillingPeriods,
}

impl ValidationCode {
    /// Returns the stable code reported to callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::MissingMandatoryFields => "missingMandatoryFields",
            ValidationCode::NegativeRecurringPrice => "negativeRecurringPrice",
            ValidationCode::CashPriceBelow100 => "cashPriceBelow100",
            ValidationCode::BillingPeriodsMoreThan12Months => "billingPeriodsMoreThan12Months",
            ValidationCode::BillingPeriodsLessThan6Months => "billingPeriodsLessThan6Months",
            ValidationCode::BillingPeriodsMoreThan10Years => "billingPeriodsMoreThan10Years",
            ValidationCode::BillingPeriodsLessThan3Years => "billingPeriodsLessThan3Years",
            ValidationCode::InvalidBillingPeriods => "invalidBillingPeriods",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(ValidationCode),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Converts into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), ValidationCode> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(code) => Err(code),
        }
    }
}

/// Runs the ordered rule list against a draft.
pub fn validate(draft: &MembershipDraft) -> ValidationOutcome {
    match first_violation(draft) {
        Some(code) => ValidationOutcome::Invalid(code),
        None => ValidationOutcome::Valid,
    }
}

fn first_violation(draft: &MembershipDraft) -> Option<ValidationCode> {
    let price = draft.recurring_price;

    if draft.name.is_empty() || price.is_zero() {
        return Some(ValidationCode::MissingMandatoryFields);
    }

    if price.is_sign_negative() {
        return Some(ValidationCode::NegativeRecurringPrice);
    }

    if price > Decimal::from(CASH_PRICE_LIMIT) && draft.payment_method == Some(PaymentMethod::Cash) {
        return Some(ValidationCode::CashPriceBelow100);
    }

    let periods = draft.billing_periods;
    let interval_violation = match &draft.billing_interval {
        RequestedInterval::Recognized(BillingInterval::Monthly) => {
            if periods > 12 {
                Some(ValidationCode::BillingPeriodsMoreThan12Months)
            } else if periods < 6 {
                Some(ValidationCode::BillingPeriodsLessThan6Months)
            } else {
                None
            }
        }
        RequestedInterval::Recognized(BillingInterval::Yearly) if periods > 3 => {
            if periods > 10 {
                Some(ValidationCode::BillingPeriodsMoreThan10Years)
            } else {
                Some(ValidationCode::BillingPeriodsLessThan3Years)
            }
        }
        RequestedInterval::Recognized(_) => None,
        RequestedInterval::Unrecognized(_) => Some(ValidationCode::InvalidBillingPeriods),
    };

    interval_violation.or_else(|| {
        draft
            .valid_until
            .is_none()
            .then_some(ValidationCode::InvalidBillingPeriods)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::membership::MembershipInput;

    fn now() -> Timestamp {
        Timestamp::now()
    }

    fn draft(input: MembershipInput) -> MembershipDraft {
        MembershipDraft::from_input(input, now())
    }

    fn valid_input() -> MembershipInput {
        MembershipInput {
            name: Some("Gold Plan".to_string()),
            recurring_price: Some(Decimal::from(50)),
            billing_interval: Some("monthly".to_string()),
            billing_periods: Some(6),
            ..Default::default()
        }
    }

    fn code_for(input: MembershipInput) -> Option<ValidationCode> {
        match validate(&draft(input)) {
            ValidationOutcome::Valid => None,
            ValidationOutcome::Invalid(code) => Some(code),
        }
    }

    #[test]
    fn empty_input_is_missing_mandatory_fields() {
        assert_eq!(
            code_for(MembershipInput::default()),
            Some(ValidationCode::MissingMandatoryFields)
        );
    }

    #[test]
    fn zero_price_counts_as_missing() {
        let input = MembershipInput {
            recurring_price: Some(Decimal::ZERO),
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::MissingMandatoryFields));
    }

    #[test]
    fn empty_name_counts_as_missing() {
        let input = MembershipInput {
            name: Some(String::new()),
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::MissingMandatoryFields));
    }

    #[test]
    fn negative_price_is_rejected() {
        let input = MembershipInput {
            name: Some("Plan".to_string()),
            recurring_price: Some(Decimal::from(-10)),
            ..Default::default()
        };
        assert_eq!(code_for(input), Some(ValidationCode::NegativeRecurringPrice));
    }

    #[test]
    fn cash_above_limit_is_rejected() {
        let input = MembershipInput {
            name: Some("Plan".to_string()),
            recurring_price: Some(Decimal::from(150)),
            payment_method: Some(PaymentMethod::Cash),
            ..Default::default()
        };
        assert_eq!(code_for(input), Some(ValidationCode::CashPriceBelow100));
    }

    #[test]
    fn cash_at_limit_is_accepted() {
        let input = MembershipInput {
            recurring_price: Some(Decimal::from(100)),
            payment_method: Some(PaymentMethod::Cash),
            ..valid_input()
        };
        assert_eq!(code_for(input), None);
    }

    #[test]
    fn card_above_limit_is_accepted() {
        let input = MembershipInput {
            recurring_price: Some(Decimal::from(150)),
            payment_method: Some(PaymentMethod::Card),
            ..valid_input()
        };
        assert_eq!(code_for(input), None);
    }

    #[test]
    fn monthly_below_six_is_rejected() {
        let input = MembershipInput {
            billing_periods: Some(3),
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::BillingPeriodsLessThan6Months));
    }

    #[test]
    fn monthly_above_twelve_is_rejected() {
        let input = MembershipInput {
            billing_periods: Some(15),
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::BillingPeriodsMoreThan12Months));
    }

    #[test]
    fn monthly_bounds_are_inclusive() {
        for periods in [6, 12] {
            let input = MembershipInput {
                billing_periods: Some(periods),
                ..valid_input()
            };
            assert_eq!(code_for(input), None, "periods = {}", periods);
        }
    }

    #[test]
    fn missing_interval_defaults_to_monthly_rules() {
        let input = MembershipInput {
            billing_interval: None,
            billing_periods: None,
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::BillingPeriodsLessThan6Months));
    }

    #[test]
    fn yearly_four_reports_less_than_three_years() {
        let input = MembershipInput {
            billing_interval: Some("yearly".to_string()),
            billing_periods: Some(4),
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::BillingPeriodsLessThan3Years));
    }

    #[test]
    fn yearly_above_ten_is_rejected() {
        let input = MembershipInput {
            billing_interval: Some("yearly".to_string()),
            billing_periods: Some(12),
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::BillingPeriodsMoreThan10Years));
    }

    #[test]
    fn yearly_three_is_valid() {
        let input = MembershipInput {
            billing_interval: Some("yearly".to_string()),
            billing_periods: Some(3),
            ..valid_input()
        };
        assert_eq!(code_for(input), None);
    }

    #[test]
    fn weekly_has_no_period_bounds() {
        for periods in [1, 52, 500] {
            let input = MembershipInput {
                billing_interval: Some("weekly".to_string()),
                billing_periods: Some(periods),
                ..valid_input()
            };
            assert_eq!(code_for(input), None, "periods = {}", periods);
        }
    }

    #[test]
    fn weekly_window_past_calendar_range_is_rejected() {
        for periods in [20_000_000, i32::MAX] {
            let input = MembershipInput {
                billing_interval: Some("weekly".to_string()),
                billing_periods: Some(periods),
                ..valid_input()
            };
            assert_eq!(
                code_for(input),
                Some(ValidationCode::InvalidBillingPeriods),
                "periods = {}",
                periods
            );
        }
    }

    #[test]
    fn unrecognized_interval_is_rejected() {
        let input = MembershipInput {
            billing_interval: Some("daily".to_string()),
            ..valid_input()
        };
        assert_eq!(code_for(input), Some(ValidationCode::InvalidBillingPeriods));
    }

    #[test]
    fn earlier_rules_win_over_later_ones() {
        let input = MembershipInput {
            name: Some("Plan".to_string()),
            recurring_price: Some(Decimal::from(500)),
            payment_method: Some(PaymentMethod::Cash),
            billing_interval: Some("daily".to_string()),
            billing_periods: Some(99),
            ..Default::default()
        };
        assert_eq!(code_for(input), Some(ValidationCode::CashPriceBelow100));
    }

    #[test]
    fn outcome_converts_to_result() {
        assert_eq!(ValidationOutcome::Valid.into_result(), Ok(()));
        assert_eq!(
            ValidationOutcome::Invalid(ValidationCode::CashPriceBelow100).into_result(),
            Err(ValidationCode::CashPriceBelow100)
        );
    }

    #[test]
    fn code_serializes_as_camel_case_text() {
        let json = serde_json::to_string(&ValidationCode::BillingPeriodsLessThan3Years).unwrap();
        assert_eq!(json, "\"billingPeriodsLessThan3Years\"");
    }
}
