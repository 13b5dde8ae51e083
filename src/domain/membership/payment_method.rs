//! Payment method of a membership.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How the recurring price is paid. Absence is modelled as `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            other => Err(ValidationError::unknown_value("paymentMethod", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_methods() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
    }

    #[test]
    fn rejects_unknown_methods() {
        assert!("credit card".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn deserializes_from_lowercase() {
        let method: PaymentMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(method, PaymentMethod::Card);
    }
}
