//! Shared domain types for the booking flows.
//!
//! Value objects and guest-facing message strings used by both the omakase
//! reservation flow and the event ticket flow.

use guestflow_client::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from dollars
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (dollars * 100 > `u64::MAX`).
    /// Use `checked_from_dollars` for non-panicking conversion.
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_dollars(dollars: u64) -> Self {
        match dollars.checked_mul(100) {
            Some(cents) => Self(cents),
            None => panic!("Money::from_dollars overflow"),
        }
    }

    /// Creates a `Money` value from dollars with overflow checking
    #[must_use]
    pub const fn checked_from_dollars(dollars: u64) -> Option<Self> {
        match dollars.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in dollars (rounded down)
    #[must_use]
    pub const fn dollars(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Formats the amount as a plain decimal string with two fraction digits
    /// (e.g. `"660.00"`)
    ///
    /// This is the representation the payment endpoint expects for its
    /// `amount` field.
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        format!("{}.{:02}", self.dollars(), self.0 % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.dollars(), self.0 % 100)
    }
}

// ============================================================================
// Availability
// ============================================================================

/// Outcome of the most recent seat-availability check
///
/// A value only ever describes the slot it was requested for: editing the
/// date, time, or party size discards it back to [`Availability::Unknown`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    /// No check has completed for the current slot
    #[default]
    Unknown,
    /// The requested slot can be booked
    Available {
        /// Remaining capacity, when the backend reports one
        seats_left: Option<u32>,
    },
    /// The requested slot cannot be booked, or the check itself failed
    Unavailable {
        /// Guest-facing reason
        reason: String,
    },
}

impl Availability {
    /// Whether submission may proceed past the availability gate
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

// ============================================================================
// Guest-Facing Messages
// ============================================================================

/// Message strings surfaced in the single error slot of each flow
pub mod messages {
    /// Availability cannot be checked until date, time, and party size are set
    pub const MISSING_GATE_INPUTS: &str = "Please select a date, time, and number of guests";

    /// The availability call failed; the slot is treated as unavailable
    pub const AVAILABILITY_CHECK_FAILED: &str = "Error checking availability";

    /// The backend reported the slot unavailable without giving a reason
    pub const NOT_AVAILABLE: &str = "Not available for this date and time";

    /// Submission attempted before a passing availability check
    pub const CHECK_AVAILABILITY_FIRST: &str = "Please check availability first";

    /// Submission attempted with required fields still empty
    pub const MISSING_REQUIRED_FIELDS: &str = "Please fill in all required fields";

    /// The payment step did not produce an authorization
    pub const PAYMENT_DECLINED: &str = "Payment was declined";

    /// Fallback when the backend failed without a usable error message
    pub const SUBMIT_FAILED: &str = "An error occurred. Please try again.";
}

/// Guest-facing message for a failed booking-creation call
///
/// Prefers the server's own error message; falls back to a generic message
/// when the server responded without one; surfaces the transport error's
/// description when no response arrived at all.
#[must_use]
pub fn booking_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Status {
            message: Some(message),
            ..
        } => message.clone(),
        ApiError::Status { message: None, .. } => messages::SUBMIT_FAILED.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_displays_with_dollar_sign_and_two_fraction_digits() {
        assert_eq!(Money::from_dollars(660).to_string(), "$660.00");
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn decimal_string_omits_the_currency_symbol() {
        assert_eq!(Money::from_dollars(660).to_decimal_string(), "660.00");
        assert_eq!(Money::from_cents(50_000).to_decimal_string(), "500.00");
        assert_eq!(Money::ZERO.to_decimal_string(), "0.00");
    }

    #[test]
    fn checked_multiply_catches_overflow() {
        let price = Money::from_cents(u64::MAX / 2);
        assert_eq!(price.checked_multiply(3), None);
        assert_eq!(
            Money::from_dollars(330).checked_multiply(2),
            Some(Money::from_dollars(660))
        );
    }

    #[test]
    fn availability_gate_only_passes_available() {
        assert!(
            Availability::Available { seats_left: None }.is_available()
        );
        assert!(!Availability::Unknown.is_available());
        assert!(
            !Availability::Unavailable {
                reason: "Fully booked".to_string()
            }
            .is_available()
        );
    }

    #[test]
    fn failure_message_prefers_the_server_body() {
        let err = ApiError::Status {
            status: 409,
            message: Some("No seats left".to_string()),
        };
        assert_eq!(booking_failure_message(&err), "No seats left");
    }

    #[test]
    fn failure_message_falls_back_when_body_is_missing() {
        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(booking_failure_message(&err), messages::SUBMIT_FAILED);
    }

    #[test]
    fn failure_message_surfaces_transport_description() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(
            booking_failure_message(&err),
            "Transport error: connection refused"
        );
    }
}
