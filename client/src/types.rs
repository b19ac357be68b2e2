//! Wire types for the booking API
//!
//! Field names follow the backend's JSON contract (camelCase keys, and the
//! legacy `numeroAutorizacion` key on the payment response).

use serde::{Deserialize, Serialize};

/// Request body for the availability endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    /// Requested reservation date (`YYYY-MM-DD`)
    pub reservation_date: String,
    /// Requested seating time (`HH:MM`)
    pub reservation_time: String,
    /// Party size
    pub guests: u32,
}

/// Response body from the availability endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// Whether the requested slot can be booked
    pub available: bool,
    /// Remaining capacity, when the slot is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats_left: Option<u32>,
    /// Human-readable reason, when the slot is not available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Request body for the payment authorization endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Card number (digits only, up to 16)
    pub card_number: String,
    /// Card expiry as `MMYY`
    pub exp_date: String,
    /// Card verification value
    pub cvv: String,
    /// Total to authorize, as a fixed-point decimal string with two fraction
    /// digits (e.g. `"660.00"`)
    pub amount: String,
    /// Billing ZIP code
    pub zip_code: String,
    /// Billing street address
    pub address: String,
}

/// Response body from the payment authorization endpoint
///
/// A body without an explicit `success` field deserializes as a decline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Whether the authorization succeeded
    #[serde(default)]
    pub success: bool,
    /// Gateway authorization reference
    #[serde(rename = "numeroAutorizacion", default, skip_serializing_if = "Option::is_none")]
    pub authorization_number: Option<String>,
    /// Gateway authorization token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_auth: Option<String>,
    /// Opaque compliance metadata, forwarded verbatim to booking creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_data: Option<serde_json::Value>,
}

impl PaymentResponse {
    /// Extract the authorization artifacts to forward to booking creation
    #[must_use]
    pub fn into_authorization(self) -> PaymentAuthorization {
        PaymentAuthorization {
            authorization_number: self.authorization_number,
            token_auth: self.token_auth,
            compliance_data: self.compliance_data,
        }
    }
}

/// Authorization artifacts produced by a successful payment step
///
/// Forwarded once to the booking-creation call and then discarded; never
/// retained in flow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAuthorization {
    /// Gateway authorization reference (`numeroAutorizacion` on the wire)
    pub authorization_number: Option<String>,
    /// Gateway authorization token
    pub token_auth: Option<String>,
    /// Opaque compliance metadata
    pub compliance_data: Option<serde_json::Value>,
}

/// Request body for the reservation-creation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Guest first name
    pub first_name: String,
    /// Guest last name
    pub last_name: String,
    /// Guest email
    pub email: String,
    /// Guest phone (may be empty)
    pub phone: String,
    /// Party size
    pub guests: u32,
    /// Reservation date (`YYYY-MM-DD`)
    pub reservation_date: String,
    /// Seating time (`HH:MM`)
    pub reservation_time: String,
    /// Free-text allergy notes (may be empty)
    pub allergies: String,
    /// Free-text special requests (may be empty)
    pub special_requests: String,
    /// Authorization reference from the payment step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_number: Option<String>,
    /// Authorization token from the payment step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_auth: Option<String>,
    /// Compliance metadata from the payment step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_data: Option<serde_json::Value>,
}

/// Request body for the ticket-creation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    /// Guest first name
    pub first_name: String,
    /// Guest last name
    pub last_name: String,
    /// Guest email
    pub email: String,
    /// Party size
    pub guests: u32,
    /// Authorization reference from the payment step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_number: Option<String>,
    /// Authorization token from the payment step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_auth: Option<String>,
    /// Compliance metadata from the payment step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_data: Option<serde_json::Value>,
    /// Event variant wire name (e.g. `"mangrove"`)
    pub event_type: String,
}
