//! Mock implementations for testing
//!
//! Provides a deterministic clock and a scriptable booking API so reducer
//! and store tests never touch the network.

use chrono::{DateTime, Utc};
use guestflow_client::{
    ApiError, AvailabilityRequest, AvailabilityResponse, BookingApi, CreateReservationRequest,
    CreateTicketRequest, PaymentRequest, PaymentResponse,
};
use guestflow_client::api::ApiFuture;
use guestflow_core::environment::Clock;
use std::sync::{Arc, Mutex};

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making tests reproducible.
///
/// # Example
///
/// ```
/// use guestflow_testing::mocks::FixedClock;
/// use guestflow_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// let time1 = clock.now();
/// let time2 = clock.now();
/// assert_eq!(time1, time2); // Always the same!
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
///
/// # Panics
///
/// This function will panic if the hardcoded timestamp fails to parse,
/// which should never happen in practice.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

/// A request the mock booking API received, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// An availability check was dispatched
    CheckAvailability(AvailabilityRequest),
    /// A payment authorization was dispatched
    AuthorizePayment(PaymentRequest),
    /// A reservation creation was dispatched
    CreateReservation(CreateReservationRequest),
    /// A ticket creation was dispatched
    CreateTicket(CreateTicketRequest),
}

impl RecordedCall {
    /// Short name of the endpoint, for sequencing assertions
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::CheckAvailability(_) => "availability",
            Self::AuthorizePayment(_) => "payment",
            Self::CreateReservation(_) => "reservation",
            Self::CreateTicket(_) => "ticket",
        }
    }
}

/// Scriptable mock booking API
///
/// Each endpoint returns a configured response and records the request it
/// received. The default script approves everything: seats are available,
/// payment authorizes, and creation succeeds.
///
/// # Example
///
/// ```
/// use guestflow_testing::MockBookingApi;
///
/// let api = MockBookingApi::new().with_payment_declined();
/// let shared = api.shared();
/// ```
pub struct MockBookingApi {
    availability: Mutex<Result<AvailabilityResponse, ApiError>>,
    payment: Mutex<Result<PaymentResponse, ApiError>>,
    reservation: Mutex<Result<(), ApiError>>,
    ticket: Mutex<Result<(), ApiError>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockBookingApi {
    /// Create a mock where every endpoint succeeds
    #[must_use]
    pub fn new() -> Self {
        Self {
            availability: Mutex::new(Ok(AvailabilityResponse {
                available: true,
                seats_left: Some(8),
                reason: None,
            })),
            payment: Mutex::new(Ok(PaymentResponse {
                success: true,
                authorization_number: Some("AUTH-12345".to_string()),
                token_auth: Some("tok_mock".to_string()),
                compliance_data: Some(serde_json::json!({"mock": true})),
            })),
            reservation: Mutex::new(Ok(())),
            ticket: Mutex::new(Ok(())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the availability endpoint to report open seats
    #[must_use]
    pub fn with_available_seats(self, seats: u32) -> Self {
        self.set_availability(Ok(AvailabilityResponse {
            available: true,
            seats_left: Some(seats),
            reason: None,
        }))
    }

    /// Script the availability endpoint to report no room
    #[must_use]
    pub fn with_unavailable(self, reason: impl Into<String>) -> Self {
        self.set_availability(Ok(AvailabilityResponse {
            available: false,
            seats_left: Some(0),
            reason: Some(reason.into()),
        }))
    }

    /// Script the availability endpoint to fail with the given error
    #[must_use]
    pub fn with_availability_error(self, error: ApiError) -> Self {
        self.set_availability(Err(error))
    }

    /// Script the payment endpoint to authorize with the given number
    #[must_use]
    pub fn with_payment_approved(self, authorization_number: impl Into<String>) -> Self {
        self.set_payment(Ok(PaymentResponse {
            success: true,
            authorization_number: Some(authorization_number.into()),
            token_auth: Some("tok_mock".to_string()),
            compliance_data: None,
        }))
    }

    /// Script the payment endpoint to decline the card
    ///
    /// The gateway reports declines as a 200 with `success: false`.
    #[must_use]
    pub fn with_payment_declined(self) -> Self {
        self.set_payment(Ok(PaymentResponse {
            success: false,
            authorization_number: None,
            token_auth: None,
            compliance_data: None,
        }))
    }

    /// Script the payment endpoint to fail with the given error
    #[must_use]
    pub fn with_payment_error(self, error: ApiError) -> Self {
        self.set_payment(Err(error))
    }

    /// Script the reservation endpoint to fail with the given error
    #[must_use]
    pub fn with_reservation_error(self, error: ApiError) -> Self {
        #[allow(clippy::expect_used)]
        {
            *self.reservation.lock().expect("mock script lock poisoned") = Err(error);
        }
        self
    }

    /// Script the ticket endpoint to fail with the given error
    #[must_use]
    pub fn with_ticket_error(self, error: ApiError) -> Self {
        #[allow(clippy::expect_used)]
        {
            *self.ticket.lock().expect("mock script lock poisoned") = Err(error);
        }
        self
    }

    /// Wrap the mock in an `Arc<dyn BookingApi>` for an environment
    #[must_use]
    pub fn shared(self) -> Arc<dyn BookingApi> {
        Arc::new(self)
    }

    /// A handle to the call log that survives `shared()`
    ///
    /// Clone this before wrapping the mock so tests can still inspect the
    /// requests after the mock is behind a trait object.
    #[must_use]
    pub fn call_log(&self) -> MockCallLog {
        MockCallLog {
            calls: Arc::clone(&self.calls),
        }
    }

    /// Every request received so far, in arrival order
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    #[allow(clippy::expect_used)]
    fn set_availability(self, result: Result<AvailabilityResponse, ApiError>) -> Self {
        *self.availability.lock().expect("mock script lock poisoned") = result;
        self
    }

    #[allow(clippy::expect_used)]
    fn set_payment(self, result: Result<PaymentResponse, ApiError>) -> Self {
        *self.payment.lock().expect("mock script lock poisoned") = result;
        self
    }

    #[allow(clippy::expect_used)]
    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }
}

impl Default for MockBookingApi {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockBookingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBookingApi")
            .field("recorded_calls", &self.calls().len())
            .finish()
    }
}

impl BookingApi for MockBookingApi {
    fn check_availability(&self, request: AvailabilityRequest) -> ApiFuture<AvailabilityResponse> {
        self.record(RecordedCall::CheckAvailability(request.clone()));
        #[allow(clippy::expect_used)]
        let result = self
            .availability
            .lock()
            .expect("mock script lock poisoned")
            .clone();
        Box::pin(async move {
            tracing::debug!(date = %request.reservation_date, "Mock availability check");
            result
        })
    }

    fn authorize_payment(&self, request: PaymentRequest) -> ApiFuture<PaymentResponse> {
        self.record(RecordedCall::AuthorizePayment(request.clone()));
        #[allow(clippy::expect_used)]
        let result = self
            .payment
            .lock()
            .expect("mock script lock poisoned")
            .clone();
        Box::pin(async move {
            tracing::debug!(amount = %request.amount, "Mock payment authorization");
            result
        })
    }

    fn create_reservation(&self, request: CreateReservationRequest) -> ApiFuture<()> {
        self.record(RecordedCall::CreateReservation(request));
        #[allow(clippy::expect_used)]
        let result = self
            .reservation
            .lock()
            .expect("mock script lock poisoned")
            .clone();
        Box::pin(async move {
            tracing::debug!("Mock reservation creation");
            result
        })
    }

    fn create_ticket(&self, request: CreateTicketRequest) -> ApiFuture<()> {
        self.record(RecordedCall::CreateTicket(request));
        #[allow(clippy::expect_used)]
        let result = self
            .ticket
            .lock()
            .expect("mock script lock poisoned")
            .clone();
        Box::pin(async move {
            tracing::debug!("Mock ticket creation");
            result
        })
    }
}

/// Inspection handle for a shared [`MockBookingApi`]'s call log
#[derive(Debug, Clone)]
pub struct MockCallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockCallLog {
    /// Every request received so far, in arrival order
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Endpoint names in arrival order, for sequencing assertions
    #[must_use]
    pub fn endpoints(&self) -> Vec<&'static str> {
        self.calls().iter().map(RecordedCall::endpoint).collect()
    }

    /// Number of requests the given endpoint received
    #[must_use]
    pub fn count_for(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[tokio::test]
    async fn test_mock_default_script_approves() {
        let api = MockBookingApi::new();

        let availability = api
            .check_availability(AvailabilityRequest {
                reservation_date: "2025-06-15".to_string(),
                reservation_time: "19:30".to_string(),
                guests: 2,
            })
            .await
            .unwrap();
        assert!(availability.available);

        let payment = api
            .authorize_payment(PaymentRequest {
                card_number: "4242424242424242".to_string(),
                exp_date: "1227".to_string(),
                cvv: "1234".to_string(),
                amount: "660.00".to_string(),
                zip_code: "10001".to_string(),
                address: "1 Main St".to_string(),
            })
            .await
            .unwrap();
        assert!(payment.success);
        assert_eq!(payment.authorization_number.as_deref(), Some("AUTH-12345"));
    }

    #[tokio::test]
    async fn test_mock_scripted_decline() {
        let api = MockBookingApi::new().with_payment_declined();

        let payment = api
            .authorize_payment(PaymentRequest {
                card_number: "4242424242424242".to_string(),
                exp_date: "1227".to_string(),
                cvv: "1234".to_string(),
                amount: "330.00".to_string(),
                zip_code: "10001".to_string(),
                address: "1 Main St".to_string(),
            })
            .await
            .unwrap();
        assert!(!payment.success);
        assert!(payment.authorization_number.is_none());
    }

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let api = MockBookingApi::new();
        let log = api.call_log();

        let _ = api
            .check_availability(AvailabilityRequest {
                reservation_date: "2025-06-15".to_string(),
                reservation_time: "20:00".to_string(),
                guests: 4,
            })
            .await;
        let _ = api
            .authorize_payment(PaymentRequest {
                card_number: "4242424242424242".to_string(),
                exp_date: "1227".to_string(),
                cvv: "1234".to_string(),
                amount: "1320.00".to_string(),
                zip_code: "10001".to_string(),
                address: "1 Main St".to_string(),
            })
            .await;

        assert_eq!(log.endpoints(), vec!["availability", "payment"]);
        assert_eq!(log.count_for("reservation"), 0);
    }

    #[tokio::test]
    async fn test_mock_availability_error_script() {
        let api = MockBookingApi::new().with_availability_error(ApiError::Transport(
            "connection refused".to_string(),
        ));

        let result = api
            .check_availability(AvailabilityRequest {
                reservation_date: "2025-06-15".to_string(),
                reservation_time: "19:30".to_string(),
                guests: 2,
            })
            .await;

        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
