//! The `BookingApi` trait
//!
//! Object-safe abstraction over the booking backend so flow environments can
//! hold an `Arc<dyn BookingApi>` and tests can substitute a scripted mock.

use crate::error::ApiError;
use crate::types::{
    AvailabilityRequest, AvailabilityResponse, CreateReservationRequest, CreateTicketRequest,
    PaymentRequest, PaymentResponse,
};
use std::future::Future;
use std::pin::Pin;

/// Booking API result
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by [`BookingApi`] methods
///
/// Methods return boxed futures (rather than `async fn`) so the trait stays
/// object-safe behind `Arc<dyn BookingApi>`.
pub type ApiFuture<T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send>>;

/// Abstraction over the booking backend's four endpoints
///
/// Implemented by [`HttpBookingApi`](crate::HttpBookingApi) for production
/// and by scripted mocks in tests.
pub trait BookingApi: Send + Sync {
    /// Check remaining capacity for a date/time/party-size tuple
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status or transport failure.
    fn check_availability(&self, request: AvailabilityRequest) -> ApiFuture<AvailabilityResponse>;

    /// Authorize a payment for the computed total
    ///
    /// A declined payment is not an error at this layer: the response's
    /// `success` flag carries the decision.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status or transport failure.
    fn authorize_payment(&self, request: PaymentRequest) -> ApiFuture<PaymentResponse>;

    /// Create a dinner reservation from a draft plus authorization artifacts
    ///
    /// Success is the backend answering 201 Created.
    ///
    /// # Errors
    ///
    /// Returns an error on any other status or a transport failure.
    fn create_reservation(&self, request: CreateReservationRequest) -> ApiFuture<()>;

    /// Create an event-ticket booking from a draft plus authorization artifacts
    ///
    /// Success is the backend answering 201 Created.
    ///
    /// # Errors
    ///
    /// Returns an error on any other status or a transport failure.
    fn create_ticket(&self, request: CreateTicketRequest) -> ApiFuture<()>;
}
