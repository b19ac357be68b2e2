//! # Guestflow Booking API Client
//!
//! HTTP client for the guestflow booking backend: seat availability lookup,
//! payment authorization, and reservation/ticket creation.
//!
//! The [`BookingApi`] trait is object-safe so flow environments can hold an
//! `Arc<dyn BookingApi>` and swap the production [`HttpBookingApi`] for a
//! scripted mock in tests.
//!
//! ## Example
//!
//! ```no_run
//! use guestflow_client::{AvailabilityRequest, BookingApi, HttpBookingApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Base URL from BOOKING_API_URL, falling back to the local default
//!     let api = HttpBookingApi::from_env()?;
//!
//!     let response = api
//!         .check_availability(AvailabilityRequest {
//!             reservation_date: "2026-01-15".to_string(),
//!             reservation_time: "19:30".to_string(),
//!             guests: 2,
//!         })
//!         .await?;
//!
//!     println!("available: {}", response.available);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use api::{ApiResult, BookingApi};
pub use client::HttpBookingApi;
pub use error::ApiError;
pub use types::{
    AvailabilityRequest, AvailabilityResponse, CreateReservationRequest, CreateTicketRequest,
    PaymentAuthorization, PaymentRequest, PaymentResponse,
};
