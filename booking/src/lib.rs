//! Booking flows for a restaurant group: omakase dinner reservations and
//! special-event tickets.
//!
//! Both flows are reducers over explicit phase machines:
//!
//! - [`omakase`] drives the dinner reservation form. Submission is gated on a
//!   seat-availability check, and stale availability responses are fenced by
//!   a per-check sequence number.
//! - [`tickets`] drives event ticket purchases. There is no availability
//!   gate; submission goes straight to payment.
//!
//! Each submission runs a two-step transaction against the booking API:
//! authorize payment, then create the reservation or ticket with the
//! authorization artifacts. A declined payment returns the form to idle with
//! a declined message. A creation failure surfaces the server's error; the
//! authorization is not reversed.
//!
//! # Quick Start
//!
//! ```no_run
//! use guestflow_booking::omakase::{
//!     ReservationAction, ReservationEnvironment, ReservationField, ReservationReducer,
//!     ReservationState,
//! };
//! use guestflow_client::HttpBookingApi;
//! use guestflow_core::environment::SystemClock;
//! use guestflow_runtime::Store;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = ReservationEnvironment::new(
//!     HttpBookingApi::from_env()?.shared(),
//!     Arc::new(SystemClock),
//! );
//! let store = Store::new(ReservationState::new(), ReservationReducer::new(), env);
//!
//! store
//!     .send(ReservationAction::UpdateField {
//!         field: ReservationField::Date,
//!         value: "2026-02-14".to_string(),
//!     })
//!     .await?;
//! store.send(ReservationAction::CheckAvailability).await?;
//!
//! let availability = store.state(|s| s.availability.clone()).await;
//! println!("availability: {availability:?}");
//! # Ok(())
//! # }
//! ```

pub mod omakase;
pub mod tickets;
pub mod types;

// Re-export commonly used types
pub use types::{Availability, Money};
