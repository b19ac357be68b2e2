//! # Guestflow Testing
//!
//! Testing utilities and helpers for the Guestflow architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A scriptable mock booking API with call recording
//! - A fluent Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use guestflow_testing::{MockBookingApi, test_clock};
//! use guestflow_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_booking_flow() {
//!     let env = ReservationEnvironment {
//!         api: MockBookingApi::new().shared(),
//!         clock: Arc::new(test_clock()),
//!     };
//!     let store = Store::new(ReservationState::default(), ReservationReducer, env);
//!
//!     let mut handle = store.send(ReservationAction::CheckAvailability).await?;
//!     handle.wait().await;
//!
//!     let available = store.state(|s| s.availability.clone()).await;
//!     assert!(matches!(available, Availability::Available { .. }));
//! }
//! ```

/// Mock implementations for testing
pub mod mocks;


// Re-export commonly used items
pub use mocks::{FixedClock, MockBookingApi, RecordedCall, test_clock};
pub use reducer_test::{ReducerTest, assertions};
