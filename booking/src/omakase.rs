//! Omakase dinner reservation flow.
//!
//! Guests pick a date, seating time, and party size, check seat availability
//! for that slot, then submit contact and card details. Submission runs a
//! two-step transaction: authorize payment, then create the reservation with
//! the authorization artifacts.
//!
//! # Phase machine
//!
//! ```text
//! Idle ──CheckAvailability──▶ Checking ──AvailabilityResolved──▶ Idle
//!
//! Idle ──Submit──▶ Authorizing ──PaymentAuthorized──▶ Booking ──BookingConfirmed──▶ Confirmed
//!                      │                                 │
//!                      └──PaymentDeclined──▶ Idle        └──BookingFailed──▶ Idle
//! ```
//!
//! Availability responses carry the sequence number of the check that issued
//! them. A response is applied only while the flow is still `Checking` and
//! the number matches the latest check, so a result can never land on a slot
//! the guest has since edited away from.

use crate::types::{Availability, Money, booking_failure_message, messages};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use guestflow_client::{
    ApiError, AvailabilityRequest, AvailabilityResponse, BookingApi, CreateReservationRequest,
    PaymentAuthorization, PaymentRequest,
};
use guestflow_core::effect::Effect;
use guestflow_core::environment::Clock;
use guestflow_core::reducer::Reducer;
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

// ============================================================================
// Constants
// ============================================================================

/// Fixed price per guest for the omakase dinner
pub const PRICE_PER_GUEST: Money = Money::from_dollars(330);

/// Seating times offered by the dining room
pub const SEATING_TIMES: [&str; 5] = ["19:30", "20:00", "20:30", "21:00", "21:30"];

/// Smallest bookable party
pub const MIN_PARTY_SIZE: u32 = 1;

/// Largest party the dining room takes in one booking
pub const MAX_PARTY_SIZE: u32 = 12;

/// Notice shown under the date field when the drafted date is a Thursday
pub const CLOSURE_NOTICE: &str = "Closed on Thursdays";

/// Whether a drafted date (`YYYY-MM-DD`) falls on the weekly closure day
///
/// Empty or unparseable dates are not closure days.
#[must_use]
pub fn is_closure_day(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok_and(|d| d.weekday() == Weekday::Thu)
}

// ============================================================================
// Draft
// ============================================================================

/// Editable fields of the reservation form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationField {
    /// Guest first name
    FirstName,
    /// Guest last name
    LastName,
    /// Guest email
    Email,
    /// Guest phone (optional)
    Phone,
    /// Reservation date (`YYYY-MM-DD`)
    Date,
    /// Seating time (`HH:MM`)
    Time,
    /// Party size (entered as text)
    PartySize,
    /// Allergy notes (optional)
    Allergies,
    /// Special requests (optional)
    SpecialRequests,
    /// Card number
    CardNumber,
    /// Card expiry (`MMYY`)
    ExpDate,
    /// Card verification value
    Cvv,
    /// Billing ZIP code
    ZipCode,
    /// Billing street address
    Address,
}

impl ReservationField {
    /// Whether editing this field changes the slot being checked for
    /// availability
    #[must_use]
    pub const fn affects_slot(self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::PartySize)
    }
}

/// Form draft for a dinner reservation
///
/// All fields are held as entered; parsing and validation happen at the
/// transitions that need them. The draft is reset on successful completion
/// and retained unchanged on any failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationDraft {
    /// Guest first name
    pub first_name: String,
    /// Guest last name
    pub last_name: String,
    /// Guest email
    pub email: String,
    /// Guest phone (may stay empty)
    pub phone: String,
    /// Reservation date (`YYYY-MM-DD`)
    pub date: String,
    /// Seating time (`HH:MM`)
    pub time: String,
    /// Party size as entered
    pub party_size: String,
    /// Allergy notes (may stay empty)
    pub allergies: String,
    /// Special requests (may stay empty)
    pub special_requests: String,
    /// Card number
    pub card_number: String,
    /// Card expiry (`MMYY`)
    pub exp_date: String,
    /// Card verification value
    pub cvv: String,
    /// Billing ZIP code
    pub zip_code: String,
    /// Billing street address
    pub address: String,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            date: String::new(),
            time: String::new(),
            party_size: "1".to_string(),
            allergies: String::new(),
            special_requests: String::new(),
            card_number: String::new(),
            exp_date: String::new(),
            cvv: String::new(),
            zip_code: String::new(),
            address: String::new(),
        }
    }
}

impl ReservationDraft {
    /// Applies a single field edit
    pub fn set(&mut self, field: ReservationField, value: String) {
        match field {
            ReservationField::FirstName => self.first_name = value,
            ReservationField::LastName => self.last_name = value,
            ReservationField::Email => self.email = value,
            ReservationField::Phone => self.phone = value,
            ReservationField::Date => self.date = value,
            ReservationField::Time => self.time = value,
            ReservationField::PartySize => self.party_size = value,
            ReservationField::Allergies => self.allergies = value,
            ReservationField::SpecialRequests => self.special_requests = value,
            ReservationField::CardNumber => self.card_number = value,
            ReservationField::ExpDate => self.exp_date = value,
            ReservationField::Cvv => self.cvv = value,
            ReservationField::ZipCode => self.zip_code = value,
            ReservationField::Address => self.address = value,
        }
    }

    /// Party size as a positive integer, when the field parses as one
    #[must_use]
    pub fn party_size(&self) -> Option<u32> {
        self.party_size
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&n| n >= MIN_PARTY_SIZE)
    }

    /// Total dinner price for the drafted party size
    ///
    /// Zero when the party size is missing or not a positive integer; never
    /// fails.
    #[must_use]
    pub fn total(&self) -> Money {
        self.party_size()
            .and_then(|n| PRICE_PER_GUEST.checked_multiply(n))
            .unwrap_or(Money::ZERO)
    }

    /// Whether the slot inputs (date, time, party size) are all set
    #[must_use]
    pub fn has_slot_inputs(&self) -> bool {
        !self.date.is_empty() && !self.time.is_empty() && !self.party_size.is_empty()
    }

    /// Whether every required field is filled in
    ///
    /// Phone, allergies, and special requests are optional.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.date,
            &self.time,
            &self.party_size,
            &self.card_number,
            &self.exp_date,
            &self.cvv,
            &self.zip_code,
            &self.address,
        ];
        required.iter().all(|field| !field.is_empty())
    }
}

// ============================================================================
// State
// ============================================================================

/// Submission phase of the reservation flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReservationPhase {
    /// Form editable; nothing in flight
    #[default]
    Idle,
    /// An availability check is in flight for the drafted slot
    Checking,
    /// Step 1: payment authorization in flight
    Authorizing {
        /// The draft as it stood at submission; the transaction runs against
        /// this snapshot, so later edits cannot change what gets booked
        snapshot: Box<ReservationDraft>,
    },
    /// Step 2: reservation creation in flight
    Booking,
    /// Terminal success; the draft has been reset
    Confirmed,
}

/// State for the reservation flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationState {
    /// Form draft, mutated field-by-field
    pub draft: ReservationDraft,
    /// Outcome of the latest availability check for the drafted slot
    pub availability: Availability,
    /// Where the flow currently is
    pub phase: ReservationPhase,
    /// Sequence number of the most recent availability check
    ///
    /// Monotonic for the life of the flow instance, surviving `Reset`, so a
    /// response from before a reset can never match a check from after it.
    pub check_seq: u64,
    /// Guest-facing message from the most recent failure, if any
    pub last_error: Option<String>,
}

impl ReservationState {
    /// Creates a fresh reservation flow state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the submit affordance is enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, ReservationPhase::Idle)
            && self.draft.has_required_fields()
            && self.availability.is_available()
    }

    /// Closure notice for the drafted date, when it falls on a Thursday
    #[must_use]
    pub fn closure_notice(&self) -> Option<&'static str> {
        is_closure_day(&self.draft.date).then_some(CLOSURE_NOTICE)
    }

    /// Total dinner price for the drafted party size
    #[must_use]
    pub fn total(&self) -> Money {
        self.draft.total()
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions driving the reservation flow
#[derive(Clone, Debug)]
pub enum ReservationAction {
    /// Guest edited a form field
    UpdateField {
        /// Which field was edited
        field: ReservationField,
        /// The new raw value
        value: String,
    },
    /// Guest asked for a seat-availability check on the drafted slot
    CheckAvailability,
    /// An availability call finished
    AvailabilityResolved {
        /// Sequence number of the check that issued the call
        seq: u64,
        /// What the backend said, or how the call failed
        result: Result<AvailabilityResponse, ApiError>,
    },
    /// Guest submitted the form
    Submit,
    /// Step 1 produced an authorization
    PaymentAuthorized {
        /// Artifacts to forward to reservation creation; never stored
        authorization: PaymentAuthorization,
    },
    /// Step 1 ended without an authorization (decline or call failure)
    PaymentDeclined,
    /// Step 2 created the reservation
    BookingConfirmed,
    /// Step 2 failed after a successful authorization
    BookingFailed {
        /// Guest-facing message describing the failure
        message: String,
    },
    /// Start over with an empty draft
    Reset,
}

// ============================================================================
// Environment
// ============================================================================

/// Injected dependencies for the reservation flow
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Booking API used for availability, payment, and creation calls
    pub api: Arc<dyn BookingApi>,
    /// Clock used to derive the earliest selectable date
    pub clock: Arc<dyn Clock>,
}

impl ReservationEnvironment {
    /// Creates a new environment
    #[must_use]
    pub fn new(api: Arc<dyn BookingApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// Earliest selectable reservation date: tomorrow, as `YYYY-MM-DD`
    #[must_use]
    pub fn earliest_reservation_date(&self) -> String {
        (self.clock.now() + Duration::days(1))
            .format("%Y-%m-%d")
            .to_string()
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer driving the reservation flow
#[derive(Clone, Copy, Debug)]
pub struct ReservationReducer;

impl ReservationReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn check_availability_effect(
        env: &ReservationEnvironment,
        seq: u64,
        draft: &ReservationDraft,
    ) -> Effect<ReservationAction> {
        let api = Arc::clone(&env.api);
        let request = AvailabilityRequest {
            reservation_date: draft.date.clone(),
            reservation_time: draft.time.clone(),
            guests: draft.party_size().unwrap_or(0),
        };

        Effect::Future(Box::pin(async move {
            let result = api.check_availability(request).await;
            tracing::debug!(seq, ok = result.is_ok(), "availability check resolved");
            Some(ReservationAction::AvailabilityResolved { seq, result })
        }))
    }

    fn authorize_payment_effect(
        env: &ReservationEnvironment,
        draft: &ReservationDraft,
    ) -> Effect<ReservationAction> {
        let api = Arc::clone(&env.api);
        let request = PaymentRequest {
            card_number: draft.card_number.clone(),
            exp_date: draft.exp_date.clone(),
            cvv: draft.cvv.clone(),
            amount: draft.total().to_decimal_string(),
            zip_code: draft.zip_code.clone(),
            address: draft.address.clone(),
        };

        Effect::Future(Box::pin(async move {
            match api.authorize_payment(request).await {
                Ok(response) if response.success => Some(ReservationAction::PaymentAuthorized {
                    authorization: response.into_authorization(),
                }),
                Ok(_) => {
                    tracing::warn!("payment authorization declined");
                    Some(ReservationAction::PaymentDeclined)
                }
                Err(error) => {
                    tracing::warn!(%error, "payment authorization call failed");
                    Some(ReservationAction::PaymentDeclined)
                }
            }
        }))
    }

    fn create_reservation_effect(
        env: &ReservationEnvironment,
        snapshot: &ReservationDraft,
        authorization: PaymentAuthorization,
    ) -> Effect<ReservationAction> {
        let api = Arc::clone(&env.api);
        let request = CreateReservationRequest {
            first_name: snapshot.first_name.clone(),
            last_name: snapshot.last_name.clone(),
            email: snapshot.email.clone(),
            phone: snapshot.phone.clone(),
            guests: snapshot.party_size().unwrap_or(0),
            reservation_date: snapshot.date.clone(),
            reservation_time: snapshot.time.clone(),
            allergies: snapshot.allergies.clone(),
            special_requests: snapshot.special_requests.clone(),
            payment_number: authorization.authorization_number,
            token_auth: authorization.token_auth,
            compliance_data: authorization.compliance_data,
        };

        Effect::Future(Box::pin(async move {
            match api.create_reservation(request).await {
                Ok(()) => Some(ReservationAction::BookingConfirmed),
                Err(error) => {
                    tracing::warn!(%error, "reservation creation failed");
                    Some(ReservationAction::BookingFailed {
                        message: booking_failure_message(&error),
                    })
                }
            }
        }))
    }
}

impl Default for ReservationReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ReservationReducer {
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;

    #[allow(clippy::too_many_lines)] // Every phase transition lives in this match
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match (state.phase.clone(), action) {
            // ========== Field edits ==========
            (ReservationPhase::Confirmed, ReservationAction::UpdateField { .. }) => {
                SmallVec::new()
            }

            (phase, ReservationAction::UpdateField { field, value }) => {
                state.draft.set(field, value);
                if field.affects_slot() {
                    // The current result no longer describes the drafted slot.
                    state.availability = Availability::Unknown;
                    if matches!(phase, ReservationPhase::Checking) {
                        state.phase = ReservationPhase::Idle;
                    }
                }
                SmallVec::new()
            }

            // ========== Availability check ==========
            (ReservationPhase::Idle, ReservationAction::CheckAvailability) => {
                if !state.draft.has_slot_inputs() {
                    state.last_error = Some(messages::MISSING_GATE_INPUTS.to_string());
                    return SmallVec::new();
                }

                state.check_seq += 1;
                state.phase = ReservationPhase::Checking;
                state.availability = Availability::Unknown;
                state.last_error = None;

                smallvec![Self::check_availability_effect(
                    env,
                    state.check_seq,
                    &state.draft
                )]
            }

            (ReservationPhase::Checking, ReservationAction::AvailabilityResolved { seq, result })
                if seq == state.check_seq =>
            {
                state.phase = ReservationPhase::Idle;
                match result {
                    Ok(response) if response.available => {
                        state.availability = Availability::Available {
                            seats_left: response.seats_left,
                        };
                    }
                    Ok(response) => {
                        let reason = response
                            .reason
                            .unwrap_or_else(|| messages::NOT_AVAILABLE.to_string());
                        state.last_error = Some(reason.clone());
                        state.availability = Availability::Unavailable { reason };
                    }
                    Err(_) => {
                        // A completed check never leaves availability unknown;
                        // a failed call reads as unavailable until one passes.
                        state.last_error = Some(messages::AVAILABILITY_CHECK_FAILED.to_string());
                        state.availability = Availability::Unavailable {
                            reason: messages::AVAILABILITY_CHECK_FAILED.to_string(),
                        };
                    }
                }
                SmallVec::new()
            }

            // Stale responses, and responses arriving after the slot was
            // edited, describe inputs the guest abandoned.
            (_, ReservationAction::AvailabilityResolved { .. }) => SmallVec::new(),

            // ========== Step 1: Submit -> authorize payment ==========
            (ReservationPhase::Idle, ReservationAction::Submit) => {
                if !state.draft.has_required_fields() {
                    state.last_error = Some(messages::MISSING_REQUIRED_FIELDS.to_string());
                    return SmallVec::new();
                }
                if !state.availability.is_available() {
                    state.last_error = Some(messages::CHECK_AVAILABILITY_FIRST.to_string());
                    return SmallVec::new();
                }

                state.last_error = None;
                let snapshot = Box::new(state.draft.clone());
                let effect = Self::authorize_payment_effect(env, &snapshot);
                state.phase = ReservationPhase::Authorizing { snapshot };

                smallvec![effect]
            }

            // ========== Step 2: authorization -> create reservation ==========
            (
                ReservationPhase::Authorizing { snapshot },
                ReservationAction::PaymentAuthorized { authorization },
            ) => {
                let effect = Self::create_reservation_effect(env, &snapshot, authorization);
                state.phase = ReservationPhase::Booking;
                smallvec![effect]
            }

            (ReservationPhase::Authorizing { .. }, ReservationAction::PaymentDeclined) => {
                // Draft retained; a new attempt is a fresh Submit.
                state.phase = ReservationPhase::Idle;
                state.last_error = Some(messages::PAYMENT_DECLINED.to_string());
                SmallVec::new()
            }

            // ========== Terminal outcomes ==========
            (ReservationPhase::Booking, ReservationAction::BookingConfirmed) => {
                state.draft = ReservationDraft::default();
                state.availability = Availability::Unknown;
                state.last_error = None;
                state.phase = ReservationPhase::Confirmed;
                SmallVec::new()
            }

            (ReservationPhase::Booking, ReservationAction::BookingFailed { message }) => {
                // No compensating void is issued for the dangling
                // authorization; the draft is retained for correction.
                // TODO: void the authorization once the gateway exposes a void endpoint
                state.phase = ReservationPhase::Idle;
                state.last_error = Some(message);
                SmallVec::new()
            }

            // ========== Reset ==========
            (
                ReservationPhase::Idle | ReservationPhase::Checking | ReservationPhase::Confirmed,
                ReservationAction::Reset,
            ) => {
                *state = ReservationState {
                    check_seq: state.check_seq,
                    ..ReservationState::default()
                };
                SmallVec::new()
            }

            // Out-of-phase actions (double submits, resets mid-transaction,
            // terminal outcomes after the phase moved on) are dropped.
            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use guestflow_testing::{MockBookingApi, ReducerTest, assertions, test_clock};
    use proptest::prelude::*;

    fn test_env() -> ReservationEnvironment {
        ReservationEnvironment::new(MockBookingApi::new().shared(), Arc::new(test_clock()))
    }

    fn slot_draft() -> ReservationDraft {
        ReservationDraft {
            date: "2026-02-13".to_string(),
            time: "19:30".to_string(),
            party_size: "2".to_string(),
            ..ReservationDraft::default()
        }
    }

    fn full_draft() -> ReservationDraft {
        ReservationDraft {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            allergies: "shellfish".to_string(),
            special_requests: "window seat".to_string(),
            card_number: "4242424242424242".to_string(),
            exp_date: "1227".to_string(),
            cvv: "123".to_string(),
            zip_code: "10001".to_string(),
            address: "1 Main St".to_string(),
            ..slot_draft()
        }
    }

    fn submittable_state() -> ReservationState {
        ReservationState {
            draft: full_draft(),
            availability: Availability::Available {
                seats_left: Some(4),
            },
            phase: ReservationPhase::Idle,
            check_seq: 1,
            last_error: None,
        }
    }

    fn authorization() -> PaymentAuthorization {
        PaymentAuthorization {
            authorization_number: Some("AUTH-12345".to_string()),
            token_auth: Some("tok_mock".to_string()),
            compliance_data: None,
        }
    }

    #[test]
    fn update_field_edits_the_draft() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(ReservationState::new())
            .when_action(ReservationAction::UpdateField {
                field: ReservationField::FirstName,
                value: "Ada".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.draft.first_name, "Ada");
                assert_eq!(state.phase, ReservationPhase::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn editing_the_slot_resets_availability() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.availability = Availability::Available {
            seats_left: Some(8),
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::UpdateField {
                field: ReservationField::Date,
                value: "2026-02-14".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.availability, Availability::Unknown);
                assert_eq!(state.draft.date, "2026-02-14");
            })
            .run();
    }

    #[test]
    fn editing_a_contact_field_keeps_availability() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.availability = Availability::Available {
            seats_left: Some(8),
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::UpdateField {
                field: ReservationField::Email,
                value: "ada@example.com".to_string(),
            })
            .then_state(|state| {
                assert!(state.availability.is_available());
            })
            .run();
    }

    #[test]
    fn editing_the_slot_mid_check_abandons_the_check() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.phase = ReservationPhase::Checking;
        state.check_seq = 1;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::UpdateField {
                field: ReservationField::Time,
                value: "21:00".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Idle);
                assert_eq!(state.availability, Availability::Unknown);
            })
            .run();
    }

    #[test]
    fn check_availability_requires_slot_inputs() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(ReservationState {
                draft: ReservationDraft {
                    party_size: String::new(),
                    ..ReservationDraft::default()
                },
                ..ReservationState::default()
            })
            .when_action(ReservationAction::CheckAvailability)
            .then_state(|state| {
                assert_eq!(
                    state.last_error.as_deref(),
                    Some(messages::MISSING_GATE_INPUTS)
                );
                assert_eq!(state.phase, ReservationPhase::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn check_availability_dispatches_a_call() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.last_error = Some("old message".to_string());

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::CheckAvailability)
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Checking);
                assert_eq!(state.check_seq, 1);
                assert_eq!(state.last_error, None);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn closure_day_shows_a_notice_but_allows_the_check() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        // 2026-02-12 is a Thursday.
        state.draft.date = "2026-02-12".to_string();

        assert_eq!(state.closure_notice(), Some(CLOSURE_NOTICE));

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::CheckAvailability)
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Checking);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn available_response_opens_the_gate() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.phase = ReservationPhase::Checking;
        state.check_seq = 1;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::AvailabilityResolved {
                seq: 1,
                result: Ok(AvailabilityResponse {
                    available: true,
                    seats_left: Some(4),
                    reason: None,
                }),
            })
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Idle);
                assert_eq!(
                    state.availability,
                    Availability::Available {
                        seats_left: Some(4)
                    }
                );
                assert_eq!(state.last_error, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn unavailable_response_surfaces_the_reason() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.phase = ReservationPhase::Checking;
        state.check_seq = 1;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::AvailabilityResolved {
                seq: 1,
                result: Ok(AvailabilityResponse {
                    available: false,
                    seats_left: None,
                    reason: Some("Fully booked".to_string()),
                }),
            })
            .then_state(|state| {
                assert_eq!(
                    state.availability,
                    Availability::Unavailable {
                        reason: "Fully booked".to_string()
                    }
                );
                assert_eq!(state.last_error.as_deref(), Some("Fully booked"));
            })
            .run();
    }

    #[test]
    fn unavailable_response_without_reason_uses_the_fallback() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.phase = ReservationPhase::Checking;
        state.check_seq = 1;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::AvailabilityResolved {
                seq: 1,
                result: Ok(AvailabilityResponse {
                    available: false,
                    seats_left: None,
                    reason: None,
                }),
            })
            .then_state(|state| {
                assert_eq!(state.last_error.as_deref(), Some(messages::NOT_AVAILABLE));
            })
            .run();
    }

    #[test]
    fn failed_check_reads_as_unavailable() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.phase = ReservationPhase::Checking;
        state.check_seq = 1;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::AvailabilityResolved {
                seq: 1,
                result: Err(ApiError::Transport("connection refused".to_string())),
            })
            .then_state(|state| {
                assert_eq!(
                    state.availability,
                    Availability::Unavailable {
                        reason: messages::AVAILABILITY_CHECK_FAILED.to_string()
                    }
                );
                assert_eq!(
                    state.last_error.as_deref(),
                    Some(messages::AVAILABILITY_CHECK_FAILED)
                );
                assert!(!state.can_submit());
            })
            .run();
    }

    #[test]
    fn stale_availability_response_is_discarded() {
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.phase = ReservationPhase::Checking;
        state.check_seq = 2;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::AvailabilityResolved {
                seq: 1,
                result: Ok(AvailabilityResponse {
                    available: true,
                    seats_left: Some(4),
                    reason: None,
                }),
            })
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Checking);
                assert_eq!(state.availability, Availability::Unknown);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn response_after_slot_edit_is_discarded() {
        // The edit already returned the phase to Idle; the late response
        // must not flip availability for the new slot.
        let mut state = ReservationState::new();
        state.draft = slot_draft();
        state.phase = ReservationPhase::Idle;
        state.check_seq = 1;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::AvailabilityResolved {
                seq: 1,
                result: Ok(AvailabilityResponse {
                    available: true,
                    seats_left: Some(4),
                    reason: None,
                }),
            })
            .then_state(|state| {
                assert_eq!(state.availability, Availability::Unknown);
            })
            .run();
    }

    #[test]
    fn submit_requires_all_fields() {
        let mut state = submittable_state();
        state.draft.card_number = String::new();

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::Submit)
            .then_state(|state| {
                assert_eq!(
                    state.last_error.as_deref(),
                    Some(messages::MISSING_REQUIRED_FIELDS)
                );
                assert_eq!(state.phase, ReservationPhase::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn submit_requires_a_passing_availability_check() {
        let mut state = submittable_state();
        state.availability = Availability::Unknown;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::Submit)
            .then_state(|state| {
                assert_eq!(
                    state.last_error.as_deref(),
                    Some(messages::CHECK_AVAILABILITY_FIRST)
                );
                assert_eq!(state.phase, ReservationPhase::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn submit_snapshots_the_draft_and_authorizes() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(submittable_state())
            .when_action(ReservationAction::Submit)
            .then_state(|state| {
                let ReservationPhase::Authorizing { snapshot } = &state.phase else {
                    panic!("expected Authorizing, got {:?}", state.phase);
                };
                assert_eq!(**snapshot, full_draft());
                assert_eq!(state.last_error, None);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn submit_is_ignored_while_a_transaction_runs() {
        let state = ReservationState {
            phase: ReservationPhase::Authorizing {
                snapshot: Box::new(full_draft()),
            },
            ..submittable_state()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state.clone())
            .when_action(ReservationAction::Submit)
            .then_state(move |after| {
                assert_eq!(*after, state);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn authorized_payment_moves_to_booking() {
        let state = ReservationState {
            phase: ReservationPhase::Authorizing {
                snapshot: Box::new(full_draft()),
            },
            ..submittable_state()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::PaymentAuthorized {
                authorization: authorization(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Booking);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn declined_payment_returns_to_idle_with_the_draft() {
        let state = ReservationState {
            phase: ReservationPhase::Authorizing {
                snapshot: Box::new(full_draft()),
            },
            ..submittable_state()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::PaymentDeclined)
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Idle);
                assert_eq!(state.last_error.as_deref(), Some(messages::PAYMENT_DECLINED));
                assert_eq!(state.draft, full_draft());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn confirmed_booking_resets_the_draft() {
        let state = ReservationState {
            phase: ReservationPhase::Booking,
            ..submittable_state()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::BookingConfirmed)
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Confirmed);
                assert_eq!(state.draft, ReservationDraft::default());
                assert_eq!(state.availability, Availability::Unknown);
                assert_eq!(state.last_error, None);
            })
            .run();
    }

    #[test]
    fn failed_booking_keeps_the_draft() {
        let state = ReservationState {
            phase: ReservationPhase::Booking,
            ..submittable_state()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::BookingFailed {
                message: "No seats left".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, ReservationPhase::Idle);
                assert_eq!(state.last_error.as_deref(), Some("No seats left"));
                assert_eq!(state.draft, full_draft());
            })
            .run();
    }

    #[test]
    fn reset_clears_the_form_but_keeps_the_check_counter() {
        let state = ReservationState {
            phase: ReservationPhase::Confirmed,
            check_seq: 3,
            ..submittable_state()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(ReservationAction::Reset)
            .then_state(|state| {
                assert_eq!(state.draft, ReservationDraft::default());
                assert_eq!(state.phase, ReservationPhase::Idle);
                assert_eq!(state.check_seq, 3);
            })
            .run();
    }

    #[test]
    fn reset_is_ignored_mid_transaction() {
        let state = ReservationState {
            phase: ReservationPhase::Booking,
            ..submittable_state()
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state.clone())
            .when_action(ReservationAction::Reset)
            .then_state(move |after| {
                assert_eq!(*after, state);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn zero_party_size_totals_zero() {
        let draft = ReservationDraft {
            party_size: "0".to_string(),
            ..ReservationDraft::default()
        };
        assert_eq!(draft.total(), Money::ZERO);
        assert_eq!(draft.party_size(), None);
    }

    #[test]
    fn default_draft_seats_one_guest() {
        let draft = ReservationDraft::default();
        assert_eq!(draft.party_size(), Some(1));
        assert_eq!(draft.total(), PRICE_PER_GUEST);
    }

    #[test]
    fn earliest_reservation_date_is_tomorrow() {
        let env = test_env();
        assert_eq!(env.earliest_reservation_date(), "2025-01-02");
    }

    #[test]
    fn thursdays_are_closure_days() {
        assert!(is_closure_day("2026-02-12"));
        assert!(!is_closure_day("2026-02-13"));
        assert!(!is_closure_day(""));
        assert!(!is_closure_day("not-a-date"));
    }

    #[test]
    fn five_evening_seatings_are_offered() {
        assert_eq!(SEATING_TIMES, ["19:30", "20:00", "20:30", "21:00", "21:30"]);
        let draft = slot_draft();
        assert!(SEATING_TIMES.contains(&draft.time.as_str()));
    }

    proptest! {
        #[test]
        fn total_is_party_size_times_unit_price(n in 1u32..=MAX_PARTY_SIZE) {
            let draft = ReservationDraft {
                party_size: n.to_string(),
                ..ReservationDraft::default()
            };
            prop_assert_eq!(
                draft.total(),
                Money::from_cents(PRICE_PER_GUEST.cents() * u64::from(n))
            );
        }

        #[test]
        fn non_numeric_party_size_totals_zero(raw in "[a-zA-Z ]{0,8}") {
            let draft = ReservationDraft {
                party_size: raw,
                ..ReservationDraft::default()
            };
            prop_assert_eq!(draft.total(), Money::ZERO);
        }

        #[test]
        fn slot_edits_always_reset_availability(
            field_idx in 0usize..3,
            value in "[0-9:-]{1,10}",
            seats in proptest::option::of(0u32..20),
        ) {
            let field = [
                ReservationField::Date,
                ReservationField::Time,
                ReservationField::PartySize,
            ][field_idx];

            let mut state = ReservationState::new();
            state.draft = slot_draft();
            state.availability = Availability::Available { seats_left: seats };

            let reducer = ReservationReducer::new();
            let env = test_env();
            let _ = reducer.reduce(
                &mut state,
                ReservationAction::UpdateField { field, value },
                &env,
            );

            prop_assert_eq!(state.availability, Availability::Unknown);
        }
    }
}
