//! Event ticket purchase flow.
//!
//! Tickets for the New Year's events sell without an availability gate:
//! submission goes straight to payment authorization, then ticket creation.
//! The event variant is chosen by query parameter before the flow starts and
//! only changes the display copy and the `eventType` field sent on creation;
//! the orchestration is identical for every event.

use crate::types::{Money, booking_failure_message, messages};
use guestflow_client::{BookingApi, CreateTicketRequest, PaymentAuthorization, PaymentRequest};
use guestflow_core::effect::Effect;
use guestflow_core::reducer::Reducer;
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

// ============================================================================
// Constants
// ============================================================================

/// Fixed ticket price per guest
pub const PRICE_PER_GUEST: Money = Money::from_dollars(500);

/// Smallest bookable party
pub const MIN_PARTY_SIZE: u32 = 1;

/// Largest party a single ticket purchase covers
pub const MAX_PARTY_SIZE: u32 = 20;

// ============================================================================
// Events
// ============================================================================

/// Events currently on sale
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventKind {
    /// New Year's celebration at the Mangrove restaurant
    #[default]
    Mangrove,
    /// New Year's celebration at Ikigai
    Ikigai,
}

impl EventKind {
    /// Resolves the event from the `event` query-parameter value
    ///
    /// Missing or unknown values fall back to the Mangrove event.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("ikigai") => Self::Ikigai,
            _ => Self::Mangrove,
        }
    }

    /// Wire name sent as `eventType` on ticket creation
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Mangrove => "mangrove",
            Self::Ikigai => "ikigai",
        }
    }

    /// Display copy for this event
    #[must_use]
    pub const fn info(self) -> EventInfo {
        match self {
            Self::Mangrove => EventInfo {
                name: "The Mangrove",
                subtitle: "New Year's 2026",
                description: "Exclusive celebration at Mangrove Restaurant in Biras Marina",
            },
            Self::Ikigai => EventInfo {
                name: "Ikigai",
                subtitle: "New Year's 2026",
                description: "Exclusive Japanese/Caribbean fusion celebration",
            },
        }
    }
}

/// Display copy for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventInfo {
    /// Event name
    pub name: &'static str,
    /// Event subtitle
    pub subtitle: &'static str,
    /// One-line description
    pub description: &'static str,
}

// ============================================================================
// Draft
// ============================================================================

/// Editable fields of the ticket form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketField {
    /// Guest first name
    FirstName,
    /// Guest last name
    LastName,
    /// Guest email
    Email,
    /// Party size (entered as text)
    PartySize,
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

/// Form draft for a ticket purchase
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketDraft {
    /// Guest first name
    pub first_name: String,
    /// Guest last name
    pub last_name: String,
    /// Guest email
    pub email: String,
    /// Party size as entered
    pub party_size: String,
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

impl Default for TicketDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            party_size: "1".to_string(),
            card_number: String::new(),
            exp_date: String::new(),
            cvv: String::new(),
            zip_code: String::new(),
            address: String::new(),
        }
    }
}

impl TicketDraft {
    /// Applies a single field edit
    pub fn set(&mut self, field: TicketField, value: String) {
        match field {
            TicketField::FirstName => self.first_name = value,
            TicketField::LastName => self.last_name = value,
            TicketField::Email => self.email = value,
            TicketField::PartySize => self.party_size = value,
            TicketField::CardNumber => self.card_number = value,
            TicketField::ExpDate => self.exp_date = value,
            TicketField::Cvv => self.cvv = value,
            TicketField::ZipCode => self.zip_code = value,
            TicketField::Address => self.address = value,
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

    /// Total ticket price for the drafted party size
    ///
    /// Zero when the party size is missing or not a positive integer.
    #[must_use]
    pub fn total(&self) -> Money {
        self.party_size()
            .and_then(|n| PRICE_PER_GUEST.checked_multiply(n))
            .unwrap_or(Money::ZERO)
    }

    /// Whether every required field is filled in
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.email,
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

/// Submission phase of the ticket flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TicketPhase {
    /// Form editable; nothing in flight
    #[default]
    Idle,
    /// Step 1: payment authorization in flight
    Authorizing {
        /// The draft as it stood at submission
        snapshot: Box<TicketDraft>,
    },
    /// Step 2: ticket creation in flight
    Booking,
    /// Terminal success; the draft has been reset
    Confirmed,
}

/// State for the ticket flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TicketState {
    /// Which event tickets are being sold for
    pub event: EventKind,
    /// Form draft, mutated field-by-field
    pub draft: TicketDraft,
    /// Where the flow currently is
    pub phase: TicketPhase,
    /// Guest-facing message from the most recent failure, if any
    pub last_error: Option<String>,
}

impl TicketState {
    /// Creates a fresh ticket flow state for the given event
    #[must_use]
    pub fn new(event: EventKind) -> Self {
        Self {
            event,
            ..Self::default()
        }
    }

    /// Whether the submit affordance is enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, TicketPhase::Idle) && self.draft.has_required_fields()
    }

    /// Total ticket price for the drafted party size
    #[must_use]
    pub fn total(&self) -> Money {
        self.draft.total()
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions driving the ticket flow
#[derive(Clone, Debug)]
pub enum TicketAction {
    /// Guest edited a form field
    UpdateField {
        /// Which field was edited
        field: TicketField,
        /// The new raw value
        value: String,
    },
    /// Guest submitted the form
    Submit,
    /// Step 1 produced an authorization
    PaymentAuthorized {
        /// Artifacts to forward to ticket creation; never stored
        authorization: PaymentAuthorization,
    },
    /// Step 1 ended without an authorization (decline or call failure)
    PaymentDeclined,
    /// Step 2 created the ticket booking
    BookingConfirmed,
    /// Step 2 failed after a successful authorization
    BookingFailed {
        /// Guest-facing message describing the failure
        message: String,
    },
    /// Start over with an empty draft for the same event
    Reset,
}

// ============================================================================
// Environment
// ============================================================================

/// Injected dependencies for the ticket flow
#[derive(Clone)]
pub struct TicketEnvironment {
    /// Booking API used for payment and creation calls
    pub api: Arc<dyn BookingApi>,
}

impl TicketEnvironment {
    /// Creates a new environment
    #[must_use]
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self { api }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer driving the ticket flow
#[derive(Clone, Copy, Debug)]
pub struct TicketReducer;

impl TicketReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn authorize_payment_effect(
        env: &TicketEnvironment,
        draft: &TicketDraft,
    ) -> Effect<TicketAction> {
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
                Ok(response) if response.success => Some(TicketAction::PaymentAuthorized {
                    authorization: response.into_authorization(),
                }),
                Ok(_) => {
                    tracing::warn!("payment authorization declined");
                    Some(TicketAction::PaymentDeclined)
                }
                Err(error) => {
                    tracing::warn!(%error, "payment authorization call failed");
                    Some(TicketAction::PaymentDeclined)
                }
            }
        }))
    }

    fn create_ticket_effect(
        env: &TicketEnvironment,
        event: EventKind,
        snapshot: &TicketDraft,
        authorization: PaymentAuthorization,
    ) -> Effect<TicketAction> {
        let api = Arc::clone(&env.api);
        let request = CreateTicketRequest {
            first_name: snapshot.first_name.clone(),
            last_name: snapshot.last_name.clone(),
            email: snapshot.email.clone(),
            guests: snapshot.party_size().unwrap_or(0),
            payment_number: authorization.authorization_number,
            token_auth: authorization.token_auth,
            compliance_data: authorization.compliance_data,
            event_type: event.wire_name().to_string(),
        };

        Effect::Future(Box::pin(async move {
            match api.create_ticket(request).await {
                Ok(()) => Some(TicketAction::BookingConfirmed),
                Err(error) => {
                    tracing::warn!(%error, "ticket creation failed");
                    Some(TicketAction::BookingFailed {
                        message: booking_failure_message(&error),
                    })
                }
            }
        }))
    }
}

impl Default for TicketReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TicketReducer {
    type State = TicketState;
    type Action = TicketAction;
    type Environment = TicketEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match (state.phase.clone(), action) {
            // ========== Field edits ==========
            (TicketPhase::Confirmed, TicketAction::UpdateField { .. }) => SmallVec::new(),

            (_, TicketAction::UpdateField { field, value }) => {
                state.draft.set(field, value);
                SmallVec::new()
            }

            // ========== Step 1: Submit -> authorize payment ==========
            (TicketPhase::Idle, TicketAction::Submit) => {
                if !state.draft.has_required_fields() {
                    state.last_error = Some(messages::MISSING_REQUIRED_FIELDS.to_string());
                    return SmallVec::new();
                }

                state.last_error = None;
                let snapshot = Box::new(state.draft.clone());
                let effect = Self::authorize_payment_effect(env, &snapshot);
                state.phase = TicketPhase::Authorizing { snapshot };

                smallvec![effect]
            }

            // ========== Step 2: authorization -> create ticket ==========
            (
                TicketPhase::Authorizing { snapshot },
                TicketAction::PaymentAuthorized { authorization },
            ) => {
                let effect = Self::create_ticket_effect(env, state.event, &snapshot, authorization);
                state.phase = TicketPhase::Booking;
                smallvec![effect]
            }

            (TicketPhase::Authorizing { .. }, TicketAction::PaymentDeclined) => {
                // Draft retained; a new attempt is a fresh Submit.
                state.phase = TicketPhase::Idle;
                state.last_error = Some(messages::PAYMENT_DECLINED.to_string());
                SmallVec::new()
            }

            // ========== Terminal outcomes ==========
            (TicketPhase::Booking, TicketAction::BookingConfirmed) => {
                state.draft = TicketDraft::default();
                state.last_error = None;
                state.phase = TicketPhase::Confirmed;
                SmallVec::new()
            }

            (TicketPhase::Booking, TicketAction::BookingFailed { message }) => {
                // No compensating void is issued for the dangling
                // authorization; the draft is retained for correction.
                state.phase = TicketPhase::Idle;
                state.last_error = Some(message);
                SmallVec::new()
            }

            // ========== Reset ==========
            (TicketPhase::Idle | TicketPhase::Confirmed, TicketAction::Reset) => {
                *state = TicketState::new(state.event);
                SmallVec::new()
            }

            // Out-of-phase actions are dropped.
            _ => SmallVec::new(),
        }
    }
}
