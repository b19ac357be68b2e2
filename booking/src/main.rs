//! Booking flows demo binary
//!
//! Walks the omakase reservation flow through a full happy path and the
//! ticket flow through a declined payment, against a scripted mock API.
//! Swap in `HttpBookingApi::from_env()?.shared()` to drive a live backend.

use guestflow_booking::omakase::{
    ReservationAction, ReservationEnvironment, ReservationField, ReservationReducer,
    ReservationState, SEATING_TIMES,
};
use guestflow_booking::tickets::{
    EventKind, TicketAction, TicketEnvironment, TicketField, TicketReducer, TicketState,
};
use guestflow_core::environment::SystemClock;
use guestflow_runtime::Store;
use guestflow_testing::MockBookingApi;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guestflow_booking=debug,guestflow_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Guestflow Booking Flows ===\n");

    dinner_reservation_happy_path().await?;
    ticket_purchase_declined_payment().await?;

    println!("\n=== Done ===");
    Ok(())
}

async fn dinner_reservation_happy_path() -> anyhow::Result<()> {
    println!("--- Omakase dinner reservation ---\n");

    let api = MockBookingApi::new();
    let log = api.call_log();
    let env = ReservationEnvironment::new(api.shared(), Arc::new(SystemClock));
    let date = env.earliest_reservation_date();
    println!("Earliest bookable date: {date}");
    println!("Seatings offered: {}", SEATING_TIMES.join(", "));

    let store = Store::new(ReservationState::new(), ReservationReducer::new(), env);

    // Pick the slot
    let slot_edits = [
        (ReservationField::Date, date.as_str()),
        (ReservationField::Time, "19:30"),
        (ReservationField::PartySize, "2"),
    ];
    for (field, value) in slot_edits {
        let _ = store
            .send(ReservationAction::UpdateField {
                field,
                value: value.to_string(),
            })
            .await?;
    }

    // Check availability and wait for the result to land
    println!(">>> Sending: CheckAvailability");
    let mut handle = store.send(ReservationAction::CheckAvailability).await?;
    handle.wait().await;

    let (availability, total) = store
        .state(|s| (s.availability.clone(), s.total()))
        .await;
    println!("Availability: {availability:?}");
    println!("Total for the party: {total}");

    // Fill in the guest and card details
    let detail_edits = [
        (ReservationField::FirstName, "Ada"),
        (ReservationField::LastName, "Lovelace"),
        (ReservationField::Email, "ada@example.com"),
        (ReservationField::Phone, "555-0100"),
        (ReservationField::Allergies, "shellfish"),
        (ReservationField::CardNumber, "4242424242424242"),
        (ReservationField::ExpDate, "1227"),
        (ReservationField::Cvv, "123"),
        (ReservationField::ZipCode, "10001"),
        (ReservationField::Address, "1 Main St"),
    ];
    for (field, value) in detail_edits {
        let _ = store
            .send(ReservationAction::UpdateField {
                field,
                value: value.to_string(),
            })
            .await?;
    }

    // Submit and wait for the terminal outcome of the transaction
    println!(">>> Sending: Submit");
    let outcome = store
        .send_and_wait_for(
            ReservationAction::Submit,
            |a| {
                matches!(
                    a,
                    ReservationAction::BookingConfirmed
                        | ReservationAction::BookingFailed { .. }
                        | ReservationAction::PaymentDeclined
                )
            },
            Duration::from_secs(5),
        )
        .await?;

    match outcome {
        ReservationAction::BookingConfirmed => println!("Reservation confirmed!"),
        ReservationAction::BookingFailed { message } => println!("Booking failed: {message}"),
        ReservationAction::PaymentDeclined => println!("Payment was declined"),
        _ => {}
    }

    // Give the feedback loop a beat to apply the terminal action
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (phase, first_name) = store
        .state(|s| (s.phase.clone(), s.draft.first_name.clone()))
        .await;
    println!("Final phase: {phase:?}");
    println!("Draft first name after reset: {first_name:?}");
    println!("Calls made: {:?}\n", log.endpoints());

    store.shutdown(Duration::from_secs(5)).await?;

    Ok(())
}

async fn ticket_purchase_declined_payment() -> anyhow::Result<()> {
    println!("--- Event tickets: declined payment ---\n");

    let api = MockBookingApi::new().with_payment_declined();
    let log = api.call_log();
    let env = TicketEnvironment::new(api.shared());

    let event = EventKind::Ikigai;
    let info = event.info();
    println!("{}: {}", info.name, info.subtitle);

    let store = Store::new(TicketState::new(event), TicketReducer::new(), env);

    let edits = [
        (TicketField::FirstName, "Grace"),
        (TicketField::LastName, "Hopper"),
        (TicketField::Email, "grace@example.com"),
        (TicketField::PartySize, "4"),
        (TicketField::CardNumber, "4000000000000002"),
        (TicketField::ExpDate, "1127"),
        (TicketField::Cvv, "999"),
        (TicketField::ZipCode, "10001"),
        (TicketField::Address, "1 Main St"),
    ];
    for (field, value) in edits {
        let _ = store
            .send(TicketAction::UpdateField {
                field,
                value: value.to_string(),
            })
            .await?;
    }

    let total = store.state(TicketState::total).await;
    println!("Total for the party: {total}");

    println!(">>> Sending: Submit");
    let outcome = store
        .send_and_wait_for(
            TicketAction::Submit,
            |a| {
                matches!(
                    a,
                    TicketAction::BookingConfirmed
                        | TicketAction::BookingFailed { .. }
                        | TicketAction::PaymentDeclined
                )
            },
            Duration::from_secs(5),
        )
        .await?;

    match outcome {
        TicketAction::PaymentDeclined => println!("Payment was declined, as scripted"),
        other => println!("Unexpected outcome: {other:?}"),
    }

    // Give the feedback loop a beat to apply the terminal action
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (last_error, first_name) = store
        .state(|s| (s.last_error.clone(), s.draft.first_name.clone()))
        .await;
    println!("Guest-facing message: {last_error:?}");
    println!("Draft retained for correction: first name = {first_name:?}");
    println!(
        "Ticket creation calls made: {}",
        log.count_for("ticket")
    );

    store.shutdown(Duration::from_secs(5)).await?;

    Ok(())
}
