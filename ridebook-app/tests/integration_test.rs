use chrono::{TimeZone, Utc};
use ridebook_account::{LoginForm, RegistrationForm};
use ridebook_app::{telemetry, App, BookingCommand, FormView, Page};
use ridebook_booking::{BookingId, PassengerInput, TripDetailsInput, WizardStep};
use ridebook_core::{FixedClock, LogNotifier, Location, RouteResponse, StaticMappingService};
use ridebook_shared::Masked;
use ridebook_store::Config;
use std::sync::Arc;

fn point_a() -> Location {
    Location::new("A", 19.1136, 72.8697)
}

fn point_b() -> Location {
    Location::new("B", 19.0596, 72.8295)
}

fn point_c() -> Location {
    Location::new("C", 18.9220, 72.8347)
}

fn app() -> App {
    telemetry::init_tracing();

    let maps = StaticMappingService::new()
        .with_place("in", point_a())
        .with_place("in", point_b())
        .with_route(&point_a(), &point_b(), RouteResponse::ok(12_000, 1200))
        .with_route(&point_b(), &point_a(), RouteResponse::ok(12_400, 1300));
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 12, 25, 7, 45, 0).unwrap()));

    App::with_collaborators(Config::default(), Arc::new(maps), Arc::new(LogNotifier), clock)
        .expect("in-memory app")
}

fn registration(password: &str) -> RegistrationForm {
    RegistrationForm {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: "asha@example.com".into(),
        phone: "9876543210".into(),
        password: Masked::new(password.into()),
        confirm_password: Masked::new(password.into()),
        accept_terms: true,
    }
}

fn login(password: &str) -> LoginForm {
    LoginForm {
        email: "asha@example.com".into(),
        password: Masked::new(password.into()),
        remember_me: true,
    }
}

fn trip(car_type: Option<&str>) -> BookingCommand {
    BookingCommand::SubmitTripDetails(TripDetailsInput {
        date: "2024-12-25".into(),
        time: "18:00".into(),
        car_type: car_type.map(str::to_string),
    })
}

fn passenger() -> BookingCommand {
    BookingCommand::SubmitPassengerDetails(PassengerInput {
        name: "Asha Rao".into(),
        phone: "9876543210".into(),
        email: "asha@example.com".into(),
        special_requests: String::new(),
    })
}

#[tokio::test]
async fn test_registration_and_login_flow() {
    let app = app();

    let view = app.register(&registration("password123")).await;
    assert!(view.field_errors.is_empty());
    assert_eq!(view.redirect, Some(Page::Login));

    let view = app.login(&login("password123")).await;
    assert_eq!(view.redirect, Some(Page::Booking));
    assert_eq!(view.alert.as_deref(), Some("Login successful!"));
    assert!(app.state().accounts.remembers_user().await.unwrap());

    let view = app.login(&login("password124")).await;
    assert_eq!(view.redirect, None);
    assert_eq!(view.error_for("loginPassword"), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_rejected_registration_shows_field_errors() {
    let app = app();

    let view = app.register(&registration("short")).await;
    assert_eq!(view.redirect, None);
    assert_eq!(
        view.error_for("password"),
        Some("Password must be at least 8 characters long")
    );
    assert!(app.state().accounts.current_user().await.unwrap().is_none());

    let view = app.login(&login("short")).await;
    assert_eq!(view.error_for("loginPassword"), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_form_helpers() {
    let app = app();

    assert_eq!(app.password_meter("Abcdefgh1!xyz").label, "Strong password");
    assert_eq!(app.password_meter("").label, "Enter password");

    let view = app.check_required("firstName", "First Name *", " ");
    assert_eq!(view.error_for("firstName"), Some("First Name is required"));
    assert_eq!(app.check_required("firstName", "First Name *", "Asha"), FormView::new());

    let view = app.social_login("Google");
    assert_eq!(
        view.alert.as_deref(),
        Some("Google authentication would be integrated here in production.")
    );
}

#[tokio::test]
async fn test_booking_wizard_end_to_end() {
    let app = app();
    let outcome = app.start_booking();
    assert_eq!(outcome.view.visible_step, Some(1));
    assert!(outcome.view.steps[0].active);

    let places = app.suggest_places("a").await.unwrap();
    assert_eq!(places, vec![point_a()]);

    let outcome = app
        .handle_booking(&outcome.state, BookingCommand::SelectPickup { location: point_a() })
        .await;
    assert!(outcome.view.map.is_none());

    let outcome = app
        .handle_booking(&outcome.state, BookingCommand::SelectDrop { location: point_b() })
        .await;
    let map = outcome.view.map.clone().unwrap();
    assert_eq!(map.fare_text, "₹300");
    assert_eq!(map.distance_text, "12.0 km");
    assert_eq!(map.duration_text, "20 mins");

    let blocked = app.handle_booking(&outcome.state, trip(None)).await;
    assert_eq!(blocked.view.visible_step, Some(1));
    assert_eq!(blocked.view.error_for("carType"), Some("Please select a vehicle type"));

    let outcome = app.handle_booking(&blocked.state, trip(Some("sedan"))).await;
    assert_eq!(outcome.view.visible_step, Some(2));
    assert!(outcome.view.steps[0].completed);

    let outcome = app.handle_booking(&outcome.state, passenger()).await;
    assert_eq!(outcome.view.visible_step, Some(3));
    let summary = outcome.view.summary.clone().unwrap();
    assert_eq!(summary.car_type, "Sedan");
    assert_eq!(summary.fare, "₹300");
    assert_eq!(summary.date_time, "25 December 2024 at 18:00");

    let unconfirmed = app
        .handle_booking(&outcome.state, BookingCommand::SubmitBooking { accepted: false })
        .await;
    assert_eq!(
        unconfirmed.view.error_for("confirmTerms"),
        Some("You must confirm the booking details")
    );
    assert_eq!(unconfirmed.state.step, WizardStep::Summary);

    let done = app
        .handle_booking(&unconfirmed.state, BookingCommand::SubmitBooking { accepted: true })
        .await;
    assert_eq!(done.view.visible_step, Some(4));
    let id = done.view.confirmation_id.clone().unwrap();
    assert!(BookingId::is_well_formed(&id));
    assert_eq!(id, "BT12700000");
    assert_eq!(app.state().bookings.ledger().list().await.unwrap().len(), 1);

    let closed = app.handle_booking(&done.state, BookingCommand::CloseConfirmation).await;
    assert_eq!(closed.view.redirect, Some(Page::Home));
    assert_eq!(closed.state.step, WizardStep::TripDetails);
    assert_ne!(closed.state.session_id, done.state.session_id);
}

#[tokio::test]
async fn test_swap_and_route_failure() {
    let app = app();
    let start = app.start_booking();
    let outcome = app
        .handle_booking(&start.state, BookingCommand::SelectPickup { location: point_a() })
        .await;
    let outcome = app
        .handle_booking(&outcome.state, BookingCommand::SelectDrop { location: point_b() })
        .await;

    let swapped = app.handle_booking(&outcome.state, BookingCommand::SwapLocations).await;
    assert_eq!(swapped.state.draft.pickup, Some(point_b()));
    assert_eq!(swapped.view.map.as_ref().unwrap().fare_text, "₹310");

    let failed = app
        .handle_booking(&swapped.state, BookingCommand::SelectDrop { location: point_c() })
        .await;
    assert_eq!(
        failed.view.alert.as_deref(),
        Some("Unable to calculate route. Please check the addresses.")
    );
    assert_eq!(failed.state.draft.drop, Some(point_c()));
    assert_eq!(failed.state.draft.fare, 310);

    let blocked = app.handle_booking(&failed.state, trip(Some("suv"))).await;
    assert_eq!(
        blocked.view.alert.as_deref(),
        Some("Please wait for the route to be calculated")
    );
}

#[tokio::test]
async fn test_commands_deserialize_from_page_payloads() {
    let app = app();
    let start = app.start_booking();

    let command: BookingCommand = serde_json::from_str(
        r#"{ "type": "selectPickup", "location": { "address": "A", "lat": 19.1136, "lng": 72.8697 } }"#,
    )
    .unwrap();
    let outcome = app.handle_booking(&start.state, command).await;
    assert_eq!(outcome.state.draft.pickup, Some(point_a()));

    let command: BookingCommand = serde_json::from_str(
        r#"{ "type": "submitTripDetails", "date": "2024-12-25", "time": "10:00", "carType": "sedan" }"#,
    )
    .unwrap();
    let outcome = app.handle_booking(&outcome.state, command).await;
    assert_eq!(outcome.view.error_for("dropLocation"), Some("Please select a drop location"));

    let back: BookingCommand = serde_json::from_str(r#"{ "type": "previousStep" }"#).unwrap();
    let outcome = app.handle_booking(&outcome.state, back).await;
    assert_eq!(outcome.state.step, WizardStep::TripDetails);
    assert!(outcome.view.alert.is_none());
}
