use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockall::mock;
use ridebook_booking::{
    BookingError, BookingId, BookingService, BookingStatus, BookingSummary, FareEngine, PassengerInput,
    RouteError, TripDetailsInput, WizardState, WizardStep,
};
use ridebook_core::storage::keys;
use ridebook_core::{
    BookingNotifier, BoxError, FixedClock, KeyValueStore, Location, MappingService, RouteRequest, RouteResponse,
    RouteStatus,
};
use ridebook_shared::models::BookingConfirmedEvent;
use ridebook_store::InMemoryStore;
use std::sync::{Arc, Mutex};

mock! {
    pub Maps {}

    #[async_trait]
    impl MappingService for Maps {
        async fn autocomplete(&self, query: &str, country: &str) -> Result<Vec<Location>, BoxError>;
        async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, BoxError>;
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<BookingConfirmedEvent>>,
}

#[async_trait]
impl BookingNotifier for RecordingNotifier {
    async fn booking_confirmed(&self, event: &BookingConfirmedEvent) -> Result<(), BoxError> {
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct BrokenNotifier;

#[async_trait]
impl BookingNotifier for BrokenNotifier {
    async fn booking_confirmed(&self, _event: &BookingConfirmedEvent) -> Result<(), BoxError> {
        Err("smtp unavailable".into())
    }
}

/// Reads work, writes fail.
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, BoxError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), BoxError> {
        Err("quota exceeded".into())
    }
}

fn point_a() -> Location {
    Location::new("A", 19.1136, 72.8697)
}

fn point_b() -> Location {
    Location::new("B", 19.0596, 72.8295)
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 12, 25, 8, 0, 0).unwrap()))
}

fn maps_with_route(response: RouteResponse) -> MockMaps {
    let mut maps = MockMaps::new();
    maps.expect_route().returning(move |_| Ok(response.clone()));
    maps
}

fn trip_input() -> TripDetailsInput {
    TripDetailsInput {
        date: "2024-12-26".into(),
        time: "09:15".into(),
        car_type: Some("sedan".into()),
    }
}

fn passenger_input() -> PassengerInput {
    PassengerInput {
        name: "Asha Rao".into(),
        phone: "9876543210".into(),
        email: "asha@example.com".into(),
        special_requests: "Extra luggage".into(),
    }
}

async fn routed(service: &BookingService) -> WizardState {
    let (state, _) = WizardState::new().select_pickup(point_a()).unwrap();
    let (state, pending) = state.select_drop(point_b()).unwrap();
    service.resolve_route(&state, &pending.unwrap()).await.unwrap()
}

#[tokio::test]
async fn test_end_to_end_booking() {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = BookingService::new(
        store.clone(),
        Arc::new(maps_with_route(RouteResponse::ok(12_000, 1200))),
        notifier.clone(),
        clock(),
        FareEngine::default(),
    );

    let state = routed(&service).await;
    assert_eq!(state.draft.fare, 300);
    assert_eq!(state.route.as_ref().unwrap().fare_text, "₹300");
    assert_eq!(state.draft.duration, "20 mins");

    let state = service.submit_trip_details(&state, &trip_input()).unwrap();
    let state = service.submit_passenger_details(&state, &passenger_input()).unwrap();

    let summary = BookingSummary::from_draft(&state.draft, service.fares()).unwrap();
    assert_eq!(summary.date_time, "26 December 2024 at 09:15");
    assert_eq!(summary.fare, "₹300");

    let done = service.submit_booking(&state, true).await.unwrap();
    assert_eq!(done.step, WizardStep::Confirmed);
    assert_eq!(done.draft.status, BookingStatus::Confirmed);

    let booking_id = done.draft.booking_id.clone().unwrap();
    assert!(BookingId::is_well_formed(booking_id.as_str()));

    let stored = service.ledger().list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].booking_id.as_ref(), Some(&booking_id));
    assert!(store.peek(keys::BOOKINGS).unwrap().contains("\"status\":\"confirmed\""));

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].passenger_email, "asha@example.com");
    assert_eq!(sent[0].booking_id, booking_id.to_string());
}

#[tokio::test]
async fn test_unchecked_confirmation_stores_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let service = BookingService::new(
        store.clone(),
        Arc::new(maps_with_route(RouteResponse::ok(10_000, 900))),
        Arc::new(RecordingNotifier::default()),
        clock(),
        FareEngine::default(),
    );

    let state = routed(&service).await;
    let state = service.submit_trip_details(&state, &trip_input()).unwrap();
    let state = service.submit_passenger_details(&state, &passenger_input()).unwrap();

    let err = service.submit_booking(&state, false).await.unwrap_err();
    assert!(matches!(err, BookingError::Step(_)));
    assert!(store.peek(keys::BOOKINGS).is_none());
    assert_eq!(state.step, WizardStep::Summary);
}

#[tokio::test]
async fn test_route_failure_is_reported_and_fare_kept() {
    let mut maps = MockMaps::new();
    let mut responses = vec![
        RouteResponse::failed(RouteStatus::NotFound),
        RouteResponse::ok(10_000, 900),
    ];
    maps.expect_route()
        .times(2)
        .returning(move |_| Ok(responses.pop().unwrap()));

    let service = BookingService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(maps),
        Arc::new(RecordingNotifier::default()),
        clock(),
        FareEngine::default(),
    );

    let state = routed(&service).await;
    assert_eq!(state.draft.fare, 250);

    let (swapped, pending) = state.swap_locations().unwrap();
    let err = service.resolve_route(&swapped, &pending.unwrap()).await.unwrap_err();
    assert!(matches!(err, RouteError::Unavailable(RouteStatus::NotFound)));
    assert!(err.is_user_facing());
    assert_eq!(swapped.draft.fare, 250);

    let blocked = service.submit_trip_details(&swapped, &trip_input()).unwrap_err();
    assert_eq!(blocked.to_string(), "Please wait for the route to be calculated");
}

#[tokio::test]
async fn test_transport_error_maps_to_lookup_failure() {
    let mut maps = MockMaps::new();
    maps.expect_route().returning(|_| Err("connection reset".into()));

    let service = BookingService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(maps),
        Arc::new(RecordingNotifier::default()),
        clock(),
        FareEngine::default(),
    );

    let (state, _) = WizardState::new().select_pickup(point_a()).unwrap();
    let (state, pending) = state.select_drop(point_b()).unwrap();
    let err = service.resolve_route(&state, &pending.unwrap()).await.unwrap_err();
    assert!(matches!(err, RouteError::Lookup(_)));
}

#[tokio::test]
async fn test_autocomplete_uses_configured_country() {
    let mut maps = MockMaps::new();
    maps.expect_autocomplete()
        .withf(|query, country| query.to_string() == "andh" && country.to_string() == "in")
        .times(1)
        .returning(|_, _| Ok(vec![Location::new("Andheri, Mumbai", 19.1136, 72.8697)]));

    let service = BookingService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(maps),
        Arc::new(RecordingNotifier::default()),
        clock(),
        FareEngine::default(),
    );

    let places = service.suggest_places("andh").await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].address, "Andheri, Mumbai");
}

#[tokio::test]
async fn test_notifier_failure_does_not_undo_booking() {
    let store = Arc::new(InMemoryStore::new());
    let service = BookingService::new(
        store.clone(),
        Arc::new(maps_with_route(RouteResponse::ok(12_000, 1200))),
        Arc::new(BrokenNotifier),
        clock(),
        FareEngine::default(),
    );

    let state = routed(&service).await;
    let state = service.submit_trip_details(&state, &trip_input()).unwrap();
    let state = service.submit_passenger_details(&state, &passenger_input()).unwrap();

    let done = service.submit_booking(&state, true).await.unwrap();
    assert_eq!(done.draft.status, BookingStatus::Confirmed);
    assert_eq!(service.ledger().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_storage_failure_leaves_booking_unconfirmed() {
    let service = BookingService::new(
        Arc::new(ReadOnlyStore),
        Arc::new(maps_with_route(RouteResponse::ok(12_000, 1200))),
        Arc::new(RecordingNotifier::default()),
        clock(),
        FareEngine::default(),
    );

    let state = routed(&service).await;
    let state = service.submit_trip_details(&state, &trip_input()).unwrap();
    let state = service.submit_passenger_details(&state, &passenger_input()).unwrap();

    let err = service.submit_booking(&state, true).await.unwrap_err();
    assert!(matches!(err, BookingError::Storage(_)));
    assert!(state.draft.booking_id.is_none());
}
