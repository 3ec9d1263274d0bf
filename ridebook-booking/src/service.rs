use ridebook_core::{BookingNotifier, Clock, KeyValueStore, Location, MappingService};
use ridebook_shared::models::BookingConfirmedEvent;
use ridebook_store::StoreError;
use std::sync::Arc;
use tracing::{info, warn};

use crate::fare::FareEngine;
use crate::ledger::{BookingIdGenerator, BookingLedger};
use crate::models::BookingId;
use crate::route::{PendingRoute, RouteError};
use crate::wizard::{PassengerInput, StepError, TripDetailsInput, WizardState};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("Place lookup failed: {0}")]
    Autocomplete(String),
}

/// Runs wizard commands that need collaborators: the mapping provider, the
/// booking ledger, the clock and the confirmation notifier.
pub struct BookingService {
    mapping: Arc<dyn MappingService>,
    notifier: Arc<dyn BookingNotifier>,
    clock: Arc<dyn Clock>,
    ledger: BookingLedger,
    ids: BookingIdGenerator,
    fares: FareEngine,
    country: String,
    phone_digits: usize,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        mapping: Arc<dyn MappingService>,
        notifier: Arc<dyn BookingNotifier>,
        clock: Arc<dyn Clock>,
        fares: FareEngine,
    ) -> Self {
        Self {
            mapping,
            notifier,
            clock,
            ledger: BookingLedger::new(store),
            ids: BookingIdGenerator::new(),
            fares,
            country: "in".to_string(),
            phone_digits: 10,
        }
    }

    /// Restrict autocomplete to another country code
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn with_phone_digits(mut self, digits: usize) -> Self {
        self.phone_digits = digits;
        self
    }

    pub fn fares(&self) -> &FareEngine {
        &self.fares
    }

    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    pub async fn suggest_places(&self, query: &str) -> Result<Vec<Location>, BookingError> {
        self.mapping
            .autocomplete(query, &self.country)
            .await
            .map_err(|e| BookingError::Autocomplete(e.to_string()))
    }

    /// Perform the lookup for `pending` and fold the answer into `state`.
    /// `state` must be the value that issued the ticket, or a later one.
    pub async fn resolve_route(&self, state: &WizardState, pending: &PendingRoute) -> Result<WizardState, RouteError> {
        let response = match self.mapping.route(&pending.request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(session = %state.session_id, "Directions request failed: {}", e);
                return Err(RouteError::Lookup(e.to_string()));
            }
        };

        match state.apply_route(pending.ticket, &response, &self.fares) {
            Ok(next) => {
                info!(
                    session = %next.session_id,
                    distance_km = next.draft.distance,
                    fare = next.draft.fare,
                    "Route resolved"
                );
                Ok(next)
            }
            Err(e @ RouteError::Stale { .. }) => {
                warn!(session = %state.session_id, "Dropping superseded route response: {}", e);
                Err(e)
            }
            Err(e) => {
                warn!(session = %state.session_id, status = ?response.status, "Directions request failed");
                Err(e)
            }
        }
    }

    pub fn submit_trip_details(&self, state: &WizardState, input: &TripDetailsInput) -> Result<WizardState, StepError> {
        state.submit_trip_details(input, self.clock.today())
    }

    pub fn submit_passenger_details(&self, state: &WizardState, input: &PassengerInput) -> Result<WizardState, StepError> {
        state.submit_passenger_details(input, self.phone_digits)
    }

    /// Step 3 -> 4: assign the booking id, persist, and notify the passenger.
    /// On error the caller keeps its previous state and nothing is stored.
    pub async fn submit_booking(&self, state: &WizardState, accepted: bool) -> Result<WizardState, BookingError> {
        state.check_submission(accepted)?;

        let now = self.clock.now();
        let booking_id = self.ids.next(now);
        let confirmed = state.confirm(accepted, booking_id.clone(), now)?;

        let total = self.ledger.append(&confirmed.draft).await?;
        info!(
            session = %confirmed.session_id,
            booking_id = %booking_id,
            fare = confirmed.draft.fare,
            "Booking confirmed ({} on record)",
            total
        );

        if let Some(event) = confirmation_event(&confirmed, &booking_id) {
            if let Err(e) = self.notifier.booking_confirmed(&event).await {
                warn!(booking_id = %booking_id, "Confirmation notice not sent: {}", e);
            }
        }

        Ok(confirmed)
    }
}

fn confirmation_event(state: &WizardState, booking_id: &BookingId) -> Option<BookingConfirmedEvent> {
    let draft = &state.draft;
    let passenger = draft.passenger.as_ref()?;
    Some(BookingConfirmedEvent {
        booking_id: booking_id.to_string(),
        passenger_name: passenger.name.clone(),
        passenger_email: passenger.email.clone(),
        pickup_address: draft.pickup.as_ref().map(|l| l.address.clone()).unwrap_or_default(),
        drop_address: draft.drop.as_ref().map(|l| l.address.clone()).unwrap_or_default(),
        fare: draft.fare,
        confirmed_at: draft.created_at?,
    })
}
