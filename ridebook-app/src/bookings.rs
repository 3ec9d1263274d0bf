use ridebook_booking::{PassengerInput, PendingRoute, TripDetailsInput, WizardState, WizardStep};
use ridebook_core::Location;
use serde::Deserialize;

use crate::error::AppError;
use crate::view::{FormView, Page};
use crate::App;

/// User actions on the booking page.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BookingCommand {
    SelectPickup { location: Location },
    SelectDrop { location: Location },
    SwapLocations,
    SubmitTripDetails(TripDetailsInput),
    SubmitPassengerDetails(PassengerInput),
    PreviousStep,
    SubmitBooking { accepted: bool },
    CloseConfirmation,
}

/// The state to keep for the next command, plus what to draw now.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub state: WizardState,
    pub view: FormView,
}

impl App {
    pub fn start_booking(&self) -> BookingOutcome {
        let state = WizardState::new();
        tracing::debug!(session = %state.session_id, "Booking session started");
        self.render(state)
    }

    pub async fn handle_booking(&self, state: &WizardState, command: BookingCommand) -> BookingOutcome {
        let bookings = &self.state.bookings;

        let result = match command {
            BookingCommand::SelectPickup { location } => match state.select_pickup(location) {
                Ok((next, pending)) => return self.resolve(next, pending).await,
                Err(e) => Err(AppError::from(e)),
            },
            BookingCommand::SelectDrop { location } => match state.select_drop(location) {
                Ok((next, pending)) => return self.resolve(next, pending).await,
                Err(e) => Err(AppError::from(e)),
            },
            BookingCommand::SwapLocations => match state.swap_locations() {
                Ok((next, pending)) => return self.resolve(next, pending).await,
                Err(e) => Err(AppError::from(e)),
            },
            BookingCommand::SubmitTripDetails(input) => {
                bookings.submit_trip_details(state, &input).map_err(AppError::from)
            }
            BookingCommand::SubmitPassengerDetails(input) => {
                bookings.submit_passenger_details(state, &input).map_err(AppError::from)
            }
            BookingCommand::PreviousStep => state.prev_step().map_err(AppError::from),
            BookingCommand::SubmitBooking { accepted } => {
                bookings.submit_booking(state, accepted).await.map_err(AppError::from)
            }
            BookingCommand::CloseConfirmation => {
                if state.step == WizardStep::Confirmed {
                    let mut outcome = self.start_booking();
                    outcome.view = outcome.view.with_redirect(Page::Home);
                    return outcome;
                }
                Ok(state.clone())
            }
        };

        match result {
            Ok(next) => self.render(next),
            Err(e) => self.render_with_error(state.clone(), e),
        }
    }

    pub async fn suggest_places(&self, query: &str) -> Result<Vec<Location>, AppError> {
        Ok(self.state.bookings.suggest_places(query).await?)
    }

    /// Route lookups keep the new selection even when the lookup fails.
    async fn resolve(&self, next: WizardState, pending: Option<PendingRoute>) -> BookingOutcome {
        let Some(pending) = pending else {
            return self.render(next);
        };

        match self.state.bookings.resolve_route(&next, &pending).await {
            Ok(resolved) => self.render(resolved),
            Err(e) => self.render_with_error(next, e.into()),
        }
    }

    fn render(&self, state: WizardState) -> BookingOutcome {
        let view = FormView::for_wizard(&state, self.state.bookings.fares());
        BookingOutcome { state, view }
    }

    fn render_with_error(&self, state: WizardState, err: AppError) -> BookingOutcome {
        let view = FormView::for_wizard(&state, self.state.bookings.fares()).merge(err.into_view());
        BookingOutcome { state, view }
    }
}
