use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use ridebook_core::validation::{is_valid_email, is_valid_phone};
use ridebook_core::{Location, RouteRequest, RouteResponse, ValidationErrors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fare::{meters_to_km, FareEngine};
use crate::models::{fields, BookingDraft, BookingId, BookingStatus, PassengerInfo};
use crate::route::{PendingRoute, RouteError, RouteInfo, RouteTicket};

/// Steps of the booking form, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardStep {
    TripDetails,
    PassengerDetails,
    Summary,
    Confirmed,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::TripDetails,
        WizardStep::PassengerDetails,
        WizardStep::Summary,
        WizardStep::Confirmed,
    ];

    /// 1-based position, as shown on the step indicator
    pub fn number(self) -> u8 {
        match self {
            WizardStep::TripDetails => 1,
            WizardStep::PassengerDetails => 2,
            WizardStep::Summary => 3,
            WizardStep::Confirmed => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepIndicator {
    pub step: WizardStep,
    pub active: bool,
    pub completed: bool,
}

/// Step 1 input besides the two locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetailsInput {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub car_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub special_requests: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("Invalid form input: {0}")]
    Validation(ValidationErrors),

    #[error("Please wait for the route to be calculated")]
    RoutePending,

    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl From<ValidationErrors> for StepError {
    fn from(errors: ValidationErrors) -> Self {
        StepError::Validation(errors)
    }
}

/// One booking session: the current step plus the draft it has built so far.
///
/// Every command borrows the state and hands back a new one, so a rejected
/// command leaves the caller's state exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardState {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub draft: BookingDraft,
    /// Map info for the last successfully resolved route
    pub route: Option<RouteInfo>,
    latest_ticket: RouteTicket,
    resolved_ticket: Option<RouteTicket>,
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            step: WizardStep::TripDetails,
            draft: BookingDraft::new(),
            route: None,
            latest_ticket: RouteTicket::default(),
            resolved_ticket: None,
        }
    }

    pub fn latest_ticket(&self) -> RouteTicket {
        self.latest_ticket
    }

    /// True once the current pickup/drop pair has a fare.
    pub fn has_current_fare(&self) -> bool {
        self.draft.fare > 0 && self.resolved_ticket == Some(self.latest_ticket)
    }

    pub fn select_pickup(&self, location: Location) -> Result<(Self, Option<PendingRoute>), StepError> {
        self.expect_step(WizardStep::TripDetails, "pickup selection")?;
        let mut next = self.clone();
        next.draft.pickup = Some(location);
        let pending = next.issue_route_request();
        Ok((next, pending))
    }

    pub fn select_drop(&self, location: Location) -> Result<(Self, Option<PendingRoute>), StepError> {
        self.expect_step(WizardStep::TripDetails, "drop selection")?;
        let mut next = self.clone();
        next.draft.drop = Some(location);
        let pending = next.issue_route_request();
        Ok((next, pending))
    }

    /// Exchange pickup and drop, then ask for the reverse route.
    pub fn swap_locations(&self) -> Result<(Self, Option<PendingRoute>), StepError> {
        self.expect_step(WizardStep::TripDetails, "location swap")?;
        let mut next = self.clone();
        std::mem::swap(&mut next.draft.pickup, &mut next.draft.drop);
        let pending = next.issue_route_request();
        Ok((next, pending))
    }

    fn issue_route_request(&mut self) -> Option<PendingRoute> {
        let (pickup, drop) = match (&self.draft.pickup, &self.draft.drop) {
            (Some(pickup), Some(drop)) => (pickup, drop),
            _ => return None,
        };

        let request = RouteRequest::driving(pickup, drop);
        self.latest_ticket = self.latest_ticket.next();
        Some(PendingRoute {
            ticket: self.latest_ticket,
            request,
        })
    }

    /// Fold a route response into the draft. On any failure the previous
    /// distance and fare stay in place.
    pub fn apply_route(
        &self,
        ticket: RouteTicket,
        response: &RouteResponse,
        fares: &FareEngine,
    ) -> Result<Self, RouteError> {
        if self.step == WizardStep::Confirmed {
            return Err(RouteError::Finalized);
        }
        if ticket != self.latest_ticket {
            return Err(RouteError::Stale {
                ticket,
                latest: self.latest_ticket,
            });
        }

        let distance = match (&response.distance, response.is_ok()) {
            (Some(distance), true) => distance,
            _ => return Err(RouteError::Unavailable(response.status)),
        };
        let duration_text = response
            .duration
            .as_ref()
            .map(|d| d.text.clone())
            .unwrap_or_default();

        let mut next = self.clone();
        next.draft.distance = meters_to_km(distance.value);
        next.draft.duration = duration_text.clone();
        next.draft.fare = fares.fare_for_km(next.draft.distance);
        next.route = Some(RouteInfo {
            distance_text: distance.text.clone(),
            duration_text,
            fare_text: fares.format_fare(next.draft.fare),
        });
        next.resolved_ticket = Some(ticket);
        Ok(next)
    }

    /// Step 1 -> 2.
    pub fn submit_trip_details(&self, input: &TripDetailsInput, today: NaiveDate) -> Result<Self, StepError> {
        self.expect_step(WizardStep::TripDetails, "passenger details")?;

        let mut errors = ValidationErrors::new();
        if self.draft.pickup.is_none() {
            errors.add(fields::PICKUP, "Please select a pickup location");
        }
        if self.draft.drop.is_none() {
            errors.add(fields::DROP, "Please select a drop location");
        }

        let date = match input.date.trim() {
            "" => {
                errors.add(fields::DATE, "Please select a pickup date");
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) if date < today => {
                    errors.add(fields::DATE, "Pickup date cannot be in the past");
                    None
                }
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add(fields::DATE, "Please select a valid pickup date");
                    None
                }
            },
        };

        let time = match input.time.trim() {
            "" => {
                errors.add(fields::TIME, "Please select a pickup time");
                None
            }
            raw => match NaiveTime::parse_from_str(raw, "%H:%M") {
                Ok(time) => Some(time),
                Err(_) => {
                    errors.add(fields::TIME, "Please select a valid pickup time");
                    None
                }
            },
        };

        let car_type = input
            .car_type
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if car_type.is_none() {
            errors.add(fields::CAR_TYPE, "Please select a vehicle type");
        }

        errors.into_result(())?;

        if !self.has_current_fare() {
            return Err(StepError::RoutePending);
        }

        let mut next = self.clone();
        next.draft.date = date;
        next.draft.time = time;
        next.draft.car_type = car_type.map(str::to_string);
        next.step = WizardStep::PassengerDetails;
        Ok(next)
    }

    /// Step 2 -> 3. Freezes the passenger record.
    pub fn submit_passenger_details(&self, input: &PassengerInput, phone_digits: usize) -> Result<Self, StepError> {
        self.expect_step(WizardStep::PassengerDetails, "summary")?;

        let name = input.name.trim();
        let phone = input.phone.trim();
        let email = input.email.trim();

        let mut errors = ValidationErrors::new();
        if name.is_empty() {
            errors.add(fields::PASSENGER_NAME, "Name is required");
        }
        if phone.is_empty() {
            errors.add(fields::PASSENGER_PHONE, "Phone number is required");
        } else if !is_valid_phone(phone, phone_digits) {
            errors.add(fields::PASSENGER_PHONE, "Invalid phone number");
        }
        if email.is_empty() {
            errors.add(fields::PASSENGER_EMAIL, "Email is required");
        } else if !is_valid_email(email) {
            errors.add(fields::PASSENGER_EMAIL, "Invalid email address");
        }
        errors.into_result(())?;

        let mut next = self.clone();
        next.draft.passenger = Some(PassengerInfo {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            special_requests: input.special_requests.trim().to_string(),
        });
        next.step = WizardStep::Summary;
        Ok(next)
    }

    /// Everything `confirm` checks before an id is spent on the booking.
    pub fn check_submission(&self, accepted: bool) -> Result<(), StepError> {
        self.expect_step(WizardStep::Summary, "confirmation")?;
        if !accepted {
            return Err(ValidationErrors::single(
                fields::CONFIRM_TERMS,
                "You must confirm the booking details",
            )
            .into());
        }
        Ok(())
    }

    /// Step 3 -> 4. Stamps id, status and creation time.
    pub fn confirm(&self, accepted: bool, booking_id: BookingId, now: DateTime<Utc>) -> Result<Self, StepError> {
        self.check_submission(accepted)?;

        let mut next = self.clone();
        next.draft.booking_id = Some(booking_id);
        next.draft.status = BookingStatus::Confirmed;
        next.draft.created_at = Some(now);
        next.step = WizardStep::Confirmed;
        Ok(next)
    }

    /// Go back one step without re-validating anything.
    pub fn prev_step(&self) -> Result<Self, StepError> {
        let previous = match self.step {
            WizardStep::PassengerDetails => WizardStep::TripDetails,
            WizardStep::Summary => WizardStep::PassengerDetails,
            WizardStep::TripDetails | WizardStep::Confirmed => {
                return Err(StepError::InvalidTransition {
                    from: format!("{:?}", self.step),
                    to: "previous step".to_string(),
                })
            }
        };

        let mut next = self.clone();
        next.step = previous;
        Ok(next)
    }

    pub fn indicators(&self) -> Vec<StepIndicator> {
        WizardStep::ALL
            .iter()
            .map(|&step| StepIndicator {
                step,
                active: step == self.step,
                completed: step < self.step,
            })
            .collect()
    }

    fn expect_step(&self, expected: WizardStep, target: &str) -> Result<(), StepError> {
        if self.step != expected {
            return Err(StepError::InvalidTransition {
                from: format!("{:?}", self.step),
                to: target.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
