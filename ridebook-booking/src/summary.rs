use serde::Serialize;

use crate::fare::{format_distance_km, FareEngine};
use crate::models::BookingDraft;

/// Display strings for the step 3 review panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub pickup: String,
    pub drop: String,
    pub date_time: String,
    pub car_type: String,
    pub distance: String,
    pub fare: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub special_requests: String,
}

impl BookingSummary {
    /// `None` until every field the summary shows has been filled in.
    pub fn from_draft(draft: &BookingDraft, fares: &FareEngine) -> Option<Self> {
        let pickup = draft.pickup.as_ref()?;
        let drop = draft.drop.as_ref()?;
        let date = draft.date?;
        let time = draft.time?;
        let car_type = draft.car_type.as_deref()?;
        let passenger = draft.passenger.as_ref()?;

        Some(Self {
            pickup: pickup.address.clone(),
            drop: drop.address.clone(),
            date_time: format!("{} at {}", date.format("%-d %B %Y"), time.format("%H:%M")),
            car_type: capitalize_first(car_type),
            distance: format_distance_km(draft.distance),
            fare: fares.format_fare(draft.fare),
            name: passenger.name.clone(),
            phone: format!("+91 {}", passenger.phone),
            email: passenger.email.clone(),
            special_requests: passenger.special_requests.clone(),
        })
    }
}

pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
