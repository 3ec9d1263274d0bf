use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use ridebook_core::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Form group identifiers on the booking page.
pub mod fields {
    pub const PICKUP: &str = "pickupLocation";
    pub const DROP: &str = "dropLocation";
    pub const DATE: &str = "pickupDate";
    pub const TIME: &str = "pickupTime";
    pub const CAR_TYPE: &str = "carType";
    pub const PASSENGER_NAME: &str = "passengerName";
    pub const PASSENGER_PHONE: &str = "passengerPhone";
    pub const PASSENGER_EMAIL: &str = "passengerEmail";
    pub const CONFIRM_TERMS: &str = "confirmTerms";
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Draft,
    Confirmed,
}

/// `BT` followed by the last 8 digits of the submission time in Unix millis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub const PREFIX: &'static str = "BT";

    pub fn from_timestamp_millis(millis: i64) -> Self {
        Self(format!("{}{:08}", Self::PREFIX, millis.rem_euclid(100_000_000)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_well_formed(candidate: &str) -> bool {
        candidate
            .strip_prefix(Self::PREFIX)
            .is_some_and(|digits| digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()))
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub special_requests: String,
}

/// The booking being assembled by the wizard. Appended to the `bookings`
/// list once confirmed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub pickup: Option<Location>,
    pub drop: Option<Location>,
    /// Kilometers, from the last resolved route
    pub distance: f64,
    /// Provider text, e.g. "20 mins"
    pub duration: String,
    /// Whole currency units
    pub fare: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger: Option<PassengerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<BookingId>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_both_locations(&self) -> bool {
        self.pickup.is_some() && self.drop.is_some()
    }
}
