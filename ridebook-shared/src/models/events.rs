use chrono::{DateTime, Utc};

/// Emitted when a booking is confirmed and appended to the booking list.
/// Drives the (simulated) confirmation email.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmedEvent {
    pub booking_id: String,
    pub passenger_name: String,
    pub passenger_email: String,
    pub pickup_address: String,
    pub drop_address: String,
    pub fare: i64,
    pub confirmed_at: DateTime<Utc>,
}
