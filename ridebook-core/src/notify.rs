use async_trait::async_trait;
use ridebook_shared::models::BookingConfirmedEvent;
use ridebook_shared::pii::mask_email;

use crate::BoxError;

#[async_trait]
pub trait BookingNotifier: Send + Sync {
    /// Tell the passenger their booking went through
    async fn booking_confirmed(&self, event: &BookingConfirmedEvent) -> Result<(), BoxError>;
}

/// Simulated confirmation email: writes the event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn booking_confirmed(&self, event: &BookingConfirmedEvent) -> Result<(), BoxError> {
        tracing::info!(
            booking_id = %event.booking_id,
            fare = event.fare,
            "Sending confirmation email to: {}",
            mask_email(&event.passenger_email)
        );
        Ok(())
    }
}
