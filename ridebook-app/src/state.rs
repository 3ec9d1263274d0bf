use ridebook_account::CredentialStore;
use ridebook_booking::BookingService;
use ridebook_store::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub accounts: Arc<CredentialStore>,
    pub bookings: Arc<BookingService>,
}
