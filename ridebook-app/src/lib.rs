use ridebook_account::CredentialStore;
use ridebook_booking::{BookingService, FareEngine};
use ridebook_core::{BookingNotifier, Clock, LogNotifier, MappingService, SystemClock};
use ridebook_store::Config;
use std::sync::Arc;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod state;
pub mod telemetry;
pub mod view;

pub use bookings::{BookingCommand, BookingOutcome};
pub use error::AppError;
pub use state::AppState;
pub use view::{FormView, Page, PasswordMeter};

/// Command handlers for the page layer.
#[derive(Clone)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Wire the application from configuration. The mapping provider is
    /// always supplied by the host.
    pub fn from_config(config: Config, mapping: Arc<dyn MappingService>) -> Result<Self, AppError> {
        Self::with_collaborators(config, mapping, Arc::new(LogNotifier), Arc::new(SystemClock))
    }

    pub fn with_collaborators(
        config: Config,
        mapping: Arc<dyn MappingService>,
        notifier: Arc<dyn BookingNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let store = ridebook_store::open_store(&config.storage)?;

        let accounts = CredentialStore::new(store.clone(), config.accounts.clone(), clock.clone());
        let bookings = BookingService::new(store, mapping, notifier, clock, FareEngine::new(config.fare.clone()))
            .with_country(&config.mapping.country)
            .with_phone_digits(config.accounts.phone_digits);

        tracing::info!(
            backend = ?config.storage.backend,
            rate_per_km = config.fare.rate_per_km,
            "Ride booking app ready"
        );

        Ok(Self::new(AppState {
            config: Arc::new(config),
            accounts: Arc::new(accounts),
            bookings: Arc::new(bookings),
        }))
    }

    /// Load `config/` plus `RIDEBOOK__*` overrides, then wire.
    pub fn load(mapping: Arc<dyn MappingService>) -> Result<Self, AppError> {
        let config = Config::load().map_err(|e| AppError::Internal(anyhow::Error::new(e).context("loading configuration")))?;
        Self::from_config(config, mapping)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
