pub mod fare;
pub mod ledger;
pub mod models;
pub mod route;
pub mod service;
pub mod summary;
pub mod wizard;

pub use fare::FareEngine;
pub use ledger::{BookingIdGenerator, BookingLedger};
pub use models::{BookingDraft, BookingId, BookingStatus, PassengerInfo};
pub use route::{PendingRoute, RouteError, RouteInfo, RouteTicket};
pub use service::{BookingError, BookingService};
pub use summary::BookingSummary;
pub use wizard::{PassengerInput, StepError, StepIndicator, TripDetailsInput, WizardState, WizardStep};
