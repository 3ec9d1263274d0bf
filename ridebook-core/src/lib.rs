pub mod clock;
pub mod location;
pub mod mapping;
pub mod notify;
pub mod storage;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use location::{LatLng, Location};
pub use mapping::{MappingService, RouteRequest, RouteResponse, RouteStatus, StaticMappingService};
pub use notify::{BookingNotifier, LogNotifier};
pub use storage::KeyValueStore;
pub use validation::{FieldError, PasswordStrength, ValidationErrors};

/// Error type returned by the collaborator traits (store, mapping, notifier).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
