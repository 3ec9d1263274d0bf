use ridebook_core::{RouteRequest, RouteStatus};
use serde::{Deserialize, Serialize};

pub const ROUTE_FAILURE_MESSAGE: &str = "Unable to calculate route. Please check the addresses.";

/// Generation number of a route request within one wizard session. Only a
/// response carrying the latest ticket may touch the draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTicket(pub(crate) u64);

impl RouteTicket {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A route lookup the host must perform before the fare is known.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRoute {
    pub ticket: RouteTicket,
    pub request: RouteRequest,
}

/// Values shown on the map info cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub distance_text: String,
    pub duration_text: String,
    pub fare_text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Provider answered with a non-OK status
    #[error("{}", ROUTE_FAILURE_MESSAGE)]
    Unavailable(RouteStatus),

    /// Provider could not be reached
    #[error("{}", ROUTE_FAILURE_MESSAGE)]
    Lookup(String),

    #[error("Route response {ticket:?} superseded by {latest:?}")]
    Stale {
        ticket: RouteTicket,
        latest: RouteTicket,
    },

    #[error("Booking already confirmed; route can no longer change")]
    Finalized,
}

impl RouteError {
    /// Stale responses are dropped silently; everything else is shown.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, RouteError::Unavailable(_) | RouteError::Lookup(_))
    }
}
