use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::location::{LatLng, Location};
use crate::BoxError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Driving,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteRequest {
    pub origin: LatLng,
    pub destination: LatLng,
    pub travel_mode: TravelMode,
}

impl RouteRequest {
    pub fn driving(origin: &Location, destination: &Location) -> Self {
        Self {
            origin: origin.coordinates(),
            destination: destination.coordinates(),
            travel_mode: TravelMode::Driving,
        }
    }
}

/// Directions status codes as reported by the mapping provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxWaypointsExceeded,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteDistance {
    /// Meters
    pub value: u64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteDuration {
    /// Seconds
    pub value: u64,
    pub text: String,
}

/// First leg of the first route, or a failure status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteResponse {
    pub status: RouteStatus,
    pub distance: Option<RouteDistance>,
    pub duration: Option<RouteDuration>,
}

impl RouteResponse {
    pub fn ok(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            status: RouteStatus::Ok,
            distance: Some(RouteDistance {
                value: distance_meters,
                text: distance_text(distance_meters),
            }),
            duration: Some(RouteDuration {
                value: duration_seconds,
                text: duration_text(duration_seconds),
            }),
        }
    }

    pub fn failed(status: RouteStatus) -> Self {
        Self {
            status,
            distance: None,
            duration: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RouteStatus::Ok && self.distance.is_some()
    }
}

/// Provider-style distance text: `"850 m"`, `"12.0 km"`.
pub fn distance_text(meters: u64) -> String {
    if meters < 1000 {
        format!("{} m", meters)
    } else {
        format!("{:.1} km", meters as f64 / 1000.0)
    }
}

/// Provider-style duration text: `"1 min"`, `"20 mins"`, `"1 hour 5 mins"`.
pub fn duration_text(seconds: u64) -> String {
    let minutes = ((seconds + 30) / 60).max(1);
    let plural = |n: u64, unit: &str| {
        if n == 1 {
            format!("{} {}", n, unit)
        } else {
            format!("{} {}s", n, unit)
        }
    };

    if minutes < 60 {
        plural(minutes, "min")
    } else {
        let hours = minutes / 60;
        let rest = minutes % 60;
        if rest == 0 {
            plural(hours, "hour")
        } else {
            format!("{} {}", plural(hours, "hour"), plural(rest, "min"))
        }
    }
}

#[async_trait]
pub trait MappingService: Send + Sync {
    /// Place suggestions for a partially typed address, restricted to a country code
    async fn autocomplete(&self, query: &str, country: &str) -> Result<Vec<Location>, BoxError>;

    /// Request a route between two points
    async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, BoxError>;
}

/// Table-driven mapping service for demos and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticMappingService {
    places: Vec<(String, Location)>,
    routes: HashMap<String, RouteResponse>,
}

impl StaticMappingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, country: &str, location: Location) -> Self {
        self.places.push((country.to_string(), location));
        self
    }

    pub fn with_route(mut self, from: &Location, to: &Location, response: RouteResponse) -> Self {
        self.routes
            .insert(route_key(&from.coordinates(), &to.coordinates()), response);
        self
    }
}

fn route_key(origin: &LatLng, destination: &LatLng) -> String {
    format!(
        "{:.6},{:.6}->{:.6},{:.6}",
        origin.lat, origin.lng, destination.lat, destination.lng
    )
}

#[async_trait]
impl MappingService for StaticMappingService {
    async fn autocomplete(&self, query: &str, country: &str) -> Result<Vec<Location>, BoxError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .places
            .iter()
            .filter(|(c, _)| c.eq_ignore_ascii_case(country))
            .filter(|(_, l)| l.address.to_lowercase().contains(&needle))
            .map(|(_, l)| l.clone())
            .collect())
    }

    async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, BoxError> {
        let key = route_key(&request.origin, &request.destination);
        tracing::debug!("Static route lookup: {}", key);

        Ok(self
            .routes
            .get(&key)
            .cloned()
            .unwrap_or_else(|| RouteResponse::failed(RouteStatus::ZeroResults)))
    }
}
