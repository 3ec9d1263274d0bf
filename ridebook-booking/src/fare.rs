use ridebook_store::FareRules;

/// Flat per-kilometer fare.
#[derive(Debug, Clone)]
pub struct FareEngine {
    rules: FareRules,
}

impl FareEngine {
    pub fn new(rules: FareRules) -> Self {
        Self { rules }
    }

    /// `round(km × rate)`, half away from zero
    pub fn fare_for_km(&self, distance_km: f64) -> i64 {
        (distance_km * self.rules.rate_per_km).round() as i64
    }

    pub fn format_fare(&self, fare: i64) -> String {
        format!("{}{}", self.rules.currency_symbol, fare)
    }

    pub fn rate_per_km(&self) -> f64 {
        self.rules.rate_per_km
    }
}

impl Default for FareEngine {
    fn default() -> Self {
        Self::new(FareRules::default())
    }
}

pub fn meters_to_km(meters: u64) -> f64 {
    meters as f64 / 1000.0
}

pub fn format_distance_km(distance_km: f64) -> String {
    format!("{:.2} km", distance_km)
}
