use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fare: FareRules,
    #[serde(default)]
    pub mapping: MappingConfig,
    #[serde(default)]
    pub accounts: AccountRules,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    pub redis_url: Option<String>,
    /// Prepended to every key, e.g. `ridebook:` -> `ridebook:bookings`
    #[serde(default)]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            redis_url: None,
            key_prefix: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FareRules {
    #[serde(default = "default_rate_per_km")]
    pub rate_per_km: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_rate_per_km() -> f64 { 25.0 }
fn default_currency_symbol() -> String { "₹".to_string() }

impl Default for FareRules {
    fn default() -> Self {
        Self {
            rate_per_km: default_rate_per_km(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MappingConfig {
    /// Country restriction for place autocomplete
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_center")]
    pub default_center: MapCenter,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
}

fn default_country() -> String { "in".to_string() }
// Mumbai
fn default_center() -> MapCenter { MapCenter { lat: 19.0760, lng: 72.8777 } }
fn default_zoom() -> u8 { 12 }

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            default_center: default_center(),
            default_zoom: default_zoom(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountRules {
    #[serde(default = "default_min_name_len")]
    pub min_name_len: usize,
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
    #[serde(default = "default_phone_digits")]
    pub phone_digits: usize,
}

fn default_min_name_len() -> usize { 2 }
fn default_min_password_len() -> usize { 8 }
fn default_phone_digits() -> usize { 10 }

impl Default for AccountRules {
    fn default() -> Self {
        Self {
            min_name_len: default_min_name_len(),
            min_password_len: default_min_password_len(),
            phone_digits: default_phone_digits(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `RIDEBOOK__STORAGE__BACKEND=redis`
            .add_source(config::Environment::with_prefix("RIDEBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
