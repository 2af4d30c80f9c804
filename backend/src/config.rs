//! Configuration management for the dashboard server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with DASH_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{DistanceEstimator, FixedDistance, GeodesicDistance};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Data source gateway configuration
    pub gateway: GatewayConfig,

    /// Job allocation configuration
    pub allocation: AllocationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base URL of the data source gateway
    pub base_url: String,

    /// Request timeout in seconds. Forecasts can take a while.
    pub timeout_secs: u64,

    /// Days of history shown on the overview chart
    pub history_days: u32,
}

/// How job cards label distance to other cities
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    Fixed,
    Geodesic,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AllocationConfig {
    pub distance: DistanceMode,

    /// Used when `distance` is `fixed`
    pub fixed_distance_km: u32,
}

impl AllocationConfig {
    pub fn distance_estimator(&self) -> Box<dyn DistanceEstimator> {
        match self.distance {
            DistanceMode::Fixed => Box::new(FixedDistance(self.fixed_distance_km)),
            DistanceMode::Geodesic => Box::new(GeodesicDistance),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("DASH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("gateway.base_url", "http://localhost:8000")?
            .set_default("gateway.timeout_secs", 120)?
            .set_default("gateway.history_days", 30)?
            .set_default("allocation.distance", "fixed")?
            .set_default("allocation.fixed_distance_km", i64::from(FixedDistance::DEFAULT_KM))?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DASH_ prefix)
            .add_source(
                Environment::with_prefix("DASH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            gateway: GatewayConfig::default(),
            allocation: AllocationConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            history_days: 30,
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            distance: DistanceMode::Fixed,
            fixed_distance_km: FixedDistance::DEFAULT_KM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::City;

    #[test]
    fn test_defaults_load_without_files() {
        let config = Config::load().unwrap();
        assert_eq!(config.gateway.history_days, 30);
        assert_eq!(config.allocation.fixed_distance_km, FixedDistance::DEFAULT_KM);
    }

    #[test]
    fn test_distance_estimator_selection() {
        let fixed = AllocationConfig {
            distance: DistanceMode::Fixed,
            fixed_distance_km: 12,
        };
        assert_eq!(fixed.distance_estimator().estimate_km(City::Sydney, City::Perth), 12);

        let geodesic = AllocationConfig {
            distance: DistanceMode::Geodesic,
            fixed_distance_km: 12,
        };
        assert!(geodesic.distance_estimator().estimate_km(City::Sydney, City::Perth) > 3000);
    }
}
