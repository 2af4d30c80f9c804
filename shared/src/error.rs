//! Error taxonomy for the dashboard core
//!
//! Every failure is reported synchronously to the caller. Nothing here is
//! retried; the presentation layer decides how to surface each kind.

use thiserror::Error;

use crate::types::City;

/// Failures raised by the core transforms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown city: {0}")]
    InvalidCity(String),

    #[error("Demand is missing for {}", join_cities(.missing))]
    IncompleteDemand { missing: Vec<City> },

    #[error("Malformed series: {0}")]
    MalformedSeries(String),

    #[error("Unknown forecast model: {0}")]
    UnknownModel(String),

    #[error("Forecast horizon must be between 1 and {max} days, got {days}")]
    InvalidHorizon { days: u32, max: u32 },
}

impl CoreError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidCity(_) => "INVALID_CITY",
            CoreError::IncompleteDemand { .. } => "INCOMPLETE_DEMAND",
            CoreError::MalformedSeries(_) => "MALFORMED_SERIES",
            CoreError::UnknownModel(_) => "UNKNOWN_MODEL",
            CoreError::InvalidHorizon { .. } => "INVALID_HORIZON",
        }
    }
}

fn join_cities(cities: &[City]) -> String {
    cities
        .iter()
        .map(City::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
