//! Day emulation: appending a synthetic observed day to the data source

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::City;

/// A new observed day to push to the data source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct EmulateDayRequest {
    pub city: City,
    pub actual_count: u32,
    /// Air temperature in degrees Celsius
    #[validate(range(min = -50.0, max = 60.0))]
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub rainfall: f64,
}

/// Data source acknowledgement of an emulated day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmulateDayResponse {
    pub success: bool,
    pub new_date: NaiveDate,
    pub city: City,
    pub actual_count: u32,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(temperature: f64, rainfall: f64) -> EmulateDayRequest {
        EmulateDayRequest {
            city: City::Melbourne,
            actual_count: 120,
            temperature,
            rainfall,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request(21.5, 0.0).validate().is_ok());
        assert!(request(-3.0, 12.4).validate().is_ok());
    }

    #[test]
    fn test_negative_rainfall_rejected() {
        let errors = request(20.0, -1.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("rainfall"));
    }

    #[test]
    fn test_implausible_temperature_rejected() {
        let errors = request(75.0, 1.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("temperature"));
        let errors = request(-60.0, 1.0).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("temperature"));
        assert!(request(-50.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_unknown_city_fails_to_deserialize() {
        let body = r#"{"city":"Atlantis","actual_count":1,"temperature":20.0,"rainfall":0.0}"#;
        assert!(serde_json::from_str::<EmulateDayRequest>(body).is_err());
    }
}
