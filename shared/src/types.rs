//! Common types used across the dashboard

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Service regions covered by the field team.
///
/// Declaration order is the enumeration order used for display and for
/// breaking demand ties during allocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum City {
    Sydney,
    Melbourne,
    Brisbane,
    Perth,
    Adelaide,
    Canberra,
}

impl City {
    pub const ALL: [City; 6] = [
        City::Sydney,
        City::Melbourne,
        City::Brisbane,
        City::Perth,
        City::Adelaide,
        City::Canberra,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            City::Sydney => "Sydney",
            City::Melbourne => "Melbourne",
            City::Brisbane => "Brisbane",
            City::Perth => "Perth",
            City::Adelaide => "Adelaide",
            City::Canberra => "Canberra",
        }
    }

    /// City centre coordinates
    pub fn location(&self) -> GeoPoint {
        match self {
            City::Sydney => GeoPoint::new(-33.8688, 151.2093),
            City::Melbourne => GeoPoint::new(-37.8136, 144.9631),
            City::Brisbane => GeoPoint::new(-27.4698, 153.0251),
            City::Perth => GeoPoint::new(-31.9505, 115.8605),
            City::Adelaide => GeoPoint::new(-34.9285, 138.6007),
            City::Canberra => GeoPoint::new(-35.2809, 149.1300),
        }
    }

    /// Residents per square kilometre
    pub fn population_density(&self) -> u32 {
        match self {
            City::Sydney => 2058,
            City::Melbourne => 1566,
            City::Brisbane => 1031,
            City::Perth => 330,
            City::Adelaide => 407,
            City::Canberra => 171,
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        City::ALL
            .iter()
            .copied()
            .find(|city| city.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidCity(s.to_string()))
    }
}

/// City listing entry exposed to the renderer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityInfo {
    pub city: City,
    pub location: GeoPoint,
    pub population_density: u32,
}

impl From<City> for CityInfo {
    fn from(city: City) -> Self {
        Self {
            city,
            location: city.location(),
            population_density: city.population_density(),
        }
    }
}

/// Model families, each served by a different forecasting backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    Classical,
    MachineLearning,
    DeepLearning,
}

/// Forecasting models accepted by the data source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ForecastModel {
    #[serde(rename = "arima")]
    Arima,
    #[serde(rename = "sarima")]
    Sarima,
    #[serde(rename = "es")]
    ExponentialSmoothing,
    #[serde(rename = "rf")]
    RandomForest,
    #[serde(rename = "gbm")]
    GradientBoosting,
    #[serde(rename = "svm")]
    SupportVector,
    #[serde(rename = "xgboost")]
    XgBoost,
    #[serde(rename = "lstm")]
    Lstm,
    #[serde(rename = "gru")]
    Gru,
    #[serde(rename = "transformer")]
    Transformer,
}

impl ForecastModel {
    pub const ALL: [ForecastModel; 10] = [
        ForecastModel::Arima,
        ForecastModel::Sarima,
        ForecastModel::ExponentialSmoothing,
        ForecastModel::RandomForest,
        ForecastModel::GradientBoosting,
        ForecastModel::SupportVector,
        ForecastModel::XgBoost,
        ForecastModel::Lstm,
        ForecastModel::Gru,
        ForecastModel::Transformer,
    ];

    /// Identifier used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            ForecastModel::Arima => "arima",
            ForecastModel::Sarima => "sarima",
            ForecastModel::ExponentialSmoothing => "es",
            ForecastModel::RandomForest => "rf",
            ForecastModel::GradientBoosting => "gbm",
            ForecastModel::SupportVector => "svm",
            ForecastModel::XgBoost => "xgboost",
            ForecastModel::Lstm => "lstm",
            ForecastModel::Gru => "gru",
            ForecastModel::Transformer => "transformer",
        }
    }

    pub fn family(&self) -> ModelFamily {
        match self {
            ForecastModel::Arima | ForecastModel::Sarima | ForecastModel::ExponentialSmoothing => {
                ModelFamily::Classical
            }
            ForecastModel::RandomForest
            | ForecastModel::GradientBoosting
            | ForecastModel::SupportVector
            | ForecastModel::XgBoost => ModelFamily::MachineLearning,
            ForecastModel::Lstm | ForecastModel::Gru | ForecastModel::Transformer => {
                ModelFamily::DeepLearning
            }
        }
    }
}

impl std::fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code().to_uppercase())
    }
}

impl FromStr for ForecastModel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ForecastModel::ALL
            .iter()
            .copied()
            .find(|model| model.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownModel(s.to_string()))
    }
}

/// Number of future days a forecast covers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    pub const MAX_DAYS: u32 = 30;

    pub fn new(days: u32) -> CoreResult<Self> {
        if days == 0 || days > Self::MAX_DAYS {
            return Err(CoreError::InvalidHorizon {
                days,
                max: Self::MAX_DAYS,
            });
        }
        Ok(Self(days))
    }

    pub fn days(&self) -> u32 {
        self.0
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self(7)
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = CoreError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(horizon: ForecastHorizon) -> Self {
        horizon.0
    }
}
