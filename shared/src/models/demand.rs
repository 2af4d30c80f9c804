//! Demand observations and snapshots

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::types::City;

/// One day of observed demand for a city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    /// Set when the source returns rows for several cities at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    pub request_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub temperature_c: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rainfall_mm: Decimal,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_weekend: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_holiday: bool,
}

impl HistoricalPoint {
    /// Observation with neutral weather and calendar flags
    pub fn new(date: NaiveDate, request_count: u32) -> Self {
        Self {
            date,
            city: None,
            request_count,
            temperature_c: Decimal::ZERO,
            rainfall_mm: Decimal::ZERO,
            is_weekend: false,
            is_holiday: false,
        }
    }
}

/// Predicted demand for a future day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_count: f64,
}

impl ForecastPoint {
    pub fn new(date: NaiveDate, predicted_count: f64) -> Self {
        Self {
            date,
            predicted_count,
        }
    }
}

/// Calendar flags arrive either as JSON booleans or as 0/1 integers
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

/// Current pending requests per city, iterated in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityDemand(BTreeMap<City, u32>);

impl CityDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pending count for a city, returning the previous value
    pub fn insert(&mut self, city: City, pending: u32) -> Option<u32> {
        self.0.insert(city, pending)
    }

    pub fn get(&self, city: City) -> Option<u32> {
        self.0.get(&city).copied()
    }

    pub fn contains(&self, city: City) -> bool {
        self.0.contains_key(&city)
    }

    /// Cities from `expected` without an entry, in the order given
    pub fn missing(&self, expected: &[City]) -> Vec<City> {
        expected
            .iter()
            .copied()
            .filter(|city| !self.contains(*city))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (City, u32)> + '_ {
        self.0.iter().map(|(city, pending)| (*city, *pending))
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(|pending| u64::from(*pending)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(City, u32)> for CityDemand {
    fn from_iter<I: IntoIterator<Item = (City, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
