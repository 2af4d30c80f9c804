//! Chart-ready series for the renderer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::iter;

use crate::error::{CoreError, CoreResult};
use crate::models::{CityDemand, ForecastPoint, HistoricalPoint};
use crate::types::City;
use crate::validation::validate_timeline;

/// Historical and forecast lines aligned on one timeline.
///
/// Absent values serialize as `null`, which chart libraries render as gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<NaiveDate>,
    pub historical: Vec<Option<f64>>,
    pub forecast: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether a forecast line should be drawn
    pub fn has_forecast(&self) -> bool {
        !self.forecast.is_empty()
    }

    /// Check the shape of a series received from outside the merger.
    ///
    /// Each non-empty line must match the label count, and where both lines
    /// are present exactly one of them holds a value at every index.
    pub fn check_aligned(&self) -> CoreResult<()> {
        for (name, line) in [("historical", &self.historical), ("forecast", &self.forecast)] {
            if !line.is_empty() && line.len() != self.labels.len() {
                return Err(CoreError::MalformedSeries(format!(
                    "{} has {} values for {} labels",
                    name,
                    line.len(),
                    self.labels.len()
                )));
            }
        }

        if !self.historical.is_empty() && !self.forecast.is_empty() {
            let overlap = self
                .historical
                .iter()
                .zip(&self.forecast)
                .position(|(h, f)| h.is_some() == f.is_some());
            if let Some(index) = overlap {
                return Err(CoreError::MalformedSeries(format!(
                    "index {} must carry exactly one of historical or forecast",
                    index
                )));
            }
        }

        Ok(())
    }
}

/// Merge a historical series and an optional forecast onto one timeline.
///
/// Inputs are taken in caller order and never re-sorted. An empty input
/// produces an empty line for that side.
pub fn merge(historical: &[HistoricalPoint], forecast: &[ForecastPoint]) -> ChartSeries {
    let labels = historical
        .iter()
        .map(|point| point.date)
        .chain(forecast.iter().map(|point| point.date))
        .collect();

    let historical_line = if historical.is_empty() {
        Vec::new()
    } else {
        historical
            .iter()
            .map(|point| Some(f64::from(point.request_count)))
            .chain(iter::repeat(None).take(forecast.len()))
            .collect()
    };

    let forecast_line = if forecast.is_empty() {
        Vec::new()
    } else {
        iter::repeat(None)
            .take(historical.len())
            .chain(forecast.iter().map(|point| Some(point.predicted_count)))
            .collect()
    };

    ChartSeries {
        labels,
        historical: historical_line,
        forecast: forecast_line,
    }
}

/// Series merger with an optional ordering check
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesMerger {
    strict: bool,
}

impl SeriesMerger {
    /// Merger that trusts caller ordering
    pub fn new() -> Self {
        Self::default()
    }

    /// Merger that rejects out-of-order, overlapping or gapped inputs
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn merge(
        &self,
        historical: &[HistoricalPoint],
        forecast: &[ForecastPoint],
    ) -> CoreResult<ChartSeries> {
        if !self.strict {
            return Ok(merge(historical, forecast));
        }

        validate_timeline(historical, forecast)?;
        let series = merge(historical, forecast);
        series.check_aligned()?;
        Ok(series)
    }
}

/// Pending requests per city for the workload bar chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSeries {
    pub labels: Vec<City>,
    pub values: Vec<u32>,
}

impl WorkloadSeries {
    pub fn from_demand(demand: &CityDemand) -> Self {
        let (labels, values) = demand.iter().unzip();
        Self { labels, values }
    }
}
