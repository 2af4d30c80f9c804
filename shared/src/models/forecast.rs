//! Forecast runs and accuracy scoring

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{ForecastPoint, HistoricalPoint};
use crate::types::{City, ForecastModel};

/// A forecast produced by the data source for one city and model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastRun {
    pub city: City,
    pub model: ForecastModel,
    /// Last observed date the forecast was made from
    pub forecast_date: NaiveDate,
    pub forecasts: Vec<ForecastPoint>,
}

impl ForecastRun {
    pub fn horizon_days(&self) -> usize {
        self.forecasts.len()
    }
}

/// Error measures of a forecast against observed demand
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute percentage error. `None` when every actual value is zero.
    pub mape: Option<f64>,
    /// Number of dates present in both series
    pub samples: usize,
}

/// Score `forecast` against `actual`, pairing points by date.
///
/// Returns `None` when the two series share no date. Days with zero actual
/// demand count towards MAE and RMSE but are left out of MAPE.
pub fn evaluate_accuracy(
    actual: &[HistoricalPoint],
    forecast: &[ForecastPoint],
) -> Option<AccuracyMetrics> {
    let observed: HashMap<NaiveDate, f64> = actual
        .iter()
        .map(|point| (point.date, f64::from(point.request_count)))
        .collect();

    let pairs: Vec<(f64, f64)> = forecast
        .iter()
        .filter_map(|point| {
            observed
                .get(&point.date)
                .map(|actual| (*actual, point.predicted_count))
        })
        .collect();

    if pairs.is_empty() {
        return None;
    }

    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let rmse = (pairs.iter().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n).sqrt();

    let percentage_errors: Vec<f64> = pairs
        .iter()
        .filter(|(a, _)| *a != 0.0)
        .map(|(a, p)| ((a - p) / a).abs() * 100.0)
        .collect();
    let mape = if percentage_errors.is_empty() {
        None
    } else {
        Some(percentage_errors.iter().sum::<f64>() / percentage_errors.len() as f64)
    };

    Some(AccuracyMetrics {
        mae,
        rmse,
        mape,
        samples: pairs.len(),
    })
}

/// Summary row of the model comparison table.
///
/// `mape` is `None` when no compared day had non-zero demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelPerformance {
    pub name: String,
    pub mae: f64,
    pub rmse: f64,
    #[serde(default)]
    pub mape: Option<f64>,
}

impl ModelPerformance {
    pub fn from_metrics(name: impl Into<String>, metrics: &AccuracyMetrics) -> Self {
        Self {
            name: name.into(),
            mae: round2(metrics.mae),
            rmse: round2(metrics.rmse),
            mape: metrics.mape.map(round2),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn test_accuracy_on_matching_dates() {
        let actual = vec![
            HistoricalPoint::new(day(1), 100),
            HistoricalPoint::new(day(2), 200),
            HistoricalPoint::new(day(3), 50),
        ];
        let forecast = vec![
            ForecastPoint::new(day(1), 110.0),
            ForecastPoint::new(day(2), 180.0),
            // no observation for this day
            ForecastPoint::new(day(9), 1.0),
        ];

        let metrics = evaluate_accuracy(&actual, &forecast).unwrap();
        assert_eq!(metrics.samples, 2);
        assert!((metrics.mae - 15.0).abs() < 1e-9);
        assert!((metrics.rmse - 250f64.sqrt()).abs() < 1e-9);
        assert!((metrics.mape.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_without_overlap() {
        let actual = vec![HistoricalPoint::new(day(1), 10)];
        let forecast = vec![ForecastPoint::new(day(2), 10.0)];
        assert_eq!(evaluate_accuracy(&actual, &forecast), None);
    }

    #[test]
    fn test_mape_skips_zero_actuals() {
        let actual = vec![HistoricalPoint::new(day(1), 0)];
        let forecast = vec![ForecastPoint::new(day(1), 4.0)];
        let metrics = evaluate_accuracy(&actual, &forecast).unwrap();
        assert_eq!(metrics.mae, 4.0);
        assert_eq!(metrics.mape, None);
    }

    #[test]
    fn test_performance_row_rounding() {
        let metrics = AccuracyMetrics {
            mae: 12.345,
            rmse: 15.3,
            mape: Some(8.2049),
            samples: 7,
        };
        let row = ModelPerformance::from_metrics("ARIMA", &metrics);
        assert_eq!(row.name, "ARIMA");
        assert_eq!(row.rmse, 15.3);
        assert_eq!(row.mape, Some(8.2));
    }

    #[test]
    fn test_performance_row_keeps_undefined_mape() {
        let actual = vec![HistoricalPoint::new(day(1), 0)];
        let forecast = vec![ForecastPoint::new(day(1), 50.0)];
        let metrics = evaluate_accuracy(&actual, &forecast).unwrap();

        let row = ModelPerformance::from_metrics("SVM", &metrics);
        assert_eq!(row.mae, 50.0);
        assert_eq!(row.mape, None);
        let json = serde_json::to_value(&row).unwrap();
        assert!(json["mape"].is_null());
    }

    #[test]
    fn test_performance_row_without_mape_field() {
        let row: ModelPerformance =
            serde_json::from_str(r#"{"name":"GBM","mae":3.1,"rmse":4.0}"#).unwrap();
        assert_eq!(row.mape, None);
    }

    #[test]
    fn test_forecast_run_from_source_response() {
        let json = serde_json::json!({
            "city": "Perth",
            "model": "arima",
            "forecast_date": "2024-12-30",
            "forecasts": [
                {"date": "2024-12-31", "predicted_count": 81},
                {"date": "2025-01-01", "predicted_count": 77}
            ]
        });
        let run: ForecastRun = serde_json::from_value(json).unwrap();
        assert_eq!(run.city, City::Perth);
        assert_eq!(run.model, ForecastModel::Arima);
        assert_eq!(run.horizon_days(), 2);
    }
}
