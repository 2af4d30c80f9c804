//! Chart series integration tests
//!
//! Tests for merging history and forecasts onto one timeline:
//! - Label count equals history plus forecast length
//! - Each index carries exactly one of the two lines
//! - Strict merging rejects overlapping timelines

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use shared::{merge, CoreError, ForecastPoint, HistoricalPoint, SeriesMerger};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn history(counts: &[u32]) -> Vec<HistoricalPoint> {
    counts
        .iter()
        .enumerate()
        .map(|(i, count)| HistoricalPoint::new(start() + Duration::days(i as i64), *count))
        .collect()
}

fn forecast_after(history_len: usize, values: &[f64]) -> Vec<ForecastPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            ForecastPoint::new(start() + Duration::days((history_len + i) as i64), *value)
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Three days of history followed by two forecast days
    #[test]
    fn test_history_then_forecast() {
        let h = history(&[150, 148, 160]);
        let f = forecast_after(3, &[158.0, 162.0]);
        let chart = merge(&h, &f);

        assert_eq!(chart.len(), 5);
        assert_eq!(
            chart.historical,
            vec![Some(150.0), Some(148.0), Some(160.0), None, None]
        );
        assert_eq!(chart.forecast, vec![None, None, None, Some(158.0), Some(162.0)]);
        assert!(chart.check_aligned().is_ok());
    }

    /// No forecast yet: only the history line is drawn
    #[test]
    fn test_history_only() {
        let chart = merge(&history(&[10, 20]), &[]);
        assert_eq!(chart.labels.len(), 2);
        assert!(chart.forecast.is_empty());
        assert!(!chart.has_forecast());
    }

    /// A strict merger refuses a forecast that starts inside the history
    #[test]
    fn test_strict_rejects_overlap() {
        let h = history(&[1, 2, 3]);
        let f = forecast_after(1, &[5.0]);

        let err = SeriesMerger::strict().merge(&h, &f).unwrap_err();
        assert!(matches!(err, CoreError::MalformedSeries(_)));
        // lenient merging charts it anyway
        assert_eq!(SeriesMerger::new().merge(&h, &f).unwrap().len(), 4);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        /// Labels are history dates then forecast dates, in input order
        #[test]
        fn prop_labels_concatenate(
            counts in prop::collection::vec(0u32..500, 0..40),
            values in prop::collection::vec(0.0f64..500.0, 0..30),
        ) {
            let h = history(&counts);
            let f = forecast_after(counts.len(), &values);
            let chart = merge(&h, &f);

            prop_assert_eq!(chart.labels.len(), h.len() + f.len());
            for (i, point) in h.iter().enumerate() {
                prop_assert_eq!(chart.labels[i], point.date);
            }
            for (i, point) in f.iter().enumerate() {
                prop_assert_eq!(chart.labels[h.len() + i], point.date);
            }
        }

        /// When both sides are present, exactly one line has a value per index
        #[test]
        fn prop_lines_are_complementary(
            counts in prop::collection::vec(0u32..500, 1..40),
            values in prop::collection::vec(0.0f64..500.0, 1..30),
        ) {
            let h = history(&counts);
            let f = forecast_after(counts.len(), &values);
            let chart = merge(&h, &f);

            prop_assert_eq!(chart.historical.len(), chart.labels.len());
            prop_assert_eq!(chart.forecast.len(), chart.labels.len());
            for i in 0..chart.labels.len() {
                prop_assert!(chart.historical[i].is_some() != chart.forecast[i].is_some());
            }
            prop_assert!(chart.check_aligned().is_ok());
        }

        /// Historical values survive the merge unchanged
        #[test]
        fn prop_history_values_preserved(counts in prop::collection::vec(0u32..10_000, 1..60)) {
            let chart = merge(&history(&counts), &[]);
            let values: Vec<f64> = chart.historical.iter().flatten().copied().collect();
            let expected: Vec<f64> = counts.iter().map(|c| f64::from(*c)).collect();
            prop_assert_eq!(values, expected);
        }

        /// Merging twice gives the same series and leaves the inputs untouched
        #[test]
        fn prop_merge_idempotent_and_pure(
            counts in prop::collection::vec(0u32..500, 0..30),
            values in prop::collection::vec(0.0f64..500.0, 0..20),
        ) {
            let h = history(&counts);
            let f = forecast_after(counts.len(), &values);
            let (h_before, f_before) = (h.clone(), f.clone());

            let first = merge(&h, &f);
            let second = merge(&h, &f);
            prop_assert_eq!(first, second);
            prop_assert_eq!(h, h_before);
            prop_assert_eq!(f, f_before);
        }

        /// Contiguous, ordered inputs always pass the strict merger
        #[test]
        fn prop_strict_accepts_ordered(
            counts in prop::collection::vec(0u32..500, 0..20),
            values in prop::collection::vec(0.0f64..500.0, 0..10),
        ) {
            let h = history(&counts);
            let f = forecast_after(counts.len(), &values);
            prop_assert!(SeriesMerger::strict().merge(&h, &f).is_ok());
        }
    }
}
