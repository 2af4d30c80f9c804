//! Validation utilities for the demand dashboard
//!
//! The merge itself trusts caller ordering. These checks back the strict
//! merger and any caller that wants to reject bad data before rendering.

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};
use crate::models::{ForecastPoint, HistoricalPoint};

// ============================================================================
// Series Validations
// ============================================================================

/// Validate that dates are strictly ascending (no duplicates)
pub fn validate_ascending_dates<I>(dates: I, series: &str) -> CoreResult<()>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut previous: Option<NaiveDate> = None;
    for (index, date) in dates.into_iter().enumerate() {
        if let Some(prev) = previous {
            if date <= prev {
                return Err(CoreError::MalformedSeries(format!(
                    "{} date {} at index {} does not follow {}",
                    series, date, index, prev
                )));
            }
        }
        previous = Some(date);
    }
    Ok(())
}

/// Validate that history and forecast form one ascending timeline with a
/// day-by-day forecast
pub fn validate_timeline(
    historical: &[HistoricalPoint],
    forecast: &[ForecastPoint],
) -> CoreResult<()> {
    validate_ascending_dates(historical.iter().map(|p| p.date), "historical")?;
    validate_ascending_dates(forecast.iter().map(|p| p.date), "forecast")?;

    if let (Some(last), Some(first)) = (historical.last(), forecast.first()) {
        if first.date <= last.date {
            return Err(CoreError::MalformedSeries(format!(
                "forecast starts on {} but history runs to {}",
                first.date, last.date
            )));
        }
    }

    if !is_contiguous(forecast) {
        return Err(CoreError::MalformedSeries(
            "forecast dates skip at least one day".to_string(),
        ));
    }

    validate_forecast_values(forecast)
}

/// Predicted counts must be finite and non-negative
pub fn validate_forecast_values(forecast: &[ForecastPoint]) -> CoreResult<()> {
    match forecast
        .iter()
        .find(|p| !p.predicted_count.is_finite() || p.predicted_count < 0.0)
    {
        Some(point) => Err(CoreError::MalformedSeries(format!(
            "forecast for {} has invalid count {}",
            point.date, point.predicted_count
        ))),
        None => Ok(()),
    }
}

/// Check whether forecast dates follow each other day by day
pub fn is_contiguous(forecast: &[ForecastPoint]) -> bool {
    forecast
        .windows(2)
        .all(|pair| pair[0].date.succ_opt() == Some(pair[1].date))
}
