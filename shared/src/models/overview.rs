//! Overview panel data and the per-session view state

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{merge, ChartSeries, ForecastRun, HistoricalPoint};
use crate::types::City;

/// Latest observation shown above the main chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverviewStats {
    pub date: NaiveDate,
    pub request_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub temperature_c: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rainfall_mm: Decimal,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl OverviewStats {
    /// Summarise the last point of an ascending history
    pub fn from_history(history: &[HistoricalPoint]) -> Option<Self> {
        history.last().map(|latest| Self {
            date: latest.date,
            request_count: latest.request_count,
            temperature_c: latest.temperature_c,
            rainfall_mm: latest.rainfall_mm,
            is_weekend: latest.is_weekend,
            is_holiday: latest.is_holiday,
        })
    }
}

/// What the dashboard is currently showing.
///
/// Owned by the caller and threaded through each action instead of living in
/// process-wide variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub current_city: City,
    pub last_forecast: Option<ForecastRun>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new(City::Sydney)
    }
}

impl DashboardView {
    pub fn new(current_city: City) -> Self {
        Self {
            current_city,
            last_forecast: None,
        }
    }

    /// Switch city. A forecast made for another city is dropped.
    pub fn select_city(&mut self, city: City) {
        self.current_city = city;
        if self
            .last_forecast
            .as_ref()
            .is_some_and(|run| run.city != city)
        {
            self.last_forecast = None;
        }
    }

    /// Keep a freshly generated forecast for reuse by later chart refreshes
    pub fn record_forecast(&mut self, run: ForecastRun) {
        self.current_city = run.city;
        self.last_forecast = Some(run);
    }

    /// Forecast applicable to the current city, if any
    pub fn active_forecast(&self) -> Option<&ForecastRun> {
        self.last_forecast
            .as_ref()
            .filter(|run| run.city == self.current_city)
    }

    /// Chart for the current city's history, with the active forecast appended
    pub fn chart(&self, history: &[HistoricalPoint]) -> ChartSeries {
        let forecast = self
            .active_forecast()
            .map(|run| run.forecasts.as_slice())
            .unwrap_or_default();
        merge(history, forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ForecastPoint;
    use crate::types::ForecastModel;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn run_for(city: City) -> ForecastRun {
        ForecastRun {
            city,
            model: ForecastModel::Lstm,
            forecast_date: day(2),
            forecasts: vec![ForecastPoint::new(day(3), 42.0)],
        }
    }

    #[test]
    fn test_overview_stats_latest_point() {
        let history = vec![HistoricalPoint::new(day(1), 10), HistoricalPoint::new(day(2), 20)];
        let stats = OverviewStats::from_history(&history).unwrap();
        assert_eq!(stats.date, day(2));
        assert_eq!(stats.request_count, 20);
        assert!(OverviewStats::from_history(&[]).is_none());
    }

    #[test]
    fn test_chart_without_forecast() {
        let view = DashboardView::new(City::Brisbane);
        let chart = view.chart(&[HistoricalPoint::new(day(1), 10)]);
        assert!(!chart.has_forecast());
    }

    #[test]
    fn test_chart_uses_recorded_forecast() {
        let mut view = DashboardView::new(City::Perth);
        view.record_forecast(run_for(City::Perth));

        let chart = view.chart(&[HistoricalPoint::new(day(2), 10)]);
        assert_eq!(chart.labels, vec![day(2), day(3)]);
        assert_eq!(chart.forecast, vec![None, Some(42.0)]);
    }

    #[test]
    fn test_select_city_drops_foreign_forecast() {
        let mut view = DashboardView::default();
        view.record_forecast(run_for(City::Sydney));

        view.select_city(City::Sydney);
        assert!(view.active_forecast().is_some());

        view.select_city(City::Adelaide);
        assert_eq!(view.current_city, City::Adelaide);
        assert!(view.last_forecast.is_none());
    }

    #[test]
    fn test_record_forecast_follows_city() {
        let mut view = DashboardView::new(City::Sydney);
        view.record_forecast(run_for(City::Canberra));
        assert_eq!(view.current_city, City::Canberra);
        assert!(view.active_forecast().is_some());
    }
}
