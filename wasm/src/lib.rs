//! WebAssembly module for the demand dashboard
//!
//! Provides client-side computation for:
//! - Merging historical and forecast series for the demand chart
//! - Ranking cities into an engineer's job list
//! - Workload and overview panels
//! - Forecast accuracy scoring
//!
//! Every function takes and returns JSON strings so the renderer can hand the
//! result straight to its chart library.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;
pub use shared::CoreError;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("demand dashboard core loaded"));
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn render<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

/// Surface a failure to the caller and the browser console
fn js_error(message: String) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn forecast_or_empty(forecast_json: &str) -> Result<Vec<ForecastPoint>, String> {
    if forecast_json.trim().is_empty() || forecast_json.trim() == "null" {
        return Ok(Vec::new());
    }
    parse(forecast_json, "forecast")
}

fn merge_series_json(historical_json: &str, forecast_json: &str, strict: bool) -> Result<String, String> {
    let historical: Vec<HistoricalPoint> = parse(historical_json, "historical")?;
    let forecast = forecast_or_empty(forecast_json)?;
    let merger = if strict {
        SeriesMerger::strict()
    } else {
        SeriesMerger::new()
    };
    let series = merger
        .merge(&historical, &forecast)
        .map_err(|e| e.to_string())?;
    render(&series)
}

/// Merge history and an optional forecast (`""` or `"null"` for none)
#[wasm_bindgen]
pub fn merge_series(historical_json: &str, forecast_json: &str) -> Result<String, JsValue> {
    merge_series_json(historical_json, forecast_json, false).map_err(js_error)
}

/// Merge, rejecting out-of-order or overlapping dates
#[wasm_bindgen]
pub fn merge_series_strict(historical_json: &str, forecast_json: &str) -> Result<String, JsValue> {
    merge_series_json(historical_json, forecast_json, true).map_err(js_error)
}

fn rank_jobs_json(demand_json: &str, location: &str, geodesic: bool) -> Result<String, String> {
    let demand: CityDemand = parse(demand_json, "demand")?;
    let ranked = if geodesic {
        AllocationRanker::new()
            .with_distance(GeodesicDistance)
            .rank(&demand, location)
    } else {
        AllocationRanker::new().rank(&demand, location)
    };
    render(&ranked.map_err(|e| e.to_string())?)
}

/// Rank every city for an engineer at `location`
#[wasm_bindgen]
pub fn rank_jobs(demand_json: &str, location: &str) -> Result<String, JsValue> {
    rank_jobs_json(demand_json, location, false).map_err(js_error)
}

/// Rank with great-circle distances on the job cards
#[wasm_bindgen]
pub fn rank_jobs_with_distances(demand_json: &str, location: &str) -> Result<String, JsValue> {
    rank_jobs_json(demand_json, location, true).map_err(js_error)
}

fn workload_series_json(demand_json: &str) -> Result<String, String> {
    let demand: CityDemand = parse(demand_json, "demand")?;
    render(&WorkloadSeries::from_demand(&demand))
}

/// Bar chart data for pending requests per city
#[wasm_bindgen]
pub fn workload_series(demand_json: &str) -> Result<String, JsValue> {
    workload_series_json(demand_json).map_err(js_error)
}

fn overview_stats_json(historical_json: &str) -> Result<String, String> {
    let historical: Vec<HistoricalPoint> = parse(historical_json, "historical")?;
    render(&OverviewStats::from_history(&historical))
}

/// Latest observation, or `null` for an empty history
#[wasm_bindgen]
pub fn overview_stats(historical_json: &str) -> Result<String, JsValue> {
    overview_stats_json(historical_json).map_err(js_error)
}

fn evaluate_forecast_json(actual_json: &str, forecast_json: &str) -> Result<String, String> {
    let actual: Vec<HistoricalPoint> = parse(actual_json, "actual")?;
    let forecast: Vec<ForecastPoint> = parse(forecast_json, "forecast")?;
    render(&evaluate_accuracy(&actual, &forecast))
}

/// MAE, RMSE and MAPE of a forecast against observed days
#[wasm_bindgen]
pub fn evaluate_forecast(actual_json: &str, forecast_json: &str) -> Result<String, JsValue> {
    evaluate_forecast_json(actual_json, forecast_json).map_err(js_error)
}

fn performance_row_json(name: &str, actual_json: &str, forecast_json: &str) -> Result<String, String> {
    let actual: Vec<HistoricalPoint> = parse(actual_json, "actual")?;
    let forecast: Vec<ForecastPoint> = parse(forecast_json, "forecast")?;
    let row = evaluate_accuracy(&actual, &forecast)
        .map(|metrics| ModelPerformance::from_metrics(name, &metrics));
    render(&row)
}

/// Comparison table row for a model, or `null` when no dates overlap
#[wasm_bindgen]
pub fn performance_row(name: &str, actual_json: &str, forecast_json: &str) -> Result<String, JsValue> {
    performance_row_json(name, actual_json, forecast_json).map_err(js_error)
}

fn check_series_json(series_json: &str) -> Result<String, String> {
    let series: ChartSeries = parse(series_json, "series")?;
    series.check_aligned().map_err(|e| e.to_string())?;
    render(&series)
}

/// Accept a chart series built elsewhere only if its lines line up
#[wasm_bindgen]
pub fn check_series(series_json: &str) -> Result<String, JsValue> {
    check_series_json(series_json).map_err(js_error)
}

/// Family of a forecasting model code, or `None` when unknown
#[wasm_bindgen]
pub fn model_family(code: &str) -> Option<String> {
    let model: ForecastModel = code.parse().ok()?;
    serde_json::to_value(model.family())
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
}

/// Names of the enumerated cities, in display order
#[wasm_bindgen]
pub fn city_names() -> Vec<String> {
    City::ALL.iter().map(|city| city.name().to_string()).collect()
}

/// View state held by the page: selected city and the last forecast
#[wasm_bindgen]
pub struct DashboardSession {
    view: DashboardView,
}

impl DashboardSession {
    fn open(city: &str) -> Result<Self, String> {
        let city: City = city.parse().map_err(|e: CoreError| e.to_string())?;
        Ok(Self {
            view: DashboardView::new(city),
        })
    }

    fn select(&mut self, city: &str) -> Result<(), String> {
        let city: City = city.parse().map_err(|e: CoreError| e.to_string())?;
        self.view.select_city(city);
        Ok(())
    }

    fn record(&mut self, run_json: &str) -> Result<(), String> {
        let run: ForecastRun = parse(run_json, "forecast run")?;
        self.view.record_forecast(run);
        Ok(())
    }

    fn chart_json(&self, historical_json: &str) -> Result<String, String> {
        let historical: Vec<HistoricalPoint> = parse(historical_json, "historical")?;
        render(&self.view.chart(&historical))
    }
}

#[wasm_bindgen]
impl DashboardSession {
    #[wasm_bindgen(constructor)]
    pub fn new(city: &str) -> Result<DashboardSession, JsValue> {
        Self::open(city).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn current_city(&self) -> String {
        self.view.current_city.name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn has_forecast(&self) -> bool {
        self.view.active_forecast().is_some()
    }

    pub fn select_city(&mut self, city: &str) -> Result<(), JsValue> {
        self.select(city).map_err(js_error)
    }

    /// Store a forecast response (`{city, model, forecast_date, forecasts}`)
    pub fn record_forecast(&mut self, run_json: &str) -> Result<(), JsValue> {
        self.record(run_json).map_err(js_error)
    }

    /// Chart for the current city with the stored forecast, if it applies
    pub fn chart(&self, historical_json: &str) -> Result<String, JsValue> {
        self.chart_json(historical_json).map_err(js_error)
    }
}
