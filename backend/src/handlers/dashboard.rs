//! HTTP handlers for the dashboard endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{
    City, CityInfo, CoreError, EmulateDayRequest, EmulateDayResponse, ForecastHorizon, ForecastModel,
};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::models::{
    ForecastResponse, HistoryTableResponse, JobsResponse, OverviewResponse, PerformanceResponse,
};
use crate::services::DashboardService;
use crate::AppState;

/// Days of history shown in the data table when not specified
const DEFAULT_TABLE_DAYS: u32 = 365;

/// List the supported cities
pub async fn list_cities() -> Json<Vec<CityInfo>> {
    Json(City::ALL.into_iter().map(CityInfo::from).collect())
}

/// Query parameters for the overview tab
#[derive(Debug, Deserialize, Validate)]
pub struct OverviewQuery {
    pub city: String,
    #[validate(range(min = 1, max = 365))]
    pub days: Option<u32>,
}

/// Latest stats and history chart for a city
pub async fn get_overview(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<OverviewQuery>,
) -> AppResult<Json<OverviewResponse>> {
    query.validate()?;
    let city: City = query.city.parse()?;

    let service = DashboardService::from_state(&state);
    let overview = service.overview(city, query.days).await?;
    Ok(Json(overview))
}

/// Query parameters for generating a forecast
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub city: String,
    pub model: String,
    pub horizon: Option<u32>,
}

/// Generate a forecast and the chart that extends the history with it
pub async fn generate_forecast(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ForecastQuery>,
) -> AppResult<Json<ForecastResponse>> {
    let city: City = query.city.parse()?;
    let model: ForecastModel = query.model.parse()?;
    let horizon = match query.horizon {
        Some(days) => ForecastHorizon::new(days)?,
        None => ForecastHorizon::default(),
    };

    tracing::info!("Generating {} forecast for {} over {} days", model, city, horizon.days());
    let service = DashboardService::from_state(&state);
    let response = service.forecast(city, model, horizon).await?;
    Ok(Json(response))
}

/// Query parameters for the engineer job list
#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub location: String,
}

/// Prioritized job list for an engineer
pub async fn get_jobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<JobsQuery>,
) -> AppResult<Json<JobsResponse>> {
    let service = DashboardService::from_state(&state);
    let jobs = service.jobs(&query.location).await?;
    Ok(Json(jobs))
}

/// Query parameters for the data table
#[derive(Debug, Deserialize, Validate)]
pub struct HistoryQuery {
    pub city: Option<String>,
    #[validate(range(min = 1, max = 3650))]
    pub days: Option<u32>,
}

/// Historical rows for one city, or all cities when none is given
pub async fn get_history(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<HistoryQuery>,
) -> AppResult<Json<HistoryTableResponse>> {
    query.validate()?;
    let city = query
        .city
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .map(str::parse::<City>)
        .transpose()?;

    let service = DashboardService::from_state(&state);
    let table = service
        .history_table(city, query.days.unwrap_or(DEFAULT_TABLE_DAYS))
        .await?;
    Ok(Json(table))
}

/// Body of an emulated day, with the city still unparsed
#[derive(Debug, Deserialize)]
pub struct EmulateDayInput {
    pub city: String,
    pub actual_count: u32,
    pub temperature: f64,
    pub rainfall: f64,
}

impl TryFrom<EmulateDayInput> for EmulateDayRequest {
    type Error = CoreError;

    fn try_from(input: EmulateDayInput) -> Result<Self, Self::Error> {
        Ok(EmulateDayRequest {
            city: input.city.parse()?,
            actual_count: input.actual_count,
            temperature: input.temperature,
            rainfall: input.rainfall,
        })
    }
}

/// Append an emulated day of demand
pub async fn emulate_day(
    State(state): State<AppState>,
    AppJson(input): AppJson<EmulateDayInput>,
) -> AppResult<Json<EmulateDayResponse>> {
    let request = EmulateDayRequest::try_from(input)?;

    let service = DashboardService::from_state(&state);
    let response = service.emulate(request).await?;
    Ok(Json(response))
}

/// Model comparison table
pub async fn get_performance(
    State(state): State<AppState>,
) -> AppResult<Json<PerformanceResponse>> {
    let service = DashboardService::from_state(&state);
    let models = service.performance().await?;
    Ok(Json(PerformanceResponse { models }))
}
