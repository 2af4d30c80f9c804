//! Data source gateway client
//!
//! The gateway owns demand history, current snapshots and the forecasting
//! services. This client only fetches and forwards; no computation happens
//! here.

use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{
    City, EmulateDayRequest, EmulateDayResponse, ForecastHorizon, ForecastModel, ForecastRun,
    HistoricalPoint, ModelPerformance,
};
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::error::{AppError, AppResult};

/// HTTP client for the data source gateway
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

/// Response of `GET /data/history`
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    data: Vec<HistoricalPoint>,
}

/// Response of `GET /data/current`, newest row first
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    data: Vec<HistoricalPoint>,
    #[serde(default)]
    latest_date: Option<NaiveDate>,
}

/// Response of `GET /performance/summary`
#[derive(Debug, Deserialize)]
struct PerformanceResponse {
    models: Vec<ModelPerformance>,
}

/// FastAPI style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl GatewayClient {
    /// Create a new GatewayClient from configuration
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new GatewayClient with custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the last `days` days of history for a city, oldest first
    pub async fn history(&self, city: City, days: u32) -> AppResult<Vec<HistoricalPoint>> {
        let request = self
            .client
            .get(format!("{}/data/history", self.base_url))
            .query(&[("city", city.name().to_string()), ("days", days.to_string())]);

        let response: HistoryResponse = self.send(request, "history").await?;
        tracing::debug!("Fetched {} history rows for {}", response.data.len(), city);
        Ok(response.data)
    }

    /// Fetch the pending request count of the latest day for a city.
    ///
    /// `None` when the data source has no rows for the city.
    pub async fn current_demand(&self, city: City) -> AppResult<Option<u32>> {
        let request = self
            .client
            .get(format!("{}/data/current", self.base_url))
            .query(&[("city", city.name())]);

        let response: CurrentResponse = self.send(request, "current demand").await?;
        let pending = response.data.first().map(|latest| latest.request_count);
        tracing::debug!(
            "Current demand for {} as of {:?}: {:?}",
            city,
            response.latest_date,
            pending
        );
        Ok(pending)
    }

    /// Ask the data source to run a forecast
    pub async fn forecast(
        &self,
        city: City,
        model: ForecastModel,
        horizon: ForecastHorizon,
    ) -> AppResult<ForecastRun> {
        let request = self
            .client
            .post(format!("{}/forecast/demand", self.base_url))
            .query(&[
                ("city", city.name().to_string()),
                ("model", model.code().to_string()),
                ("horizon", horizon.days().to_string()),
            ]);

        let run: ForecastRun = self.send(request, "forecast").await?;
        tracing::info!(
            "Forecast for {} with {} returned {} days",
            city,
            model,
            run.horizon_days()
        );
        Ok(run)
    }

    /// Append an emulated day to the data source
    pub async fn emulate_day(&self, input: &EmulateDayRequest) -> AppResult<EmulateDayResponse> {
        let request = self
            .client
            .post(format!("{}/emulate/day", self.base_url))
            .json(input);

        self.send(request, "emulate day").await
    }

    /// Fetch the model comparison table
    pub async fn performance_summary(&self) -> AppResult<Vec<ModelPerformance>> {
        let request = self
            .client
            .get(format!("{}/performance/summary", self.base_url));

        let response: PerformanceResponse = self.send(request, "performance summary").await?;
        Ok(response.models)
    }

    /// Whether the gateway answers at all
    pub async fn is_reachable(&self) -> bool {
        match self.client.get(format!("{}/", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Data source health probe failed: {}", e);
                false
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Data source request for {} failed: {}", what, e);
            AppError::GatewayUnavailable(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Gateway {
                status,
                body: Self::error_message(&body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::GatewayResponse(format!("{}: {}", what, e)))
    }

    /// Pull `detail` out of a FastAPI error body, falling back to the raw text
    fn error_message(body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) => body.to_string(),
        }
    }
}
