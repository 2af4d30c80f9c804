//! Dashboard service: fetch from the data source, run the core transforms

use shared::{
    merge, validate_timeline, AllocationRanker, City, CityDemand, DistanceEstimator,
    EmulateDayRequest, EmulateDayResponse, ForecastHorizon, ForecastModel, HistoricalPoint,
    ModelPerformance, OverviewStats, WorkloadSeries,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::GatewayClient;
use crate::models::{ForecastResponse, HistoryTableResponse, JobsResponse, OverviewResponse};
use crate::AppState;

/// Ranker configured at startup with the distance labelling of choice
pub type Ranker = AllocationRanker<Box<dyn DistanceEstimator>>;

/// Dashboard service composing data source calls with the core transforms
#[derive(Clone)]
pub struct DashboardService {
    gateway: GatewayClient,
    ranker: Arc<Ranker>,
    history_days: u32,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(gateway: GatewayClient, ranker: Arc<Ranker>, history_days: u32) -> Self {
        Self {
            gateway,
            ranker,
            history_days,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.gateway.clone(),
            state.ranker.clone(),
            state.config.gateway.history_days,
        )
    }

    /// Latest stats and the history-only chart for a city
    pub async fn overview(&self, city: City, days: Option<u32>) -> AppResult<OverviewResponse> {
        let history = self
            .gateway
            .history(city, days.unwrap_or(self.history_days))
            .await?;

        Ok(OverviewResponse {
            city,
            stats: OverviewStats::from_history(&history),
            chart: merge(&history, &[]),
        })
    }

    /// Generate a forecast and chart it after the recent history
    pub async fn forecast(
        &self,
        city: City,
        model: ForecastModel,
        horizon: ForecastHorizon,
    ) -> AppResult<ForecastResponse> {
        let run = self.gateway.forecast(city, model, horizon).await?;
        let history = self.gateway.history(city, self.history_days).await?;

        if let Err(e) = validate_timeline(&history, &run.forecasts) {
            tracing::warn!("Charting {} forecast for {} as received: {}", model, city, e);
        }

        let chart = merge(&history, &run.forecasts);
        Ok(ForecastResponse { run, chart })
    }

    /// Current pending requests for every city the ranker covers.
    ///
    /// Cities are fetched concurrently; any failed fetch fails the snapshot.
    /// Cities without data are left out of the map.
    pub async fn demand_snapshot(&self) -> AppResult<CityDemand> {
        let mut tasks = JoinSet::new();
        for city in self.ranker.cities().iter().copied() {
            let gateway = self.gateway.clone();
            tasks.spawn(async move { (city, gateway.current_demand(city).await) });
        }

        let mut demand = CityDemand::new();
        while let Some(joined) = tasks.join_next().await {
            let (city, pending) = joined
                .map_err(|e| AppError::Internal(format!("Demand fetch task failed: {}", e)))?;
            match pending? {
                Some(count) => {
                    demand.insert(city, count);
                }
                None => tracing::warn!("No current demand reported for {}", city),
            }
        }

        Ok(demand)
    }

    /// Prioritized job list for an engineer at `location`
    pub async fn jobs(&self, location: &str) -> AppResult<JobsResponse> {
        // reject unknown cities before fanning out to the data source
        let city: City = location.parse()?;

        let demand = self.demand_snapshot().await?;
        let jobs = self.ranker.rank(&demand, location)?;
        tracing::debug!("Ranked {} cities for engineer in {}", jobs.len(), city);

        Ok(JobsResponse {
            location: city,
            workload: WorkloadSeries::from_demand(&demand),
            total_pending: demand.total(),
            jobs,
        })
    }

    /// Rows for the data table, for one city or all of them
    pub async fn history_table(
        &self,
        city: Option<City>,
        days: u32,
    ) -> AppResult<HistoryTableResponse> {
        let mut records = match city {
            Some(city) => self.gateway.history(city, days).await?,
            None => self.all_cities_history(days).await?,
        };

        // newest first, the way the table reads
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.city.cmp(&b.city)));

        Ok(HistoryTableResponse {
            total_records: records.len(),
            records,
        })
    }

    async fn all_cities_history(&self, days: u32) -> AppResult<Vec<HistoricalPoint>> {
        let mut tasks = JoinSet::new();
        for city in City::ALL {
            let gateway = self.gateway.clone();
            tasks.spawn(async move { (city, gateway.history(city, days).await) });
        }

        let mut records = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (city, rows) = joined
                .map_err(|e| AppError::Internal(format!("History fetch task failed: {}", e)))?;
            records.extend(rows?.into_iter().map(|mut row| {
                row.city.get_or_insert(city);
                row
            }));
        }
        Ok(records)
    }

    /// Validate and forward an emulated day
    pub async fn emulate(&self, input: EmulateDayRequest) -> AppResult<EmulateDayResponse> {
        input.validate()?;
        let response = self.gateway.emulate_day(&input).await?;
        tracing::info!(
            "Emulated {} for {} with {} requests",
            response.new_date,
            response.city,
            response.actual_count
        );
        Ok(response)
    }

    /// Model comparison rows from the data source
    pub async fn performance(&self) -> AppResult<Vec<ModelPerformance>> {
        self.gateway.performance_summary().await
    }
}
