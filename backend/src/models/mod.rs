//! Response models for the dashboard server
//!
//! Re-exports models from the shared crate and adds the render-ready payloads
//! returned by the API.

use serde::{Deserialize, Serialize};
use shared::City;

pub use shared::models::*;

/// Overview tab: latest stats and the history chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub city: City,
    pub stats: Option<OverviewStats>,
    pub chart: ChartSeries,
}

/// A new forecast and the history it extends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub run: ForecastRun,
    pub chart: ChartSeries,
}

/// Engineer tab: prioritized jobs and the workload chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsResponse {
    pub location: City,
    pub jobs: Vec<JobEntry>,
    pub workload: WorkloadSeries,
    pub total_pending: u64,
}

/// Raw rows for the data table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTableResponse {
    pub total_records: usize,
    pub records: Vec<HistoricalPoint>,
}

/// Model comparison table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub models: Vec<ModelPerformance>,
}
