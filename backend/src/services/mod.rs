//! Business logic services for the dashboard server

pub mod dashboard;

pub use dashboard::{DashboardService, Ranker};
