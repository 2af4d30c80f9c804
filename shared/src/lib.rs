//! Shared types and core transforms for the demand dashboard
//!
//! This crate holds everything that is computed rather than fetched or
//! painted: the series merge behind the demand chart, the job allocation
//! ranking, forecast accuracy scoring, and the view state threaded through
//! the UI. It is used by the backend and, through WASM, by the browser.

pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
