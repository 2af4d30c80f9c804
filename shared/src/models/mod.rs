//! Domain models for the demand dashboard

mod allocation;
mod chart;
mod demand;
mod emulation;
mod forecast;
mod overview;

pub use allocation::*;
pub use chart::*;
pub use demand::*;
pub use emulation::*;
pub use forecast::*;
pub use overview::*;
