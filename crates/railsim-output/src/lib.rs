//! Output sinks for a railsim run: a CSV event log and a `tracing`-backed
//! alternative, both implementing `railsim_model::EventObserver`.

mod csv;
mod error;
mod tracing_observer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use tracing_observer::TracingObserver;
