//! `tracing`-backed event sink, for when a CSV file on disk isn't wanted.

use railsim_core::Tick;
use railsim_model::EventObserver;

/// Emits one `tracing::info!` event per IN/OUT, with the same fields a
/// [`crate::csv::CsvWriter`] would put in a row.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn on_enter(&mut self, now: Tick, train_uid: &str, component_uid: &str, component_type: &str) {
        tracing::info!(now = now.0, train = train_uid, component = component_uid, r#type = component_type, "IN");
    }

    fn on_exit(&mut self, now: Tick, train_uid: &str, component_uid: &str, component_type: &str) {
        tracing::info!(now = now.0, train = train_uid, component = component_uid, r#type = component_type, "OUT");
    }
}
