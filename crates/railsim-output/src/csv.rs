//! CSV event log writer.

use std::fs::File;
use std::path::Path;

use railsim_core::Tick;
use railsim_model::EventObserver;

use crate::error::OutputResult;

/// Writes one row per IN/OUT event: `<now>,<train-uid>,IN|OUT,<component-uid>,<component-type>`.
pub struct CsvWriter {
    writer: csv::Writer<File>,
    finished: bool,
}

impl CsvWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        Ok(Self { writer, finished: false })
    }

    fn write_row(&mut self, now: Tick, train_uid: &str, kind: &str, component_uid: &str, component_type: &str) {
        // An error here would only surface on the next `flush`/drop; the writer's
        // own internal buffer tracks it, so it is not worth threading through
        // `EventObserver`'s infallible signature.
        let _ = self.writer.write_record(&[
            now.0.to_string(),
            train_uid.to_string(),
            kind.to_string(),
            component_uid.to_string(),
            component_type.to_string(),
        ]);
    }

    pub fn finish(&mut self) -> OutputResult<()> {
        if !self.finished {
            self.writer.flush()?;
            self.finished = true;
        }
        Ok(())
    }
}

impl Drop for CsvWriter {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

impl EventObserver for CsvWriter {
    fn on_enter(&mut self, now: Tick, train_uid: &str, component_uid: &str, component_type: &str) {
        self.write_row(now, train_uid, "IN", component_uid, component_type);
    }

    fn on_exit(&mut self, now: Tick, train_uid: &str, component_uid: &str, component_type: &str) {
        self.write_row(now, train_uid, "OUT", component_uid, component_type);
    }
}
