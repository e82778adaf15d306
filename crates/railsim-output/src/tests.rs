use std::fs;

use railsim_core::Tick;
use railsim_model::EventObserver;

use crate::csv::CsvWriter;

#[test]
fn csv_writer_emits_expected_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.csv");

    {
        let mut writer = CsvWriter::create(&path).expect("create");
        writer.on_enter(Tick(0), "T1", "A-B-0", "TimedTrack");
        writer.on_exit(Tick(180), "T1", "A-B-0", "TimedTrack");
        writer.finish().expect("finish");
    }

    let contents = fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["0,T1,IN,A-B-0,TimedTrack", "180,T1,OUT,A-B-0,TimedTrack"]);
}

#[test]
fn csv_writer_finish_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("events.csv");

    let mut writer = CsvWriter::create(&path).expect("create");
    writer.on_enter(Tick(0), "T1", "A-B-0", "TimedTrack");
    writer.finish().expect("finish once");
    writer.finish().expect("finish twice is a no-op");

    let contents = fs::read_to_string(&path).expect("read");
    assert_eq!(contents.lines().count(), 1);
}
