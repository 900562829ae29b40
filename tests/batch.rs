use std::fs;

use chrono::{DateTime, Utc};
use gpx2fit::pipeline::batch;

const ROUTE_GPX: &str = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <rte>
    <rtept lat="51.0" lon="0.0"/>
    <rtept lat="51.1" lon="0.1"/>
  </rte>
  <wpt lat="51.05" lon="0.05"><name>Pub</name></wpt>
</gpx>"#;

fn reference_time() -> DateTime<Utc> {
    "2025-01-01T00:00:00Z".parse().expect("time")
}

#[test]
fn converts_files_next_to_their_inputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("downs.gpx");
    fs::write(&input, ROUTE_GPX).expect("write input");

    let report = batch::run(&[input], reference_time());

    assert!(report.is_success());
    assert_eq!(
        report.written,
        vec![
            dir.path().join("downs-rt01.fit"),
            dir.path().join("downs-wpts.fit"),
        ]
    );
    for path in &report.written {
        let bytes = fs::read(path).expect("output written");
        assert_eq!(&bytes[8..12], b".FIT");
    }
}

#[test]
fn bad_inputs_are_skipped_without_stopping_the_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = dir.path().join("good.gpx");
    let broken = dir.path().join("broken.gpx");
    let missing = dir.path().join("missing.gpx");
    fs::write(&good, ROUTE_GPX).expect("write good");
    fs::write(&broken, "<gpx><rte><rtept lat=\"x\" lon=\"1\"/></rte></gpx>").expect("write broken");

    let report = batch::run(
        &[broken.clone(), good.clone(), missing.clone()],
        reference_time(),
    );

    assert!(!report.is_success());
    assert_eq!(report.skipped, vec![broken, missing]);
    assert!(report.failed.is_empty());
    assert_eq!(report.written.len(), 2);
    assert!(dir.path().join("good-rt01.fit").is_file());
    assert!(!dir.path().join("broken-rt01.fit").exists());
}

#[test]
fn discovers_only_gpx_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("b.gpx"), ROUTE_GPX).expect("write");
    fs::write(dir.path().join("a.gpx"), ROUTE_GPX).expect("write");
    fs::write(dir.path().join("notes.txt"), "x").expect("write");

    let inputs = batch::discover_inputs(dir.path()).expect("discover");

    assert_eq!(
        inputs,
        vec![dir.path().join("a.gpx"), dir.path().join("b.gpx")]
    );
}

#[test]
fn document_without_routes_or_waypoints_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("empty.gpx");
    fs::write(&input, "<gpx version=\"1.1\"></gpx>").expect("write");

    let report = batch::run(&[input], reference_time());

    assert!(report.is_success());
    assert!(report.written.is_empty());
}
