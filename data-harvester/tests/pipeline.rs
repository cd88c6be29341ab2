use common::types::config::TimeReference;
use common::types::report::*;
use common::util::df::{equivalent, matches_schema};
use cabtrace_data_harvester::step1_load::{load_data, LoadError, LoadStepOutput};
use cabtrace_data_harvester::step2_enrich_time::{enrich_time, EnrichStepOutput};
use cabtrace_data_harvester::step3_label_trips::{label_trips, LabelStepOutput};
use cabtrace_data_harvester::step4_summarize::{summarize, SummaryStepOutput};
use polars::frame::DataFrame;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn run(path: &Path) -> DataFrame {
    let LoadStepOutput { reports, .. } = load_data(path).unwrap();
    let EnrichStepOutput { reports } = enrich_time(reports, TimeReference::Utc).unwrap();
    let LabelStepOutput { reports } = label_trips(reports).unwrap();
    reports
}

fn two_vehicles() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("trace_A.txt"), "37.0 -122.0 0 1000\n37.001 -122.001 1 1100\n").unwrap();
    fs::write(dir.path().join("trace_B.txt"), "38.0 -121.0 0 1000\n").unwrap();
    dir
}

#[test]
fn test_two_vehicles_end_to_end() {
    let dir = two_vehicles();

    let reports = run(dir.path());

    assert!(matches_schema(&reports, &labeled_schema()));
    assert_eq!(reports.height(), 3);

    let vehicles: Vec<&str> = reports.column(VEHICLE_ID).unwrap().str().unwrap().into_no_null_iter().collect();
    let pick_ups: Vec<u32> = reports.column(PICK_UP).unwrap().u32().unwrap().into_no_null_iter().collect();
    let drop_offs: Vec<u32> = reports.column(DROP_OFF).unwrap().u32().unwrap().into_no_null_iter().collect();
    let distances: Vec<f64> = reports.column(DISTANCE_MILES).unwrap().f64().unwrap().into_no_null_iter().collect();
    let minutes: Vec<u32> = reports.column(MINUTE).unwrap().u32().unwrap().into_no_null_iter().collect();

    assert_eq!(vehicles, vec!["A", "A", "B"]);
    assert_eq!(pick_ups, vec![0, 1, 0]);
    assert_eq!(drop_offs, vec![0, 0, 0]);
    assert_eq!(distances[0], 0.0);
    assert!((distances[1] - 0.0884).abs() < 1e-3);
    assert_eq!(distances[2], 0.0);
    // 1000s and 1100s after the epoch
    assert_eq!(minutes, vec![16, 18, 16]);
}

#[test]
fn test_rerunning_stages_is_idempotent() {
    let dir = two_vehicles();
    let reports = run(dir.path());

    let EnrichStepOutput { reports: enriched_again } = enrich_time(reports.clone(), TimeReference::Utc).unwrap();
    let LabelStepOutput { reports: labeled_again } = label_trips(enriched_again).unwrap();

    assert!(equivalent(&reports, &labeled_again, false, false).unwrap());
}

#[test]
fn test_single_report_vehicle() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("new_solo.txt"), "37.5 -122.4 1 1213084687\n").unwrap();

    let reports = run(dir.path());

    assert_eq!(reports.column(PICK_UP).unwrap().u32().unwrap().get(0), Some(1));
    assert_eq!(reports.column(DROP_OFF).unwrap().u32().unwrap().get(0), Some(0));
    assert_eq!(reports.column(DISTANCE_MILES).unwrap().f64().unwrap().get(0), Some(0.0));
}

#[test]
fn test_empty_directory_is_no_data() {
    let dir = TempDir::new().unwrap();

    let result = load_data(dir.path());

    assert!(matches!(result, Err(LoadError::NoData(_))));
}

#[test]
fn test_empty_trace_files_flow_through() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("new_idle.txt"), "\n").unwrap();

    let reports = run(dir.path());

    assert_eq!(reports.height(), 0);
    assert!(matches_schema(&reports, &labeled_schema()));
}

#[test]
fn test_summary_of_pipeline_output() {
    let dir = two_vehicles();
    let reports = run(dir.path());

    let SummaryStepOutput { per_vehicle, totals } = summarize(&reports).unwrap();

    assert_eq!(per_vehicle.height(), 2);
    assert_eq!((totals.vehicles, totals.reports, totals.pick_ups, totals.drop_offs), (2, 3, 1, 0));
    assert!((totals.distance_miles - 0.0884).abs() < 1e-3);
}

#[test]
fn test_first_sorted_report_starts_a_vehicle() {
    let dir = TempDir::new().unwrap();
    // Loaded first, so the unsorted first row belongs to vehicle z
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("x_z.txt"), "37.0\t-122.0\t1\t50\n").unwrap();
    fs::write(dir.path().join("x_a.txt"), "37.1  -122.1  2  100\n37.2 -122.2 0 200\n37.3 -122.3 3 200\n").unwrap();

    let reports = run(dir.path());

    let vehicles: Vec<&str> = reports.column(VEHICLE_ID).unwrap().str().unwrap().into_no_null_iter().collect();
    let occupancies: Vec<i64> = reports.column(OCCUPANCY).unwrap().i64().unwrap().into_no_null_iter().collect();
    let pick_ups: Vec<u32> = reports.column(PICK_UP).unwrap().u32().unwrap().into_no_null_iter().collect();
    let drop_offs: Vec<u32> = reports.column(DROP_OFF).unwrap().u32().unwrap().into_no_null_iter().collect();
    let distances: Vec<f64> = reports.column(DISTANCE_MILES).unwrap().f64().unwrap().into_no_null_iter().collect();

    assert_eq!(vehicles, vec!["a", "a", "a", "z"]);
    // Tied timestamps keep the order of the file
    assert_eq!(occupancies, vec![2, 0, 3, 1]);
    assert_eq!(pick_ups, vec![0, 0, 1, 1]);
    assert_eq!(drop_offs, vec![0, 1, 0, 0]);
    assert_eq!(distances[0], 0.0);
    assert_eq!(distances[3], 0.0);
}
