use common::types::report::{DISTANCE_MILES, DROP_OFF, LATITUDE, LONGITUDE, OCCUPANCY, PICK_UP, TIMESTAMP, VEHICLE_ID};
use common::util::distance::haversine_miles;
use itertools::izip;
use log::debug;
use polars::frame::DataFrame;
use polars::prelude::{Column, NamedFrom, SortMultipleOptions};
use polars::series::Series;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::Display;

/// Sorts the reports by vehicle and time and labels every report with
/// - `pick_up`: 1 if the vehicle's occupancy went up with this report
/// - `drop_off`: 1 if the vehicle's occupancy went down with this report
/// - `distance_miles`: distance to the vehicle's previous report
///
/// The first report of a vehicle has no predecessor. Its distance is 0, it is never a drop off,
/// and it is a pick up only if its occupancy is exactly 1.
pub fn label_trips(reports: DataFrame) -> Result<LabelStepOutput, LabelError> {
    let mut reports = reports.sort(
        [VEHICLE_ID, TIMESTAMP],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;

    let labels = {
        let vehicle_ids = reports.column(VEHICLE_ID)?.str()?;
        let occupancies = reports.column(OCCUPANCY)?.i64()?;
        let latitudes = reports.column(LATITUDE)?.f64()?;
        let longitudes = reports.column(LONGITUDE)?.f64()?;

        let mut scan = TripScan::default();
        let mut labels = TripLabels::with_capacity(reports.height());

        for (row, (vehicle_id, occupancy, latitude, longitude)) in
            izip!(vehicle_ids, occupancies, latitudes, longitudes).enumerate()
        {
            let report = ScannedReport {
                vehicle_id: required(vehicle_id, VEHICLE_ID, row)?,
                occupancy: required(occupancy, OCCUPANCY, row)?,
                latitude: required(latitude, LATITUDE, row)?,
                longitude: required(longitude, LONGITUDE, row)?,
            };
            labels.push(scan.advance(report));
        }

        labels
    };

    debug!(
        target: "label",
        "Labeled {} reports: {} pick ups, {} drop offs",
        reports.height(), labels.pick_ups.iter().sum::<u32>(), labels.drop_offs.iter().sum::<u32>()
    );

    for column in labels.into_columns() {
        reports.with_column(column)?;
    }

    Ok(LabelStepOutput { reports })
}

fn required<T>(value: Option<T>, column: &'static str, row: usize) -> Result<T, LabelError> {
    value.ok_or(LabelError::MissingValue { column, row })
}

#[derive(Debug, Clone, Copy)]
struct ScannedReport<'a> {
    vehicle_id: &'a str,
    occupancy: i64,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TripLabel {
    pick_up: u32,
    drop_off: u32,
    distance_miles: f64,
}

/// State carried from one report to the next while walking the sorted reports
#[derive(Default)]
struct TripScan<'a> {
    vehicle_id: Option<&'a str>,
    occupancy: i64,
    /// (longitude, latitude) of the previous report
    previous: Option<(f64, f64)>,
}

impl<'a> TripScan<'a> {
    fn advance(&mut self, report: ScannedReport<'a>) -> TripLabel {
        let label = match (self.vehicle_id, self.previous) {
            (Some(vehicle_id), Some((previous_lon, previous_lat))) if vehicle_id == report.vehicle_id => {
                let distance_miles = haversine_miles(report.longitude, report.latitude, previous_lon, previous_lat);

                // Direction counts, not magnitude: 0 -> 2 is a single pick up
                let (pick_up, drop_off) = match report.occupancy.cmp(&self.occupancy) {
                    Ordering::Greater => (1, 0),
                    Ordering::Less => (0, 1),
                    Ordering::Equal => (0, 0),
                };
                self.occupancy = report.occupancy;

                TripLabel { pick_up, drop_off, distance_miles }
            }
            _ => {
                self.vehicle_id = Some(report.vehicle_id);
                self.occupancy = report.occupancy;

                TripLabel {
                    pick_up: u32::from(report.occupancy == 1),
                    drop_off: 0,
                    distance_miles: 0.0,
                }
            }
        };

        self.previous = Some((report.longitude, report.latitude));

        label
    }
}

#[derive(Default)]
struct TripLabels {
    pick_ups: Vec<u32>,
    drop_offs: Vec<u32>,
    distances: Vec<f64>,
}

impl TripLabels {
    fn with_capacity(capacity: usize) -> Self {
        TripLabels {
            pick_ups: Vec::with_capacity(capacity),
            drop_offs: Vec::with_capacity(capacity),
            distances: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, label: TripLabel) {
        self.pick_ups.push(label.pick_up);
        self.drop_offs.push(label.drop_off);
        self.distances.push(label.distance_miles);
    }

    fn into_columns(self) -> [Column; 3] {
        [
            Column::from(Series::new(PICK_UP.into(), self.pick_ups)),
            Column::from(Series::new(DROP_OFF.into(), self.drop_offs)),
            Column::from(Series::new(DISTANCE_MILES.into(), self.distances)),
        ]
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LabelError {
    Polars(#[from] polars::error::PolarsError),
    MissingValue { column: &'static str, row: usize },
}

impl Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LabelError::Polars(err) => err.fmt(f),
            LabelError::MissingValue { column, row } => {
                write!(f, "Report in row {row} (sorted by vehicle and time) has no {column}")
            }
        }
    }
}

pub struct LabelStepOutput {
    pub reports: DataFrame,
}
