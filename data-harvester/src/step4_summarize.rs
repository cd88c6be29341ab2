use common::types::report::{DISTANCE_MILES, DROP_OFF, PICK_UP, TIMESTAMP, VEHICLE_ID};
use polars::datatypes::DataType;
use polars::frame::DataFrame;
use polars::prelude::{col, len, ChunkAgg, IntoLazy, SortMultipleOptions};
use std::fmt;
use std::fmt::Display;

pub const REPORTS: &str = "reports";
pub const PICK_UPS: &str = "pick_ups";
pub const DROP_OFFS: &str = "drop_offs";
pub const FIRST_TIMESTAMP: &str = "first_timestamp";
pub const LAST_TIMESTAMP: &str = "last_timestamp";

/// Aggregates a labeled dataset into one row per vehicle (sorted by vehicle id) and overall totals
pub fn summarize(reports: &DataFrame) -> Result<SummaryStepOutput, SummarizeError> {
    let per_vehicle = reports
        .clone()
        .lazy()
        .group_by([col(VEHICLE_ID)])
        .agg([
            len().cast(DataType::UInt32).alias(REPORTS),
            col(PICK_UP).sum().cast(DataType::UInt32).alias(PICK_UPS),
            col(DROP_OFF).sum().cast(DataType::UInt32).alias(DROP_OFFS),
            col(DISTANCE_MILES).sum(),
            col(TIMESTAMP).min().alias(FIRST_TIMESTAMP),
            col(TIMESTAMP).max().alias(LAST_TIMESTAMP),
        ])
        .sort([VEHICLE_ID], SortMultipleOptions::default())
        .collect()?;

    let totals = Totals {
        vehicles: per_vehicle.height(),
        reports: reports.height(),
        pick_ups: reports.column(PICK_UP)?.u32()?.sum().unwrap_or(0),
        drop_offs: reports.column(DROP_OFF)?.u32()?.sum().unwrap_or(0),
        distance_miles: reports.column(DISTANCE_MILES)?.f64()?.sum().unwrap_or(0.0),
    };

    Ok(SummaryStepOutput { per_vehicle, totals })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub vehicles: usize,
    pub reports: usize,
    pub pick_ups: u32,
    pub drop_offs: u32,
    pub distance_miles: f64,
}

impl Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vehicles, {} reports, {} pick ups, {} drop offs, {:.1} miles",
            self.vehicles, self.reports, self.pick_ups, self.drop_offs, self.distance_miles
        )
    }
}

pub struct SummaryStepOutput {
    pub per_vehicle: DataFrame,
    pub totals: Totals,
}

#[derive(thiserror::Error, Debug)]
pub enum SummarizeError {
    Polars(#[from] polars::error::PolarsError),
}

impl Display for SummarizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            SummarizeError::Polars(err) => err,
        };
        write!(f, "{}", err)
    }
}
