use common::types::report::{LATITUDE, LONGITUDE, OCCUPANCY, TIMESTAMP};
use polars::df;
use polars::error::PolarsResult;
use polars::frame::DataFrame;
use std::path::Path;

pub const TRACE_FILE_EXTENSION: &str = "txt";

/// Vehicle id encoded in a trace file name: the second `_`-separated token, up to the extension.
/// `new_abboip.txt` belongs to vehicle `abboip`.
pub fn vehicle_id_from_file_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let token = file_name.split('_').nth(1)?;
    let vehicle_id = token.split('.').next()?;

    if vehicle_id.is_empty() {
        None
    } else {
        Some(vehicle_id.to_string())
    }
}

/// One line of a trace file: `latitude longitude occupancy timestamp`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceLine {
    pub latitude: f64,
    pub longitude: f64,
    pub occupancy: i64,
    pub timestamp: i64,
}

impl TraceLine {
    /// Parses a whitespace separated line. `Ok(None)` for blank lines, `Err` carries a short
    /// description of what is wrong with the line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        match fields.as_slice() {
            [] => Ok(None),
            [latitude, longitude, occupancy, timestamp] => Ok(Some(TraceLine {
                latitude: parse_field(latitude, LATITUDE)?,
                longitude: parse_field(longitude, LONGITUDE)?,
                occupancy: parse_field(occupancy, OCCUPANCY)?,
                timestamp: parse_field(timestamp, TIMESTAMP)?,
            })),
            _ => Err(format!("expected 4 fields, found {}", fields.len())),
        }
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str, column: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|err| format!("invalid {column} '{raw}': {err}"))
}

/// Column-wise buffer for the lines of a single trace file
#[derive(Default)]
pub struct TraceColumns {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    occupancies: Vec<i64>,
    timestamps: Vec<i64>,
}

impl TraceColumns {
    pub fn push(&mut self, line: TraceLine) {
        self.latitudes.push(line.latitude);
        self.longitudes.push(line.longitude);
        self.occupancies.push(line.occupancy);
        self.timestamps.push(line.timestamp);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn into_frame(self) -> PolarsResult<DataFrame> {
        df![
            LATITUDE => self.latitudes,
            LONGITUDE => self.longitudes,
            OCCUPANCY => self.occupancies,
            TIMESTAMP => self.timestamps,
        ]
    }
}
