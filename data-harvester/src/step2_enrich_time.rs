use chrono::{Datelike, Timelike};
use common::types::config::TimeReference;
use common::types::report::{DAY_OF_MONTH, DAY_OF_WEEK, EVENT_TIME, HOUR, MINUTE, TIMESTAMP};
use log::debug;
use polars::datatypes::{DataType, TimeUnit};
use polars::frame::DataFrame;
use polars::prelude::{Column, NamedFrom};
use polars::series::Series;
use std::fmt;
use std::fmt::Display;

/// Adds the calendar fields of every report's `timestamp`: `event_time`, `hour`, `minute`,
/// `day_of_week` (0 is Monday) and `day_of_month`.
///
/// Every row is converted on its own, so row order doesn't matter. Fields that already exist are
/// replaced.
pub fn enrich_time(
    mut reports: DataFrame,
    time_reference: TimeReference,
) -> Result<EnrichStepOutput, EnrichError> {
    let timestamps = reports.column(TIMESTAMP)?.i64()?;

    let mut fields = TimeFields::with_capacity(timestamps.len());
    for (row, timestamp) in timestamps.into_iter().enumerate() {
        let timestamp = timestamp.ok_or(EnrichError::MissingTimestamp { row })?;
        let wall_clock = time_reference
            .wall_clock(timestamp)
            .ok_or(EnrichError::TimestampOutOfRange { row, timestamp })?;

        fields.event_times.push(wall_clock.and_utc().timestamp_millis());
        fields.hours.push(wall_clock.hour());
        fields.minutes.push(wall_clock.minute());
        fields.days_of_week.push(wall_clock.weekday().num_days_from_monday());
        fields.days_of_month.push(wall_clock.day());
    }

    for column in fields.into_columns()? {
        reports.with_column(column)?;
    }

    debug!(target: "enrich", "Added time fields to {} reports ({:?} time)", reports.height(), time_reference);

    Ok(EnrichStepOutput { reports })
}

#[derive(Default)]
struct TimeFields {
    event_times: Vec<i64>,
    hours: Vec<u32>,
    minutes: Vec<u32>,
    days_of_week: Vec<u32>,
    days_of_month: Vec<u32>,
}

impl TimeFields {
    fn with_capacity(capacity: usize) -> Self {
        TimeFields {
            event_times: Vec::with_capacity(capacity),
            hours: Vec::with_capacity(capacity),
            minutes: Vec::with_capacity(capacity),
            days_of_week: Vec::with_capacity(capacity),
            days_of_month: Vec::with_capacity(capacity),
        }
    }

    fn into_columns(self) -> Result<Vec<Column>, EnrichError> {
        let event_times = Series::new(EVENT_TIME.into(), self.event_times)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        Ok(vec![
            Column::from(event_times),
            Column::from(Series::new(HOUR.into(), self.hours)),
            Column::from(Series::new(MINUTE.into(), self.minutes)),
            Column::from(Series::new(DAY_OF_WEEK.into(), self.days_of_week)),
            Column::from(Series::new(DAY_OF_MONTH.into(), self.days_of_month)),
        ])
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EnrichError {
    Polars(#[from] polars::error::PolarsError),
    MissingTimestamp { row: usize },
    TimestampOutOfRange { row: usize, timestamp: i64 },
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EnrichError::Polars(err) => err.fmt(f),
            EnrichError::MissingTimestamp { row } => write!(f, "Report in row {row} has no timestamp"),
            EnrichError::TimestampOutOfRange { row, timestamp } => {
                write!(f, "Timestamp {timestamp} in row {row} can't be represented as a date")
            }
        }
    }
}

pub struct EnrichStepOutput {
    pub reports: DataFrame,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use common::types::report::OCCUPANCY;
    use common::util::df::equivalent;
    use polars::df;

    fn u32_column(frame: &DataFrame, name: &str) -> Vec<u32> {
        frame.column(name).unwrap().u32().unwrap().into_no_null_iter().collect()
    }

    #[test]
    fn test_utc_fields() {
        let reports = df![
            TIMESTAMP => [0i64, 1_213_084_687, 1_212_962_400],
            OCCUPANCY => [0i64, 1, 0],
        ].unwrap();

        let EnrichStepOutput { reports } = enrich_time(reports, TimeReference::Utc).unwrap();

        // 1970-01-01T00:00:00 was a Thursday, 2008-06-10T07:58:07 a Tuesday,
        // 2008-06-08T22:00:00 a Sunday
        assert_eq!(u32_column(&reports, HOUR), vec![0, 7, 22]);
        assert_eq!(u32_column(&reports, MINUTE), vec![0, 58, 0]);
        assert_eq!(u32_column(&reports, DAY_OF_WEEK), vec![3, 1, 6]);
        assert_eq!(u32_column(&reports, DAY_OF_MONTH), vec![1, 10, 8]);

        let event_times = reports.column(EVENT_TIME).unwrap();
        assert_eq!(event_times.dtype(), &DataType::Datetime(TimeUnit::Milliseconds, None));
        let millis: Vec<i64> = event_times
            .as_materialized_series()
            .cast(&DataType::Int64).unwrap()
            .i64().unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(millis, vec![0, 1_213_084_687_000, 1_212_962_400_000]);
    }

    #[test]
    fn test_local_fields_match_chrono() {
        let timestamps = [1_000i64, 1_213_084_687, 1_211_018_400, 1_700_000_000];
        let reports = df![TIMESTAMP => timestamps].unwrap();

        let EnrichStepOutput { reports } = enrich_time(reports, TimeReference::Local).unwrap();

        let hours = u32_column(&reports, HOUR);
        let minutes = u32_column(&reports, MINUTE);
        let days = u32_column(&reports, DAY_OF_MONTH);
        let millis: Vec<i64> = reports.column(EVENT_TIME).unwrap()
            .as_materialized_series()
            .cast(&DataType::Int64).unwrap()
            .i64().unwrap()
            .into_no_null_iter()
            .collect();

        for (i, timestamp) in timestamps.into_iter().enumerate() {
            let expected = TimeReference::Local.wall_clock(timestamp).unwrap();
            let event_time = DateTime::<Utc>::from_timestamp_millis(millis[i]).unwrap().naive_utc();

            // The stored calendar time and the extracted fields describe the same wall clock time
            assert_eq!(event_time, expected);
            assert_eq!(
                event_time.date().and_hms_opt(hours[i], minutes[i], expected.second()).unwrap(),
                expected
            );
            assert_eq!(days[i], event_time.day());
        }
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let reports = df![TIMESTAMP => [1_213_084_687i64, 1_213_084_747]].unwrap();

        let EnrichStepOutput { reports: once } = enrich_time(reports, TimeReference::Utc).unwrap();
        let EnrichStepOutput { reports: twice } = enrich_time(once.clone(), TimeReference::Utc).unwrap();

        assert_eq!(twice.width(), once.width());
        assert!(equivalent(&once, &twice, false, false).unwrap());
    }

    #[test]
    fn test_empty_dataset() {
        let reports = df![TIMESTAMP => Vec::<i64>::new()].unwrap();

        let EnrichStepOutput { reports } = enrich_time(reports, TimeReference::Local).unwrap();

        assert_eq!(reports.shape(), (0, 6));
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let reports = df![TIMESTAMP => [0i64, i64::MAX]].unwrap();

        let err = enrich_time(reports, TimeReference::Utc).err().unwrap();

        assert!(matches!(err, EnrichError::TimestampOutOfRange { row: 1, timestamp: i64::MAX }));
    }

    #[test]
    fn test_missing_timestamp() {
        let reports = df![TIMESTAMP => [Some(0i64), None]].unwrap();

        let err = enrich_time(reports, TimeReference::Utc).err().unwrap();

        assert!(matches!(err, EnrichError::MissingTimestamp { row: 1 }));
    }
}
