use polars::datatypes::{DataType, TimeUnit};
use polars::prelude::{Field, Schema};

// Columns of a freshly loaded trace
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const OCCUPANCY: &str = "occupancy";
pub const TIMESTAMP: &str = "timestamp";
pub const VEHICLE_ID: &str = "vehicle_id";

// Columns added by time enrichment
pub const EVENT_TIME: &str = "event_time";
pub const HOUR: &str = "hour";
pub const MINUTE: &str = "minute";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const DAY_OF_MONTH: &str = "day_of_month";

// Columns added by trip labeling
pub const PICK_UP: &str = "pick_up";
pub const DROP_OFF: &str = "drop_off";
pub const DISTANCE_MILES: &str = "distance_miles";

pub const TRACE_COLUMNS: [&str; 5] = [LATITUDE, LONGITUDE, OCCUPANCY, TIMESTAMP, VEHICLE_ID];
pub const TIME_COLUMNS: [&str; 5] = [EVENT_TIME, HOUR, MINUTE, DAY_OF_WEEK, DAY_OF_MONTH];
pub const LABEL_COLUMNS: [&str; 3] = [PICK_UP, DROP_OFF, DISTANCE_MILES];

/// Schema of the dataset right after loading, in column order
pub fn trace_schema() -> Schema {
    Schema::from_iter(vec![
        Field::new(LATITUDE.into(), DataType::Float64),
        Field::new(LONGITUDE.into(), DataType::Float64),
        Field::new(OCCUPANCY.into(), DataType::Int64),
        Field::new(TIMESTAMP.into(), DataType::Int64),
        Field::new(VEHICLE_ID.into(), DataType::String),
    ])
}

/// Fields appended by time enrichment. `event_time` carries no time zone: it holds the wall clock
/// time in whatever [TimeReference](crate::types::config::TimeReference) the enrichment used.
pub fn time_fields() -> Vec<Field> {
    vec![
        Field::new(EVENT_TIME.into(), DataType::Datetime(TimeUnit::Milliseconds, None)),
        Field::new(HOUR.into(), DataType::UInt32),
        Field::new(MINUTE.into(), DataType::UInt32),
        Field::new(DAY_OF_WEEK.into(), DataType::UInt32),
        Field::new(DAY_OF_MONTH.into(), DataType::UInt32),
    ]
}

pub fn label_fields() -> Vec<Field> {
    vec![
        Field::new(PICK_UP.into(), DataType::UInt32),
        Field::new(DROP_OFF.into(), DataType::UInt32),
        Field::new(DISTANCE_MILES.into(), DataType::Float64),
    ]
}

/// Full schema of a labeled dataset
pub fn labeled_schema() -> Schema {
    let mut schema = trace_schema();
    schema.merge(Schema::from_iter(time_fields().into_iter().chain(label_fields())));
    schema
}
