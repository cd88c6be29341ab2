use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PipelineConfig {
    /// Directory (searched recursively) or single file holding the `*.txt` traces
    pub data_path: PathBuf,
    #[serde(default)]
    pub time_reference: TimeReference,
}

/// The clock in which epoch seconds are turned into calendar fields
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeReference {
    /// Time zone of the machine running the pipeline
    #[default]
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "utc")]
    Utc,
}

impl TimeReference {
    /// Wall clock time of an epoch timestamp in this reference. `None` if chrono can't represent
    /// the instant.
    pub fn wall_clock(&self, epoch_seconds: i64) -> Option<NaiveDateTime> {
        let instant = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?;
        match self {
            TimeReference::Local => Some(instant.with_timezone(&Local).naive_local()),
            TimeReference::Utc => Some(instant.naive_utc()),
        }
    }
}
