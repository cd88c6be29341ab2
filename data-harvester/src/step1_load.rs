use crate::trace_file::{vehicle_id_from_file_name, TraceColumns, TraceLine, TRACE_FILE_EXTENSION};
use common::types::report::{trace_schema, TRACE_COLUMNS, VEHICLE_ID};
use log::{debug, info, warn};
use polars::frame::DataFrame;
use polars::prelude::{col, concat, lit, IntoLazy, LazyFrame, UnionArgs};
use std::fmt;
use std::fmt::Display;
use std::fs::read_to_string;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Loads every trace file below `path` into a single frame with the columns of
/// [trace_schema]. Files are appended in discovery order, so rows are grouped by file but are not
/// sorted by time across vehicles.
pub fn load_data(path: &Path) -> Result<LoadStepOutput, LoadError> {
    let files = discover_trace_files(path)?;
    if files.is_empty() {
        return Err(LoadError::NoData(path.to_path_buf()));
    }

    let mut frames: Vec<LazyFrame> = Vec::with_capacity(files.len());
    for file in &files {
        if let Some(frame) = load_trace_file(file)? {
            frames.push(frame);
        }
    }

    let reports = if frames.is_empty() {
        DataFrame::empty_with_schema(&trace_schema())
    } else {
        concat(frames, UnionArgs::default())?
            .select(TRACE_COLUMNS.map(|name| col(name)))
            .collect()?
    };

    info!(target: "load", "Loaded {} reports from {} trace files", reports.height(), files.len());

    Ok(LoadStepOutput { reports, files })
}

fn discover_trace_files(root: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !root.exists() {
        return Err(LoadError::InputNotFound(root.to_path_buf()));
    }

    let mut files = vec![];
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == TRACE_FILE_EXTENSION) {
            files.push(entry.into_path());
        }
    }

    debug!(target: "load", "Found {} trace files below {:?}", files.len(), root);

    Ok(files)
}

/// `None` if the file holds no reports
fn load_trace_file(file: &Path) -> Result<Option<LazyFrame>, LoadError> {
    let vehicle_id = vehicle_id_from_file_name(file)
        .ok_or_else(|| LoadError::Naming(file.to_path_buf()))?;

    let content = read_to_string(file).map_err(|source| LoadError::Read {
        file: file.to_path_buf(),
        source,
    })?;

    let mut columns = TraceColumns::default();
    for (index, line) in content.lines().enumerate() {
        match TraceLine::parse(line) {
            Ok(Some(trace_line)) => columns.push(trace_line),
            Ok(None) => {}
            Err(reason) => {
                return Err(LoadError::Parse {
                    file: file.to_path_buf(),
                    line: index + 1,
                    reason,
                })
            }
        }
    }

    if columns.is_empty() {
        warn!(target: "load", "Trace file {:?} of vehicle '{}' holds no reports", file, vehicle_id);
        return Ok(None);
    }

    debug!(target: "load", "Read {} reports of vehicle '{}' from {:?}", columns.len(), vehicle_id, file);

    let frame = columns
        .into_frame()?
        .lazy()
        .with_column(lit(vehicle_id).alias(VEHICLE_ID));

    Ok(Some(frame))
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    InputNotFound(PathBuf),
    NoData(PathBuf),
    Naming(PathBuf),
    Parse {
        file: PathBuf,
        line: usize,
        reason: String,
    },
    Read {
        file: PathBuf,
        source: io::Error,
    },
    Walk(#[from] walkdir::Error),
    Polars(#[from] polars::error::PolarsError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::InputNotFound(path) => write!(f, "Input path {path:?} does not exist"),
            LoadError::NoData(path) => write!(f, "No data: no *.{TRACE_FILE_EXTENSION} trace files found below {path:?}"),
            LoadError::Naming(file) => write!(f, "Can't derive a vehicle id from {file:?}, expected a file name like 'prefix_VEHICLE.{TRACE_FILE_EXTENSION}'"),
            LoadError::Parse { file, line, reason } => write!(f, "{file:?}, line {line}: {reason}"),
            LoadError::Read { file, source } => write!(f, "Reading {file:?} failed: {source}"),
            LoadError::Walk(err) => err.fmt(f),
            LoadError::Polars(err) => err.fmt(f),
        }
    }
}

pub struct LoadStepOutput {
    pub reports: DataFrame,
    /// Trace files in the order they were loaded
    pub files: Vec<PathBuf>,
}
