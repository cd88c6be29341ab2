use itertools::Itertools;
use polars::error::{PolarsError, PolarsResult};
use polars::frame::DataFrame;
use polars::io::SerWriter;
use polars::prelude::{col, CsvWriter, IntoLazy, IpcWriter, ParquetWriter, Schema, SortMultipleOptions};
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

/// Whether two frames hold the same values, nulls included. Column order and row order can be
/// ignored independently.
pub fn equivalent(lhs: &DataFrame, rhs: &DataFrame, ignore_col_order: bool, ignore_row_order: bool) -> PolarsResult<bool> {
    fn normalize_col_order(frame: &DataFrame) -> PolarsResult<DataFrame> {
        let by_name = frame.get_column_names().into_iter()
            .sorted()
            .map(|name| col(name.clone()))
            .collect_vec();
        frame.clone().lazy().select(by_name).collect()
    }

    fn normalize_row_order(frame: &DataFrame) -> PolarsResult<DataFrame> {
        // List columns can't be sort keys
        let keys = frame.get_columns().iter()
            .filter(|column| !column.dtype().is_list())
            .map(|column| column.name().clone())
            .collect_vec();
        frame.clone().lazy()
            .sort(keys, SortMultipleOptions::default().with_maintain_order(true))
            .collect()
    }

    let normalize = |frame: &DataFrame| -> PolarsResult<DataFrame> {
        let mut frame = frame.clone();
        if ignore_col_order {
            frame = normalize_col_order(&frame)?;
        }
        if ignore_row_order {
            frame = normalize_row_order(&frame)?;
        }
        Ok(frame)
    };

    Ok(normalize(lhs)?.equals_missing(&normalize(rhs)?))
}

/// Whether the frame has exactly the columns of `schema`, in the same order and with the same types
pub fn matches_schema(frame: &DataFrame, schema: &Schema) -> bool {
    frame.width() == schema.len()
        && frame.get_columns().iter()
            .zip(schema.iter())
            .all(|(column, (name, dtype))| column.name() == name && column.dtype() == dtype)
}

#[derive(Clone, Copy, Debug)]
pub enum FileType {
    CSV,
    IPC,
    PARQUET,
}

pub fn write_df_to_file(
    path: PathBuf,
    format: FileType,
    mut df: DataFrame
) -> Result<(), PolarsError> {
    let mut file = prepare_file(path)?;

    match format {
        FileType::CSV => {
            CsvWriter::new(&mut file).finish(&mut df)?;
        },
        FileType::IPC => {
            IpcWriter::new(&mut file).finish(&mut df)?;
        },
        FileType::PARQUET => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        },
    };

    Ok(())
}

fn prepare_file(
    path: PathBuf,
) -> Result<File, std::io::Error> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(path)?;

    Ok(file)
}
