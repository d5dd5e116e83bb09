use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{
    class_from_number, Dataset, LaunchRecord, COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
    #[error("row {row}: unknown launch site '{site}'")]
    UnknownSite { row: usize, site: String },
    #[error("malformed file: {0}")]
    Malformed(String),
    #[error("dataset contains no launches")]
    Empty,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the launch columns, extra columns ignored
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    Dataset::from_records(records)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == col) {
            return Err(LoadError::MissingColumn(col));
        }
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<LaunchRecord>().enumerate() {
        let record = result.map_err(|e| LoadError::InvalidRow {
            row,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, value) in rows.iter().enumerate() {
        let obj = value.as_object().ok_or_else(|| LoadError::InvalidRow {
            row,
            message: "not a JSON object".to_string(),
        })?;
        for col in REQUIRED_COLUMNS {
            if !obj.contains_key(col) {
                return Err(LoadError::MissingColumn(col));
            }
        }
        let record: LaunchRecord =
            serde_json::from_value(value.clone()).map_err(|e| LoadError::InvalidRow {
                row,
                message: e.to_string(),
            })?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::Malformed(e.to_string()))?;

        let site_col = column(&batch, COL_LAUNCH_SITE)?;
        let payload_col = column(&batch, COL_PAYLOAD_MASS)?;
        let class_col = column(&batch, COL_CLASS)?;
        let booster_col = column(&batch, COL_BOOSTER_CATEGORY)?;

        for i in 0..batch.num_rows() {
            let row = records.len();
            let value = number_at(class_col, i, row, COL_CLASS)?;
            let class = class_from_number(value).ok_or_else(|| LoadError::InvalidRow {
                row,
                message: format!("class must be 0 or 1, got {value}"),
            })?;

            records.push(LaunchRecord {
                launch_site: string_at(site_col, i, row, COL_LAUNCH_SITE)?,
                payload_mass_kg: number_at(payload_col, i, row, COL_PAYLOAD_MASS)?,
                class,
                booster_version_category: string_at(booster_col, i, row, COL_BOOSTER_CATEGORY)?,
            });
        }
    }

    Ok(records)
}

// -- Arrow helpers --

fn column<'b>(batch: &'b RecordBatch, name: &'static str) -> Result<&'b ArrayRef, LoadError> {
    batch
        .schema()
        .index_of(name)
        .map(|i| batch.column(i))
        .map_err(|_| LoadError::MissingColumn(name))
}

fn null_cell(row: usize, column: &str) -> LoadError {
    LoadError::InvalidRow {
        row,
        message: format!("null value in '{column}'"),
    }
}

fn wrong_type(row: usize, column: &str, data_type: &DataType) -> LoadError {
    LoadError::InvalidRow {
        row,
        message: format!("column '{column}' has unsupported type {data_type:?}"),
    }
}

/// Read a Utf8 / LargeUtf8 cell.
fn string_at(col: &ArrayRef, i: usize, row: usize, column: &str) -> Result<String, LoadError> {
    if col.is_null(i) {
        return Err(null_cell(row, column));
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        Ok(arr.value(i).to_string())
    } else if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        Ok(arr.value(i).to_string())
    } else {
        Err(wrong_type(row, column, col.data_type()))
    }
}

/// Read any integer or float cell as `f64`.
fn number_at(col: &ArrayRef, i: usize, row: usize, column: &str) -> Result<f64, LoadError> {
    if col.is_null(i) {
        return Err(null_cell(row, column));
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.value(i))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(i) as f64)
    } else {
        Err(wrong_type(row, column, col.data_type()))
    }
}
