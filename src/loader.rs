//! Loads tabular data files (CSV, Parquet, Arrow IPC) into records.

use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::SpotlessError;
use crate::entities::EntityKind;
use crate::grid::value::parse_date;
use crate::grid::{ColumnDescriptor, Record, Value, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub file_type: FileType,
}

pub fn detect_file_type(path: &Path) -> Result<FileType, SpotlessError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(SpotlessError::UnknownFileType),
    }
}

/// Expands `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> Result<PathBuf, SpotlessError> {
    shellexpand::full(raw)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| SpotlessError::Config(format!("cannot expand {raw}: {e}")))
}

pub fn get_file_info(path: PathBuf) -> Result<FileInfo, SpotlessError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SpotlessError::FileNotFound,
        ErrorKind::PermissionDenied => SpotlessError::PermissionDenied,
        _ => SpotlessError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(SpotlessError::LoadingFailed("Not a file!".into()));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

/// Parses a `<entity>=<path>` command line argument.
pub fn parse_load_spec(spec: &str) -> Result<(EntityKind, PathBuf), SpotlessError> {
    let (entity, path) = spec
        .split_once('=')
        .ok_or_else(|| SpotlessError::Config(format!("expected <entity>=<path>, got {spec}")))?;
    let kind = EntityKind::parse(entity)
        .ok_or_else(|| SpotlessError::Config(format!("unknown entity {entity}")))?;
    Ok((kind, expand_path(path.trim())?))
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

fn is_numeric_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn to_value(raw: &str, dtype: &DataType) -> Value {
    if is_numeric_type(dtype) {
        return raw
            .parse::<f64>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::text(raw));
    }
    match dtype {
        DataType::Boolean => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::text(raw),
        },
        DataType::Date | DataType::Datetime(_, _) => {
            parse_date(raw).unwrap_or_else(|| Value::text(raw))
        }
        _ => Value::text(raw),
    }
}

// Converts one dataframe column into values, keeping the original dtype's meaning.
fn load_column(df: &DataFrame, col_name: &str) -> Result<(String, Vec<Value>), PolarsError> {
    let original_dtype = df.column(col_name)?.dtype().clone();

    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    let data = series
        .into_iter()
        .map(|value| match value {
            Some(s) => to_value(s, &original_dtype),
            None => Value::Empty,
        })
        .collect();

    Ok((col_name.to_string(), data))
}

/// Reads a data file into records, one per row, fields in column order.
pub fn load_records(path: &Path) -> Result<Vec<Record>, SpotlessError> {
    let file_info = get_file_info(path.to_path_buf())?;
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    let start_time = Instant::now();
    let df = frame.collect()?;

    // Each column is converted on its own rayon worker.
    let columns: Result<Vec<(String, Vec<Value>)>, _> = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect();
    let mut columns = columns?;

    let records: Vec<Record> = (0..df.height())
        .map(|row| {
            columns
                .iter_mut()
                .map(|(name, data)| {
                    let value = std::mem::replace(&mut data[row], Value::Empty);
                    (name.clone(), value)
                })
                .collect()
        })
        .collect();

    info!(
        "Loaded {} records from {:?} ({} bytes) in {}ms",
        records.len(),
        file_info.path,
        file_info.file_size,
        start_time.elapsed().as_millis()
    );
    Ok(records)
}

/// One sortable column per field of the first record.
///
/// Kinds are inferred from the first non-empty value of each field; text
/// that reads as a date makes a date column.
pub fn columns_for(records: &[Record]) -> Vec<ColumnDescriptor> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    first
        .field_names()
        .map(|name| {
            let kind = records
                .iter()
                .filter_map(|r| r.get(name))
                .find(|v| !v.is_empty())
                .map(infer_kind)
                .unwrap_or_default();
            debug!("Column {name} inferred as {kind:?}");
            ColumnDescriptor::by_name(name, name, kind).sortable(true)
        })
        .collect()
}

fn infer_kind(value: &Value) -> ValueKind {
    match value {
        Value::Text(s) if parse_date(s).is_some() => ValueKind::Date,
        other => other.kind().unwrap_or_default(),
    }
}
