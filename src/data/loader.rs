use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use csv::StringRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::{EngineError, SourceTable};
use super::model::{GeoRecord, MarketRecord};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

const YEAR: &str = "year";
const NEIGHBORHOOD: &str = "neighborhood";
const SALE_PRICE: &str = "sale_price_sqr_foot";
const HOUSING_UNITS: &str = "housing_units";
const GROSS_RENT: &str = "gross_rent";
const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";

/// Accepted header spellings per canonical column, compared case-insensitively.
fn aliases(column: &'static str) -> &'static [&'static str] {
    match column {
        LATITUDE => &["latitude", "lat"],
        LONGITUDE => &["longitude", "lon", "lng"],
        YEAR => &["year"],
        NEIGHBORHOOD => &["neighborhood"],
        SALE_PRICE => &["sale_price_sqr_foot"],
        HOUSING_UNITS => &["housing_units"],
        GROSS_RENT => &["gross_rent"],
        _ => &[],
    }
}

fn matches_column(header: &str, column: &'static str) -> bool {
    let header = header.trim();
    aliases(column).iter().any(|a| header.eq_ignore_ascii_case(a))
}

fn find_column<'h>(
    headers: impl IntoIterator<Item = &'h str>,
    table: SourceTable,
    column: &'static str,
) -> Result<usize, EngineError> {
    headers
        .into_iter()
        .position(|h| matches_column(h, column))
        .ok_or_else(|| EngineError::MissingColumn {
            table,
            column: column.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Load the yearly housing-market table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `year, neighborhood, sale_price_sqr_foot, housing_units, gross_rent`
/// * `.json`    – `[{ "year": 2010, "neighborhood": "...", ... }, ...]`
/// * `.parquet` – same columns, integer or float physical types
pub fn load_market_file(path: &Path) -> Result<Vec<MarketRecord>> {
    let records = match extension(path).as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening market CSV")?;
            read_market_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading market JSON")?;
            read_market_json(&text)?
        }
        "parquet" | "pq" => load_market_parquet(path)?,
        other => bail!("Unsupported market file extension: .{other}"),
    };
    log::info!("Loaded {} market rows from {}", records.len(), path.display());
    Ok(records)
}

/// Load the neighborhood coordinate table (`.csv` or `.json`).
///
/// Header spellings `Neighborhood`, `Lat` and `Lon` are accepted.
pub fn load_geo_file(path: &Path) -> Result<Vec<GeoRecord>> {
    let records = match extension(path).as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening coordinates CSV")?;
            read_geo_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading coordinates JSON")?;
            read_geo_json(&text)?
        }
        other => bail!("Unsupported coordinates file extension: .{other}"),
    };
    log::info!("Loaded {} coordinate rows from {}", records.len(), path.display());
    Ok(records)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

fn parse_f64(table: SourceTable, row: usize, column: &str, raw: &str) -> Result<f64, EngineError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EngineError::schema(table, row, column, "missing value"));
    }
    raw.parse::<f64>()
        .map_err(|_| EngineError::schema(table, row, column, format!("'{raw}' is not a number")))
}

/// Integers may be written as `123` or `123.0`; fractional values are rejected.
fn parse_i64(table: SourceTable, row: usize, column: &str, raw: &str) -> Result<i64, EngineError> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(i);
    }
    let f = parse_f64(table, row, column, raw)?;
    float_to_i64(f).ok_or_else(|| {
        EngineError::schema(table, row, column, format!("'{raw}' is not an integer"))
    })
}

fn float_to_i64(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn to_year(table: SourceTable, row: usize, value: i64) -> Result<i32, EngineError> {
    i32::try_from(value)
        .map_err(|_| EngineError::schema(table, row, YEAR, format!("year {value} out of range")))
}

/// Names are join keys and are kept exactly as read; only blank names fail.
fn parse_name(table: SourceTable, row: usize, column: &str, raw: &str) -> Result<String, EngineError> {
    if raw.trim().is_empty() {
        return Err(EngineError::schema(table, row, column, "missing value"));
    }
    Ok(raw.to_string())
}

// ---------------------------------------------------------------------------
// CSV readers
// ---------------------------------------------------------------------------

fn csv_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<StringRecord> {
    Ok(reader.headers().context("reading CSV headers")?.clone())
}

/// Parse a market table from CSV text.
pub fn read_market_csv<R: Read>(input: R) -> Result<Vec<MarketRecord>> {
    let table = SourceTable::Market;
    let mut reader = csv::Reader::from_reader(input);
    let headers = csv_headers(&mut reader)?;

    let year_idx = find_column(headers.iter(), table, YEAR)?;
    let name_idx = find_column(headers.iter(), table, NEIGHBORHOOD)?;
    let price_idx = find_column(headers.iter(), table, SALE_PRICE)?;
    let units_idx = find_column(headers.iter(), table, HOUSING_UNITS)?;
    let rent_idx = find_column(headers.iter(), table, GROSS_RENT)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        records.push(MarketRecord {
            year: to_year(table, row, parse_i64(table, row, YEAR, cell(year_idx))?)?,
            neighborhood: parse_name(table, row, NEIGHBORHOOD, cell(name_idx))?,
            sale_price_sqr_foot: parse_f64(table, row, SALE_PRICE, cell(price_idx))?,
            housing_units: parse_i64(table, row, HOUSING_UNITS, cell(units_idx))?,
            gross_rent: parse_f64(table, row, GROSS_RENT, cell(rent_idx))?,
        });
    }
    Ok(records)
}

/// Parse a coordinate table from CSV text.
pub fn read_geo_csv<R: Read>(input: R) -> Result<Vec<GeoRecord>> {
    let table = SourceTable::Geo;
    let mut reader = csv::Reader::from_reader(input);
    let headers = csv_headers(&mut reader)?;

    let name_idx = find_column(headers.iter(), table, NEIGHBORHOOD)?;
    let lat_idx = find_column(headers.iter(), table, LATITUDE)?;
    let lon_idx = find_column(headers.iter(), table, LONGITUDE)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        records.push(GeoRecord {
            neighborhood: parse_name(table, row, NEIGHBORHOOD, cell(name_idx))?,
            latitude: parse_f64(table, row, LATITUDE, cell(lat_idx))?,
            longitude: parse_f64(table, row, LONGITUDE, cell(lon_idx))?,
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON readers
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "year": 2010, "neighborhood": "Alamo Square", "sale_price_sqr_foot": 291.18,
///     "housing_units": 372560, "gross_rent": 1239 },
///   ...
/// ]
/// ```
pub fn read_market_json(text: &str) -> Result<Vec<MarketRecord>> {
    let table = SourceTable::Market;
    json_records(text)?
        .iter()
        .enumerate()
        .map(|(row, rec)| -> Result<MarketRecord> {
            let obj = json_object(table, row, rec)?;
            let year = json_i64(table, row, obj, YEAR)?;
            Ok(MarketRecord {
                year: to_year(table, row, year)?,
                neighborhood: json_str(table, row, obj, NEIGHBORHOOD)?,
                sale_price_sqr_foot: json_f64(table, row, obj, SALE_PRICE)?,
                housing_units: json_i64(table, row, obj, HOUSING_UNITS)?,
                gross_rent: json_f64(table, row, obj, GROSS_RENT)?,
            })
        })
        .collect()
}

pub fn read_geo_json(text: &str) -> Result<Vec<GeoRecord>> {
    let table = SourceTable::Geo;
    json_records(text)?
        .iter()
        .enumerate()
        .map(|(row, rec)| -> Result<GeoRecord> {
            let obj = json_object(table, row, rec)?;
            Ok(GeoRecord {
                neighborhood: json_str(table, row, obj, NEIGHBORHOOD)?,
                latitude: json_f64(table, row, obj, LATITUDE)?,
                longitude: json_f64(table, row, obj, LONGITUDE)?,
            })
        })
        .collect()
}

fn json_records(text: &str) -> Result<Vec<JsonValue>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    match root {
        JsonValue::Array(records) => Ok(records),
        _ => bail!("Expected top-level JSON array"),
    }
}

fn json_object<'a>(
    table: SourceTable,
    row: usize,
    value: &'a JsonValue,
) -> Result<&'a Map<String, JsonValue>, EngineError> {
    value
        .as_object()
        .ok_or_else(|| EngineError::schema(table, row, "*", "row is not a JSON object"))
}

fn json_field<'a>(
    table: SourceTable,
    row: usize,
    obj: &'a Map<String, JsonValue>,
    column: &'static str,
) -> Result<&'a JsonValue, EngineError> {
    obj.iter()
        .find(|(k, _)| matches_column(k, column))
        .map(|(_, v)| v)
        .filter(|v| !v.is_null())
        .ok_or_else(|| EngineError::schema(table, row, column, "missing value"))
}

fn json_f64(
    table: SourceTable,
    row: usize,
    obj: &Map<String, JsonValue>,
    column: &'static str,
) -> Result<f64, EngineError> {
    let value = json_field(table, row, obj, column)?;
    value
        .as_f64()
        .ok_or_else(|| EngineError::schema(table, row, column, format!("{value} is not a number")))
}

fn json_i64(
    table: SourceTable,
    row: usize,
    obj: &Map<String, JsonValue>,
    column: &'static str,
) -> Result<i64, EngineError> {
    let value = json_field(table, row, obj, column)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().and_then(float_to_i64))
        .ok_or_else(|| {
            EngineError::schema(table, row, column, format!("{value} is not an integer"))
        })
}

fn json_str(
    table: SourceTable,
    row: usize,
    obj: &Map<String, JsonValue>,
    column: &'static str,
) -> Result<String, EngineError> {
    let value = json_field(table, row, obj, column)?;
    let s = value
        .as_str()
        .ok_or_else(|| EngineError::schema(table, row, column, format!("{value} is not a string")))?;
    parse_name(table, row, column, s)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet market table.
///
/// Integer columns may be Int16/Int32/Int64 or whole-valued floats; float
/// columns may also be stored as integers. String columns may be Utf8 or LargeUtf8.
fn load_market_parquet(path: &Path) -> Result<Vec<MarketRecord>> {
    let table = SourceTable::Market;
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let names = || schema.fields().iter().map(|f| f.name().as_str());
        let base = records.len();

        let year_col = batch.column(find_column(names(), table, YEAR)?);
        let name_col = batch.column(find_column(names(), table, NEIGHBORHOOD)?);
        let price_col = batch.column(find_column(names(), table, SALE_PRICE)?);
        let units_col = batch.column(find_column(names(), table, HOUSING_UNITS)?);
        let rent_col = batch.column(find_column(names(), table, GROSS_RENT)?);

        for i in 0..batch.num_rows() {
            let row = base + i;
            let year = arrow_i64(table, year_col, i, row, YEAR)?;
            records.push(MarketRecord {
                year: to_year(table, row, year)?,
                neighborhood: arrow_str(table, name_col, i, row, NEIGHBORHOOD)?,
                sale_price_sqr_foot: arrow_f64(table, price_col, i, row, SALE_PRICE)?,
                housing_units: arrow_i64(table, units_col, i, row, HOUSING_UNITS)?,
                gross_rent: arrow_f64(table, rent_col, i, row, GROSS_RENT)?,
            });
        }
    }

    Ok(records)
}

// -- Arrow helpers --

fn unsupported(table: SourceTable, row: usize, column: &str, dt: &DataType) -> EngineError {
    EngineError::schema(table, row, column, format!("unsupported column type {dt:?}"))
}

fn check_null(
    table: SourceTable,
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &str,
) -> Result<(), EngineError> {
    if col.is_null(i) {
        return Err(EngineError::schema(table, row, column, "missing value"));
    }
    Ok(())
}

fn arrow_i64(
    table: SourceTable,
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &str,
) -> Result<i64, EngineError> {
    check_null(table, col, i, row, column)?;
    match col.data_type() {
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(i)),
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(i) as i64),
        DataType::Int16 => Ok(col.as_primitive::<Int16Type>().value(i) as i64),
        DataType::Float64 | DataType::Float32 => {
            let f = arrow_f64(table, col, i, row, column)?;
            float_to_i64(f).ok_or_else(|| {
                EngineError::schema(table, row, column, format!("{f} is not an integer"))
            })
        }
        other => Err(unsupported(table, row, column, other)),
    }
}

fn arrow_f64(
    table: SourceTable,
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &str,
) -> Result<f64, EngineError> {
    check_null(table, col, i, row, column)?;
    match col.data_type() {
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().value(i)),
        DataType::Float32 => Ok(col.as_primitive::<Float32Type>().value(i) as f64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(i) as f64),
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(i) as f64),
        other => Err(unsupported(table, row, column, other)),
    }
}

fn arrow_str(
    table: SourceTable,
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &str,
) -> Result<String, EngineError> {
    check_null(table, col, i, row, column)?;
    let raw = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(i),
        DataType::LargeUtf8 => col.as_string::<i64>().value(i),
        other => return Err(unsupported(table, row, column, other)),
    };
    parse_name(table, row, column, raw)
}
