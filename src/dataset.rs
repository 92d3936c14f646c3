//! Sales dataset: typed records plus the source table they were read from.
//!
//! A `Dataset` is built once from a CSV file and never mutated afterwards.
//! Each row is kept twice: as a typed `Record` used by filtering and
//! aggregation, and as the raw cells of the source row (in source column
//! order) used by the preview.
//!
//! # Examples
//!
//! ```
//! use salesboard::Dataset;
//!
//! let csv = "title,console,genre,publisher,year,total_sales,na_sales,pal_sales,jp_sales\n\
//!            Halo 3,X360,Shooter,Microsoft Studios,2007,8.09,4.8,2.59,0.13\n";
//! let dataset = Dataset::from_csv_str(csv).unwrap();
//!
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.consoles(), vec!["X360"]);
//! assert_eq!(dataset.year_range(), Some((2007, 2007)));
//! ```

use crate::column::{infer_column_type, parse_cell, ColumnType, ColumnValue};
use crate::error::LoadError;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "title",
    "console",
    "genre",
    "publisher",
    "year",
    "total_sales",
    "na_sales",
    "pal_sales",
    "jp_sales",
];

/// Years outside this range are treated as malformed.
pub const MIN_VALID_YEAR: i32 = 1950;
pub const MAX_VALID_YEAR: i32 = 2100;

/// Schema definition with column names and types, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<(String, ColumnType)>,
}

impl Schema {
    pub fn new(columns: Vec<(String, ColumnType)>) -> Self {
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns a list of all column names.
    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the index of a column by name, or None if not found.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    /// Returns the type of a column by name, or None if not found.
    pub fn get_column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }
}

/// One sales entry for a single game/platform combination.
///
/// Sales figures are in millions of units. `None` means the source cell was
/// empty; aggregations exclude absent values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub title: String,
    pub console: String,
    pub genre: String,
    pub publisher: String,
    pub year: i32,
    pub total_sales: Option<f64>,
    pub na_sales: Option<f64>,
    pub pal_sales: Option<f64>,
    pub jp_sales: Option<f64>,
}

/// Immutable table of sales records.
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
    cells: Vec<Vec<ColumnValue>>,
}

/// Positions of the required columns inside the source header.
struct ColumnLayout {
    title: usize,
    console: usize,
    genre: usize,
    publisher: usize,
    year: usize,
    total_sales: usize,
    na_sales: usize,
    pal_sales: usize,
    jp_sales: usize,
}

impl ColumnLayout {
    fn locate(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|&name| find(name).is_none())
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        let index = |name: &str| find(name).unwrap_or_default();
        Ok(ColumnLayout {
            title: index("title"),
            console: index("console"),
            genre: index("genre"),
            publisher: index("publisher"),
            year: index("year"),
            total_sales: index("total_sales"),
            na_sales: index("na_sales"),
            pal_sales: index("pal_sales"),
            jp_sales: index("jp_sales"),
        })
    }

    fn forced_type(&self, col_idx: usize) -> Option<ColumnType> {
        if col_idx == self.year {
            Some(ColumnType::Int64)
        } else if [self.total_sales, self.na_sales, self.pal_sales, self.jp_sales].contains(&col_idx) {
            Some(ColumnType::Float64)
        } else if [self.title, self.console, self.genre, self.publisher].contains(&col_idx) {
            Some(ColumnType::String)
        } else {
            None
        }
    }

    fn parse_record(&self, row: &csv::StringRecord) -> Result<Record, String> {
        let text = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();

        let console = text(self.console);
        if console.is_empty() {
            return Err("missing console".to_string());
        }

        Ok(Record {
            title: text(self.title),
            console,
            genre: text(self.genre),
            publisher: text(self.publisher),
            year: parse_year(row.get(self.year).unwrap_or(""))?,
            total_sales: parse_sales("total_sales", row.get(self.total_sales).unwrap_or(""))?,
            na_sales: parse_sales("na_sales", row.get(self.na_sales).unwrap_or(""))?,
            pal_sales: parse_sales("pal_sales", row.get(self.pal_sales).unwrap_or(""))?,
            jp_sales: parse_sales("jp_sales", row.get(self.jp_sales).unwrap_or(""))?,
        })
    }
}

/// Parse a release year.
///
/// Integral reals such as `2008.0` are accepted, since integer columns with
/// gaps are commonly written that way.
fn parse_year(value: &str) -> Result<i32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("missing year".to_string());
    }

    let year = match trimmed.parse::<i64>() {
        Ok(y) => y,
        Err(_) => {
            let f: f64 = trimmed
                .parse()
                .map_err(|_| format!("year '{}' is not a number", trimmed))?;
            if !f.is_finite() || f.fract() != 0.0 {
                return Err(format!("year '{}' is not an integer", trimmed));
            }
            f as i64
        }
    };

    if year < MIN_VALID_YEAR as i64 || year > MAX_VALID_YEAR as i64 {
        return Err(format!(
            "year {} outside [{}, {}]",
            year, MIN_VALID_YEAR, MAX_VALID_YEAR
        ));
    }
    Ok(year as i32)
}

/// Parse a sales figure. Empty cells are absent rather than zero.
fn parse_sales(column: &str, value: &str) -> Result<Option<f64>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let sales: f64 = trimmed
        .parse()
        .map_err(|_| format!("{} '{}' is not a number", column, trimmed))?;
    if !sales.is_finite() || sales < 0.0 {
        return Err(format!("{} '{}' is not a non-negative number", column, trimmed));
    }
    Ok(Some(sales))
}

fn optional_f64(value: Option<f64>) -> ColumnValue {
    value.map(ColumnValue::Float64).unwrap_or(ColumnValue::Null)
}

impl Dataset {
    /// Load a dataset from a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;
        info!(
            "Loaded {} sales records ({} columns) from {}",
            dataset.len(),
            dataset.schema.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_csv_str(csv: &str) -> Result<Self, LoadError> {
        Self::from_reader(csv.as_bytes())
    }

    /// Parse a dataset from any CSV source with a header row.
    ///
    /// Structural CSV errors and missing required columns fail the whole
    /// load. Individual rows that cannot be interpreted (invalid UTF-8, wrong
    /// field count, missing console, bad year, non-numeric or negative sales)
    /// are logged and skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let layout = ColumnLayout::locate(&headers)?;

        let mut records = Vec::new();
        let mut raw_rows = Vec::new();
        let mut skipped = 0usize;

        for result in csv_reader.byte_records() {
            let bytes = result?;
            let line = bytes.position().map(|p| p.line()).unwrap_or_default();
            let row = match csv::StringRecord::from_byte_record(bytes) {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping line {}: {}", line, e.utf8_error());
                    skipped += 1;
                    continue;
                }
            };

            if row.iter().all(|field| field.is_empty()) {
                continue;
            }

            if row.len() != headers.len() {
                warn!(
                    "Skipping line {}: expected {} fields, found {}",
                    line,
                    headers.len(),
                    row.len()
                );
                skipped += 1;
                continue;
            }

            match layout.parse_record(&row) {
                Ok(record) => {
                    records.push(record);
                    raw_rows.push(row);
                }
                Err(reason) => {
                    warn!("Skipping line {}: {}", line, reason);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            info!("Kept {} rows, skipped {} malformed rows", records.len(), skipped);
        }

        let schema = Schema::new(
            headers
                .iter()
                .enumerate()
                .map(|(col_idx, name)| {
                    let col_type = layout.forced_type(col_idx).unwrap_or_else(|| {
                        infer_column_type(raw_rows.iter().map(|row| row.get(col_idx).unwrap_or("")))
                    });
                    (name.trim().to_string(), col_type)
                })
                .collect(),
        );

        let cells = raw_rows
            .iter()
            .zip(&records)
            .map(|(row, record)| {
                (0..headers.len())
                    .map(|col_idx| {
                        if col_idx == layout.year {
                            ColumnValue::Int64(record.year as i64)
                        } else if col_idx == layout.total_sales {
                            optional_f64(record.total_sales)
                        } else if col_idx == layout.na_sales {
                            optional_f64(record.na_sales)
                        } else if col_idx == layout.pal_sales {
                            optional_f64(record.pal_sales)
                        } else if col_idx == layout.jp_sales {
                            optional_f64(record.jp_sales)
                        } else {
                            let col_type = schema
                                .columns
                                .get(col_idx)
                                .map(|(_, ty)| *ty)
                                .unwrap_or(ColumnType::String);
                            parse_cell(row.get(col_idx).unwrap_or(""), col_type)
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Dataset {
            schema,
            records,
            cells,
        })
    }

    /// Build a dataset directly from records.
    ///
    /// The schema is the nine required columns in their canonical order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let schema = Schema::new(
            REQUIRED_COLUMNS
                .iter()
                .map(|name| {
                    let col_type = match *name {
                        "year" => ColumnType::Int64,
                        "title" | "console" | "genre" | "publisher" => ColumnType::String,
                        _ => ColumnType::Float64,
                    };
                    (name.to_string(), col_type)
                })
                .collect(),
        );

        let cells = records
            .iter()
            .map(|r| {
                vec![
                    ColumnValue::String(r.title.clone()),
                    ColumnValue::String(r.console.clone()),
                    ColumnValue::String(r.genre.clone()),
                    ColumnValue::String(r.publisher.clone()),
                    ColumnValue::Int64(r.year as i64),
                    optional_f64(r.total_sales),
                    optional_f64(r.na_sales),
                    optional_f64(r.pal_sales),
                    optional_f64(r.jp_sales),
                ]
            })
            .collect();

        Dataset {
            schema,
            records,
            cells,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Source cells of a row, in source column order.
    pub fn row_cells(&self, index: usize) -> Option<&[ColumnValue]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    /// Distinct console names, sorted ascending.
    pub fn consoles(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.console.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Observed (min, max) release year, or None for an empty dataset.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dataset {{ columns: {}, rows: {} }}",
            self.schema.len(),
            self.records.len()
        )
    }
}
