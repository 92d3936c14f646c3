//! Error types for the dashboard pipeline.
//!
//! Loading is the only fallible stage with real I/O. Filtering can only fail
//! at criteria construction, and everything downstream of a valid
//! `FilterCriteria` is infallible.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the sales dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read dataset '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Errors raised when building filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("year range is inverted: {year_min} > {year_max}")]
    InvertedYearRange { year_min: i32, year_max: i32 },
}

/// Errors raised while reading process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{value}'")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}
