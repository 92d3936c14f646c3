//! Cell values and cell types for the source table.
//!
//! Every cell of the input file is kept as a `ColumnValue` so the preview can
//! show the source columns exactly as loaded. Summary tables reuse the same
//! value type for their grouping keys and measures.

use serde::Serialize;
use std::cmp::Ordering;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Bool,
}

impl ColumnType {
    /// Smallest type able to hold values of both `self` and `other`.
    ///
    /// Integers widen to floats; any other mix falls back to strings.
    pub fn widen(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::Int64, ColumnType::Float64) | (ColumnType::Float64, ColumnType::Int64) => {
                ColumnType::Float64
            }
            _ => ColumnType::String,
        }
    }
}

/// A single cell value. Serializes as a bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Int64(i64),
    Float64(f64),
    String(String),
    Bool(bool),
    Null,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ColumnValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ColumnValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value, for measures that may be counts or sums.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ColumnValue::Int64(v) => Some(*v as f64),
            ColumnValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Total order used for sorting summary rows.
    ///
    /// Nulls sort last. Integers and floats compare numerically with each
    /// other; other mixed types compare by their debug form so the order is
    /// still deterministic.
    pub fn compare(&self, other: &ColumnValue) -> Ordering {
        match (self, other) {
            (ColumnValue::Null, ColumnValue::Null) => Ordering::Equal,
            (ColumnValue::Null, _) => Ordering::Greater,
            (_, ColumnValue::Null) => Ordering::Less,
            (ColumnValue::Int64(a), ColumnValue::Int64(b)) => a.cmp(b),
            (ColumnValue::String(a), ColumnValue::String(b)) => a.cmp(b),
            (ColumnValue::Bool(a), ColumnValue::Bool(b)) => a.cmp(b),
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => format!("{:?}", a).cmp(&format!("{:?}", b)),
            },
        }
    }
}

/// Infer the type of a single CSV value. Empty values carry no type.
pub fn infer_type(value: &str) -> Option<ColumnType> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return None;
    }

    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        return Some(ColumnType::Bool);
    }

    if trimmed.parse::<i64>().is_ok() {
        return Some(ColumnType::Int64);
    }

    if trimmed.parse::<f64>().is_ok() {
        return Some(ColumnType::Float64);
    }

    Some(ColumnType::String)
}

/// Infer a column type from all of its values.
///
/// A column with no non-empty values is treated as a string column.
pub fn infer_column_type<'a, I>(values: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .filter_map(infer_type)
        .reduce(ColumnType::widen)
        .unwrap_or(ColumnType::String)
}

/// Parse a CSV value into a `ColumnValue` of the given column type.
///
/// Empty strings become `Null`. A value that does not fit the column type is
/// kept as a string rather than dropped.
pub fn parse_cell(value: &str, col_type: ColumnType) -> ColumnValue {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return ColumnValue::Null;
    }

    let parsed = match col_type {
        ColumnType::Int64 => trimmed.parse::<i64>().ok().map(ColumnValue::Int64),
        ColumnType::Float64 => trimmed.parse::<f64>().ok().map(ColumnValue::Float64),
        ColumnType::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Some(ColumnValue::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(ColumnValue::Bool(false))
            } else {
                None
            }
        }
        ColumnType::String => None,
    };

    parsed.unwrap_or_else(|| ColumnValue::String(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_type() {
        assert_eq!(infer_type(""), None);
        assert_eq!(infer_type("  "), None);
        assert_eq!(infer_type("2013"), Some(ColumnType::Int64));
        assert_eq!(infer_type("20.32"), Some(ColumnType::Float64));
        assert_eq!(infer_type("TRUE"), Some(ColumnType::Bool));
        assert_eq!(infer_type("2013-09-17"), Some(ColumnType::String));
    }

    #[test]
    fn test_infer_column_type_widens() {
        assert_eq!(infer_column_type(["1", "", "2"]), ColumnType::Int64);
        assert_eq!(infer_column_type(["1", "2.5"]), ColumnType::Float64);
        assert_eq!(infer_column_type(["1", "n/a"]), ColumnType::String);
        assert_eq!(infer_column_type(["true", "1"]), ColumnType::String);
        assert_eq!(infer_column_type(["", ""]), ColumnType::String);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("", ColumnType::Float64), ColumnValue::Null);
        assert_eq!(parse_cell("9.4", ColumnType::Float64), ColumnValue::Float64(9.4));
        assert_eq!(parse_cell("7", ColumnType::Int64), ColumnValue::Int64(7));
        assert_eq!(parse_cell("False", ColumnType::Bool), ColumnValue::Bool(false));
        assert_eq!(
            parse_cell(" Rockstar North ", ColumnType::String),
            ColumnValue::String("Rockstar North".to_string())
        );
        assert_eq!(
            parse_cell("x", ColumnType::Int64),
            ColumnValue::String("x".to_string())
        );
    }

    #[test]
    fn test_compare_orders_nulls_last() {
        let mut values = vec![
            ColumnValue::Null,
            ColumnValue::Float64(2.5),
            ColumnValue::Int64(1),
            ColumnValue::Int64(3),
        ];
        values.sort_by(|a, b| a.compare(b));
        assert_eq!(
            values,
            vec![
                ColumnValue::Int64(1),
                ColumnValue::Float64(2.5),
                ColumnValue::Int64(3),
                ColumnValue::Null,
            ]
        );
    }

    #[test]
    fn test_serializes_as_scalar() {
        let row = vec![
            ColumnValue::String("PS4".to_string()),
            ColumnValue::Int64(2015),
            ColumnValue::Float64(2.5),
            ColumnValue::Null,
        ];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["PS4",2015,2.5,null]"#);
    }
}
