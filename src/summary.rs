//! Summary tables produced by the aggregation pipeline.
//!
//! A `SummaryTable` is a small, ordered table of grouping keys and numeric
//! measures. Row order is meaningful: it is the axis order of the chart the
//! table feeds.

use crate::column::ColumnValue;
use serde::Serialize;
use std::cmp::Ordering;

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order (smallest first)
    Ascending,
    /// Descending order (largest first)
    Descending,
}

/// Which cell of a summary row a sort key reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTarget {
    Key(usize),
    Measure(usize),
}

/// A single sort key specifying a cell and order
#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub target: SortTarget,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(target: SortTarget) -> Self {
        SortKey {
            target,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(target: SortTarget) -> Self {
        SortKey {
            target,
            order: SortOrder::Descending,
        }
    }
}

/// One row: grouping key(s) followed by measure(s).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub keys: Vec<ColumnValue>,
    pub measures: Vec<ColumnValue>,
}

impl SummaryRow {
    fn cell(&self, target: SortTarget) -> Option<&ColumnValue> {
        match target {
            SortTarget::Key(i) => self.keys.get(i),
            SortTarget::Measure(i) => self.measures.get(i),
        }
    }

    /// Measure `index` as a number, if present and numeric.
    pub fn measure(&self, index: usize) -> Option<f64> {
        self.measures.get(index).and_then(ColumnValue::as_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    key_columns: Vec<String>,
    measure_columns: Vec<String>,
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(key_columns: &[&str], measure_columns: &[&str]) -> Self {
        SummaryTable {
            key_columns: key_columns.iter().map(|c| c.to_string()).collect(),
            measure_columns: measure_columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, keys: Vec<ColumnValue>, measures: Vec<ColumnValue>) {
        debug_assert_eq!(keys.len(), self.key_columns.len());
        debug_assert_eq!(measures.len(), self.measure_columns.len());
        self.rows.push(SummaryRow { keys, measures });
    }

    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn measure_columns(&self) -> &[String] {
        &self.measure_columns
    }

    /// Key columns followed by measure columns.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.key_columns
            .iter()
            .chain(self.measure_columns.iter())
            .map(String::as_str)
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stable multi-key sort; the first key is primary.
    pub fn sort_by_keys(&mut self, sort_keys: &[SortKey]) {
        self.rows.sort_by(|a, b| {
            for key in sort_keys {
                let cmp = Self::compare_cells(a.cell(key.target), b.cell(key.target), key.order);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });
    }

    /// Order rows by measure `measure` descending, ties broken by every key
    /// column ascending.
    pub fn rank_by_measure(&mut self, measure: usize) {
        let mut sort_keys = vec![SortKey::descending(SortTarget::Measure(measure))];
        sort_keys.extend((0..self.key_columns.len()).map(|i| SortKey::ascending(SortTarget::Key(i))));
        self.sort_by_keys(&sort_keys);
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// Sum of measure `index` across all rows.
    pub fn measure_total(&self, index: usize) -> f64 {
        self.rows.iter().filter_map(|row| row.measure(index)).sum()
    }

    /// Values of key `index`, in row order.
    pub fn key_values(&self, index: usize) -> Vec<&ColumnValue> {
        self.rows.iter().filter_map(|row| row.keys.get(index)).collect()
    }

    fn compare_cells(a: Option<&ColumnValue>, b: Option<&ColumnValue>, order: SortOrder) -> Ordering {
        let base_cmp = match (a, b) {
            (Some(a), Some(b)) => a.compare(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        match order {
            SortOrder::Ascending => base_cmp,
            SortOrder::Descending => base_cmp.reverse(),
        }
    }
}
