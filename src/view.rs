//! Filter stage: platform and year-range selection over a dataset.
//!
//! A `FilteredView` borrows the dataset and keeps a mapping from view
//! positions to dataset rows, so no records are copied. Views are rebuilt
//! from scratch for every new set of criteria.

use crate::column::ColumnValue;
use crate::dataset::{Dataset, Record};
use crate::error::FilterError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Platform selection plus an inclusive year range.
///
/// # Examples
///
/// ```
/// use salesboard::FilterCriteria;
///
/// let criteria = FilterCriteria::new(["PS4", "X360"], 2010, 2015).unwrap();
/// assert_eq!(criteria.year_min(), 2010);
/// assert!(FilterCriteria::new(["PS4"], 2016, 2015).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    selected_consoles: BTreeSet<String>,
    year_min: i32,
    year_max: i32,
}

impl FilterCriteria {
    /// Build criteria. An empty console set is allowed and matches nothing.
    pub fn new<I, S>(consoles: I, year_min: i32, year_max: i32) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if year_min > year_max {
            return Err(FilterError::InvertedYearRange { year_min, year_max });
        }
        Ok(FilterCriteria {
            selected_consoles: consoles.into_iter().map(Into::into).collect(),
            year_min,
            year_max,
        })
    }

    pub fn selected_consoles(&self) -> &BTreeSet<String> {
        &self.selected_consoles
    }

    pub fn year_min(&self) -> i32 {
        self.year_min
    }

    pub fn year_max(&self) -> i32 {
        self.year_max
    }

    /// Inclusion predicate: console selected and year within both bounds.
    #[inline]
    pub fn matches(&self, record: &Record) -> bool {
        record.year >= self.year_min
            && record.year <= self.year_max
            && self.selected_consoles.contains(&record.console)
    }
}

/// The records of a dataset that pass a `FilterCriteria`, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    view_to_parent: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.view_to_parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_parent.is_empty()
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Dataset row indices of the records in this view.
    pub fn parent_indices(&self) -> &[usize] {
        &self.view_to_parent
    }

    pub fn get(&self, index: usize) -> Option<&'a Record> {
        let parent_index = *self.view_to_parent.get(index)?;
        self.dataset.get(parent_index)
    }

    /// Source cells of the view row at `index`.
    pub fn row_cells(&self, index: usize) -> Option<&'a [ColumnValue]> {
        let parent_index = *self.view_to_parent.get(index)?;
        self.dataset.row_cells(parent_index)
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.view_to_parent
            .iter()
            .filter_map(move |&i| dataset.get(i))
    }
}

/// Select the records matching `criteria`.
pub fn filter<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let view_to_parent = if criteria.selected_consoles.is_empty() {
        Vec::new()
    } else {
        dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| criteria.matches(record))
            .map(|(i, _)| i)
            .collect()
    };

    FilteredView {
        dataset,
        view_to_parent,
    }
}
