//! Filter controls offered to the user, and how their input becomes
//! `FilterCriteria`.
//!
//! Platforms are offered in sorted order with the first five preselected.
//! The year range is bounded by the data and starts at 1995–2015, clamped
//! into whatever range the data covers.

use crate::dataset::Dataset;
use crate::error::FilterError;
use crate::view::FilterCriteria;
use serde::{Deserialize, Serialize};

/// Platforms preselected when the dashboard opens.
pub const DEFAULT_PLATFORM_COUNT: usize = 5;

/// Year range shown when the dashboard opens, before clamping.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (1995, 2015);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControls {
    pub platforms: Vec<String>,
    pub default_platforms: Vec<String>,
    pub year_bounds: (i32, i32),
    pub default_years: (i32, i32),
}

impl FilterControls {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let platforms: Vec<String> = dataset.consoles().into_iter().map(String::from).collect();
        let default_platforms = platforms.iter().take(DEFAULT_PLATFORM_COUNT).cloned().collect();

        // An empty dataset has no observed years; fall back to the default range.
        let year_bounds = dataset.year_range().unwrap_or(DEFAULT_YEAR_RANGE);
        let default_years = (
            DEFAULT_YEAR_RANGE.0.clamp(year_bounds.0, year_bounds.1),
            DEFAULT_YEAR_RANGE.1.clamp(year_bounds.0, year_bounds.1),
        );

        FilterControls {
            platforms,
            default_platforms,
            year_bounds,
            default_years,
        }
    }

    pub fn default_criteria(&self) -> Result<FilterCriteria, FilterError> {
        self.criteria_for(&self.default_platforms, self.default_years.0, self.default_years.1)
    }

    /// Build criteria from user input.
    ///
    /// Year bounds are clamped into `year_bounds` and an inverted pair is
    /// swapped. Platform names the dataset does not contain are dropped.
    pub fn criteria_for<I, S>(&self, consoles: I, year_min: i32, year_max: i32) -> Result<FilterCriteria, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (lo, hi) = self.year_bounds;
        let a = year_min.clamp(lo, hi);
        let b = year_max.clamp(lo, hi);

        let selected: Vec<String> = consoles
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .filter(|c| self.platforms.contains(c))
            .collect();

        FilterCriteria::new(selected, a.min(b), a.max(b))
    }
}

/// A render request as sent by a client. Missing fields take the control
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub consoles: Option<Vec<String>>,
    #[serde(default)]
    pub year_min: Option<i32>,
    #[serde(default)]
    pub year_max: Option<i32>,
}

impl RenderRequest {
    pub fn to_criteria(&self, controls: &FilterControls) -> Result<FilterCriteria, FilterError> {
        let consoles = self
            .consoles
            .as_deref()
            .unwrap_or(controls.default_platforms.as_slice());
        controls.criteria_for(
            consoles,
            self.year_min.unwrap_or(controls.default_years.0),
            self.year_max.unwrap_or(controls.default_years.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    fn dataset(entries: &[(&str, i32)]) -> Dataset {
        Dataset::from_records(
            entries
                .iter()
                .map(|(console, year)| Record {
                    title: format!("{} {}", console, year),
                    console: console.to_string(),
                    genre: "Action".to_string(),
                    publisher: "Acme".to_string(),
                    year: *year,
                    total_sales: Some(1.0),
                    na_sales: None,
                    pal_sales: None,
                    jp_sales: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let ds = dataset(&[
            ("X360", 2005),
            ("PS2", 2000),
            ("Wii", 2006),
            ("3DS", 2011),
            ("DS", 2004),
            ("PS4", 2013),
            ("GB", 1989),
        ]);
        let controls = FilterControls::from_dataset(&ds);

        assert_eq!(controls.platforms, vec!["3DS", "DS", "GB", "PS2", "PS4", "Wii", "X360"]);
        assert_eq!(controls.default_platforms, vec!["3DS", "DS", "GB", "PS2", "PS4"]);
        assert_eq!(controls.year_bounds, (1989, 2013));
        assert_eq!(controls.default_years, (1995, 2013));

        let criteria = controls.default_criteria().unwrap();
        assert_eq!(criteria.selected_consoles().len(), 5);
        assert_eq!((criteria.year_min(), criteria.year_max()), (1995, 2013));
    }

    #[test]
    fn test_default_years_clamped_into_narrow_data() {
        let controls = FilterControls::from_dataset(&dataset(&[("PS5", 2020), ("PS5", 2023)]));
        assert_eq!(controls.default_years, (2020, 2020));
        assert_eq!(controls.default_platforms, vec!["PS5"]);
    }

    #[test]
    fn test_empty_dataset() {
        let controls = FilterControls::from_dataset(&dataset(&[]));
        assert!(controls.platforms.is_empty());
        assert_eq!(controls.year_bounds, DEFAULT_YEAR_RANGE);
        assert_eq!(controls.default_years, DEFAULT_YEAR_RANGE);
        assert!(controls.default_criteria().unwrap().selected_consoles().is_empty());
    }

    #[test]
    fn test_criteria_for_clamps_and_swaps() {
        let controls = FilterControls::from_dataset(&dataset(&[("PS4", 2013), ("PS4", 2020)]));

        let criteria = controls.criteria_for(["PS4", "Saturn"], 2030, 1990).unwrap();
        assert_eq!(criteria.selected_consoles().iter().collect::<Vec<_>>(), vec!["PS4"]);
        assert_eq!((criteria.year_min(), criteria.year_max()), (2013, 2020));
    }

    #[test]
    fn test_render_request_defaults() {
        let controls = FilterControls::from_dataset(&dataset(&[("PS4", 2013), ("Wii", 2008)]));

        let request: RenderRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(
            request.to_criteria(&controls).unwrap(),
            controls.default_criteria().unwrap()
        );

        let request: RenderRequest =
            serde_json::from_str(r#"{"consoles": ["Wii"], "year_max": 2010}"#).unwrap();
        let criteria = request.to_criteria(&controls).unwrap();
        assert_eq!(criteria.selected_consoles().iter().collect::<Vec<_>>(), vec!["Wii"]);
        assert_eq!((criteria.year_min(), criteria.year_max()), (2008, 2010));

        let request: RenderRequest = serde_json::from_str(r#"{"consoles": []}"#).unwrap();
        assert!(request.to_criteria(&controls).unwrap().selected_consoles().is_empty());
    }
}
