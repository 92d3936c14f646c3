//! Salesboard - Video Game Sales Dashboard
//!
//! Loads a video game sales CSV once, then turns a filter selection
//! (platforms and a year range) into ten summary tables and their
//! Vega-Lite charts. The pipeline is pure: `render` filters, aggregates and
//! presents without touching the loaded dataset.
//!
//! The HTTP and WebSocket layer lives behind the `server` feature.

pub mod column;
pub mod dataset;
pub mod store;
pub mod view;
pub mod summary;
pub mod aggregate;
pub mod chart;
pub mod dashboard;
pub mod controls;
pub mod config;
pub mod error;

pub use column::{ColumnType, ColumnValue};
pub use dataset::{Dataset, Record, Schema};
pub use store::DatasetStore;
pub use view::{filter, FilterCriteria, FilteredView};
pub use summary::{SortKey, SortOrder, SortTarget, SummaryRow, SummaryTable};
pub use aggregate::{aggregate_all, Aggregation, Summaries};
pub use chart::{ChartKind, VegaLiteWriter};
pub use dashboard::{present, render, Dashboard, Panel, PreviewTable};
pub use controls::{FilterControls, RenderRequest};
pub use config::ServerConfig;
pub use error::{ConfigError, FilterError, LoadError};

// Server modules - only when server feature is enabled
#[cfg(feature = "server")]
pub mod messages;
#[cfg(feature = "server")]
pub mod websocket;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_sales.csv")
    }

    fn approx(actual: Option<f64>, expected: f64) -> bool {
        actual.map_or(false, |v| (v - expected).abs() < 1e-9)
    }

    fn key_strings(table: &SummaryTable, index: usize) -> Vec<String> {
        table
            .key_values(index)
            .into_iter()
            .map(|v| v.as_string().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_sample_file_loads() {
        let store = DatasetStore::new(sample_path());
        let dataset = store.load().unwrap();

        // Three malformed rows are skipped
        assert_eq!(dataset.len(), 11);
        assert_eq!(dataset.consoles(), vec!["GB", "PS3", "PS4", "X360"]);
        assert_eq!(dataset.year_range(), Some((1989, 2018)));

        // Extra source columns survive for the preview
        assert_eq!(dataset.schema().len(), 13);
        assert_eq!(dataset.schema().get_column_index("developer"), Some(4));

        let pokemon = dataset
            .records()
            .iter()
            .find(|r| r.console == "GB" && r.year == 1998)
            .unwrap();
        assert_eq!(pokemon.total_sales, None);

        let uncharted = dataset.records().iter().find(|r| r.year == 2016).unwrap();
        assert_eq!(uncharted.genre, "Action, Adventure");
    }

    #[test]
    fn test_complete_workflow() {
        let dataset = DatasetStore::new(sample_path()).load().unwrap();
        let controls = FilterControls::from_dataset(&dataset);
        assert_eq!(controls.default_platforms.len(), 4);
        assert_eq!(controls.default_years, (1995, 2015));

        let criteria = controls.default_criteria().unwrap();
        let dashboard = render(&dataset, &criteria);
        assert_eq!(dashboard.matched_rows, 7);
        assert_eq!(dashboard.preview.rows.len(), 7);

        // Sales by platform, ranked by total
        let by_platform = &dashboard.panel(Aggregation::SalesByPlatform).unwrap().summary;
        assert_eq!(key_strings(by_platform, 0), vec!["PS4", "X360", "PS3", "GB"]);
        assert!(approx(by_platform.rows()[0].measure(0), 34.48));
        assert!(approx(by_platform.rows()[1].measure(0), 32.09));
        assert!(approx(by_platform.rows()[2].measure(0), 20.32));
        assert!(approx(by_platform.rows()[3].measure(0), 0.0));

        // Totals agree across groupings
        let total = by_platform.measure_total(0);
        let by_genre = &dashboard.panel(Aggregation::SalesByGenre).unwrap().summary;
        assert!((by_genre.measure_total(0) - total).abs() < 1e-9);

        // GB has no sales figures so it has no average
        let averages = &dashboard.panel(Aggregation::AverageSalesByPlatform).unwrap().summary;
        assert_eq!(key_strings(averages, 0), vec!["PS3", "PS4", "X360"]);
        assert!(approx(averages.rows()[1].measure(0), 17.24));

        let lifespan = &dashboard.panel(Aggregation::PlatformLifespan).unwrap().summary;
        assert_eq!(key_strings(lifespan, 0), vec!["X360", "PS4", "GB", "PS3"]);
        let years: Vec<Option<f64>> = lifespan.rows().iter().map(|r| r.measure(0)).collect();
        assert_eq!(years, vec![Some(6.0), Some(1.0), Some(0.0), Some(0.0)]);

        let releases = &dashboard.panel(Aggregation::ReleasesPerYear).unwrap().summary;
        assert_eq!(releases.len(), 6);
        assert_eq!(releases.measure_total(0), 7.0);

        let histogram = &dashboard.panel(Aggregation::SalesDistribution).unwrap().summary;
        assert_eq!(histogram.len(), 50);
        assert_eq!(histogram.measure_total(0), 6.0);
    }

    #[test]
    fn test_narrow_selection() {
        let dataset = DatasetStore::new(sample_path()).load().unwrap();
        let controls = FilterControls::from_dataset(&dataset);
        let request = RenderRequest {
            consoles: Some(vec!["PS4".to_string()]),
            year_min: Some(2014),
            year_max: Some(2018),
        };
        let dashboard = render(&dataset, &request.to_criteria(&controls).unwrap());
        assert_eq!(dashboard.matched_rows, 5);

        let top = &dashboard.panel(Aggregation::TopPublishers).unwrap().summary;
        assert_eq!(
            key_strings(top, 0),
            vec!["Rockstar Games", "Activision", "EA Sports", "Sony Interactive Entertainment"]
        );
        assert!(approx(top.rows()[0].measure(0), 33.33));
    }

    #[test]
    fn test_unselected_dataset_is_empty_dashboard() {
        let dataset = DatasetStore::new(sample_path()).load().unwrap();
        let criteria = FilterCriteria::new(["Saturn"], 1995, 2000).unwrap();
        let dashboard = render(&dataset, &criteria);

        assert_eq!(dashboard.matched_rows, 0);
        assert!(dashboard.panels.iter().all(|p| p.empty));
        assert!(dashboard.preview.is_empty());
    }
}
