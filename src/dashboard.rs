//! Presentation stage and the end-to-end render pipeline.
//!
//! `render(dataset, criteria)` is `present(aggregate_all(filter(..)))`: one
//! filtered view, ten summary tables, ten chart panels and a preview of the
//! first rows. Nothing here mutates its inputs.

use crate::aggregate::{aggregate_all, Aggregation, Summaries};
use crate::chart::{AxisTitles, ChartKind, VegaLiteWriter};
use crate::column::ColumnValue;
use crate::dataset::Dataset;
use crate::summary::SummaryTable;
use crate::view::{filter, FilterCriteria, FilteredView};
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// Rows shown in the preview panel.
pub const PREVIEW_ROWS: usize = 50;

const SALES_AXIS: &str = "Sales (Millions)";

/// One chart on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub aggregation: Aggregation,
    pub title: String,
    pub kind: ChartKind,
    /// True when the summary had no rows and the chart is a placeholder.
    pub empty: bool,
    pub summary: SummaryTable,
    /// Vega-Lite specification.
    pub spec: Value,
}

/// The first rows of the filtered view, all source columns in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTable {
    pub title: String,
    pub kind: ChartKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ColumnValue>>,
    /// Rows in the filtered view, of which at most `PREVIEW_ROWS` are shown.
    pub total_rows: usize,
}

impl PreviewTable {
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        let columns = view
            .dataset()
            .schema()
            .get_column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let rows = (0..view.len().min(PREVIEW_ROWS))
            .filter_map(|i| view.row_cells(i).map(<[ColumnValue]>::to_vec))
            .collect();

        PreviewTable {
            title: "Filtered Dataset Preview".to_string(),
            kind: ChartKind::Table,
            columns,
            rows,
            total_rows: view.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything displayed for one set of filter criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub criteria: FilterCriteria,
    pub matched_rows: usize,
    /// The ten chart panels, in display order.
    pub panels: Vec<Panel>,
    pub preview: PreviewTable,
}

impl Dashboard {
    pub fn panel(&self, aggregation: Aggregation) -> Option<&Panel> {
        self.panels.iter().find(|p| p.aggregation == aggregation)
    }
}

/// Chart kind and axis titles for each aggregation.
fn layout(aggregation: Aggregation) -> (ChartKind, AxisTitles<'static>) {
    let sales = AxisTitles {
        y: Some(SALES_AXIS),
        ..AxisTitles::default()
    };
    match aggregation {
        Aggregation::SalesOverTime => (ChartKind::Line, sales),
        Aggregation::SalesByPlatform => (ChartKind::Bar, sales),
        Aggregation::PlatformTrend => (ChartKind::MultiLine, sales),
        Aggregation::SalesByGenre => (ChartKind::Bar, sales),
        Aggregation::GenreByRegion => (
            ChartKind::GroupedBar,
            AxisTitles {
                y: Some(SALES_AXIS),
                series: Some("Region"),
                ..AxisTitles::default()
            },
        ),
        Aggregation::SalesDistribution => (
            ChartKind::Histogram,
            AxisTitles {
                x: Some("total_sales"),
                y: Some("count"),
                ..AxisTitles::default()
            },
        ),
        Aggregation::TopPublishers => (ChartKind::Bar, sales),
        Aggregation::ReleasesPerYear => (
            ChartKind::Line,
            AxisTitles {
                y: Some("Number of Games"),
                ..AxisTitles::default()
            },
        ),
        Aggregation::AverageSalesByPlatform => (ChartKind::Bar, sales),
        Aggregation::PlatformLifespan => (
            ChartKind::Bar,
            AxisTitles {
                y: Some("Years"),
                ..AxisTitles::default()
            },
        ),
    }
}

/// Map summary tables to panels and attach the preview.
pub fn present(criteria: &FilterCriteria, summaries: &Summaries, view: &FilteredView<'_>) -> Dashboard {
    let writer = VegaLiteWriter::new();
    let panels = summaries
        .tables()
        .map(|(aggregation, table)| {
            let (kind, titles) = layout(aggregation);
            Panel {
                aggregation,
                title: aggregation.title().to_string(),
                kind,
                empty: table.is_empty(),
                summary: table.clone(),
                spec: writer.write(kind, aggregation.title(), table, titles),
            }
        })
        .collect();

    Dashboard {
        criteria: criteria.clone(),
        matched_rows: view.len(),
        panels,
        preview: PreviewTable::from_view(view),
    }
}

/// Filter, aggregate and present in one call.
///
/// # Examples
///
/// ```
/// use salesboard::{render, Dataset, FilterCriteria, Aggregation};
///
/// let csv = "title,console,genre,publisher,year,total_sales,na_sales,pal_sales,jp_sales\n\
///            A,PS4,Action,Sony,2015,2.0,1.0,0.5,0.5\n\
///            B,PS4,Action,Sony,2016,3.0,1.5,1.0,0.5\n\
///            C,X360,Shooter,Microsoft,2010,1.0,0.6,0.3,0.1\n";
/// let dataset = Dataset::from_csv_str(csv).unwrap();
/// let criteria = FilterCriteria::new(["PS4"], 2014, 2016).unwrap();
///
/// let dashboard = render(&dataset, &criteria);
/// assert_eq!(dashboard.matched_rows, 2);
/// assert_eq!(dashboard.panels.len(), 10);
///
/// let by_platform = &dashboard.panel(Aggregation::SalesByPlatform).unwrap().summary;
/// assert_eq!(by_platform.rows()[0].measure(0), Some(5.0));
/// ```
pub fn render(dataset: &Dataset, criteria: &FilterCriteria) -> Dashboard {
    let started = Instant::now();

    let view = filter(dataset, criteria);
    let summaries = aggregate_all(&view);
    let dashboard = present(criteria, &summaries, &view);

    debug!(
        "Rendered dashboard: {} of {} rows matched, {:?}",
        view.len(),
        dataset.len(),
        started.elapsed()
    );
    dashboard
}
