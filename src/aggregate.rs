//! Aggregation pipeline: ten independent group-and-reduce queries.
//!
//! Every function takes the shared `FilteredView` and returns a fresh
//! `SummaryTable`. They are pure, never fail, and return an empty table for
//! an empty view.
//!
//! Absent sales values are excluded from every aggregate: sums skip them,
//! means divide by the number of present values, and the distribution only
//! bins present values. Grouping uses ordered maps, so ascending key order
//! comes for free; ranked tables are re-sorted by measure with the key as
//! tie-break.

use crate::column::ColumnValue;
use crate::dataset::Record;
use crate::summary::SummaryTable;
use crate::view::FilteredView;
use serde::Serialize;
use std::collections::BTreeMap;

/// Ranked tables (#7, #9, #10) keep this many rows.
pub const TOP_N: usize = 10;

/// Number of equal-width buckets in the sales distribution.
pub const DISTRIBUTION_BINS: usize = 50;

/// The ten summary views, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    SalesOverTime,
    SalesByPlatform,
    PlatformTrend,
    SalesByGenre,
    GenreByRegion,
    SalesDistribution,
    TopPublishers,
    ReleasesPerYear,
    AverageSalesByPlatform,
    PlatformLifespan,
}

impl Aggregation {
    pub const ALL: [Aggregation; 10] = [
        Aggregation::SalesOverTime,
        Aggregation::SalesByPlatform,
        Aggregation::PlatformTrend,
        Aggregation::SalesByGenre,
        Aggregation::GenreByRegion,
        Aggregation::SalesDistribution,
        Aggregation::TopPublishers,
        Aggregation::ReleasesPerYear,
        Aggregation::AverageSalesByPlatform,
        Aggregation::PlatformLifespan,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Aggregation::SalesOverTime => "Global Video Game Sales Over Time",
            Aggregation::SalesByPlatform => "Total Global Sales by Platform",
            Aggregation::PlatformTrend => "Platform Sales Trends Over Time",
            Aggregation::SalesByGenre => "Global Sales by Genre",
            Aggregation::GenreByRegion => "Genre Preferences by Region",
            Aggregation::SalesDistribution => "Distribution of Global Video Game Sales",
            Aggregation::TopPublishers => "Top 10 Publishers by Global Sales",
            Aggregation::ReleasesPerYear => "Number of Video Games Released per Year",
            Aggregation::AverageSalesByPlatform => "Average Global Sales per Game (Top Platforms)",
            Aggregation::PlatformLifespan => "Platform Lifespan (Years Active)",
        }
    }

    pub fn compute(&self, view: &FilteredView<'_>) -> SummaryTable {
        match self {
            Aggregation::SalesOverTime => sales_over_time(view),
            Aggregation::SalesByPlatform => sales_by_platform(view),
            Aggregation::PlatformTrend => platform_trend(view),
            Aggregation::SalesByGenre => sales_by_genre(view),
            Aggregation::GenreByRegion => genre_by_region(view),
            Aggregation::SalesDistribution => sales_distribution(view),
            Aggregation::TopPublishers => top_publishers(view),
            Aggregation::ReleasesPerYear => releases_per_year(view),
            Aggregation::AverageSalesByPlatform => average_sales_by_platform(view),
            Aggregation::PlatformLifespan => platform_lifespan(view),
        }
    }
}

/// All ten summary tables for one filtered view, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summaries {
    tables: Vec<(Aggregation, SummaryTable)>,
}

impl Summaries {
    pub fn get(&self, aggregation: Aggregation) -> &SummaryTable {
        // ALL order matches the enum order, so the discriminant is the index.
        &self.tables[aggregation as usize].1
    }

    pub fn tables(&self) -> impl Iterator<Item = (Aggregation, &SummaryTable)> {
        self.tables.iter().map(|(agg, table)| (*agg, table))
    }
}

/// Run every aggregation over the same view.
pub fn aggregate_all(view: &FilteredView<'_>) -> Summaries {
    Summaries {
        tables: Aggregation::ALL
            .iter()
            .map(|agg| (*agg, agg.compute(view)))
            .collect(),
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn year_key(year: i32) -> ColumnValue {
    ColumnValue::Int64(year as i64)
}

fn text_key(s: &str) -> ColumnValue {
    ColumnValue::String(s.to_string())
}

/// Sum `value` per group, skipping absent values. Groups whose values are
/// all absent still appear with a total of zero.
fn grouped_sum<'a, K, FK, FV>(view: &FilteredView<'a>, key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&'a Record) -> K,
    FV: Fn(&Record) -> Option<f64>,
{
    let mut groups = BTreeMap::new();
    for record in view.records() {
        let total = groups.entry(key(record)).or_insert(0.0);
        if let Some(v) = value(record) {
            *total += v;
        }
    }
    groups
}

/// One key, one summed measure, ranked descending by the sum.
fn ranked_sum<'a, FK>(
    view: &FilteredView<'a>,
    key_column: &str,
    key: FK,
    limit: Option<usize>,
) -> SummaryTable
where
    FK: Fn(&'a Record) -> &'a str,
{
    let mut table = SummaryTable::new(&[key_column], &["total_sales"]);
    for (k, total) in grouped_sum(view, key, |r| r.total_sales) {
        table.push(vec![text_key(k)], vec![ColumnValue::Float64(total)]);
    }
    table.rank_by_measure(0);
    if let Some(n) = limit {
        table.truncate(n);
    }
    table
}

// ============================================================================
// The ten aggregations
// ============================================================================

/// #1: total sales per year, ascending by year.
pub fn sales_over_time(view: &FilteredView<'_>) -> SummaryTable {
    let mut table = SummaryTable::new(&["year"], &["total_sales"]);
    for (year, total) in grouped_sum(view, |r| r.year, |r| r.total_sales) {
        table.push(vec![year_key(year)], vec![ColumnValue::Float64(total)]);
    }
    table
}

/// #2: total sales per console, descending by total.
pub fn sales_by_platform(view: &FilteredView<'_>) -> SummaryTable {
    ranked_sum(view, "console", |r| r.console.as_str(), None)
}

/// #3: total sales per (year, console), ascending by year then console.
pub fn platform_trend(view: &FilteredView<'_>) -> SummaryTable {
    let mut table = SummaryTable::new(&["year", "console"], &["total_sales"]);
    for ((year, console), total) in grouped_sum(view, |r| (r.year, r.console.as_str()), |r| r.total_sales) {
        table.push(
            vec![year_key(year), text_key(console)],
            vec![ColumnValue::Float64(total)],
        );
    }
    table
}

/// #4: total sales per genre, descending by total.
pub fn sales_by_genre(view: &FilteredView<'_>) -> SummaryTable {
    ranked_sum(view, "genre", |r| r.genre.as_str(), None)
}

/// #5: regional sales per genre, ascending by genre.
pub fn genre_by_region(view: &FilteredView<'_>) -> SummaryTable {
    let mut groups: BTreeMap<&str, [f64; 3]> = BTreeMap::new();
    for record in view.records() {
        let sums = groups.entry(record.genre.as_str()).or_insert([0.0; 3]);
        let regions = [record.na_sales, record.pal_sales, record.jp_sales];
        for (sum, value) in sums.iter_mut().zip(regions) {
            if let Some(v) = value {
                *sum += v;
            }
        }
    }

    let mut table = SummaryTable::new(&["genre"], &["na_sales", "pal_sales", "jp_sales"]);
    for (genre, [na, pal, jp]) in groups {
        table.push(
            vec![text_key(genre)],
            vec![
                ColumnValue::Float64(na),
                ColumnValue::Float64(pal),
                ColumnValue::Float64(jp),
            ],
        );
    }
    table
}

/// #6: histogram of total sales.
///
/// `DISTRIBUTION_BINS` equal-width buckets span the observed min..max; each
/// bucket is `[start, end)` except the last, which also holds the maximum.
/// When every value is identical a single `[v, v]` bucket is produced.
pub fn sales_distribution(view: &FilteredView<'_>) -> SummaryTable {
    let mut table = SummaryTable::new(&["bin_start", "bin_end"], &["count"]);

    let values: Vec<f64> = view.records().filter_map(|r| r.total_sales).collect();
    let (min, max) = match values.iter().copied().fold(None, |acc: Option<(f64, f64)>, v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    }) {
        Some(bounds) => bounds,
        None => return table,
    };

    if max <= min {
        table.push(
            vec![ColumnValue::Float64(min), ColumnValue::Float64(max)],
            vec![ColumnValue::Int64(values.len() as i64)],
        );
        return table;
    }

    let width = (max - min) / DISTRIBUTION_BINS as f64;
    let mut counts = [0i64; DISTRIBUTION_BINS];
    for v in &values {
        let bucket = (((v - min) / width) as usize).min(DISTRIBUTION_BINS - 1);
        counts[bucket] += 1;
    }

    for (i, count) in counts.iter().enumerate() {
        let start = min + width * i as f64;
        let end = if i + 1 == DISTRIBUTION_BINS {
            max
        } else {
            min + width * (i + 1) as f64
        };
        table.push(
            vec![ColumnValue::Float64(start), ColumnValue::Float64(end)],
            vec![ColumnValue::Int64(*count)],
        );
    }
    table
}

/// #7: the ten publishers with the highest total sales.
pub fn top_publishers(view: &FilteredView<'_>) -> SummaryTable {
    ranked_sum(view, "publisher", |r| r.publisher.as_str(), Some(TOP_N))
}

/// #8: number of records per year, ascending by year.
pub fn releases_per_year(view: &FilteredView<'_>) -> SummaryTable {
    let mut counts: BTreeMap<i32, i64> = BTreeMap::new();
    for record in view.records() {
        *counts.entry(record.year).or_insert(0) += 1;
    }

    let mut table = SummaryTable::new(&["year"], &["games"]);
    for (year, count) in counts {
        table.push(vec![year_key(year)], vec![ColumnValue::Int64(count)]);
    }
    table
}

/// #9: mean total sales per console, top ten by mean.
///
/// Consoles without a single present sales value have no mean and are left
/// out.
pub fn average_sales_by_platform(view: &FilteredView<'_>) -> SummaryTable {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in view.records() {
        if let Some(v) = record.total_sales {
            let (sum, count) = groups.entry(record.console.as_str()).or_insert((0.0, 0));
            *sum += v;
            *count += 1;
        }
    }

    let mut table = SummaryTable::new(&["console"], &["average_sales"]);
    for (console, (sum, count)) in groups {
        table.push(
            vec![text_key(console)],
            vec![ColumnValue::Float64(sum / count as f64)],
        );
    }
    table.rank_by_measure(0);
    table.truncate(TOP_N);
    table
}

/// #10: years between first and last release per console, top ten.
pub fn platform_lifespan(view: &FilteredView<'_>) -> SummaryTable {
    let mut spans: BTreeMap<&str, (i32, i32)> = BTreeMap::new();
    for record in view.records() {
        spans
            .entry(record.console.as_str())
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(record.year);
                *hi = (*hi).max(record.year);
            })
            .or_insert((record.year, record.year));
    }

    let mut table = SummaryTable::new(&["console"], &["lifespan"]);
    for (console, (first, last)) in spans {
        table.push(
            vec![text_key(console)],
            vec![ColumnValue::Int64((last - first) as i64)],
        );
    }
    table.rank_by_measure(0);
    table.truncate(TOP_N);
    table
}
