//! Vega-Lite chart specifications for summary tables.
//!
//! Each summary table is inlined as `data.values` (one object per row, keyed
//! by column name) and paired with a mark and encodings for its chart kind.
//! Categorical axes keep the summary row order (`"sort": null`), so the
//! ordering decided by the aggregation is the ordering drawn.

use crate::summary::SummaryTable;
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Subtitle shown on charts whose summary table is empty.
pub const EMPTY_PLACEHOLDER: &str = "No data for the current filters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// One line over the first key.
    Line,
    /// One line per value of the second key.
    MultiLine,
    /// One bar per row.
    Bar,
    /// Every measure folded into a colour series, bars side by side per key.
    GroupedBar,
    /// Pre-binned `[start, end)` buckets with a count.
    Histogram,
    /// Raw rows, no chart.
    Table,
}

/// Axis and legend titles for a chart.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisTitles<'a> {
    pub x: Option<&'a str>,
    pub y: Option<&'a str>,
    pub series: Option<&'a str>,
}

/// Vega-Lite spec writer.
pub struct VegaLiteWriter {
    schema: String,
    width: Value,
    height: u32,
}

impl Default for VegaLiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VegaLiteWriter {
    pub fn new() -> Self {
        Self {
            schema: VEGA_LITE_SCHEMA.to_string(),
            width: json!("container"),
            height: 320,
        }
    }

    /// Inline data values: one JSON object per summary row.
    pub fn table_to_values(&self, table: &SummaryTable) -> Vec<Value> {
        let names: Vec<&str> = table.column_names().collect();
        table
            .rows()
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = names
                    .iter()
                    .zip(row.keys.iter().chain(row.measures.iter()))
                    .map(|(name, value)| {
                        // Non-finite floats have no JSON form and become null.
                        let json_val = serde_json::to_value(value).unwrap_or(Value::Null);
                        (name.to_string(), json_val)
                    })
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }

    /// Build a complete spec for `table` drawn as `kind`.
    ///
    /// An empty table still yields a valid spec with no data values and a
    /// placeholder subtitle.
    pub fn write(&self, kind: ChartKind, title: &str, table: &SummaryTable, titles: AxisTitles<'_>) -> Value {
        let title_value = if table.is_empty() {
            json!({ "text": title, "subtitle": EMPTY_PLACEHOLDER })
        } else {
            json!(title)
        };

        let mut spec = json!({
            "$schema": self.schema,
            "title": title_value,
            "width": self.width,
            "height": self.height,
            "data": { "values": self.table_to_values(table) },
        });

        let (mark, encoding, transform) = self.layer(kind, table, titles);
        spec["mark"] = mark;
        spec["encoding"] = encoding;
        if let Some(transform) = transform {
            spec["transform"] = transform;
        }
        spec
    }

    fn layer(&self, kind: ChartKind, table: &SummaryTable, titles: AxisTitles<'_>) -> (Value, Value, Option<Value>) {
        let key = |i: usize| table.key_columns().get(i).map(String::as_str).unwrap_or("key");
        let measure = table.measure_columns().first().map(String::as_str).unwrap_or("value");
        let axis_title = |explicit: Option<&str>, field: &str| json!(explicit.unwrap_or(field));

        match kind {
            ChartKind::Line => (
                json!({ "type": "line", "point": true }),
                json!({
                    "x": { "field": key(0), "type": "ordinal", "title": axis_title(titles.x, key(0)) },
                    "y": { "field": measure, "type": "quantitative", "title": axis_title(titles.y, measure) },
                }),
                None,
            ),
            ChartKind::MultiLine => (
                json!({ "type": "line", "point": true }),
                json!({
                    "x": { "field": key(0), "type": "ordinal", "title": axis_title(titles.x, key(0)) },
                    "y": { "field": measure, "type": "quantitative", "title": axis_title(titles.y, measure) },
                    "color": { "field": key(1), "type": "nominal", "title": axis_title(titles.series, key(1)) },
                }),
                None,
            ),
            ChartKind::Bar => (
                json!({ "type": "bar" }),
                json!({
                    "x": { "field": key(0), "type": "nominal", "sort": null, "title": axis_title(titles.x, key(0)) },
                    "y": { "field": measure, "type": "quantitative", "title": axis_title(titles.y, measure) },
                }),
                None,
            ),
            ChartKind::GroupedBar => (
                json!({ "type": "bar" }),
                json!({
                    "x": { "field": key(0), "type": "nominal", "sort": null, "title": axis_title(titles.x, key(0)) },
                    "y": { "field": "value", "type": "quantitative", "title": axis_title(titles.y, "value") },
                    "color": { "field": "variable", "type": "nominal", "title": axis_title(titles.series, "variable") },
                    "xOffset": { "field": "variable", "sort": null },
                }),
                Some(json!([{ "fold": table.measure_columns(), "as": ["variable", "value"] }])),
            ),
            ChartKind::Histogram => (
                json!({ "type": "bar" }),
                json!({
                    "x": {
                        "field": key(0),
                        "type": "quantitative",
                        "bin": "binned",
                        "title": axis_title(titles.x, key(0)),
                    },
                    "x2": { "field": key(1) },
                    "y": { "field": measure, "type": "quantitative", "title": axis_title(titles.y, measure) },
                }),
                None,
            ),
            ChartKind::Table => (json!("text"), json!({}), None),
        }
    }
}
