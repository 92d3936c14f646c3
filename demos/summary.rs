/// Dashboard Summary Example
///
/// This example demonstrates:
/// - Loading a sales CSV once through a DatasetStore
/// - Building filter controls and their default criteria
/// - Rendering the dashboard and reading its summary tables
///
/// Run with: cargo run --example summary [path/to/sales.csv]

use salesboard::{render, Aggregation, DatasetStore, FilterControls};

fn main() {
    println!("=== Salesboard Summary Example ===\n");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_sales.csv").to_string());

    // 1. Load the dataset
    println!("1. Loading {}...", path);
    let store = DatasetStore::new(path);
    let dataset = match store.load() {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("   Failed to load: {}", e);
            std::process::exit(1);
        }
    };
    println!("   Loaded {} records\n", dataset.len());

    // 2. Filter controls
    println!("2. Filter controls...");
    let controls = FilterControls::from_dataset(&dataset);
    println!("   Platforms: {:?}", controls.platforms);
    println!("   Selected:  {:?}", controls.default_platforms);
    println!(
        "   Years:     {}-{} (data covers {}-{})\n",
        controls.default_years.0, controls.default_years.1, controls.year_bounds.0, controls.year_bounds.1
    );

    // 3. Render
    println!("3. Rendering dashboard...");
    let criteria = controls.default_criteria().unwrap();
    let dashboard = render(&dataset, &criteria);
    println!("   {} rows matched\n", dashboard.matched_rows);

    // 4. Summaries
    println!("4. Panels:");
    for panel in &dashboard.panels {
        let status = if panel.empty { " (no data)" } else { "" };
        println!("   {:<40} {:>3} rows{}", panel.title, panel.summary.len(), status);
    }

    println!("\n5. {}:", Aggregation::SalesByPlatform.title());
    if let Some(panel) = dashboard.panel(Aggregation::SalesByPlatform) {
        for row in panel.summary.rows() {
            let console = row.keys[0].as_string().unwrap_or("");
            println!("   {:<8} {:>8.2}", console, row.measure(0).unwrap_or(0.0));
        }
    }

    println!("\n=== Example Complete ===");
}
