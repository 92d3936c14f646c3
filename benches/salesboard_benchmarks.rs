use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use salesboard::*;

const CONSOLES: [&str; 8] = ["3DS", "DS", "PC", "PS2", "PS3", "PS4", "Wii", "X360"];
const GENRES: [&str; 6] = ["Action", "Adventure", "Puzzle", "Racing", "Shooter", "Sports"];

fn synthetic_dataset(size: usize) -> Dataset {
    let records = (0..size)
        .map(|i| Record {
            title: format!("Game {}", i),
            console: CONSOLES[i % CONSOLES.len()].to_string(),
            genre: GENRES[i % GENRES.len()].to_string(),
            publisher: format!("Publisher {}", i % 37),
            year: 1990 + (i % 30) as i32,
            total_sales: if i % 11 == 0 { None } else { Some((i % 97) as f64 * 0.13) },
            na_sales: Some((i % 41) as f64 * 0.05),
            pal_sales: Some((i % 23) as f64 * 0.04),
            jp_sales: if i % 5 == 0 { None } else { Some((i % 13) as f64 * 0.02) },
        })
        .collect();
    Dataset::from_records(records)
}

fn default_criteria(dataset: &Dataset) -> FilterCriteria {
    FilterControls::from_dataset(dataset)
        .default_criteria()
        .unwrap()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [1000, 10000, 60000].iter() {
        let dataset = synthetic_dataset(*size);
        let criteria = default_criteria(&dataset);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| filter(black_box(&dataset), black_box(&criteria)).len());
        });
    }
    group.finish();
}

fn bench_aggregate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_all");

    for size in [1000, 10000, 60000].iter() {
        let dataset = synthetic_dataset(*size);
        let criteria = default_criteria(&dataset);
        let view = filter(&dataset, &criteria);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| aggregate_all(black_box(&view)));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for size in [1000, 10000, 60000].iter() {
        let dataset = synthetic_dataset(*size);
        let criteria = default_criteria(&dataset);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| render(black_box(&dataset), black_box(&criteria)));
        });
    }
    group.finish();
}

fn bench_csv_load(c: &mut Criterion) {
    let mut csv = String::from("title,console,genre,publisher,year,total_sales,na_sales,pal_sales,jp_sales\n");
    for i in 0..10000 {
        csv.push_str(&format!(
            "Game {},{},{},Publisher {},{},{:.2},{:.2},{:.2},\n",
            i,
            CONSOLES[i % CONSOLES.len()],
            GENRES[i % GENRES.len()],
            i % 37,
            1990 + i % 30,
            (i % 97) as f64 * 0.13,
            (i % 41) as f64 * 0.05,
            (i % 23) as f64 * 0.04,
        ));
    }

    c.bench_function("csv_load_10000", |b| {
        b.iter(|| Dataset::from_csv_str(black_box(&csv)).unwrap().len());
    });
}

criterion_group!(
    benches,
    bench_filter,
    bench_aggregate_all,
    bench_render,
    bench_csv_load,
);

criterion_main!(benches);
