use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mainstay_sdk::{daily_windows, Table};
use serde_json::{json, Value};
use time::macros::date;

/// A messages-like listing where later rows introduce new columns
fn listing(rows: usize) -> Value {
    let results: Vec<Value> = (0..rows)
        .map(|i| {
            let mut row = json!({
                "id": i,
                "body": format!("Message body number {}", i),
                "created": "2024-08-26T12:00:00Z",
                "sender": if i % 2 == 0 { "bot" } else { "contact" },
                "contact": {"admithub_id": format!("ah{:08}", i), "crm_id": null},
            });
            if i % 7 == 0 {
                row["campaign"] = json!(format!("cmp{}", i % 13));
            }
            if i % 11 == 0 {
                row["tags"] = json!(["welcome", "fafsa"]);
            }
            row
        })
        .collect();
    json!({"count": rows, "next": null, "previous": null, "results": results})
}

fn bench_from_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_from_value");

    for rows in [10, 100, 1_000] {
        let value = listing(rows);
        let _ = group.throughput(Throughput::Elements(rows as u64));
        let _ = group.bench_with_input(BenchmarkId::from_parameter(rows), &value, |b, value| {
            b.iter(|| Table::from_value(black_box(value), "results"))
        });
    }

    group.finish();
}

fn bench_write_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_write_csv");

    for rows in [100, 1_000] {
        let table = Table::from_value(&listing(rows), "results").unwrap();
        let _ = group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| {
                let mut out = Vec::with_capacity(rows * 128);
                table.write_csv(&mut out).unwrap();
                out
            })
        });
    }

    group.finish();
}

fn bench_daily_windows(c: &mut Criterion) {
    let _ = c.bench_function("daily_windows_one_year", |b| {
        b.iter(|| daily_windows(black_box(date!(2024 - 01 - 01)), black_box(date!(2025 - 01 - 01))))
    });
}

criterion_group!(benches, bench_from_value, bench_write_csv, bench_daily_windows);
criterion_main!(benches);
