use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rowjoin::{inner_join, shape_of, DynRow, Value};
use rowjoin_test_utils::{
    a, account, accounts_shape, b, balance, balances_shape, RecordA, RecordABExtra, RecordB,
};

fn derived_inputs(rows: usize, keys: usize) -> (Vec<RecordA>, Vec<RecordB>) {
    let left = (0..rows)
        .map(|i| a((i % keys) as i32, &format!("left-{i}")))
        .collect();
    let right = (0..rows)
        .map(|i| b((i % keys) as i32, &format!("right-{i}")))
        .collect();
    (left, right)
}

fn bench_derived(c: &mut Criterion) {
    let mut group = c.benchmark_group("inner_join_derived");
    // rows per side; keys chosen so each key matches ~4 rows per side
    for rows in [64usize, 512, 4096] {
        let (left, right) = derived_inputs(rows, rows / 4);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |bencher, _| {
            bencher.iter(|| {
                let out = inner_join(
                    black_box(&left),
                    |l| l.key,
                    black_box(&right),
                    |r| r.key,
                    &shape_of::<RecordABExtra>(),
                )
                .expect("join");
                black_box(out.len());
            })
        });
    }
    group.finish();
}

fn bench_dynamic(c: &mut Criterion) {
    let accounts = accounts_shape();
    let balances = balances_shape();
    let left: Vec<DynRow> = (0..1024)
        .map(|i| account(&accounts, i, "owner", i % 7 == 0))
        .collect();
    let right: Vec<DynRow> = (0..4096)
        .map(|i| balance(&balances, i % 1024, "EUR", i * 10))
        .collect();
    let output = rowjoin::DynShape::builder("statement")
        .field("account_id", rowjoin::FieldType::I64)
        .field("owner", rowjoin::FieldType::TEXT)
        .field("cents", rowjoin::FieldType::I64)
        .build()
        .expect("statement shape");
    let account_id = |row: &DynRow| match row.get("account_id") {
        Some(Value::I64(id)) => *id,
        _ => -1,
    };

    c.bench_function("inner_join_dynamic_1024x4096", |bencher| {
        bencher.iter(|| {
            let out = inner_join(
                black_box(&left),
                account_id,
                black_box(&right),
                account_id,
                &output,
            )
            .expect("join");
            black_box(out.len());
        })
    });
}

criterion_group!(benches, bench_derived, bench_dynamic);
criterion_main!(benches);
