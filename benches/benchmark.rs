#[macro_use]
extern crate criterion;
extern crate flex_btree;

use criterion::{BenchmarkId, Criterion};
use flex_btree::BTree;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::collections::BTreeSet;

fn shuffled(num: u64) -> Vec<u64> {
    let mut values: Vec<u64> = (0..num).collect();
    values.shuffle(&mut Pcg64::seed_from_u64(17));
    values
}

pub fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    let nums: Vec<u64> = vec![1_000, 10_000, 100_000];
    for num in nums {
        let values = shuffled(num);
        for &factor in &[2, 6, 16] {
            group.bench_with_input(
                BenchmarkId::new(format!("BTree factor={}", factor), num),
                &values,
                |b, values| {
                    b.iter(|| {
                        let mut tree = BTree::with_factor(factor).unwrap();
                        for &value in values {
                            tree.insert(value);
                        }
                        assert_eq!(tree.len(), values.len());
                    })
                },
            );
        }

        group.bench_with_input(
            BenchmarkId::new("std BTreeSet", num),
            &values,
            |b, values| {
                b.iter(|| {
                    let mut set = BTreeSet::new();
                    for &value in values {
                        set.insert(value);
                    }
                    assert_eq!(set.len(), values.len());
                })
            },
        );
    }
}

pub fn lookup_and_iter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    let num = 100_000;
    let values = shuffled(num);
    for &factor in &[2, 6, 16] {
        let mut tree = BTree::with_factor(factor).unwrap();
        tree.extend(values.iter().copied());

        group.bench_with_input(BenchmarkId::new("lookup", factor), &values, |b, values| {
            b.iter(|| values.iter().filter(|value| tree.contains(value)).count())
        });
        group.bench_with_input(BenchmarkId::new("iter", factor), &tree, |b, tree| {
            b.iter(|| tree.iter().fold(0u64, |sum, v| sum.wrapping_add(*v)))
        });
    }
}

criterion_group!(benches, insert_benchmark, lookup_and_iter_benchmark);
criterion_main!(benches);
