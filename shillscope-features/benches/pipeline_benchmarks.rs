//! Criterion benchmarks for feature extraction.
//!
//! Measures a full run across community sizes, sequentially and on a small
//! thread pool, using deterministic synthetic ratings.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package shillscope-features
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use shillscope_core::{InauthenticUsers, RatingEvent, RatingTable};
use shillscope_features::{
    ExtractionOptions, FeatureExtractionPipeline, Parallelism, extract_features,
};

/// Number of users to benchmark.
const COMMUNITY_SIZES: &[u64] = &[100, 1_000, 5_000];

/// Items each synthetic user rates.
const RATINGS_PER_USER: u64 = 20;

/// Catalogue size for the synthetic community.
const CATALOGUE_SIZE: u64 = 500;

/// Build a deterministic table where every user rates a strided slice of
/// the catalogue.
fn synthetic_table(users: u64) -> RatingTable {
    (0..users)
        .flat_map(|user_id| {
            (0..RATINGS_PER_USER).map(move |offset| {
                let item_id = user_id.wrapping_mul(7).wrapping_add(offset.wrapping_mul(13))
                    % CATALOGUE_SIZE;
                let rating = u8::try_from(user_id.wrapping_add(offset) % 5).unwrap_or(0) + 1;
                RatingEvent::new(user_id, item_id, rating)
            })
        })
        .collect()
}

/// Every tenth user is flagged.
fn flagged_users(users: u64) -> InauthenticUsers {
    (0..users).step_by(10).collect()
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_features");
    group.sample_size(20);

    for &users in COMMUNITY_SIZES {
        let table = synthetic_table(users);
        let labels = flagged_users(users);
        group.throughput(Throughput::Elements(users));

        group.bench_with_input(BenchmarkId::new("sequential", users), &table, |b, table| {
            b.iter(|| extract_features(table, &labels));
        });

        let options = ExtractionOptions::default().with_parallelism(Parallelism::Threads(4));
        let Ok(pipeline) = FeatureExtractionPipeline::new(options) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("threads_4", users), &table, |b, table| {
            b.iter(|| pipeline.run(table, &labels));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
