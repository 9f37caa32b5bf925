use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bwt_rust::analysis::compression;
use bwt_rust::index::rotation::RotationIndex;
use bwt_rust::index::{build, invert, search, Alphabet, RankTables};
use bwt_rust::util::{dna, naive};

fn bench_build(c: &mut Criterion) {
    let reference = dna::random_dna(10_000, 42);
    let alphabet = Alphabet::dna();

    c.bench_function("build_bwt_10k", |b| {
        b.iter(|| {
            black_box(build(black_box(&reference), &alphabet).unwrap());
        })
    });
}

fn bench_sort_rotations(c: &mut Criterion) {
    let reference = dna::random_dna(10_000, 42);
    let text = Alphabet::dna().encode_terminated(&reference).unwrap();

    c.bench_function("sort_rotations_10k", |b| {
        b.iter(|| {
            black_box(RotationIndex::new(black_box(&text)).sorted_offsets());
        })
    });
}

fn bench_rank_tables(c: &mut Criterion) {
    let reference = dna::random_dna(10_000, 42);
    let result = build(&reference, &Alphabet::dna()).unwrap();

    c.bench_function("rank_tables_10k", |b| {
        b.iter(|| {
            black_box(RankTables::build(black_box(&result.bwt), &result.alphabet).unwrap());
        })
    });
}

fn bench_invert(c: &mut Criterion) {
    let reference = dna::random_dna(10_000, 42);
    let result = build(&reference, &Alphabet::dna()).unwrap();

    c.bench_function("invert_10k", |b| {
        b.iter(|| {
            black_box(invert(black_box(&result)).unwrap());
        })
    });
}

fn bench_backward_search_vs_naive(c: &mut Criterion) {
    let reference = dna::random_dna(100_000, 7);
    let result = build(&reference, &Alphabet::dna()).unwrap();
    let tables = RankTables::build(&result.bwt, &result.alphabet).unwrap();
    let pattern = reference[1_000..1_020].to_vec();

    c.bench_function("backward_search_20bp_100k", |b| {
        b.iter(|| {
            black_box(search(&result, &tables, black_box(&pattern)).unwrap());
        })
    });

    c.bench_function("naive_count_20bp_100k", |b| {
        b.iter(|| {
            black_box(naive::count_occurrences(black_box(&reference), black_box(&pattern)));
        })
    });
}

fn bench_analyze(c: &mut Criterion) {
    let reference = dna::repetitive_dna(10_000, b"ATCGATCG");
    let result = build(&reference, &Alphabet::dna()).unwrap();

    c.bench_function("analyze_10k", |b| {
        b.iter(|| {
            black_box(compression::analyze(black_box(&reference), &result));
        })
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_sort_rotations,
    bench_rank_tables,
    bench_invert,
    bench_backward_search_vs_naive,
    bench_analyze
);
criterion_main!(benches);
