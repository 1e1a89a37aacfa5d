//! Search benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full single-tree search with varying iteration counts
//! - Information-set search across determinization counts
//! - Rollout policies and the evaluation functions in isolation
//! - Transposition hashing and table operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use game_core::{PlayerId, RulesEngine};
use games_duel::{fixtures, DuelRules};
use mcts::{
    compute_hash, evaluate, run_ismcts, run_mcts, EvalWeights, GreedyPolicy, IsmctsConfig,
    MctsConfig, RandomPolicy, TranspositionTable,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn bench_mcts_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_iterations");
    let rules = DuelRules;
    let snapshot = fixtures::midgame();

    for iterations in [50, 100, 200, 400, 800] {
        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::default()
                    .with_iterations(iterations)
                    .with_determinize(false);
                b.iter(|| {
                    let mut policy = RandomPolicy;
                    let mut rng = ChaCha20Rng::seed_from_u64(42);
                    let result = run_mcts(
                        &rules,
                        &snapshot,
                        PlayerId::ONE,
                        &mut policy,
                        config.clone(),
                        EvalWeights::default(),
                        &mut rng,
                    )
                    .unwrap();
                    black_box(result.action)
                });
            },
        );
    }
    group.finish();
}

fn bench_ismcts_determinizations(c: &mut Criterion) {
    let mut group = c.benchmark_group("ismcts_determinizations");
    let rules = DuelRules;
    let snapshot = fixtures::midgame();

    for worlds in [2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(worlds), &worlds, |b, &worlds| {
            let config = IsmctsConfig::default()
                .with_determinizations(worlds)
                .with_iterations(400);
            b.iter(|| {
                let mut policy = GreedyPolicy::default();
                let mut rng = ChaCha20Rng::seed_from_u64(42);
                let result = run_ismcts(
                    &rules,
                    &snapshot,
                    PlayerId::ONE,
                    &mut policy,
                    config.clone(),
                    EvalWeights::default(),
                    &mut rng,
                )
                .unwrap();
                black_box(result.action)
            });
        });
    }
    group.finish();
}

fn bench_rollout_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollout_policies");
    let rules = DuelRules;
    let snapshot = fixtures::midgame();
    let config = MctsConfig::default()
        .with_iterations(200)
        .with_determinize(false);

    group.bench_function("random", |b| {
        b.iter(|| {
            let mut policy = RandomPolicy;
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            run_mcts(
                &rules,
                &snapshot,
                PlayerId::ONE,
                &mut policy,
                config.clone(),
                EvalWeights::default(),
                &mut rng,
            )
            .unwrap()
        });
    });

    group.bench_function("greedy", |b| {
        b.iter(|| {
            let mut policy = GreedyPolicy::default();
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            run_mcts(
                &rules,
                &snapshot,
                PlayerId::ONE,
                &mut policy,
                config.clone(),
                EvalWeights::default(),
                &mut rng,
            )
            .unwrap()
        });
    });
    group.finish();
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    let rules = DuelRules;
    let snapshot = fixtures::midgame();
    let weights = EvalWeights::default();

    group.bench_function("evaluate", |b| {
        b.iter(|| black_box(evaluate(&snapshot, PlayerId::ONE, &weights)));
    });

    group.bench_function("legal_actions", |b| {
        b.iter(|| black_box(rules.legal_actions(&snapshot, PlayerId::ONE)));
    });

    group.bench_function("compute_hash", |b| {
        b.iter(|| black_box(compute_hash(&snapshot, PlayerId::ONE)));
    });

    group.bench_function("table_store_lookup", |b| {
        let mut table = TranspositionTable::default();
        let hash = compute_hash(&snapshot, PlayerId::ONE);
        b.iter(|| {
            table.store(hash.clone(), 10, 6.0, 2);
            black_box(table.lookup(&hash))
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_iterations,
    bench_ismcts_determinizations,
    bench_rollout_policies,
    bench_primitives
);
criterion_main!(benches);
