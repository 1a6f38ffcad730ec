use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::scoring::{coverage, fitness};
use sched_core::{SlotPolicy, SoftWeights, Solution, TimetableData, TimetableInstance};
use std::hint::black_box;

/// 10 slots x 5 days, typical course size, one assistant per weekday.
fn build(students: usize, assistants: usize, seed: u64) -> (TimetableData, Solution) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (slots, days) = (10, 5);
    let inst = TimetableInstance {
        students: (0..slots)
            .map(|_| {
                (0..days)
                    .map(|_| (0..students).map(|_| rng.gen_range(0..3u8)).collect())
                    .collect()
            })
            .collect(),
        assistants: vec![vec![vec![0; assistants]; days]; slots],
        forbidden: vec![vec![0; days]; slots],
        baseline: None,
    };
    let data = TimetableData::from_instance(&inst).expect("bench instance is valid");
    let mut sol = Solution::empty(&data);
    for k in 0..assistants {
        sol.assign(rng.gen_range(0..slots), k % days, k);
    }
    (data, sol)
}

fn bench_fitness(c: &mut Criterion) {
    let (data, sol) = build(120, 5, 7);
    let weights = SoftWeights::default();
    let policy = SlotPolicy::default();

    c.bench_function("fitness/full_120x5", |b| {
        b.iter(|| fitness(black_box(&sol), black_box(&data), &weights, &policy))
    });
    c.bench_function("fitness/coverage_120x5", |b| {
        b.iter(|| coverage(black_box(&sol), black_box(&data)))
    });
}

criterion_group!(benches, bench_fitness);
criterion_main!(benches);
