//! Performance benchmarks for the roomforge engine.
//!
//! Measures the per-tick assembly pass at different queue depths and the
//! Glicko-2 settlement of a full room.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use roomforge::prelude::*;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::Receiver;

fn queue_with_groups(group_count: usize) -> (Queue, Receiver<RoomRef>, Vec<GroupRef>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(group_count as u64);
    let clock: ClockRef = Arc::new(ManualClock::new(1_000));
    let (sink, rx) = room_channel(4_096);
    let config = QueueConfig {
        match_ranges: vec![MatchRange {
            max_match_sec: 30,
            mmr_gap_percent: 20,
            can_join_team: true,
            rank_gap: 0,
        }],
        ..QueueConfig::default()
    };
    let factory = Arc::new(StandardFactory::new(clock.clone()));
    let queue = Queue::new("bench", config, sink, factory, clock.clone()).unwrap();

    let groups: Vec<GroupRef> = (0..group_count)
        .map(|i| {
            let count = rng.gen_range(1..=5);
            let players: Vec<PlayerRef> = (0..count)
                .map(|j| {
                    Arc::new(StandardPlayer::new(
                        format!("g{i}-p{j}"),
                        Rating::new(rng.gen_range(1_000.0..2_000.0), 200.0, 0.06),
                    )) as PlayerRef
                })
                .collect();
            let group = StandardGroup::new(format!("g{i}"), players, clock.clone())
                .with_ai_fill_wait(1_000_000);
            group.set_state(GroupState::Queuing);
            group.set_start_match_time_sec(1_000);
            Arc::new(group) as GroupRef
        })
        .collect();

    (queue, rx, groups)
}

fn bench_assembly_pass(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut bench_group = c.benchmark_group("assembly_pass");

    for size in [64usize, 256, 1024] {
        bench_group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || queue_with_groups(size),
                |(queue, rx, groups)| {
                    let leftovers = rt.block_on(async { queue.match_groups(groups) });
                    black_box(leftovers);
                    drop(rx);
                },
                BatchSize::SmallInput,
            )
        });
    }
    bench_group.finish();
}

fn ranked_room() -> RoomRef {
    let clock: ClockRef = Arc::new(ManualClock::new(0));
    let room = StandardRoom::new();
    for t in 0..3 {
        let team = StandardTeam::new();
        team.set_rank(t + 1);
        let players: Vec<PlayerRef> = (0..5)
            .map(|p| {
                let player = StandardPlayer::new(
                    format!("t{t}-p{p}"),
                    Rating::new(1_500.0, 200.0, 0.06),
                );
                player.set_rank(p + 1);
                Arc::new(player) as PlayerRef
            })
            .collect();
        let group = StandardGroup::new(format!("t{t}"), players, clock.clone());
        group.set_state(GroupState::Queuing);
        team.add_group(Arc::new(group));
        room.add_team(Arc::new(team) as TeamRef);
    }
    Arc::new(room)
}

fn bench_settlement(c: &mut Criterion) {
    let settler = Settler::new();
    c.bench_function("settle_full_room", |b| {
        b.iter_batched(
            ranked_room,
            |room| settler.update_ratings(black_box(&room)).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_assembly_pass, bench_settlement);
criterion_main!(benches);
