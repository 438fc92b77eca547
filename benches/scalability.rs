//! Scalability benchmarks for the westward client core
//!
//! Placement cost grows with how crowded the map is; inbound apply cost grows
//! with the number of remote peers.
//!
//! Run with: cargo bench --bench scalability

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use westward_client::config::ClientConfig;
use westward_client::game::constants::physics::DT;
use westward_client::game::constants::spawn::MAX_ATTEMPTS;
use westward_client::game::input::{InputFrame, InputSource};
use westward_client::game::spawn::find_valid_location;
use westward_client::game::state::{LocalEntity, MapBounds, PeerId, SessionState};
use westward_client::game::systems::{patrol, physics};
use westward_client::metrics::ClientMetrics;
use westward_client::net::game_session::{GameSession, Tickable};
use westward_client::net::protocol::{InboundMessage, OutboundMessage, PeerState};
use westward_client::net::sync::apply_inbound;
use westward_client::util::vec2::Vec2;

/// Session state with `count` enemies already placed
fn create_state_with_enemies(count: usize, rng: &mut StdRng) -> SessionState {
    let mut state = SessionState::new(PeerId::new("bench"), MapBounds::new(640, 480));
    patrol::spawn_population(&mut state, count, MAX_ATTEMPTS, rng);
    state
}

/// Benchmark one placement against maps of growing density
fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    group.sample_size(50);

    for count in [0, 20, 50, 100] {
        let mut rng = StdRng::seed_from_u64(7);
        let state = create_state_with_enemies(count, &mut rng);
        let occupied = state.enemy_bodies();

        group.bench_with_input(BenchmarkId::new("find_valid_location", count), &count, |b, _| {
            b.iter(|| black_box(find_valid_location(state.bounds, &occupied, &mut rng)))
        });
    }
    group.finish();
}

/// Benchmark populating a fresh scene
fn bench_population(c: &mut Criterion) {
    let mut group = c.benchmark_group("population");
    group.sample_size(30);

    for count in [20, 50, 100] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("spawn", count), &count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(11);
            b.iter(|| black_box(create_state_with_enemies(count, &mut rng)))
        });
    }
    group.finish();
}

/// Benchmark applying peer moves across roster sizes
fn bench_roster_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("roster_apply");
    group.sample_size(50);

    for count in [10, 100, 1000] {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SessionState::new(PeerId::new("bench"), MapBounds::new(640, 480));
        let ids: Vec<String> = (0..count).map(|_| Uuid::new_v4().to_string()).collect();
        for id in &ids {
            let join = InboundMessage::NewPlayer(PeerState::new(id.as_str(), 0.0, 0.0, false));
            apply_inbound(&mut state, join, &mut rng);
        }

        let moves: Vec<InboundMessage> = ids
            .iter()
            .map(|id| {
                InboundMessage::PlayerMoved(PeerState::new(
                    id.as_str(),
                    rng.gen_range(0.0..640.0),
                    rng.gen_range(0.0..480.0),
                    rng.gen_bool(0.5),
                ))
            })
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("player_moved", count), &count, |b, _| {
            b.iter(|| {
                for message in &moves {
                    apply_inbound(&mut state, message.clone(), &mut rng);
                }
            })
        });
    }
    group.finish();
}

/// Benchmark enemy and avatar integration
fn bench_physics(c: &mut Criterion) {
    let mut group = c.benchmark_group("physics");
    group.sample_size(50);

    for count in [20, 100] {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = create_state_with_enemies(count, &mut rng);
        let mut local = LocalEntity::new(Vec2::new(320.0, 240.0), false);
        local.velocity = Vec2::new(80.0, 80.0);
        state.local = Some(local);
        patrol::start_cycle(&mut state, &mut rng);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("update", count), &count, |b, _| {
            b.iter(|| physics::update(&mut state, black_box(DT)))
        });
    }
    group.finish();
}

struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self) -> InputFrame {
        InputFrame::default()
    }
}

/// Benchmark a full session tick with the default population
fn bench_full_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_tick");
    group.sample_size(30);

    let config = ClientConfig::default();
    let mut session = GameSession::with_rng(
        PeerId::new("bench"),
        &config,
        IdleInput,
        Vec::<OutboundMessage>::new(),
        Arc::new(ClientMetrics::new()),
        StdRng::seed_from_u64(9),
    );
    let tick = Duration::from_secs_f32(DT);

    group.bench_function("complete", |b| b.iter(|| session.on_tick(black_box(tick))));
    group.finish();
}

criterion_group!(
    benches,
    bench_placement,
    bench_population,
    bench_roster_apply,
    bench_physics,
    bench_full_tick,
);

criterion_main!(benches);
