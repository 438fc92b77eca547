//! Game session - owns the world and runs it one tick at a time
//!
//! Everything that touches [`SessionState`] happens on the loop that owns the
//! session: inbound messages are drained from the inbox at the top of each
//! tick, timers fire inside the tick, and outbound deltas go to a
//! fire-and-forget [`Outbox`].

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::game::constants::patrol::{CYCLE_INTERVAL_MS, STOP_DELAY_MS};
use crate::game::input::InputSource;
use crate::game::state::{PeerId, SessionState};
use crate::game::systems::motion::MotionResolver;
use crate::game::systems::{patrol, physics};
use crate::game::timers::{FiredTimer, TimerEvent, TimerQueue};
use crate::metrics::ClientMetrics;
use crate::net::delta::detect_motion;
use crate::net::inbox::Inbox;
use crate::net::protocol::InboundMessage;
use crate::net::sync::apply_inbound;
use crate::net::transport::{Outbox, RelayTransport};

/// Receives one simulation step
pub trait Tickable {
    fn on_tick(&mut self, dt: Duration);
}

/// Receives one inbound message
pub trait MessageSink {
    fn on_message(&mut self, message: InboundMessage);
}

/// One connected client session
pub struct GameSession<I, O> {
    state: SessionState,
    motion: MotionResolver,
    timers: TimerQueue,
    input: I,
    outbox: O,
    rng: StdRng,
    spawn_max_attempts: u32,
    metrics: Arc<ClientMetrics>,
}

impl<I: InputSource, O: Outbox> GameSession<I, O> {
    /// Set up the scene: place the enemy population and start the patrol cycle
    pub fn new(
        session_id: PeerId,
        config: &ClientConfig,
        input: I,
        outbox: O,
        metrics: Arc<ClientMetrics>,
    ) -> Self {
        Self::with_rng(session_id, config, input, outbox, metrics, StdRng::from_entropy())
    }

    /// Same as [`GameSession::new`] with a caller-supplied random source
    pub fn with_rng(
        session_id: PeerId,
        config: &ClientConfig,
        input: I,
        outbox: O,
        metrics: Arc<ClientMetrics>,
        mut rng: StdRng,
    ) -> Self {
        let mut state = SessionState::new(session_id, config.bounds());

        let spawned = patrol::spawn_population(
            &mut state,
            config.enemy_count,
            config.spawn_max_attempts,
            &mut rng,
        );
        if spawned < config.enemy_count {
            ClientMetrics::incr(&metrics.placement_failures, 1);
        }
        ClientMetrics::set(&metrics.enemies, spawned as u64);

        let mut timers = TimerQueue::new();
        timers.every(Duration::from_millis(CYCLE_INTERVAL_MS), TimerEvent::PatrolCycle);

        info!(
            "Session {} ready: {} enemies on {}x{}",
            state.session_id, spawned, state.bounds.width, state.bounds.height
        );

        Self {
            state,
            motion: MotionResolver::new(),
            timers,
            input,
            outbox,
            rng,
            spawn_max_attempts: config.spawn_max_attempts,
            metrics,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    pub fn metrics(&self) -> &Arc<ClientMetrics> {
        &self.metrics
    }

    /// Hand every queued inbound message to the session, oldest first
    pub fn pump(&mut self, inbox: &Inbox) -> usize {
        let messages = inbox.drain();
        let count = messages.len();
        for message in messages {
            self.on_message(message);
        }
        count
    }

    fn handle_timer(&mut self, fired: FiredTimer) {
        match fired.event {
            TimerEvent::PatrolCycle => {
                patrol::start_cycle(&mut self.state, &mut self.rng);
                // Measured from when the cycle was due, not from the end of this tick
                self.timers.after(
                    fired.due,
                    Duration::from_millis(STOP_DELAY_MS),
                    TimerEvent::PatrolStop,
                );
                debug!("Patrol cycle due at {:?}, handled at {:?}", fired.due, self.timers.now());
            }
            TimerEvent::PatrolStop => patrol::stop(&mut self.state),
        }
    }
}

impl<I: InputSource, O: Outbox> Tickable for GameSession<I, O> {
    fn on_tick(&mut self, dt: Duration) {
        let started = Instant::now();

        for fired in self.timers.advance(dt) {
            self.handle_timer(fired);
        }

        let frame = self.input.poll();
        if let Some(local) = self.state.local.as_mut() {
            self.motion.resolve(local, &frame);
        }

        physics::update(&mut self.state, dt.as_secs_f32());

        let hits = patrol::resolve_weapon_hits(&mut self.state, self.spawn_max_attempts, &mut self.rng);
        if !hits.is_empty() {
            ClientMetrics::incr(&self.metrics.relocations, hits.relocated.len() as u64);
            ClientMetrics::incr(&self.metrics.placement_failures, hits.stranded.len() as u64);
        }

        if let Some(local) = self.state.local.as_mut() {
            let had_previous = local.previous.is_some();
            match detect_motion(local) {
                Some(message) => {
                    self.outbox.send(message);
                    ClientMetrics::incr(&self.metrics.messages_sent, 1);
                }
                None if had_previous => ClientMetrics::incr(&self.metrics.deltas_suppressed, 1),
                None => {}
            }
        }

        self.metrics.record_tick_time(started.elapsed());
    }
}

impl<I: InputSource, O: Outbox> MessageSink for GameSession<I, O> {
    fn on_message(&mut self, message: InboundMessage) {
        debug!("Applying {}", message.kind());
        ClientMetrics::incr(&self.metrics.messages_received, 1);

        apply_inbound(&mut self.state, message, &mut self.rng);

        ClientMetrics::set(&self.metrics.remote_peers, self.state.remotes.len() as u64);
    }
}

/// Connect to the relay and build the session around the connection.
///
/// The inbox exists before the transport starts reading, so the initial
/// snapshot the relay sends unprompted is never lost. Connection failure is
/// returned as-is; there is no retry.
pub async fn bootstrap<I: InputSource>(
    config: &ClientConfig,
    input: I,
    metrics: Arc<ClientMetrics>,
) -> anyhow::Result<(GameSession<I, RelayTransport>, Inbox)> {
    let inbox = Inbox::new();
    let transport =
        RelayTransport::connect(&config.server_addr, config.handshake_timeout, inbox.sender())
            .await
            .with_context(|| format!("connecting to relay at {}", config.server_addr))?;

    let session_id = transport.session_id().clone();
    let session = GameSession::new(session_id, config, input, transport, metrics);

    Ok((session, inbox))
}

/// Drive the session at a fixed rate until `limit` ticks have run (or forever).
///
/// Each tick drains the inbox, then advances the world by one fixed step.
/// Returns the number of ticks run.
pub async fn run_game_loop<I: InputSource, O: Outbox>(
    session: &mut GameSession<I, O>,
    inbox: &Inbox,
    tick_duration: Duration,
    limit: Option<u64>,
) -> u64 {
    let mut ticker = interval(tick_duration);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Game loop started at {:.0} Hz", 1.0 / tick_duration.as_secs_f64());

    #[cfg(feature = "metrics_extended")]
    let summary_every = {
        use crate::game::constants::reporting::SUMMARY_INTERVAL_SECS;
        let per_second = (1.0 / tick_duration.as_secs_f64()).round().max(1.0) as u64;
        per_second * SUMMARY_INTERVAL_SECS
    };

    let mut tick_count: u64 = 0;
    while limit.map_or(true, |limit| tick_count < limit) {
        ticker.tick().await;
        tick_count += 1;

        session.pump(inbox);
        session.on_tick(tick_duration);

        #[cfg(feature = "metrics_extended")]
        if tick_count % summary_every == 0 {
            info!("Session: {}", session.metrics().summary());
        }
    }

    tick_count
}
