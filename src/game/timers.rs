//! Timer tasks for the single-threaded session loop
//!
//! Timers never run on their own thread: the loop advances the queue by the
//! tick's elapsed time and handles whatever became due, in due order, on the
//! same thread as ticks and inbound messages.

use smallvec::SmallVec;
use std::time::Duration;

/// Events produced by timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Reassign enemy velocities
    PatrolCycle,
    /// Halt enemies after a patrol burst
    PatrolStop,
}

#[derive(Debug, Clone)]
struct Timer {
    due: Duration,
    /// Insertion order, breaks ties between timers due at the same instant
    seq: u64,
    event: TimerEvent,
    repeat: Option<Duration>,
}

/// A timer that came due, stamped with the instant it was due at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub event: TimerEvent,
    pub due: Duration,
}

/// Due timers from one advance (usually zero or one)
pub type FiredEvents = SmallVec<[FiredTimer; 4]>;

/// Virtual-clock timer queue
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the queue was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `event` every `interval`, first after one full interval
    pub fn every(&mut self, interval: Duration, event: TimerEvent) {
        self.schedule(self.now + interval, event, Some(interval));
    }

    /// Fire `event` once, `delay` after `origin`.
    ///
    /// `origin` is usually the due instant of the timer being handled, which
    /// may lie behind the clock by up to one tick.
    pub fn after(&mut self, origin: Duration, delay: Duration, event: TimerEvent) {
        self.schedule(origin + delay, event, None);
    }

    fn schedule(&mut self, due: Duration, event: TimerEvent, repeat: Option<Duration>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            due,
            seq,
            event,
            repeat,
        });
    }

    /// Move the clock forward and return every event that came due, earliest first.
    ///
    /// A repeating timer that is overdue by several intervals fires once per
    /// interval.
    pub fn advance(&mut self, elapsed: Duration) -> FiredEvents {
        self.now += elapsed;
        let mut fired = FiredEvents::new();

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= self.now)
                .min_by_key(|(_, t)| (t.due, t.seq))
                .map(|(i, _)| i);

            let Some(index) = next else { break };

            let timer = self.timers.swap_remove(index);
            fired.push(FiredTimer {
                event: timer.event,
                due: timer.due,
            });

            if let Some(interval) = timer.repeat {
                if interval.is_zero() {
                    continue;
                }
                self.schedule(timer.due + interval, timer.event, Some(interval));
            }
        }

        fired
    }
}
