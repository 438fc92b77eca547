//! Wandering input source for the headless client
//!
//! Stands in for a keyboard: holds a random heading (or rests) for a random
//! number of ticks, and taps attack now and then.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::input::{Directions, InputFrame, InputSource};

/// Ticks a decision is held for
const DECISION_TICKS: std::ops::RangeInclusive<u32> = 30..=120;
/// Chance per decision of resting instead of walking
const REST_CHANCE: f64 = 0.25;
/// Chance per tick of pressing attack
const ATTACK_CHANCE: f64 = 0.02;

/// Current wandering behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderMode {
    Rest,
    Walk(Directions),
}

#[derive(Debug)]
pub struct WanderInput {
    mode: WanderMode,
    ticks_left: u32,
    attack_held: bool,
    rng: StdRng,
}

impl WanderInput {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            mode: WanderMode::Rest,
            ticks_left: 0,
            attack_held: false,
            rng,
        }
    }

    fn decide(&mut self) {
        self.ticks_left = self.rng.gen_range(DECISION_TICKS);
        self.mode = if self.rng.gen_bool(REST_CHANCE) {
            WanderMode::Rest
        } else {
            WanderMode::Walk(self.random_heading())
        };
    }

    /// One of the eight compass headings
    fn random_heading(&mut self) -> Directions {
        let horizontal = self.rng.gen_range(-1i8..=1);
        let vertical = if horizontal == 0 {
            if self.rng.gen_bool(0.5) {
                -1
            } else {
                1
            }
        } else {
            self.rng.gen_range(-1i8..=1)
        };

        Directions {
            left: horizontal < 0,
            right: horizontal > 0,
            up: vertical < 0,
            down: vertical > 0,
        }
    }
}

impl Default for WanderInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for WanderInput {
    fn poll(&mut self) -> InputFrame {
        if self.ticks_left == 0 {
            self.decide();
        }
        self.ticks_left -= 1;

        // Release for a tick after each press so every attack is a fresh edge
        self.attack_held = !self.attack_held && self.rng.gen_bool(ATTACK_CHANCE);

        let arrows = match self.mode {
            WanderMode::Rest => Directions::NONE,
            WanderMode::Walk(dirs) => dirs,
        };

        InputFrame {
            arrows,
            attack: self.attack_held,
            ..InputFrame::default()
        }
    }
}
