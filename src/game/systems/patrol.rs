//! Enemy population and patrol gait
//!
//! Enemies are placed once at scene start, walk in a random axis-aligned
//! direction for a short burst every patrol cycle, halt when the patrol stop
//! fires, and are relocated when struck by the avatar's weapon mid-attack.

use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::game::constants::patrol::SPEED;
use crate::game::spawn::{find_valid_location_bounded, PlacementError};
use crate::game::state::{EnemyEntity, EnemyId, SessionState, Species};
use crate::util::vec2::Vec2;

/// Enemies struck during one tick (rarely more than a couple)
pub type HitList = SmallVec<[EnemyId; 4]>;

/// Outcome of one tick's weapon contact
#[derive(Debug, Default)]
pub struct WeaponHits {
    /// Struck and moved to a fresh location
    pub relocated: HitList,
    /// Struck but left in place because placement was exhausted
    pub stranded: HitList,
}

impl WeaponHits {
    pub fn is_empty(&self) -> bool {
        self.relocated.is_empty() && self.stranded.is_empty()
    }
}

/// Create `count` enemies, each placed clear of the ones before it.
///
/// Stops early if placement is exhausted; returns how many were created.
pub fn spawn_population<R: Rng + ?Sized>(
    state: &mut SessionState,
    count: usize,
    max_attempts: u32,
    rng: &mut R,
) -> usize {
    for _ in 0..count {
        let occupied = state.enemy_bodies();
        let position = match find_valid_location_bounded(state.bounds, &occupied, max_attempts, rng) {
            Ok(position) => position,
            Err(PlacementError::Exhausted { attempts }) => {
                warn!(
                    "Enemy placement exhausted after {} attempts, population stops at {}",
                    attempts,
                    state.enemies.len()
                );
                break;
            }
        };

        let id = state.enemies.len();
        let species = Species::random(rng);
        debug!("Spawned {} #{} at ({}, {})", species.name(), id, position.x, position.y);
        state.enemies.push(EnemyEntity::new(id, species, position));
    }

    state.enemies.len()
}

/// Velocity for a patrol draw in `1..=4`
pub fn patrol_velocity(draw: u32) -> Vec2 {
    match draw {
        1 => Vec2::RIGHT * SPEED,
        2 => Vec2::LEFT * SPEED,
        3 => Vec2::DOWN * SPEED,
        #[cfg(not(feature = "corrected_patrol"))]
        4 => Vec2::DOWN * SPEED,
        #[cfg(feature = "corrected_patrol")]
        4 => Vec2::UP * SPEED,
        _ => Vec2::RIGHT * SPEED,
    }
}

/// Patrol cycle: give every enemy a fresh random heading
pub fn start_cycle<R: Rng + ?Sized>(state: &mut SessionState, rng: &mut R) {
    for enemy in &mut state.enemies {
        enemy.velocity = patrol_velocity(rng.gen_range(1..=4));
    }
}

/// Patrol stop: halt every enemy
pub fn stop(state: &mut SessionState) {
    for enemy in &mut state.enemies {
        enemy.velocity = Vec2::ZERO;
    }
}

/// Relocate every enemy the weapon touches while the avatar is attacking.
///
/// Non-attacking contact has no effect here (the body collider still blocks).
/// An enemy whose relocation cannot be placed stays where it is.
pub fn resolve_weapon_hits<R: Rng + ?Sized>(
    state: &mut SessionState,
    max_attempts: u32,
    rng: &mut R,
) -> WeaponHits {
    let mut outcome = WeaponHits::default();

    let weapon = match state.local.as_ref() {
        Some(local) if local.is_attacking => local.weapon_hitbox(),
        _ => return outcome,
    };

    let hits: HitList = state
        .enemies
        .iter()
        .filter(|enemy| enemy.body().intersects(&weapon))
        .map(|enemy| enemy.id)
        .collect();

    for id in hits {
        let occupied = state.enemy_bodies();
        match find_valid_location_bounded(state.bounds, &occupied, max_attempts, rng) {
            Ok(position) => {
                if let Some(enemy) = state.enemies.get_mut(id) {
                    debug!(
                        "Enemy #{} struck, relocating to ({}, {})",
                        id, position.x, position.y
                    );
                    enemy.position = position;
                    outcome.relocated.push(id);
                }
            }
            Err(e) => {
                warn!("Enemy #{} not relocated: {}", id, e);
                outcome.stranded.push(id);
            }
        }
    }

    outcome
}
