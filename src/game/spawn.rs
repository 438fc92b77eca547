//! Spawn placement
//!
//! Finds free coordinates inside the map by rejection sampling against the
//! bounding boxes of entities that are already placed.

use rand::Rng;

use crate::game::constants::spawn::MAX_ATTEMPTS;
use crate::game::state::MapBounds;
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("no free location found after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Find a free location with the default attempt cap
pub fn find_valid_location<R: Rng + ?Sized>(
    bounds: MapBounds,
    occupied: &[Rect],
    rng: &mut R,
) -> Result<Vec2, PlacementError> {
    find_valid_location_bounded(bounds, occupied, MAX_ATTEMPTS, rng)
}

/// Sample integer coordinates uniformly in `[0, width] × [0, height]` and
/// return the first one not contained in any occupied box.
///
/// Gives up after `max_attempts` samples so a saturated map cannot stall the
/// tick loop.
pub fn find_valid_location_bounded<R: Rng + ?Sized>(
    bounds: MapBounds,
    occupied: &[Rect],
    max_attempts: u32,
    rng: &mut R,
) -> Result<Vec2, PlacementError> {
    for _ in 0..max_attempts {
        let candidate = Vec2::new(
            rng.gen_range(0..=bounds.width) as f32,
            rng.gen_range(0..=bounds.height) as f32,
        );

        if !occupied.iter().any(|region| region.contains(candidate)) {
            return Ok(candidate);
        }
    }

    Err(PlacementError::Exhausted {
        attempts: max_attempts,
    })
}
