//! Outbound delta detection
//!
//! The avatar's (x, y, flip) triple is compared against what was observed on
//! the previous tick. A `playerMovement` is produced only when something
//! changed, so an idle avatar costs no bandwidth.
//!
//! Comparison is exact: any change at all, however small, is sent.

use crate::game::state::LocalEntity;
use crate::net::protocol::{OutboundMessage, PlayerState};

/// Position and flip observed at the end of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSnapshot {
    pub x: f32,
    pub y: f32,
    pub flip_x: bool,
}

impl MotionSnapshot {
    pub fn of(local: &LocalEntity) -> Self {
        Self {
            x: local.position.x,
            y: local.position.y,
            flip_x: local.flip_x,
        }
    }
}

/// Compare the avatar against its previous snapshot and record the new one.
///
/// Returns the movement message to send, or `None` when nothing changed or
/// when there is no previous snapshot yet (the first tick after creation).
pub fn detect_motion(local: &mut LocalEntity) -> Option<OutboundMessage> {
    let current = MotionSnapshot::of(local);
    let previous = local.previous.replace(current);

    match previous {
        Some(previous) if previous != current => Some(OutboundMessage::PlayerMovement(
            PlayerState::new(current.x, current.y, current.flip_x),
        )),
        _ => None,
    }
}
