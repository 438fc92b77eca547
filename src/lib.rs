//! Westward Client Library
//!
//! Real-time sync core of a 2D multiplayer game client: one local avatar, a
//! patrolling enemy population and remote peers mirrored over a relay.
//!
//! # Features
//!
//! - `metrics_extended` - Tick-time percentiles and periodic summary logging (enabled by default)
//! - `corrected_patrol` - Patrol draw 4 walks enemies up instead of repeating the down draw

pub mod config;
pub mod game;
pub mod metrics;
pub mod net;
pub mod util;
