//! Session state definitions
//!
//! Contains the local avatar, the enemy population and the map bounds, plus
//! the [`SessionState`] that owns them together with the remote roster.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::constants::bodies;
use crate::net::delta::MotionSnapshot;
use crate::net::sync::RemoteRoster;
use crate::util::rect::Rect;
use crate::util::vec2::Vec2;

/// Identifier of a connected peer (the peer's transport session id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Index of an enemy in the population
pub type EnemyId = usize;

/// Map size in pixels; valid positions span `[0, width] × [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapBounds {
    pub width: u32,
    pub height: u32,
}

impl MapBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width as f32).contains(&point.x) && (0.0..=self.height as f32).contains(&point.y)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(Vec2::ZERO, self.max())
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        use crate::game::constants::map;
        Self::new(map::WIDTH, map::HEIGHT)
    }
}

/// Direction the avatar is facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
    Up,
    #[default]
    Down,
}

/// Walk cycle played on the avatar this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animation {
    Left,
    Right,
    Up,
    Down,
    /// Animation stopped on its current frame
    #[default]
    Stopped,
}

/// Cosmetic 24-bit RGB tint applied to remote avatars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tint(u32);

impl Tint {
    pub const MAX: u32 = 0x00FF_FFFF;

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(0..=Self::MAX))
    }

    pub fn rgb(&self) -> u32 {
        self.0
    }
}

/// The single player-controlled avatar
#[derive(Debug, Clone)]
pub struct LocalEntity {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub flip_x: bool,
    pub animation: Animation,
    /// True for exactly one tick per attack press
    pub is_attacking: bool,
    /// State observed at the end of the previous tick, `None` until the first tick
    pub previous: Option<MotionSnapshot>,
}

impl LocalEntity {
    pub fn new(position: Vec2, flip_x: bool) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: if flip_x { Facing::Left } else { Facing::Down },
            flip_x,
            animation: Animation::Stopped,
            is_attacking: false,
            previous: None,
        }
    }

    pub fn body(&self) -> Rect {
        Rect::centered(self.position, bodies::PLAYER_SIZE, bodies::PLAYER_SIZE)
    }

    pub fn weapon_hitbox(&self) -> Rect {
        Rect::centered(
            self.position + bodies::WEAPON_OFFSET,
            bodies::WEAPON_SIZE,
            bodies::WEAPON_SIZE,
        )
    }
}

/// A peer's avatar as seen locally
#[derive(Debug, Clone)]
pub struct RemoteEntity {
    id: PeerId,
    pub position: Vec2,
    pub flip_x: bool,
    tint: Tint,
}

impl RemoteEntity {
    pub fn new(id: PeerId, position: Vec2, flip_x: bool, tint: Tint) -> Self {
        Self {
            id,
            position,
            flip_x,
            tint,
        }
    }

    pub fn id(&self) -> &PeerId {
        &self.id
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }
}

/// Enemy sprite species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Golem,
    Ent,
    Demon,
    Worm,
    Wolf,
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Golem,
        Species::Ent,
        Species::Demon,
        Species::Worm,
        Species::Wolf,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Golem => "golem",
            Species::Ent => "ent",
            Species::Demon => "demon",
            Species::Worm => "worm",
            Species::Wolf => "wolf",
        }
    }
}

/// A roaming hostile
#[derive(Debug, Clone)]
pub struct EnemyEntity {
    pub id: EnemyId,
    pub species: Species,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Blocks the avatar but is never pushed by it
    pub immovable: bool,
    pub collide_world_bounds: bool,
}

impl EnemyEntity {
    pub fn new(id: EnemyId, species: Species, position: Vec2) -> Self {
        Self {
            id,
            species,
            position,
            velocity: Vec2::ZERO,
            immovable: true,
            collide_world_bounds: true,
        }
    }

    pub fn body(&self) -> Rect {
        Rect::centered(self.position, bodies::ENEMY_SIZE, bodies::ENEMY_SIZE)
    }
}

/// Everything the session owns: avatar, peers, enemies and the map
#[derive(Debug)]
pub struct SessionState {
    /// This connection's own identifier
    pub session_id: PeerId,
    pub bounds: MapBounds,
    /// Present once the initial snapshot has named this session
    pub local: Option<LocalEntity>,
    pub remotes: RemoteRoster,
    pub enemies: Vec<EnemyEntity>,
}

impl SessionState {
    pub fn new(session_id: PeerId, bounds: MapBounds) -> Self {
        Self {
            session_id,
            bounds,
            local: None,
            remotes: RemoteRoster::new(),
            enemies: Vec::new(),
        }
    }

    /// Occupied regions used for spawn placement
    pub fn enemy_bodies(&self) -> Vec<Rect> {
        self.enemies.iter().map(EnemyEntity::body).collect()
    }
}
