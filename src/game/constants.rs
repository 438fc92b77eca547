/// Tick timing for the local simulation
pub mod physics {
    /// Client tick rate in Hz
    pub const TICK_RATE: u32 = 60;
    /// Delta time per tick in seconds
    pub const DT: f32 = 1.0 / 60.0;
}

/// Avatar movement
pub mod movement {
    /// Per-axis speed while a direction is held (pixels/second)
    pub const SPEED: f32 = 80.0;
}

/// Collision boxes, all centered on the owning entity
pub mod bodies {
    use crate::util::vec2::Vec2;

    /// Avatar body size
    pub const PLAYER_SIZE: f32 = 16.0;
    /// Enemy body size
    pub const ENEMY_SIZE: f32 = 32.0;
    /// Weapon hitbox size
    pub const WEAPON_SIZE: f32 = 8.0;
    /// Weapon offset from the avatar center
    pub const WEAPON_OFFSET: Vec2 = Vec2 { x: 10.0, y: 0.0 };
}

/// Enemy population and patrol gait
pub mod patrol {
    /// Enemies created at scene start
    pub const ENEMY_COUNT: usize = 20;
    /// Patrol speed (pixels/second)
    pub const SPEED: f32 = 50.0;
    /// Time between patrol cycles (milliseconds)
    pub const CYCLE_INTERVAL_MS: u64 = 3000;
    /// Delay from a patrol cycle to the stop that follows it (milliseconds)
    pub const STOP_DELAY_MS: u64 = 500;
}

/// Spawn placement
pub mod spawn {
    /// Maximum samples drawn before placement gives up
    pub const MAX_ATTEMPTS: u32 = 10_000;
}

/// Default map size in pixels
pub mod map {
    pub const WIDTH: u32 = 640;
    pub const HEIGHT: u32 = 480;
}

/// Joystick quantization
pub mod joystick {
    /// Offsets shorter than this report no direction
    pub const FORCE_MIN: f32 = 8.0;
}

pub mod net {
    /// Maximum framed message size
    pub const MAX_MESSAGE_SIZE: usize = 65536;
    /// Default relay address
    pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8081";
    /// Wait for the session assignment before giving up
    pub const HANDSHAKE_TIMEOUT_MS: u64 = 5000;
}

/// Periodic summary logging
pub mod reporting {
    /// Seconds of ticks between summary lines
    pub const SUMMARY_INTERVAL_SECS: u64 = 30;
}
