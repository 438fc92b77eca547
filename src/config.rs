use std::str::FromStr;
use std::time::Duration;

use crate::game::constants::{map, net, patrol, physics, spawn};
use crate::game::state::MapBounds;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay server address (host:port)
    pub server_addr: String,
    /// Map width in pixels
    pub map_width: u32,
    /// Map height in pixels
    pub map_height: u32,
    /// Ticks per second
    pub tick_rate: u32,
    /// Enemies placed at scene start
    pub enemy_count: usize,
    /// Placement samples before giving up on one location
    pub spawn_max_attempts: u32,
    /// How long to wait for the relay to assign a session id
    pub handshake_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: net::DEFAULT_SERVER_ADDR.to_string(),
            map_width: map::WIDTH,
            map_height: map::HEIGHT,
            tick_rate: physics::TICK_RATE,
            enemy_count: patrol::ENEMY_COUNT,
            spawn_max_attempts: spawn::MAX_ATTEMPTS,
            handshake_timeout: Duration::from_millis(net::HANDSHAKE_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load config from an arbitrary key lookup, falling back to defaults
    pub fn load_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("SERVER_ADDR") {
            if addr.trim().is_empty() {
                tracing::warn!("SERVER_ADDR is empty, using default");
            } else {
                config.server_addr = addr.trim().to_string();
            }
        }

        if let Some(width) = parse_in_range(&lookup, "MAP_WIDTH", 1..=16384) {
            config.map_width = width;
        }
        if let Some(height) = parse_in_range(&lookup, "MAP_HEIGHT", 1..=16384) {
            config.map_height = height;
        }
        if let Some(rate) = parse_in_range(&lookup, "TICK_RATE", 1..=240) {
            config.tick_rate = rate;
        }
        if let Some(count) = parse_in_range(&lookup, "ENEMY_COUNT", 0..=1000) {
            config.enemy_count = count;
        }
        if let Some(attempts) = parse_in_range(&lookup, "SPAWN_MAX_ATTEMPTS", 1..=1_000_000) {
            config.spawn_max_attempts = attempts;
        }
        if let Some(ms) = parse_in_range::<u64, _>(&lookup, "HANDSHAKE_TIMEOUT_MS", 1..=60_000) {
            config.handshake_timeout = Duration::from_millis(ms);
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.server_addr.is_empty() {
            return Err("server_addr cannot be empty".to_string());
        }
        if self.map_width == 0 || self.map_height == 0 {
            return Err("map dimensions must be at least 1".to_string());
        }
        if self.tick_rate == 0 {
            return Err("tick_rate must be at least 1".to_string());
        }
        if self.spawn_max_attempts == 0 {
            return Err("spawn_max_attempts must be at least 1".to_string());
        }
        if self.handshake_timeout.is_zero() {
            return Err("handshake_timeout cannot be zero".to_string());
        }
        Ok(())
    }

    pub fn bounds(&self) -> MapBounds {
        MapBounds::new(self.map_width, self.map_height)
    }

    /// Wall-clock length of one tick
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}

fn parse_in_range<T, F>(lookup: &F, key: &str, range: std::ops::RangeInclusive<T>) -> Option<T>
where
    T: FromStr + PartialOrd + std::fmt::Debug,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(parsed) if range.contains(&parsed) => Some(parsed),
        Ok(_) => {
            tracing::warn!(
                "{} must be {:?}-{:?}, using default",
                key,
                range.start(),
                range.end()
            );
            None
        }
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}
