pub mod constants;
pub mod input;
pub mod spawn;
pub mod state;
pub mod systems;
pub mod timers;
pub mod wander;
