pub mod motion;
pub mod patrol;
pub mod physics;
