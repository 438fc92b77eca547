pub mod connection;
pub mod delta;
pub mod framing;
pub mod game_session;
pub mod inbox;
pub mod protocol;
pub mod sync;
pub mod transport;
