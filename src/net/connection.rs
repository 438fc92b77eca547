use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::game::state::PeerId;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket open, session id not yet assigned
    Connecting,
    /// Session id assigned, frames flowing
    Connected,
    /// Reader or writer stopped
    Disconnected,
}

/// Bookkeeping for the relay connection, shared by the reader and writer tasks
#[derive(Debug)]
pub struct Connection {
    pub session_id: Option<PeerId>,
    pub remote_addr: SocketAddr,
    pub state: ConnectionState,
    pub created_at: Instant,
    pub last_activity: Instant,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub frames_sent: u64,
    pub frames_received: u64,
    pub frames_dropped: u64,
}

impl Connection {
    pub fn new(remote_addr: SocketAddr) -> Self {
        let now = Instant::now();
        Self {
            session_id: None,
            remote_addr,
            state: ConnectionState::Connecting,
            created_at: now,
            last_activity: now,
            bytes_sent: 0,
            bytes_received: 0,
            frames_sent: 0,
            frames_received: 0,
            frames_dropped: 0,
        }
    }

    /// Record the session id from the handshake
    pub fn establish(&mut self, session_id: PeerId) {
        self.session_id = Some(session_id);
        self.state = ConnectionState::Connected;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn record_sent(&mut self, bytes: usize) {
        self.bytes_sent += bytes as u64;
        self.frames_sent += 1;
    }

    pub fn record_received(&mut self, bytes: usize) {
        self.bytes_received += bytes as u64;
        self.frames_received += 1;
        self.touch();
    }

    /// A frame arrived but could not be decoded
    pub fn record_dropped(&mut self) {
        self.frames_dropped += 1;
        self.touch();
    }

    pub fn idle_time(&self) -> Duration {
        self.last_activity.elapsed()
    }

    pub fn uptime(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn mark_disconnected(&mut self) {
        self.state = ConnectionState::Disconnected;
    }
}
