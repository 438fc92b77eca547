//! TCP transport to the relay server
//!
//! The relay greets every connection with a [`Handshake`] carrying the
//! session id, then streams [`InboundMessage`] frames. A reader task decodes
//! them into the session's inbox; a writer task drains an unbounded channel
//! of [`OutboundMessage`]s, so sending never blocks the game loop.

use parking_lot::{RwLock, RwLockReadGuard};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::game::state::PeerId;
use crate::net::connection::Connection;
use crate::net::framing::{read_frame, read_message, write_frame, FramingError};
use crate::net::inbox::InboxSender;
use crate::net::protocol::{decode, Handshake, InboundMessage, OutboundMessage};

/// Fire-and-forget sink for outbound messages
pub trait Outbox {
    fn send(&mut self, message: OutboundMessage);
}

/// Collects messages in memory, for hosts without a network
impl Outbox for Vec<OutboundMessage> {
    fn send(&mut self, message: OutboundMessage) {
        self.push(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("Handshake failed: {0}")]
    Handshake(#[from] FramingError),
    #[error("No session assigned within {0:?}")]
    HandshakeTimeout(Duration),
}

/// Live connection to the relay
#[derive(Debug)]
pub struct RelayTransport {
    session_id: PeerId,
    connection: Arc<RwLock<Connection>>,
    outbound: mpsc::UnboundedSender<OutboundMessage>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RelayTransport {
    /// Connect, wait for the session id, then start the reader and writer tasks.
    ///
    /// Every inbound message after the handshake is pushed into `inbox`, which
    /// must already exist so nothing can arrive unhandled.
    pub async fn connect(
        addr: &str,
        handshake_timeout: Duration,
        inbox: InboxSender,
    ) -> Result<Self, TransportError> {
        let connect_error = |source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        };

        let stream = TcpStream::connect(addr).await.map_err(connect_error)?;
        let remote_addr = stream.peer_addr().map_err(connect_error)?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not disable Nagle on {}: {}", remote_addr, e);
        }

        let (mut read_half, write_half) = stream.into_split();
        let connection = Arc::new(RwLock::new(Connection::new(remote_addr)));

        let handshake = tokio::time::timeout(
            handshake_timeout,
            read_frame::<_, Handshake>(&mut read_half),
        )
        .await
        .map_err(|_| TransportError::HandshakeTimeout(handshake_timeout))??;
        let Handshake::Session { id: session_id } = handshake;

        connection.write().establish(session_id.clone());
        info!("Connected to relay {} as {}", remote_addr, session_id);

        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(read_half, inbox, connection.clone()));
        let writer = tokio::spawn(write_loop(write_half, outbound_rx, connection.clone()));

        Ok(Self {
            session_id,
            connection,
            outbound,
            reader,
            writer,
        })
    }

    /// Session id the relay assigned to this connection
    pub fn session_id(&self) -> &PeerId {
        &self.session_id
    }

    /// Traffic counters and state
    pub fn connection(&self) -> RwLockReadGuard<'_, Connection> {
        self.connection.read()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.read().is_connected()
    }
}

impl Outbox for RelayTransport {
    fn send(&mut self, message: OutboundMessage) {
        if self.outbound.send(message).is_err() {
            debug!("Writer stopped, outbound message dropped");
        }
    }
}

impl Drop for RelayTransport {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

async fn read_loop(
    mut stream: OwnedReadHalf,
    inbox: InboxSender,
    connection: Arc<RwLock<Connection>>,
) {
    loop {
        let payload = match read_message(&mut stream).await {
            Ok(payload) => payload,
            Err(FramingError::ConnectionClosed) => {
                info!("Relay closed the connection");
                break;
            }
            Err(e) => {
                warn!("Relay read failed: {}", e);
                break;
            }
        };

        let message: InboundMessage = match decode(&payload) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping undecodable frame ({} bytes): {}", payload.len(), e);
                connection.write().record_dropped();
                continue;
            }
        };

        connection.write().record_received(payload.len());
        debug!("Received {}", message.kind());

        if inbox.push(message).is_err() {
            debug!("Inbox gone, stopping reader");
            break;
        }
    }

    let mut conn = connection.write();
    conn.mark_disconnected();
    info!(
        "Relay link down after {:?}: {} frames in, {} out, idle {:?}",
        conn.uptime(),
        conn.frames_received,
        conn.frames_sent,
        conn.idle_time()
    );
}

async fn write_loop(
    mut stream: OwnedWriteHalf,
    mut outbound: mpsc::UnboundedReceiver<OutboundMessage>,
    connection: Arc<RwLock<Connection>>,
) {
    while let Some(message) = outbound.recv().await {
        match write_frame(&mut stream, &message).await {
            Ok(len) => connection.write().record_sent(len),
            Err(e) => {
                warn!("Relay write failed: {}", e);
                break;
            }
        }
    }

    connection.write().mark_disconnected();
}
