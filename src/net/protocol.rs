use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::game::state::PeerId;
use crate::util::vec2::Vec2;

/// Position and facing of one avatar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "flipX", default)]
    pub flip_x: bool,
}

impl PlayerState {
    pub fn new(x: f32, y: f32, flip_x: bool) -> Self {
        Self { x, y, flip_x }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A peer's state tagged with its identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerState {
    #[serde(rename = "playerId")]
    pub player_id: PeerId,
    pub x: f32,
    pub y: f32,
    #[serde(rename = "flipX", default)]
    pub flip_x: bool,
}

impl PeerState {
    pub fn new(player_id: impl Into<PeerId>, x: f32, y: f32, flip_x: bool) -> Self {
        Self {
            player_id: player_id.into(),
            x,
            y,
            flip_x,
        }
    }

    pub fn state(&self) -> PlayerState {
        PlayerState::new(self.x, self.y, self.flip_x)
    }
}

/// Messages from the relay to this client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum InboundMessage {
    /// Every connected player, including this session, sent once on connect
    #[serde(rename = "currentPlayers")]
    CurrentPlayers(BTreeMap<PeerId, PlayerState>),
    /// Another player connected
    #[serde(rename = "newPlayer")]
    NewPlayer(PeerState),
    /// Another player disconnected; the relay sends the bare id
    #[serde(rename = "disconnect")]
    Disconnect(#[serde(deserialize_with = "departed_peer")] PeerId),
    /// Another player moved or turned
    #[serde(rename = "playerMoved")]
    PlayerMoved(PeerState),
}

impl InboundMessage {
    /// Wire event name, for logs
    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::CurrentPlayers(_) => "currentPlayers",
            InboundMessage::NewPlayer(_) => "newPlayer",
            InboundMessage::Disconnect(_) => "disconnect",
            InboundMessage::PlayerMoved(_) => "playerMoved",
        }
    }
}

/// Accept `"id"` as well as `{"playerId": "id"}`
fn departed_peer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PeerId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Departed {
        Bare(PeerId),
        Tagged {
            #[serde(rename = "playerId")]
            player_id: PeerId,
        },
    }

    Ok(match Departed::deserialize(deserializer)? {
        Departed::Bare(id) => id,
        Departed::Tagged { player_id } => player_id,
    })
}

/// Messages from this client to the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutboundMessage {
    /// The local avatar moved or turned
    #[serde(rename = "playerMovement")]
    PlayerMovement(PlayerState),
}

/// Transport-level greeting carrying this connection's session id.
///
/// Always the first frame on a connection; consumed by the transport before
/// any [`InboundMessage`] is handed to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum Handshake {
    #[serde(rename = "session")]
    Session { id: PeerId },
}

/// Encode a message as a JSON envelope
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(message).map_err(|e| EncodeError(e.to_string()))
}

/// Decode a JSON envelope
pub fn decode<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(data).map_err(|e| DecodeError(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
#[error("Encode error: {0}")]
pub struct EncodeError(String);

#[derive(Debug, thiserror::Error)]
#[error("Decode error: {0}")]
pub struct DecodeError(String);
