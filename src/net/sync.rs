//! Inbound state application
//!
//! Keeps the roster of remote avatars in step with relay notifications.
//! References to unknown peers are dropped silently: a move that overtakes
//! its join, or a second leave, is harmless.

use hashbrown::HashMap;
use rand::Rng;
use tracing::debug;

use crate::game::state::{LocalEntity, PeerId, RemoteEntity, SessionState, Tint};
use crate::net::protocol::{InboundMessage, PeerState, PlayerState};

/// Remote avatars keyed by peer id; at most one per id
#[derive(Debug, Default)]
pub struct RemoteRoster {
    entities: HashMap<PeerId, RemoteEntity>,
}

impl RemoteRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &PeerId) -> Option<&RemoteEntity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &PeerId) -> bool {
        self.entities.contains_key(id)
    }

    /// Add a peer with a fresh tint.
    ///
    /// A peer that is already present keeps its tint and only takes the new
    /// position and flip.
    pub fn join<R: Rng + ?Sized>(&mut self, id: PeerId, state: PlayerState, rng: &mut R) {
        if let Some(existing) = self.entities.get_mut(&id) {
            debug!("Peer {} joined twice, refreshing state", id);
            existing.position = state.position();
            existing.flip_x = state.flip_x;
            return;
        }

        let tint = Tint::random(rng);
        debug!("Peer {} joined at ({}, {})", id, state.x, state.y);
        self.entities
            .insert(id.clone(), RemoteEntity::new(id, state.position(), state.flip_x, tint));
    }

    /// Overwrite a peer's position and flip; returns false if the peer is unknown
    pub fn apply_move(&mut self, update: &PeerState) -> bool {
        match self.entities.get_mut(&update.player_id) {
            Some(entity) => {
                entity.position = update.state().position();
                entity.flip_x = update.flip_x;
                true
            }
            None => {
                debug!("Move for unknown peer {} dropped", update.player_id);
                false
            }
        }
    }

    /// Remove a peer; returns false if it was not present
    pub fn leave(&mut self, id: &PeerId) -> bool {
        let removed = self.entities.remove(id).is_some();
        if removed {
            debug!("Peer {} left", id);
        } else {
            debug!("Leave for unknown peer {} ignored", id);
        }
        removed
    }
}

/// Apply one inbound message to the session.
///
/// Only the roster (and, for the initial snapshot, the local avatar) is
/// written. Nothing here blocks or searches for spawn locations.
pub fn apply_inbound<R: Rng + ?Sized>(
    state: &mut SessionState,
    message: InboundMessage,
    rng: &mut R,
) {
    match message {
        InboundMessage::CurrentPlayers(players) => {
            for (id, player) in players {
                if id == state.session_id {
                    let position = state.bounds.clamp(player.position());
                    debug!("Local avatar created at ({}, {})", position.x, position.y);
                    state.local = Some(LocalEntity::new(position, player.flip_x));
                } else {
                    state.remotes.join(id, player, rng);
                }
            }
        }
        InboundMessage::NewPlayer(peer) => {
            let player = peer.state();
            state.remotes.join(peer.player_id, player, rng);
        }
        InboundMessage::Disconnect(id) => {
            state.remotes.leave(&id);
        }
        InboundMessage::PlayerMoved(peer) => {
            state.remotes.apply_move(&peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::MapBounds;
    use crate::util::vec2::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn create_test_state(own_id: &str) -> SessionState {
        SessionState::new(PeerId::new(own_id), MapBounds::new(640, 480))
    }

    #[test]
    fn test_snapshot_naming_self_creates_local_only() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");
        let mut players = BTreeMap::new();
        players.insert(PeerId::new("P1"), PlayerState::new(100.0, 100.0, false));

        apply_inbound(&mut state, InboundMessage::CurrentPlayers(players), &mut rng);

        let local = state.local.as_ref().expect("local avatar");
        assert_eq!(local.position, Vec2::new(100.0, 100.0));
        assert!(!local.flip_x);
        assert!(state.remotes.is_empty());
    }

    #[test]
    fn test_snapshot_outside_map_places_local_on_edge() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");
        let mut players = BTreeMap::new();
        players.insert(PeerId::new("P1"), PlayerState::new(900.0, -40.0, false));

        apply_inbound(&mut state, InboundMessage::CurrentPlayers(players), &mut rng);

        assert_eq!(state.local.unwrap().position, Vec2::new(640.0, 0.0));
    }

    #[test]
    fn test_snapshot_splits_self_and_peers() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");
        let mut players = BTreeMap::new();
        players.insert(PeerId::new("P1"), PlayerState::new(10.0, 20.0, true));
        players.insert(PeerId::new("P2"), PlayerState::new(30.0, 40.0, false));
        players.insert(PeerId::new("P3"), PlayerState::new(50.0, 60.0, true));

        apply_inbound(&mut state, InboundMessage::CurrentPlayers(players), &mut rng);

        assert!(state.local.as_ref().unwrap().flip_x);
        assert_eq!(state.remotes.len(), 2);
        assert!(state.remotes.contains(&PeerId::new("P2")));
        assert!(state.remotes.contains(&PeerId::new("P3")));
        assert!(!state.remotes.contains(&PeerId::new("P1")));
    }

    #[test]
    fn test_second_snapshot_recreates_local() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");
        let mut players = BTreeMap::new();
        players.insert(PeerId::new("P1"), PlayerState::new(10.0, 20.0, false));
        apply_inbound(&mut state, InboundMessage::CurrentPlayers(players.clone()), &mut rng);
        state.local.as_mut().unwrap().is_attacking = true;

        players.insert(PeerId::new("P1"), PlayerState::new(300.0, 200.0, false));
        apply_inbound(&mut state, InboundMessage::CurrentPlayers(players), &mut rng);

        let local = state.local.as_ref().unwrap();
        assert_eq!(local.position, Vec2::new(300.0, 200.0));
        assert!(!local.is_attacking);
        assert!(local.previous.is_none());
    }

    #[test]
    fn test_join_then_leave() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");

        apply_inbound(
            &mut state,
            InboundMessage::NewPlayer(PeerState::new("P2", 50.0, 50.0, true)),
            &mut rng,
        );

        let peer = state.remotes.get(&PeerId::new("P2")).expect("peer P2");
        assert_eq!(peer.position, Vec2::new(50.0, 50.0));
        assert!(peer.flip_x);
        assert!(peer.tint().rgb() <= Tint::MAX);

        apply_inbound(&mut state, InboundMessage::Disconnect(PeerId::new("P2")), &mut rng);
        assert!(!state.remotes.contains(&PeerId::new("P2")));
    }

    #[test]
    fn test_leave_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");
        state
            .remotes
            .join(PeerId::new("P2"), PlayerState::new(0.0, 0.0, false), &mut rng);

        assert!(state.remotes.leave(&PeerId::new("P2")));
        assert!(!state.remotes.leave(&PeerId::new("P2")));
        assert!(!state.remotes.contains(&PeerId::new("P2")));
    }

    #[test]
    fn test_move_updates_position_and_flip() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");
        state
            .remotes
            .join(PeerId::new("P2"), PlayerState::new(0.0, 0.0, false), &mut rng);
        let tint = state.remotes.get(&PeerId::new("P2")).unwrap().tint();

        apply_inbound(
            &mut state,
            InboundMessage::PlayerMoved(PeerState::new("P2", 12.0, 34.0, true)),
            &mut rng,
        );

        let peer = state.remotes.get(&PeerId::new("P2")).unwrap();
        assert_eq!(peer.position, Vec2::new(12.0, 34.0));
        assert!(peer.flip_x);
        assert_eq!(peer.tint(), tint);
    }

    #[test]
    fn test_move_for_unknown_peer_is_dropped() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = create_test_state("P1");

        apply_inbound(
            &mut state,
            InboundMessage::PlayerMoved(PeerState::new("ghost", 1.0, 1.0, false)),
            &mut rng,
        );

        assert!(state.remotes.is_empty());
        assert!(state.local.is_none());
    }

    #[test]
    fn test_duplicate_join_keeps_single_entry_and_tint() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut roster = RemoteRoster::new();
        roster.join(PeerId::new("P2"), PlayerState::new(1.0, 1.0, false), &mut rng);
        let tint = roster.get(&PeerId::new("P2")).unwrap().tint();

        roster.join(PeerId::new("P2"), PlayerState::new(9.0, 9.0, true), &mut rng);

        assert_eq!(roster.len(), 1);
        let peer = roster.get(&PeerId::new("P2")).unwrap();
        assert_eq!(peer.tint(), tint);
        assert_eq!(peer.position, Vec2::new(9.0, 9.0));
        assert_eq!(peer.id(), &PeerId::new("P2"));
    }
}
