//! Inbound message queue between the transport and the session loop
//!
//! The transport reader task pushes decoded messages from its own task; the
//! session drains everything pending at the start of each tick, so handlers
//! always run on the loop's thread in delivery order.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::net::protocol::InboundMessage;

/// Unbounded queue of inbound messages
pub struct Inbox {
    sender: Sender<InboundMessage>,
    receiver: Receiver<InboundMessage>,
}

impl Inbox {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// New producer handle for a transport task
    pub fn sender(&self) -> InboxSender {
        InboxSender {
            sender: self.sender.clone(),
        }
    }

    /// Take every message queued so far, oldest first
    pub fn drain(&self) -> Vec<InboundMessage> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Clonable producer handle
#[derive(Clone)]
pub struct InboxSender {
    sender: Sender<InboundMessage>,
}

impl InboxSender {
    /// Queue a message; fails only once the inbox itself is gone
    pub fn push(&self, message: InboundMessage) -> Result<(), InboxClosed> {
        self.sender.send(message).map_err(|_| InboxClosed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("inbox closed")]
pub struct InboxClosed;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::PeerId;
    use crate::net::protocol::PeerState;

    #[test]
    fn test_drain_preserves_order() {
        let inbox = Inbox::new();
        let sender = inbox.sender();

        sender
            .push(InboundMessage::NewPlayer(PeerState::new("P2", 1.0, 1.0, false)))
            .unwrap();
        sender
            .push(InboundMessage::PlayerMoved(PeerState::new("P2", 2.0, 2.0, false)))
            .unwrap();
        sender.push(InboundMessage::Disconnect(PeerId::new("P2"))).unwrap();

        assert_eq!(inbox.pending_count(), 3);

        let kinds: Vec<&str> = inbox.drain().iter().map(InboundMessage::kind).collect();
        assert_eq!(kinds, vec!["newPlayer", "playerMoved", "disconnect"]);
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_senders_from_other_threads() {
        let inbox = Inbox::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sender = inbox.sender();
                std::thread::spawn(move || {
                    sender
                        .push(InboundMessage::Disconnect(PeerId::new(format!("P{}", i))))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(inbox.drain().len(), 4);
    }

    #[test]
    fn test_push_after_inbox_dropped() {
        let inbox = Inbox::new();
        let sender = inbox.sender();
        drop(inbox);

        let result = sender.push(InboundMessage::Disconnect(PeerId::new("P1")));
        assert_eq!(result, Err(InboxClosed));
    }
}
