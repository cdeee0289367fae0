//! Interaction-state core of the forum client: optimistic vote tracking
//! reconciled against server confirmations, the action-dispatch protocol
//! between post rows and the shared compose surface, and inline-URL to
//! attachment resolution. Rendering, networking, and persistence live in
//! collaborating crates behind the [`Transport`] trait and the event stream.

use std::sync::Arc;

use shared::{domain::PostId, protocol::PostAction};
use tokio::sync::broadcast;

pub mod action;
pub mod attachment;
pub mod transport;
pub mod vote;

pub use action::{ReloadPage, ReplyDispatcher};
pub use attachment::AttachmentIndex;
pub use transport::{MissingTransport, Transport, TransportError};
pub use vote::{VoteOutcome, VoteState, VoteTracker};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// State mutations rendering layers can subscribe to. Senders ignore
/// lagging or closed receivers.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    VoteChanged {
        post_id: PostId,
        state: VoteState,
    },
    ComposeRequested {
        action: PostAction,
        reload: ReloadPage,
    },
}

/// Per-session wiring of the interaction core: one transport, one event bus,
/// one vote tracker, one reply dispatcher. Constructed once and passed by
/// reference to the view layer; nothing here is looked up implicitly.
pub struct ForumClient {
    pub votes: VoteTracker,
    pub reply: ReplyDispatcher,
    events: broadcast::Sender<ClientEvent>,
}

impl ForumClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            votes: VoteTracker::new(transport, events.clone()),
            reply: ReplyDispatcher::new(events.clone()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}
