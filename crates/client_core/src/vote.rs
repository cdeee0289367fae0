use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::{Post, PostId},
    error::ApiError,
    protocol::{ClientRequest, ServerResponse, VoteDirection, VoteOperation},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::{
    transport::{Transport, TransportError},
    ClientEvent,
};

/// Optimistic vote bookkeeping for one post. `delta` is the net adjustment
/// to the displayed score not yet folded into the authoritative base score;
/// it is only ever produced by confirmed server responses and accumulates
/// until the post list is refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoteState {
    pub direction: VoteDirection,
    pub delta: i32,
}

impl VoteState {
    /// Score to render right now. Computed at render time, never stored.
    pub fn displayed_score(&self, base_score: i32) -> i32 {
        (base_score + self.delta).max(0)
    }
}

/// Terminal result of a vote submission. Nothing is thrown past this
/// boundary; partial application does not exist.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    /// Server confirmed; the merged state is what the UI should now show.
    Applied(VoteState),
    /// The request completed but the server refused it.
    Rejected(ApiError),
    /// The request never completed; safe to resubmit the same intent.
    TransportFailed(TransportError),
    /// Mock or dummy post: nothing sent, nothing changed.
    Ignored,
}

/// Per-session vote state container. Constructed once and passed by
/// reference; rendering layers observe mutations through the event stream
/// rather than through any binding to this object.
pub struct VoteTracker {
    transport: Arc<dyn Transport>,
    votes: Mutex<HashMap<PostId, VoteState>>,
    events: broadcast::Sender<ClientEvent>,
}

impl VoteTracker {
    pub fn new(transport: Arc<dyn Transport>, events: broadcast::Sender<ClientEvent>) -> Self {
        Self {
            transport,
            votes: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Snapshot for render time. Untouched posts report `{None, 0}`.
    pub async fn state_of(&self, post_id: &PostId) -> VoteState {
        self.votes
            .lock()
            .await
            .get(post_id)
            .copied()
            .unwrap_or_default()
    }

    /// Submits one vote intent and merges the server's confirmation.
    ///
    /// At most one request per post should be in flight; the caller enforces
    /// this by disabling the vote controls while awaiting. If responses do
    /// race, deltas sum commutatively, so the final state is order
    /// independent as long as each response is applied once.
    pub async fn submit(&self, post: &Post, operation: VoteOperation) -> VoteOutcome {
        if post.is_mock() || post.is_dummy() {
            debug!(topic = %post.id.topic_id.0, "vote on inert post ignored");
            return VoteOutcome::Ignored;
        }

        let request = ClientRequest::PostVote {
            post_id: post.id.clone(),
            operation,
        };

        let response = match self.transport.call(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(topic = %post.id.topic_id.0, error = %err, "vote request did not complete");
                return VoteOutcome::TransportFailed(err);
            }
        };

        match response {
            ServerResponse::PostVoted { direction, delta } => {
                let state = {
                    let mut votes = self.votes.lock().await;
                    let entry = votes.entry(post.id.clone()).or_default();
                    entry.direction = direction;
                    entry.delta += delta;
                    *entry
                };
                debug!(
                    topic = %post.id.topic_id.0,
                    reply = %post.id.reply_id,
                    ?direction,
                    delta,
                    "vote confirmed"
                );
                let _ = self.events.send(ClientEvent::VoteChanged {
                    post_id: post.id.clone(),
                    state,
                });
                VoteOutcome::Applied(state)
            }
            ServerResponse::Error(err) => VoteOutcome::Rejected(err),
            other => {
                warn!(response = ?other, "server answered a vote with the wrong response kind");
                VoteOutcome::TransportFailed(TransportError::UnexpectedResponse)
            }
        }
    }

    /// Drops a row's state when the row is deallocated. A response arriving
    /// afterwards is a lost update, not a hazard: vote state is not
    /// persisted.
    pub async fn forget(&self, post_id: &PostId) {
        self.votes.lock().await.remove(post_id);
    }
}

#[cfg(test)]
#[path = "tests/vote_tests.rs"]
mod tests;
