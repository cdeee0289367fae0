use shared::{
    domain::Post,
    protocol::{ActionKind, PostAction},
};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::ClientEvent;

/// Which page of the topic to refresh once the compose flow succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPage {
    /// No content changed; nothing to refresh.
    #[default]
    None,
    /// New replies land on the last page; navigate there.
    Last,
    /// Refetch this page (1-based).
    Exact(u32),
}

#[derive(Debug, Clone)]
struct PendingReply {
    action: PostAction,
    reload: ReloadPage,
}

/// Single shared sink between the post rows and the one compose surface.
/// Only one compose flow is shown at a time: dispatching while another is
/// pending replaces it, last write wins, no queueing.
pub struct ReplyDispatcher {
    pending: Mutex<Option<PendingReply>>,
    events: broadcast::Sender<ClientEvent>,
}

impl ReplyDispatcher {
    pub fn new(events: broadcast::Sender<ClientEvent>) -> Self {
        Self {
            pending: Mutex::new(None),
            events,
        }
    }

    /// Quote the post; the reply will land on the last page.
    pub async fn quote(&self, post: &Post) {
        if Self::drops(post) {
            return;
        }
        self.dispatch(
            PostAction {
                post_id: post.id.clone(),
                forum_id: post.forum_id.clone(),
                kind: ActionKind::Quote,
            },
            ReloadPage::Last,
        )
        .await;
    }

    /// Comment on the post; the thread stays on the post's own page.
    pub async fn comment(&self, post: &Post) {
        if Self::drops(post) {
            return;
        }
        self.dispatch(
            PostAction {
                post_id: post.id.clone(),
                forum_id: post.forum_id.clone(),
                kind: ActionKind::Comment,
            },
            ReloadPage::Exact(post.current_page),
        )
        .await;
    }

    /// Edit the post in place.
    pub async fn edit(&self, post: &Post) {
        if Self::drops(post) {
            return;
        }
        self.dispatch(
            PostAction {
                post_id: post.id.clone(),
                forum_id: post.forum_id.clone(),
                kind: ActionKind::Edit,
            },
            ReloadPage::Exact(post.current_page),
        )
        .await;
    }

    /// Report the post. No forum id and no reload: content is unchanged.
    pub async fn report(&self, post: &Post) {
        if Self::drops(post) {
            return;
        }
        self.dispatch(
            PostAction {
                post_id: post.id.clone(),
                forum_id: None,
                kind: ActionKind::Report,
            },
            ReloadPage::None,
        )
        .await;
    }

    /// Hands a descriptor to the compose surface. Performs no I/O; the
    /// compose flow owns the network side entirely.
    pub async fn dispatch(&self, action: PostAction, reload: ReloadPage) {
        debug!(kind = ?action.kind, reply = %action.post_id.reply_id, "compose requested");
        {
            let mut pending = self.pending.lock().await;
            *pending = Some(PendingReply {
                action: action.clone(),
                reload,
            });
        }
        let _ = self
            .events
            .send(ClientEvent::ComposeRequested { action, reload });
    }

    /// Descriptor the compose surface should currently show, if any.
    pub async fn pending(&self) -> Option<PostAction> {
        self.pending
            .lock()
            .await
            .as_ref()
            .map(|reply| reply.action.clone())
    }

    /// The compose flow's success signal. Consumes the stored reload target:
    /// the first call gets it, later calls (or calls with nothing pending)
    /// get [`ReloadPage::None`].
    pub async fn complete(&self) -> ReloadPage {
        match self.pending.lock().await.take() {
            Some(reply) => reply.reload,
            None => ReloadPage::None,
        }
    }

    /// Dummy posts have no identity to quote, comment on, edit, or report.
    /// Mock posts proceed so preview data still exercises the compose flow.
    fn drops(post: &Post) -> bool {
        if post.is_dummy() {
            debug!("compose request on a placeholder post dropped");
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "tests/action_tests.rs"]
mod tests;
