use serde::{Deserialize, Serialize};

use crate::{
    domain::{ForumId, PostId},
    error::ApiError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOperation {
    Upvote,
    Downvote,
}

/// Last effective vote direction as confirmed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    #[default]
    None,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Quote,
    Comment,
    Edit,
    Report,
}

/// Immutable description of one requested post action. The compose flow
/// consumes it as an opaque value; `forum_id` is absent for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAction {
    pub post_id: PostId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum_id: Option<ForumId>,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientRequest {
    PostVote {
        post_id: PostId,
        operation: VoteOperation,
    },
    PostAction(PostAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerResponse {
    /// Confirmed vote: the effective direction after the vote plus the score
    /// adjustment this round trip produced.
    PostVoted {
        direction: VoteDirection,
        delta: i32,
    },
    /// The compose flow's action went through; its result surfacing lives
    /// outside this crate.
    ActionAccepted,
    Error(ApiError),
}
