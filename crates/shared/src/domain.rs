use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic ids carrying this prefix belong to synthetic preview data and must
/// never reach the server.
pub const MOCK_ID_PREFIX: &str = "mock_";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }
        }
    };
}

id_newtype!(TopicId);
id_newtype!(UserId);

impl TopicId {
    pub fn is_mock(&self) -> bool {
        self.0.starts_with(MOCK_ID_PREFIX)
    }
}

/// Identifies one post: the topic it belongs to plus the server-issued reply
/// id within that topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId {
    pub topic_id: TopicId,
    pub reply_id: String,
}

impl PostId {
    pub fn new(topic_id: TopicId, reply_id: impl Into<String>) -> Self {
        Self {
            topic_id,
            reply_id: reply_id.into(),
        }
    }

    /// Placeholder id used by rows that have no backing post yet.
    pub fn dummy() -> Self {
        Self::default()
    }

    pub fn is_dummy(&self) -> bool {
        *self == Self::dummy()
    }

    pub fn is_mock(&self) -> bool {
        self.topic_id.is_mock()
    }
}

/// Forums live in two server-side namespaces: regular forums (`fid`) and
/// sub-topic forums (`stid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForumId {
    Fid(String),
    Stid(String),
}

impl ForumId {
    pub fn fid(id: impl Into<String>) -> Self {
        Self::Fid(id.into())
    }

    pub fn stid(id: impl Into<String>) -> Self {
        Self::Stid(id.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentSize {
    Thumbnail,
    Full,
}

/// One entry of a post's attachment list. `path` is relative to the
/// attachment host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: String,
    pub size: AttachmentSize,
}

impl Attachment {
    pub fn new(path: impl Into<String>, size: AttachmentSize) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// A post as fetched from the topic details page. Read-only to the
/// interaction core; `score` is the authoritative base score at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum_id: Option<ForumId>,
    pub current_page: u32,
    pub floor: u32,
    pub score: i32,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Post {
    /// Synthetic preview post; exercises the UI but never the server.
    pub fn is_mock(&self) -> bool {
        self.id.is_mock()
    }

    /// Placeholder post with no backing identity.
    pub fn is_dummy(&self) -> bool {
        self.id.is_dummy()
    }
}
