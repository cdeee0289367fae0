use std::collections::HashMap;

use shared::domain::{Attachment, AttachmentSize, Post};

/// Host serving full-size attachment assets.
pub const ATTACHMENT_BASE_URL: &str = "https://img.nga.178.com/attachments/";

/// Bundled open-licensed stickers. Inline URLs ending in one of these names
/// render directly at a fixed size; they never go through attachment
/// resolution, so the caller checks this before consulting the index.
pub const OPEN_STICKER_NAMES: &[&str] = &[
    "pg01.png", "pg02.png", "pg03.png", "pg04.png", "pg05.png", "pg06.png",
];

pub fn is_open_sticker(url: &str) -> bool {
    OPEN_STICKER_NAMES.contains(&last_path_segment(url))
}

/// Maps inline content URLs to the authoritative attachment URL for one
/// post. Pure lookup over the post's attachment list; image fetching and
/// caching live elsewhere.
pub struct AttachmentIndex {
    base_url: String,
    by_name: HashMap<String, Attachment>,
}

impl AttachmentIndex {
    pub fn for_post(post: &Post) -> Self {
        Self::new(ATTACHMENT_BASE_URL, post.attachments.iter().cloned())
    }

    pub fn new(
        base_url: impl Into<String>,
        attachments: impl IntoIterator<Item = Attachment>,
    ) -> Self {
        let mut by_name: HashMap<String, Attachment> = HashMap::new();
        for attachment in attachments {
            let name = last_path_segment(&attachment.path).to_string();
            // Full-size entries shadow thumbnails; within a size class the
            // first entry of the ordered list wins.
            let replace = match by_name.get(&name) {
                None => true,
                Some(existing) => {
                    existing.size == AttachmentSize::Thumbnail
                        && attachment.size == AttachmentSize::Full
                }
            };
            if replace {
                by_name.insert(name, attachment);
            }
        }
        Self {
            base_url: base_url.into(),
            by_name,
        }
    }

    /// Returns the full-size URL for an inline content URL, or the input
    /// unchanged when no attachment entry matches (unknown URLs are treated
    /// as already canonical).
    pub fn resolve(&self, url: &str) -> String {
        match self.by_name.get(last_path_segment(url)) {
            Some(attachment) => format!("{}{}", self.base_url, attachment.path),
            None => url.to_string(),
        }
    }
}

fn last_path_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}
