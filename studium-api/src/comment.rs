use std::fmt;

use uuid::Uuid;

use crate::{Error, Time};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies a comment in a local list, whether or not the server knows it yet
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize)]
pub enum CommentKey {
    Saved(CommentId),
    /// Optimistic entry, waiting for the server to confirm it
    Pending(Uuid),
}

impl CommentKey {
    pub fn saved(&self) -> Option<CommentId> {
        match self {
            CommentKey::Saved(id) => Some(*id),
            CommentKey::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CommentKey::Pending(_))
    }
}

/// Canonical comment, as produced by the normalization boundary
///
/// `replies` is only ever populated on top-level comments.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct Comment {
    pub key: CommentKey,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Time,
    pub like_count: u64,
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn id(&self) -> Option<CommentId> {
        self.key.saved()
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.content)?;
        if self.content.trim().is_empty() && self.image_url.is_none() {
            return Err(Error::Invalid(String::from(
                "Bình luận không được để trống",
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentEdit {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_comment_wire_shape() {
        let c = NewComment {
            content: String::from("hello"),
            image_url: None,
            parent_id: Some(CommentId(4)),
        };
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            serde_json::json!({ "content": "hello", "parentId": 4 })
        );
    }

    #[test]
    fn image_only_comment_is_valid() {
        let c = NewComment {
            content: String::from("  "),
            image_url: Some(String::from("https://img.example/a.png")),
            parent_id: None,
        };
        assert_eq!(c.validate(), Ok(()));
        let empty = NewComment {
            image_url: None,
            ..c
        };
        assert!(empty.validate().is_err());
    }
}
