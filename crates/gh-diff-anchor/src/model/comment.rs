//! Review comment data structures.

use super::{HeadLine, LiveLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review comment as delivered by the hosting API.
///
/// Only the fields that matter for anchoring are modelled; unknown JSON
/// fields are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Hosting API comment ID.
    pub id: u64,
    /// File path relative to the repository root.
    pub path: String,
    /// Position in the current PR patch. `None` once the API itself considers
    /// the comment outdated.
    #[serde(default)]
    pub position: Option<u32>,
    /// Position in the patch of the commit the comment was written against.
    #[serde(default)]
    pub original_position: Option<u32>,
    /// The few patch lines surrounding the comment at creation time.
    #[serde(default)]
    pub diff_hunk: String,
    /// Comment body (markdown).
    #[serde(default)]
    pub body: String,
    /// Root comment of the thread this one replies to.
    #[serde(default)]
    pub in_reply_to_id: Option<u64>,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// Current line in the live document, recomputed on every reconciliation.
    #[serde(default, skip_deserializing)]
    pub absolute_position: Option<LiveLine>,
}

impl ReviewComment {
    /// Create a comment anchored at a patch position.
    pub fn new(
        id: u64,
        path: impl Into<String>,
        position: Option<u32>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            position,
            original_position: position,
            diff_hunk: String::new(),
            body: body.into(),
            in_reply_to_id: None,
            created_at: Utc::now(),
            absolute_position: None,
        }
    }

    /// Mark this comment as a reply to another one.
    pub fn replying_to(mut self, root_id: u64) -> Self {
        self.in_reply_to_id = Some(root_id);
        self
    }

    /// A comment is outdated when it can no longer be placed in the live document.
    pub fn is_outdated(&self) -> bool {
        self.absolute_position.is_none()
    }
}

/// Where a comment lands after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Anchor {
    /// The anchor line still exists: `head` in the committed post-image,
    /// `live` after local edits are accounted for.
    Current { head: HeadLine, live: LiveLine },
    /// The anchor line no longer exists on head.
    Outdated,
}

impl Anchor {
    /// Live line of the anchor, if any.
    pub fn live_line(&self) -> Option<LiveLine> {
        match self {
            Anchor::Current { live, .. } => Some(*live),
            Anchor::Outdated => None,
        }
    }

    /// `true` when local edits moved the anchor away from its committed line.
    pub fn is_shifted(&self) -> bool {
        match self {
            Anchor::Current { head, live } => head.get() != live.get(),
            Anchor::Outdated => false,
        }
    }
}

/// Key identifying a comment thread: the file and the patch position the
/// thread hangs off. `position: None` collects comments without a position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ThreadKey {
    pub path: String,
    pub position: Option<u32>,
}

impl ThreadKey {
    pub fn new(path: impl Into<String>, position: Option<u32>) -> Self {
        Self {
            path: path.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_deserialize_from_api_json() {
        let json = r#"{
            "id": 42,
            "path": "src/lib.rs",
            "position": 7,
            "original_position": 5,
            "diff_hunk": "@@ -1,2 +1,3 @@",
            "body": "nit",
            "created_at": "2024-01-15T10:30:00Z",
            "user": { "login": "someone" }
        }"#;
        let comment: ReviewComment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id, 42);
        assert_eq!(comment.position, Some(7));
        assert_eq!(comment.original_position, Some(5));
        assert_eq!(comment.in_reply_to_id, None);
        assert!(comment.is_outdated());
    }

    #[test]
    fn test_comment_null_position() {
        let json =
            r#"{"id": 1, "path": "a.rs", "position": null, "created_at": "2024-01-15T10:30:00Z"}"#;
        let comment: ReviewComment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.position, None);
        assert!(comment.body.is_empty());
    }

    #[test]
    fn test_anchor_live_line() {
        let anchor = Anchor::Current {
            head: HeadLine::new(4),
            live: LiveLine::new(6),
        };
        assert_eq!(anchor.live_line(), Some(LiveLine::new(6)));
        assert!(anchor.is_shifted());
        assert_eq!(Anchor::Outdated.live_line(), None);
        assert!(!Anchor::Outdated.is_shifted());
    }

    #[test]
    fn test_thread_key_orders_missing_position_first() {
        let missing = ThreadKey::new("a.rs", None);
        let zero = ThreadKey::new("a.rs", Some(0));
        let later = ThreadKey::new("a.rs", Some(3));
        assert!(missing < zero);
        assert!(zero < later);
        assert_ne!(missing, zero);
    }
}
