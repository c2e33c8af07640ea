//! # gh-diff-anchor
//!
//! Keeps pull request review comments attached to the right line while the
//! file under review is being edited locally.
//!
//! ## Design Principles
//!
//! The crate is **pure**: it receives patch text and comment records and
//! returns line numbers. Fetching patches, computing the local-edit diff and
//! drawing decorations are left to the caller. This enables:
//!
//! - Testability with plain string fixtures
//! - Reuse from an editor extension, a CLI or a bot
//!
//! ## Line coordinates
//!
//! Three versions of a file are involved:
//!
//! - **base**: the pre-image of the PR ([`BaseLine`])
//! - **head**: the last pushed commit of the PR ([`HeadLine`])
//! - **live**: the locally edited buffer ([`LiveLine`])
//!
//! The PR patch connects base and head, the local-edit patch connects head
//! and live. Review comments are addressed by *position*, the 0-based index
//! of a line within the PR patch.
//!
//! ## Usage
//!
//! ```rust
//! use gh_diff_anchor::{collect_hunks, map_comments_to_head, ReviewComment};
//!
//! let pr_patch = "@@ -1,2 +1,3 @@\n a\n+b\n c\n";
//! let hunks = collect_hunks(pr_patch);
//!
//! // One line typed at the top of the buffer since the last push
//! let local_edits = "@@ -0,0 +1 @@\n+// note\n";
//!
//! let comments = vec![ReviewComment::new(1, "src/lib.rs", Some(2), "why b?")];
//! let placed = map_comments_to_head(&hunks, local_edits, comments);
//! assert_eq!(placed[0].absolute_position.map(|l| l.get()), Some(3));
//! ```

pub mod content;
pub mod mapping;
pub mod model;
pub mod parser;
pub mod ranges;
pub mod reconcile;
pub mod threads;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use content::{apply_patch, ApplyError};
pub use mapping::{
    base_to_head, get_diff_line_by_position, head_to_base, head_to_live, live_to_head,
    map_head_line_to_diff_hunk_position, map_new_position_to_old, map_old_position_to_new,
};
pub use model::{
    Anchor, BaseLine, DiffHunk, DiffLine, DiffSide, DiffStats, FileDiff, FileStatus, HeadLine,
    LineKind, LineRange, LiveLine, ReviewComment, ThreadKey,
};
pub use parser::{collect_hunks, parse_diff_hunks, parse_unified_diff, DiffHunks};
pub use ranges::get_commenting_ranges;
pub use reconcile::{compute_absolute_position, map_comments_to_head, resolve_anchor};
pub use threads::group_into_threads;
