//! Data models for diff representation.

mod comment;
mod diff;
mod lines;

pub use comment::{Anchor, ReviewComment, ThreadKey};
pub use diff::{DiffHunk, DiffLine, DiffStats, FileDiff, FileStatus, LineKind};
pub use lines::{BaseLine, DiffSide, HeadLine, LineRange, LiveLine};
