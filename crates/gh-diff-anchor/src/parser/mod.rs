//! Unified diff parsing.

mod hunk;
mod unified;

pub use hunk::{collect_hunks, parse_diff_hunks, DiffHunks};
pub use unified::parse_unified_diff;
