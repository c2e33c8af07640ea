//! Line coordinates for the different views of a file under review.
//!
//! A review juggles several numbering schemes for "the same" line:
//!
//! - [`BaseLine`]: 1-based line in the pre-image (the PR's base commit).
//! - [`HeadLine`]: 1-based line in the post-image (the PR's head commit).
//! - [`LiveLine`]: 1-based line in the editor buffer, which may carry
//!   uncommitted edits on top of head.
//!
//! Keeping them as distinct types turns a mixed-up call into a compile error.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! line_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a 1-based line number.
            pub const fn new(line: u32) -> Self {
                Self(line)
            }

            /// The raw 1-based line number.
            pub const fn get(self) -> u32 {
                self.0
            }

            /// The 0-based line index used by editors. Line `0` stays `0`.
            pub const fn zero_based(self) -> u32 {
                self.0.saturating_sub(1)
            }

            /// Build from a 0-based editor line index.
            pub const fn from_zero_based(index: u32) -> Self {
                Self(index.saturating_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

line_newtype!(
    /// A 1-based line number in the base (pre-image) version of a file.
    BaseLine
);
line_newtype!(
    /// A 1-based line number in the head (post-image) version of a file.
    HeadLine
);
line_newtype!(
    /// A 1-based line number in the live editor buffer.
    LiveLine
);

/// Which side of the diff a line or comment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffSide {
    /// Old file (base, deletions side).
    Left,
    /// New file (head, additions side).
    Right,
}

impl DiffSide {
    /// Convert to GitHub API string representation.
    pub fn as_github_str(&self) -> &'static str {
        match self {
            DiffSide::Left => "LEFT",
            DiffSide::Right => "RIGHT",
        }
    }

    /// `true` for the base side.
    pub fn is_base(&self) -> bool {
        matches!(self, DiffSide::Left)
    }

    /// The other side of the diff.
    pub fn opposite(&self) -> DiffSide {
        match self {
            DiffSide::Left => DiffSide::Right,
            DiffSide::Right => DiffSide::Left,
        }
    }
}

/// A span of whole lines in an editor, 0-based with an inclusive end.
///
/// `LineRange { start: 0, end: 4 }` covers the first five lines of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of lines covered.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
