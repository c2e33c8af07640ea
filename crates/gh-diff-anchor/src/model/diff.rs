//! Diff data structures produced by the parser.

use super::DiffSide;
use serde::Serialize;

/// Line type in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Unchanged line present on both sides.
    Context,
    /// Added line (+).
    Add,
    /// Removed line (-).
    Delete,
    /// @@ header line.
    Control,
}

impl LineKind {
    /// Whether a line of this kind exists in the given side's file.
    pub fn exists_on(&self, side: DiffSide) -> bool {
        match (self, side) {
            (LineKind::Context, _) => true,
            (LineKind::Delete, DiffSide::Left) => true,
            (LineKind::Add, DiffSide::Right) => true,
            _ => false,
        }
    }
}

/// A single physical line of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    /// Line type.
    pub kind: LineKind,
    /// Line number in the old file (Context and Delete).
    pub old_line_number: Option<u32>,
    /// Line number in the new file (Context and Add).
    pub new_line_number: Option<u32>,
    /// Ordinal of this line across the whole patch; the first header is `0`.
    /// This is the `position` the hosting API expects for review comments.
    pub position_in_hunk: u32,
    /// Literal line text including the prefix character.
    pub raw_text: String,
    /// Set when a `\ No newline at end of file` marker follows this line.
    pub no_newline_at_eof: bool,
}

impl DiffLine {
    /// Create a new context line.
    pub fn context(
        raw_text: impl Into<String>,
        old_line: u32,
        new_line: u32,
        position: u32,
    ) -> Self {
        Self::new(LineKind::Context, Some(old_line), Some(new_line), position, raw_text)
    }

    /// Create a new addition line.
    pub fn add(raw_text: impl Into<String>, new_line: u32, position: u32) -> Self {
        Self::new(LineKind::Add, None, Some(new_line), position, raw_text)
    }

    /// Create a new deletion line.
    pub fn delete(raw_text: impl Into<String>, old_line: u32, position: u32) -> Self {
        Self::new(LineKind::Delete, Some(old_line), None, position, raw_text)
    }

    /// Create a hunk header line.
    pub fn control(raw_text: impl Into<String>, position: u32) -> Self {
        Self::new(LineKind::Control, None, None, position, raw_text)
    }

    fn new(
        kind: LineKind,
        old_line_number: Option<u32>,
        new_line_number: Option<u32>,
        position_in_hunk: u32,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            old_line_number,
            new_line_number,
            position_in_hunk,
            raw_text: raw_text.into(),
            no_newline_at_eof: false,
        }
    }

    /// Line content without the leading `+`/`-`/` ` marker.
    ///
    /// Header lines are returned as-is.
    pub fn text(&self) -> &str {
        if self.kind == LineKind::Control {
            return &self.raw_text;
        }
        let mut chars = self.raw_text.chars();
        match chars.next() {
            Some('+' | '-' | ' ') => chars.as_str(),
            _ => &self.raw_text,
        }
    }

    /// Line number on the requested side, if the line exists there.
    pub fn line_number(&self, side: DiffSide) -> Option<u32> {
        match side {
            DiffSide::Left => self.old_line_number,
            DiffSide::Right => self.new_line_number,
        }
    }
}

/// A contiguous region of changes (hunk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffHunk {
    /// Old file starting line.
    pub old_line_number: u32,
    /// Number of lines in old version.
    pub old_length: u32,
    /// New file starting line.
    pub new_line_number: u32,
    /// Number of lines in new version.
    pub new_length: u32,
    /// Position of this hunk's header line in the patch.
    pub position_in_hunk: u32,
    /// Text after the closing `@@`, usually the enclosing function.
    pub section_heading: Option<String>,
    /// Lines in this hunk, starting with the header line.
    pub diff_lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Create a hunk with the given header info. The header line itself is
    /// synthesized; the parser overwrites it with the literal text.
    pub fn new(
        old_line_number: u32,
        old_length: u32,
        new_line_number: u32,
        new_length: u32,
        position_in_hunk: u32,
    ) -> Self {
        let header = format!(
            "@@ -{},{} +{},{} @@",
            old_line_number, old_length, new_line_number, new_length
        );
        Self {
            old_line_number,
            old_length,
            new_line_number,
            new_length,
            position_in_hunk,
            section_heading: None,
            diff_lines: vec![DiffLine::control(header, position_in_hunk)],
        }
    }

    /// The raw `@@ ... @@` header line.
    pub fn header(&self) -> &str {
        self.diff_lines
            .first()
            .map(|line| line.raw_text.as_str())
            .unwrap_or_default()
    }

    /// Lines of the hunk without the header.
    pub fn content_lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.diff_lines
            .iter()
            .filter(|line| line.kind != LineKind::Control)
    }

    /// Starting line on the requested side.
    pub fn start(&self, side: DiffSide) -> u32 {
        match side {
            DiffSide::Left => self.old_line_number,
            DiffSide::Right => self.new_line_number,
        }
    }

    /// Header length on the requested side.
    pub fn length(&self, side: DiffSide) -> u32 {
        match side {
            DiffSide::Left => self.old_length,
            DiffSide::Right => self.new_length,
        }
    }

    /// Number of added lines.
    pub fn additions(&self) -> usize {
        self.diff_lines.iter().filter(|l| l.kind == LineKind::Add).count()
    }

    /// Number of deleted lines.
    pub fn deletions(&self) -> usize {
        self.diff_lines.iter().filter(|l| l.kind == LineKind::Delete).count()
    }
}

/// File status in a multi-file diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
}

impl FileStatus {
    /// Get a single-character representation.
    pub fn as_char(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
        }
    }
}

/// A single file's section of a `git diff`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDiff {
    /// Current file path (after rename if applicable).
    pub path: String,
    /// Previous file path (if renamed or copied).
    pub old_path: Option<String>,
    /// File status.
    pub status: FileStatus,
    /// Binary files carry no hunks.
    pub is_binary: bool,
    /// The hunk text of this file, starting at its first `@@` line.
    pub patch: String,
    /// Parsed hunks, positions numbered from `0` for this file.
    pub hunks: Vec<DiffHunk>,
    /// Number of added lines.
    pub additions: usize,
    /// Number of deleted lines.
    pub deletions: usize,
}

impl FileDiff {
    /// Create a new, empty file diff.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            status: FileStatus::Modified,
            is_binary: false,
            patch: String::new(),
            hunks: Vec::new(),
            additions: 0,
            deletions: 0,
        }
    }

    /// Get the display name for the file (handles renames).
    pub fn display_name(&self) -> String {
        match self.old_path {
            Some(ref old) if old != &self.path => format!("{} → {}", old, self.path),
            _ => self.path.clone(),
        }
    }

    /// Recalculate line statistics from hunks.
    pub fn recalculate_stats(&mut self) {
        let stats = DiffStats::from_hunks(&self.hunks);
        self.additions = stats.additions;
        self.deletions = stats.deletions;
    }
}

/// Summary counts for a parsed patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub hunks: usize,
    pub additions: usize,
    pub deletions: usize,
}

impl DiffStats {
    pub fn from_hunks(hunks: &[DiffHunk]) -> Self {
        Self {
            hunks: hunks.len(),
            additions: hunks.iter().map(DiffHunk::additions).sum(),
            deletions: hunks.iter().map(DiffHunk::deletions).sum(),
        }
    }
}
