//! Streaming parser for the hunks of a single-file patch.
//!
//! This is the format of the hosting API's `patch` field and of `git diff`
//! output for one file: optional file headers followed by `@@` hunks.

use crate::model::{DiffHunk, DiffLine};
use regex::Regex;
use std::iter::FusedIterator;
use std::str::Lines;
use std::sync::OnceLock;

/// Length used when a hunk header omits `,len` (or it cannot be read).
const DEFAULT_HUNK_LENGTH: u32 = 1;

/// Parse a patch into a lazy sequence of hunks.
///
/// The returned iterator is cheap to clone; a clone restarts from wherever the
/// original was when cloned, so cloning a fresh iterator re-parses the whole
/// patch. Parsing never fails: lines that do not fit the grammar are skipped.
///
/// # Example
///
/// ```
/// use gh_diff_anchor::parse_diff_hunks;
///
/// let patch = "@@ -1,2 +1,2 @@\n-old\n+new\n same\n";
/// let hunks: Vec<_> = parse_diff_hunks(patch).collect();
/// assert_eq!(hunks.len(), 1);
/// assert_eq!(hunks[0].diff_lines.len(), 4);
/// ```
pub fn parse_diff_hunks(patch: &str) -> DiffHunks<'_> {
    DiffHunks {
        lines: patch.lines(),
        current: None,
        next_position: 0,
    }
}

/// Parse a patch and collect all of its hunks.
pub fn collect_hunks(patch: &str) -> Vec<DiffHunk> {
    parse_diff_hunks(patch).collect()
}

/// Iterator over the hunks of a patch, see [`parse_diff_hunks`].
#[derive(Debug, Clone)]
pub struct DiffHunks<'a> {
    lines: Lines<'a>,
    current: Option<HunkBuilder>,
    next_position: u32,
}

impl DiffHunks<'_> {
    fn advance_position(&mut self) -> u32 {
        let position = self.next_position;
        self.next_position += 1;
        position
    }
}

impl Iterator for DiffHunks<'_> {
    type Item = DiffHunk;

    fn next(&mut self) -> Option<DiffHunk> {
        while let Some(line) = self.lines.next() {
            if let Some(header) = HunkHeader::parse(line) {
                let position = self.advance_position();
                let builder = HunkBuilder::new(&header, line, position);
                match self.current.replace(builder) {
                    Some(done) => return Some(done.finish()),
                    None => continue,
                }
            }

            if self.current.is_none() {
                log::trace!("Skipping line before first hunk: {}", line);
                continue;
            }

            if line.starts_with("@@") {
                log::debug!("Skipping malformed hunk header: {}", line);
                continue;
            }

            let position = self.advance_position();
            if let Some(builder) = self.current.as_mut() {
                builder.push(line, position);
            }
        }

        self.current.take().map(HunkBuilder::finish)
    }
}

impl FusedIterator for DiffHunks<'_> {}

/// Parsed `@@ -a,b +c,d @@ heading` line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HunkHeader {
    old_start: u32,
    old_length: u32,
    new_start: u32,
    new_length: u32,
    section_heading: Option<String>,
}

impl HunkHeader {
    fn parse(line: &str) -> Option<Self> {
        static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();

        let re = HEADER_REGEX.get_or_init(|| {
            Regex::new(r"^@@ -(\d+)(?:,(\S*))? \+(\d+)(?:,(\S*))? @@ ?(.*)$")
                .expect("hunk header regex is valid")
        });

        let captures = re.captures(line)?;
        let old_start = captures.get(1)?.as_str().parse().ok()?;
        let new_start = captures.get(3)?.as_str().parse().ok()?;
        let heading = captures.get(5).map(|m| m.as_str().trim()).unwrap_or("");

        Some(Self {
            old_start,
            old_length: parse_length(captures.get(2).map(|m| m.as_str()), line),
            new_start,
            new_length: parse_length(captures.get(4).map(|m| m.as_str()), line),
            section_heading: (!heading.is_empty()).then(|| heading.to_string()),
        })
    }
}

/// Read an optional `,len` field, falling back to [`DEFAULT_HUNK_LENGTH`].
fn parse_length(field: Option<&str>, line: &str) -> u32 {
    match field {
        None => DEFAULT_HUNK_LENGTH,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::debug!("Unreadable hunk length {:?} in {:?}, assuming 1", raw, line);
            DEFAULT_HUNK_LENGTH
        }),
    }
}

/// Accumulates the lines of the hunk being parsed.
#[derive(Debug, Clone)]
struct HunkBuilder {
    hunk: DiffHunk,
    old_line: u32,
    new_line: u32,
}

impl HunkBuilder {
    fn new(header: &HunkHeader, raw: &str, position: u32) -> Self {
        let mut hunk = DiffHunk::new(
            header.old_start,
            header.old_length,
            header.new_start,
            header.new_length,
            position,
        );
        hunk.section_heading = header.section_heading.clone();
        hunk.diff_lines = vec![DiffLine::control(raw, position)];

        Self {
            hunk,
            old_line: header.old_start,
            new_line: header.new_start,
        }
    }

    fn push(&mut self, raw: &str, position: u32) {
        match raw.chars().next() {
            Some('\\') => {
                // "\ No newline at end of file" describes the line before it
                if let Some(last) = self.hunk.diff_lines.last_mut() {
                    last.no_newline_at_eof = true;
                }
            }
            Some('+') => {
                self.hunk
                    .diff_lines
                    .push(DiffLine::add(raw, self.new_line, position));
                self.new_line = self.new_line.saturating_add(1);
            }
            Some('-') => {
                self.hunk
                    .diff_lines
                    .push(DiffLine::delete(raw, self.old_line, position));
                self.old_line = self.old_line.saturating_add(1);
            }
            _ => {
                self.hunk.diff_lines.push(DiffLine::context(
                    raw,
                    self.old_line,
                    self.new_line,
                    position,
                ));
                self.old_line = self.old_line.saturating_add(1);
                self.new_line = self.new_line.saturating_add(1);
            }
        }
    }

    fn finish(self) -> DiffHunk {
        let (old_seen, new_seen) = self.hunk.content_lines().fold((0, 0), |(old, new), line| {
            (
                old + u32::from(line.old_line_number.is_some()),
                new + u32::from(line.new_line_number.is_some()),
            )
        });
        if old_seen != self.hunk.old_length || new_seen != self.hunk.new_length {
            log::debug!(
                "Hunk {} has {} old / {} new lines",
                self.hunk.header(),
                old_seen,
                new_seen
            );
        }
        self.hunk
    }
}
