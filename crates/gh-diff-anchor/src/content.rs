//! Rebuild the post-image of a file from its pre-image and a patch.

use crate::model::LineKind;
use crate::parser::parse_diff_hunks;
use thiserror::Error;

/// Errors that can occur while applying a patch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Hunk at base line {start} runs past the end of the base ({base_lines} lines)")]
    HunkOutOfRange { start: u32, base_lines: usize },

    #[error("Hunk at base line {start} overlaps the previous hunk")]
    OverlappingHunk { start: u32 },
}

/// Apply `patch` to `base` and return the resulting head content.
///
/// Context and deleted lines are taken from `base`; a mismatch with the
/// patch text is logged and tolerated. The trailing newline follows the
/// `\ No newline at end of file` marker when the patch touches the last line,
/// and `base` otherwise. Lines end in `\r\n` when `base` (or, for an empty
/// base, the patch) does.
///
/// # Example
/// ```
/// use gh_diff_anchor::apply_patch;
///
/// let head = apply_patch("a\nb\n", "@@ -2 +2 @@\n-b\n+c\n")?;
/// assert_eq!(head, "a\nc\n");
/// # Ok::<(), gh_diff_anchor::ApplyError>(())
/// ```
pub fn apply_patch(base: &str, patch: &str) -> Result<String, ApplyError> {
    let base_lines: Vec<&str> = base.lines().collect();
    let newline = line_ending(base).or_else(|| line_ending(patch)).unwrap_or("\n");
    let mut ends_with_newline = base.is_empty() || base.ends_with('\n');
    let mut output: Vec<&str> = Vec::with_capacity(base_lines.len());
    // Index of the next base line not yet consumed
    let mut cursor = 0usize;
    let out_of_range = |start: u32| ApplyError::HunkOutOfRange {
        start,
        base_lines: base_lines.len(),
    };

    let hunks: Vec<_> = parse_diff_hunks(patch).collect();
    for hunk in &hunks {
        let start = hunk.old_line_number;
        // An empty old side means "insert after line `start`"
        let first = if hunk.old_length == 0 {
            start as usize
        } else {
            (start as usize).saturating_sub(1)
        };
        if first < cursor {
            return Err(ApplyError::OverlappingHunk { start });
        }
        if first > base_lines.len() {
            return Err(out_of_range(start));
        }

        output.extend_from_slice(&base_lines[cursor..first]);
        cursor = first;

        let mut last_new_side_line = None;
        for line in hunk.content_lines() {
            match line.kind {
                LineKind::Context | LineKind::Delete => {
                    let &text = base_lines.get(cursor).ok_or_else(|| out_of_range(start))?;
                    if text != line.text() {
                        log::warn!(
                            "Base line {} differs from patch: {:?} vs {:?}",
                            cursor + 1,
                            text,
                            line.text()
                        );
                    }
                    cursor += 1;
                    if line.kind == LineKind::Context {
                        output.push(text);
                        last_new_side_line = Some(line);
                    }
                }
                LineKind::Add => {
                    output.push(line.text());
                    last_new_side_line = Some(line);
                }
                LineKind::Control => {}
            }
        }

        if cursor == base_lines.len() {
            ends_with_newline = last_new_side_line.map_or(true, |l| !l.no_newline_at_eof);
        }
    }

    output.extend_from_slice(&base_lines[cursor..]);

    if output.is_empty() {
        return Ok(String::new());
    }
    let mut head = output.join(newline);
    if ends_with_newline {
        head.push_str(newline);
    }
    Ok(head)
}

/// Line terminator of the first line of `text`, if it has one.
fn line_ending(text: &str) -> Option<&'static str> {
    let end = text.find('\n')?;
    Some(if text[..end].ends_with('\r') { "\r\n" } else { "\n" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DELETE_ALL_PATCH, JSON_PATCH, MULTI_HUNK_PATCH};
    use pretty_assertions::assert_eq;

    const JSON_BASE: &str = "{\n    \"a\": true,\n    \"b\": [\n    ]\n}\n";

    #[test]
    fn test_apply_worked_example() {
        let head = apply_patch(JSON_BASE, JSON_PATCH).unwrap();
        assert_eq!(
            head,
            "{\n    \"a\": true,\n    \"b\": [\n    ],\n    \"c\": false\n}\n"
        );
    }

    #[test]
    fn test_empty_patch_returns_base() {
        assert_eq!(apply_patch("a\nb\n", "").unwrap(), "a\nb\n");
        assert_eq!(apply_patch("a\nb", "").unwrap(), "a\nb");
        assert_eq!(apply_patch("", "").unwrap(), "");
    }

    #[test]
    fn test_untouched_lines_around_hunks_are_kept() {
        let mut base: Vec<String> = (1..=25).map(|n| format!("line {}", n)).collect();
        base[0] = "fn first() {".to_string();
        base[1] = "    run();".to_string();
        base[2] = "}".to_string();
        base[19] = "fn second() {".to_string();
        base[20] = "    let unused = 1;".to_string();
        base[21] = "    run();".to_string();
        base[22] = "}".to_string();
        let base = base.join("\n") + "\n";

        let head = apply_patch(&base, MULTI_HUNK_PATCH).unwrap();
        let lines: Vec<&str> = head.lines().collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[1], "    setup();");
        assert_eq!(lines[4], "line 4");
        assert_eq!(lines[20], "fn second() {");
        assert_eq!(lines[21], "    run();");
        assert_eq!(lines[24], "line 25");
    }

    #[test]
    fn test_delete_everything() {
        let base = "one\ntwo\nthree\nfour\nfive\n";
        assert_eq!(apply_patch(base, DELETE_ALL_PATCH).unwrap(), "");
    }

    #[test]
    fn test_new_file() {
        let head = apply_patch("", "@@ -0,0 +1,2 @@\n+a\n+b\n").unwrap();
        assert_eq!(head, "a\nb\n");
    }

    #[test]
    fn test_no_newline_marker() {
        let patch = "@@ -1,2 +1,2 @@\n a\n-b\n+c\n\\ No newline at end of file\n";
        assert_eq!(apply_patch("a\nb\n", patch).unwrap(), "a\nc");

        let patch = "@@ -1,2 +1,2 @@\n a\n-b\n\\ No newline at end of file\n+c\n";
        assert_eq!(apply_patch("a\nb", patch).unwrap(), "a\nc\n");
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        assert_eq!(apply_patch("a\r\nb\r\n", "").unwrap(), "a\r\nb\r\n");

        let patch = "@@ -2 +2 @@\n-b\n+x\n";
        assert_eq!(apply_patch("a\r\nb\r\nc\r\n", patch).unwrap(), "a\r\nx\r\nc\r\n");

        // A CRLF patch against an LF base keeps the base's endings
        let patch = "@@ -2 +2 @@\r\n-b\r\n+x\r\n";
        assert_eq!(apply_patch("a\nb\n", patch).unwrap(), "a\nx\n");
    }

    #[test]
    fn test_new_file_takes_patch_line_endings() {
        let head = apply_patch("", "@@ -0,0 +1,2 @@\r\n+a\r\n+b\r\n").unwrap();
        assert_eq!(head, "a\r\nb\r\n");
    }

    #[test]
    fn test_crlf_without_trailing_newline() {
        let patch = "@@ -1,2 +1,2 @@\n a\n-b\n+c\n\\ No newline at end of file\n";
        assert_eq!(apply_patch("a\r\nb\r\n", patch).unwrap(), "a\r\nc");
    }

    #[test]
    fn test_hunk_out_of_range() {
        let err = apply_patch("a\n", "@@ -5,1 +5,1 @@\n-x\n+y\n").unwrap_err();
        assert_eq!(err, ApplyError::HunkOutOfRange { start: 5, base_lines: 1 });

        let err = apply_patch("a\n", "@@ -1,2 +1,2 @@\n a\n-b\n+c\n").unwrap_err();
        assert_eq!(err, ApplyError::HunkOutOfRange { start: 1, base_lines: 1 });
    }

    #[test]
    fn test_overlapping_hunks() {
        let patch = "@@ -1,2 +1,2 @@\n a\n-b\n+c\n@@ -2,1 +2,1 @@\n-b\n+d\n";
        let err = apply_patch("a\nb\n", patch).unwrap_err();
        assert_eq!(err, ApplyError::OverlappingHunk { start: 2 });
    }
}
