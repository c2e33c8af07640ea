//! Line-number conversion between the two sides of a patch.
//!
//! Two patches are in play when anchoring comments:
//!
//! - the PR patch, base → head, whose hunks are parsed once by the caller;
//! - the local-edit patch, head → live buffer, supplied as text on every call.
//!
//! All mappings are total: a line far from any hunk is shifted by the net
//! size change of the hunks above it.

use crate::model::{BaseLine, DiffHunk, DiffLine, DiffSide, HeadLine, LineKind, LiveLine};
use crate::parser::{collect_hunks, parse_diff_hunks};
use std::borrow::Borrow;

/// Map an old-side (pre-image) line of `patch` to the new side.
pub fn map_old_position_to_new(patch: &str, line: u32) -> u32 {
    map_line(parse_diff_hunks(patch), line, DiffSide::Left)
}

/// Map a new-side (post-image) line of `patch` to the old side.
pub fn map_new_position_to_old(patch: &str, line: u32) -> u32 {
    map_line(parse_diff_hunks(patch), line, DiffSide::Right)
}

/// Translate the base line of a parsed PR patch to head.
pub fn base_to_head(hunks: &[DiffHunk], line: BaseLine) -> HeadLine {
    HeadLine::new(map_line(hunks, line.get(), DiffSide::Left))
}

/// Translate the head line of a parsed PR patch to base.
pub fn head_to_base(hunks: &[DiffHunk], line: HeadLine) -> BaseLine {
    BaseLine::new(map_line(hunks, line.get(), DiffSide::Right))
}

/// Project a committed head line onto the live buffer through the local-edit patch.
pub fn head_to_live(content_diff: &str, line: HeadLine) -> LiveLine {
    LiveLine::new(map_old_position_to_new(content_diff, line.get()))
}

/// Map a live buffer line back to the committed head line it came from.
pub fn live_to_head(content_diff: &str, line: LiveLine) -> HeadLine {
    HeadLine::new(map_new_position_to_old(content_diff, line.get()))
}

/// Find the patch line at a given position, headers included.
pub fn get_diff_line_by_position(hunks: &[DiffHunk], position: u32) -> Option<&DiffLine> {
    hunks
        .iter()
        .flat_map(|hunk| hunk.diff_lines.iter())
        .find(|line| line.position_in_hunk == position)
}

/// Position in the PR patch at which a new comment on `line` of the live
/// buffer must be anchored.
///
/// `side` selects which line numbers of the PR patch are matched. Returns
/// `None` when the line is a purely local addition or does not appear in any
/// hunk (the hosting API only accepts comments inside the patch).
pub fn map_head_line_to_diff_hunk_position(
    hunks: &[DiffHunk],
    content_diff: &str,
    line: LiveLine,
    side: DiffSide,
) -> Option<u32> {
    let local_hunks = collect_hunks(content_diff);
    if is_unpaired_addition(&local_hunks, line.get()) {
        log::debug!("Live line {} only exists in the local buffer", line);
        return None;
    }

    let head = HeadLine::new(map_line(&local_hunks, line.get(), DiffSide::Right));
    hunks
        .iter()
        .flat_map(|hunk| hunk.content_lines())
        .find(|l| l.line_number(side) == Some(head.get()))
        .map(|l| l.position_in_hunk)
}

/// Walk `hunks` in order and translate `query` from side `from` to the other.
pub(crate) fn map_line<I>(hunks: I, query: u32, from: DiffSide) -> u32
where
    I: IntoIterator,
    I::Item: Borrow<DiffHunk>,
{
    let to = from.opposite();
    let query = i64::from(query);
    // Net (to - from) line offset of the hunks passed so far
    let mut delta: i64 = 0;

    for hunk in hunks {
        let hunk = hunk.borrow();
        let length = i64::from(hunk.length(from));
        let first = first_line(hunk, from);
        let last = first + length - 1;

        if query < first {
            break;
        }
        if last < query {
            delta += i64::from(hunk.length(to)) - length;
            continue;
        }

        return clamp(map_within_hunk(hunk, query, from).unwrap_or(query + delta));
    }

    clamp(query + delta)
}

/// Map `query` through the lines of the hunk that covers it.
///
/// Lines missing on one side come in change blocks: the removed lines of a
/// block pair up in order with its added lines. A line without a partner maps
/// to the first line after the block on the other side.
fn map_within_hunk(hunk: &DiffHunk, query: i64, from: DiffSide) -> Option<i64> {
    let to = from.opposite();
    let lines: Vec<&DiffLine> = hunk.content_lines().collect();
    let mut next_to = first_line(hunk, to);
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        if let (Some(number), Some(target)) = (line.line_number(from), line.line_number(to)) {
            if i64::from(number) >= query {
                return Some(i64::from(target));
            }
            next_to = i64::from(target) + 1;
            index += 1;
            continue;
        }

        let end = lines[index..]
            .iter()
            .position(|l| l.kind == LineKind::Context)
            .map_or(lines.len(), |offset| index + offset);
        let block = &lines[index..end];
        let to_count = block.iter().filter(|l| l.kind.exists_on(to)).count() as i64;
        let hit = block
            .iter()
            .filter_map(|l| l.line_number(from))
            .position(|number| i64::from(number) >= query);
        if let Some(rank) = hit {
            return Some(next_to + (rank as i64).min(to_count));
        }

        next_to += to_count;
        index = end;
    }

    None
}

/// First line a hunk covers on `side`; an empty side sits after its start line.
fn first_line(hunk: &DiffHunk, side: DiffSide) -> i64 {
    let start = i64::from(hunk.start(side));
    if hunk.length(side) == 0 {
        start + 1
    } else {
        start
    }
}

/// `true` when new-side `line` is an added line with no removed line to pair with.
fn is_unpaired_addition(hunks: &[DiffHunk], line: u32) -> bool {
    for hunk in hunks {
        let (mut deleted, mut added) = (0usize, 0usize);
        for diff_line in hunk.content_lines() {
            match diff_line.kind {
                LineKind::Delete => deleted += 1,
                LineKind::Add if diff_line.new_line_number == Some(line) => {
                    return added >= deleted;
                }
                LineKind::Add => added += 1,
                LineKind::Context => (deleted, added) = (0, 0),
                LineKind::Control => {}
            }
        }
    }
    false
}

fn clamp(line: i64) -> u32 {
    u32::try_from(line.max(0)).unwrap_or(u32::MAX)
}
