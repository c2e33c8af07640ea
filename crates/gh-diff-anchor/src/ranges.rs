//! Which lines of a file may receive a new review comment.

use crate::model::{BaseLine, DiffHunk, DiffSide, HeadLine, LineKind, LineRange};

/// Commentable line ranges for one side of a file's diff.
///
/// - Base (`Left`): only runs of deleted lines; the pre-image is reviewed for
///   what was removed.
/// - Head (`Right`): every line a hunk spans, context included.
///
/// Ranges are 0-based, sorted and non-overlapping.
pub fn get_commenting_ranges(hunks: &[DiffHunk], side: DiffSide) -> Vec<LineRange> {
    let ranges = match side {
        DiffSide::Left => deleted_line_runs(hunks),
        DiffSide::Right => hunk_spans(hunks),
    };
    merge_overlapping(ranges)
}

fn deleted_line_runs(hunks: &[DiffHunk]) -> Vec<LineRange> {
    let mut ranges = Vec::new();

    for hunk in hunks {
        let mut open: Option<LineRange> = None;
        for line in hunk.content_lines() {
            match (line.kind, line.old_line_number) {
                (LineKind::Delete, Some(old)) => {
                    let index = BaseLine::new(old).zero_based();
                    open = Some(match open {
                        Some(run) => LineRange::new(run.start, index.max(run.start)),
                        None => LineRange::new(index, index),
                    });
                }
                _ => ranges.extend(open.take()),
            }
        }
        // The hunk may end while a run of deletions is still open
        ranges.extend(open.take());
    }

    ranges
}

fn hunk_spans(hunks: &[DiffHunk]) -> Vec<LineRange> {
    hunks
        .iter()
        .filter(|hunk| hunk.new_length > 0)
        .map(|hunk| {
            let last = hunk.new_line_number.saturating_add(hunk.new_length - 1);
            LineRange::new(
                HeadLine::new(hunk.new_line_number).zero_based(),
                HeadLine::new(last).zero_based(),
            )
        })
        .collect()
}

fn merge_overlapping(mut ranges: Vec<LineRange>) -> Vec<LineRange> {
    ranges.sort();
    let mut merged: Vec<LineRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}
