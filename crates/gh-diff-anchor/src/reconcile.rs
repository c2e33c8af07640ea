//! Place existing review comments on the live document.
//!
//! Two stages: the comment's patch position selects a line of the committed
//! PR diff, then the local-edit diff carries that head line to the buffer.
//! Comments whose line was deleted come out [`Anchor::Outdated`].

use crate::mapping::{get_diff_line_by_position, map_line};
use crate::model::{Anchor, DiffHunk, DiffSide, HeadLine, LineKind, LiveLine, ReviewComment};
use crate::parser::collect_hunks;

/// Resolve where a single comment lands in the live document.
pub fn resolve_anchor(comment: &ReviewComment, hunks: &[DiffHunk], content_diff: &str) -> Anchor {
    resolve_with_local_hunks(comment, hunks, &collect_hunks(content_diff))
}

/// The comment's current line in the live document, or `None` if outdated.
pub fn compute_absolute_position(
    comment: &ReviewComment,
    hunks: &[DiffHunk],
    content_diff: &str,
) -> Option<LiveLine> {
    resolve_anchor(comment, hunks, content_diff).live_line()
}

/// Recompute `absolute_position` for every comment.
///
/// Comments come back in input order; the local-edit diff is parsed once per
/// call and not retained.
pub fn map_comments_to_head(
    hunks: &[DiffHunk],
    content_diff: &str,
    comments: Vec<ReviewComment>,
) -> Vec<ReviewComment> {
    let local_hunks = collect_hunks(content_diff);

    comments
        .into_iter()
        .map(|mut comment| {
            let anchor = resolve_with_local_hunks(&comment, hunks, &local_hunks);
            comment.absolute_position = anchor.live_line();
            comment
        })
        .collect()
}

fn resolve_with_local_hunks(
    comment: &ReviewComment,
    hunks: &[DiffHunk],
    local_hunks: &[DiffHunk],
) -> Anchor {
    let Some(position) = comment.position else {
        log::debug!("Comment {} has no position, outdated", comment.id);
        return Anchor::Outdated;
    };

    let Some(line) = get_diff_line_by_position(hunks, position) else {
        log::debug!(
            "Comment {} points at position {} outside the patch",
            comment.id,
            position
        );
        return Anchor::Outdated;
    };

    let head = match (line.kind, line.new_line_number) {
        (LineKind::Context | LineKind::Add, Some(new)) => HeadLine::new(new),
        _ => {
            log::debug!(
                "Comment {} is anchored on a {:?} line, outdated",
                comment.id,
                line.kind
            );
            return Anchor::Outdated;
        }
    };

    let live = LiveLine::new(map_line(local_hunks, head.get(), DiffSide::Left));
    Anchor::Current { head, live }
}
