//! Group review comments into threads.

use crate::model::{ReviewComment, ThreadKey};
use std::collections::{BTreeMap, HashMap};

/// Group comments by the `(path, position)` they hang off.
///
/// Replies follow their root comment's thread even when their own position
/// differs (the hosting API may report a reply with a stale position). Within
/// a thread comments keep their input order. Threads are ordered by path,
/// then position, with position-less comments first.
pub fn group_into_threads<I>(comments: I) -> BTreeMap<ThreadKey, Vec<ReviewComment>>
where
    I: IntoIterator<Item = ReviewComment>,
{
    let comments: Vec<ReviewComment> = comments.into_iter().collect();
    let roots: HashMap<u64, ThreadKey> = comments
        .iter()
        .filter(|c| c.in_reply_to_id.is_none())
        .map(|c| (c.id, ThreadKey::new(c.path.as_str(), c.position)))
        .collect();

    let mut threads: BTreeMap<ThreadKey, Vec<ReviewComment>> = BTreeMap::new();
    for comment in comments {
        let key = comment
            .in_reply_to_id
            .and_then(|root| roots.get(&root).cloned())
            .unwrap_or_else(|| ThreadKey::new(comment.path.as_str(), comment.position));
        threads.entry(key).or_default().push(comment);
    }

    log::debug!("Grouped comments into {} thread(s)", threads.len());
    threads
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(comments: &[ReviewComment]) -> Vec<u64> {
        comments.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_groups_by_path_and_position() {
        let threads = group_into_threads(vec![
            ReviewComment::new(1, "b.rs", Some(3), "first"),
            ReviewComment::new(2, "a.rs", Some(3), "other file"),
            ReviewComment::new(3, "b.rs", Some(3), "same line"),
            ReviewComment::new(4, "b.rs", Some(1), "earlier line"),
        ]);

        let keys: Vec<_> = threads.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                ThreadKey::new("a.rs", Some(3)),
                ThreadKey::new("b.rs", Some(1)),
                ThreadKey::new("b.rs", Some(3)),
            ]
        );
        assert_eq!(ids(&threads[&ThreadKey::new("b.rs", Some(3))]), vec![1, 3]);
    }

    #[test]
    fn test_zero_and_missing_positions_stay_apart() {
        let threads = group_into_threads(vec![
            ReviewComment::new(1, "a.rs", Some(0), "header"),
            ReviewComment::new(2, "a.rs", None, "outdated"),
        ]);
        assert_eq!(threads.len(), 2);
        assert_eq!(ids(&threads[&ThreadKey::new("a.rs", None)]), vec![2]);
        assert_eq!(ids(&threads[&ThreadKey::new("a.rs", Some(0))]), vec![1]);
    }

    #[test]
    fn test_replies_join_root_thread() {
        let threads = group_into_threads(vec![
            ReviewComment::new(10, "a.rs", Some(4), "root"),
            ReviewComment::new(11, "a.rs", None, "reply").replying_to(10),
            ReviewComment::new(12, "a.rs", Some(6), "reply").replying_to(10),
        ]);
        assert_eq!(threads.len(), 1);
        assert_eq!(ids(&threads[&ThreadKey::new("a.rs", Some(4))]), vec![10, 11, 12]);
    }

    #[test]
    fn test_orphan_reply_keeps_own_key() {
        let threads = group_into_threads(vec![
            ReviewComment::new(11, "a.rs", Some(2), "reply").replying_to(99)
        ]);
        assert_eq!(ids(&threads[&ThreadKey::new("a.rs", Some(2))]), vec![11]);
    }
}
