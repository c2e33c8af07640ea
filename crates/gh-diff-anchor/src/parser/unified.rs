//! Split multi-file unified diff output (as produced by `git diff`) into
//! per-file patches.

use super::collect_hunks;
use crate::model::{FileDiff, FileStatus};

/// Parse a multi-file unified diff into one [`FileDiff`] per file.
///
/// Each file's hunks are numbered from position `0`, matching the per-file
/// `patch` field of the hosting API. Text without any `diff --git` line but
/// with hunks is treated as a single file with an empty path.
///
/// # Example
/// ```
/// use gh_diff_anchor::parse_unified_diff;
///
/// let diff = "diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n@@ -1 +1 @@\n-x\n+y\n";
/// let files = parse_unified_diff(diff);
/// assert_eq!(files[0].path, "a.txt");
/// assert_eq!(files[0].additions, 1);
/// ```
pub fn parse_unified_diff(diff_text: &str) -> Vec<FileDiff> {
    let mut files = Vec::new();
    let mut current: Option<FileSection> = None;

    for line in diff_text.lines() {
        if let Some(paths) = line.strip_prefix("diff --git ") {
            if let Some(section) = current.take() {
                files.push(section.finish());
            }
            current = Some(FileSection::from_git_header(paths));
            continue;
        }

        match current.as_mut() {
            Some(section) => section.push(line),
            None if starts_file_content(line) => {
                let mut section = FileSection::anonymous();
                section.push(line);
                current = Some(section);
            }
            None => log::trace!("Skipping diff preamble line: {}", line),
        }
    }

    if let Some(section) = current {
        files.push(section.finish());
    }

    log::debug!("Parsed {} file(s) from unified diff", files.len());
    files
}

fn starts_file_content(line: &str) -> bool {
    line.starts_with("--- ") || line.starts_with("+++ ") || line.starts_with("@@")
}

/// One file's lines while the diff is being split.
struct FileSection {
    file: FileDiff,
    in_hunks: bool,
    patch: String,
}

impl FileSection {
    fn from_git_header(paths: &str) -> Self {
        let mut file = FileDiff::new("");
        // "a/old b/new"; paths may contain spaces, so split at the last " b/"
        if let Some((old, new)) = paths.rsplit_once(" b/") {
            file.path = new.to_string();
            let old = clean_path(old);
            if old != file.path {
                file.old_path = Some(old);
            }
        } else {
            file.path = clean_path(paths);
        }

        Self {
            file,
            in_hunks: false,
            patch: String::new(),
        }
    }

    fn anonymous() -> Self {
        Self {
            file: FileDiff::new(""),
            in_hunks: false,
            patch: String::new(),
        }
    }

    fn push(&mut self, line: &str) {
        if self.in_hunks || line.starts_with("@@") {
            self.in_hunks = true;
            self.patch.push_str(line);
            self.patch.push('\n');
            return;
        }

        let file = &mut self.file;
        if line.starts_with("new file mode") {
            file.status = FileStatus::Added;
        } else if line.starts_with("deleted file mode") {
            file.status = FileStatus::Deleted;
        } else if let Some(old) = line.strip_prefix("rename from ") {
            file.status = FileStatus::Renamed;
            file.old_path = Some(old.to_string());
        } else if let Some(new) = line.strip_prefix("rename to ") {
            file.path = new.to_string();
        } else if let Some(old) = line.strip_prefix("copy from ") {
            file.status = FileStatus::Copied;
            file.old_path = Some(old.to_string());
        } else if let Some(new) = line.strip_prefix("copy to ") {
            file.path = new.to_string();
        } else if let Some(source) = line.strip_prefix("--- ") {
            if strip_timestamp(source) == "/dev/null" {
                file.status = FileStatus::Added;
            }
        } else if let Some(target) = line.strip_prefix("+++ ") {
            let target = strip_timestamp(target);
            if target == "/dev/null" {
                file.status = FileStatus::Deleted;
            } else {
                file.path = clean_path(target);
            }
        } else if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
            file.is_binary = true;
        } else {
            log::trace!("Ignoring file header line: {}", line);
        }
    }

    fn finish(self) -> FileDiff {
        let mut file = self.file;
        if file.status == FileStatus::Modified
            && file.old_path.as_deref().is_some_and(|old| old != file.path)
        {
            file.status = FileStatus::Renamed;
        }
        if matches!(file.status, FileStatus::Added | FileStatus::Modified)
            && file.old_path.is_some()
        {
            file.old_path = None;
        }
        file.hunks = collect_hunks(&self.patch);
        file.patch = self.patch;
        file.recalculate_stats();
        file
    }
}

/// Drop the tab-separated timestamp some diff tools append to file headers.
fn strip_timestamp(path: &str) -> &str {
    path.split('\t').next().unwrap_or(path).trim_end()
}

/// Clean the path by removing a/b prefixes from git diff output.
fn clean_path(path: &str) -> String {
    let path = path.trim();

    if let Some(stripped) = path.strip_prefix("a/") {
        return stripped.to_string();
    }
    if let Some(stripped) = path.strip_prefix("b/") {
        return stripped.to_string();
    }

    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineKind;
    use pretty_assertions::assert_eq;

    const SAMPLE_DIFF: &str = r#"diff --git a/src/main.rs b/src/main.rs
index abc123..def456 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main()
 fn main() {
     println!("Hello");
+    println!("World");
 }
diff --git a/src/lib.rs b/src/lib.rs
index 111222..333444 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -10,5 +10,4 @@ impl Foo {
 impl Foo {
     fn bar(&self) {
-        // old comment
         self.do_thing();
     }
"#;

    #[test]
    fn test_parse_simple_diff() {
        let files = parse_unified_diff(SAMPLE_DIFF);
        assert_eq!(files.len(), 2);

        let first = &files[0];
        assert_eq!(first.path, "src/main.rs");
        assert_eq!(first.status, FileStatus::Modified);
        assert_eq!(first.old_path, None);
        assert_eq!((first.additions, first.deletions), (1, 0));
        assert_eq!(first.hunks.len(), 1);
        assert!(first.patch.starts_with("@@ -1,3 +1,4 @@"));
        assert_eq!(first.hunks[0].section_heading.as_deref(), Some("fn main()"));

        let second = &files[1];
        assert_eq!(second.path, "src/lib.rs");
        assert_eq!((second.additions, second.deletions), (0, 1));
    }

    #[test]
    fn test_positions_restart_per_file() {
        let files = parse_unified_diff(SAMPLE_DIFF);
        assert_eq!(files[1].hunks[0].position_in_hunk, 0);

        let deleted = files[1].hunks[0]
            .diff_lines
            .iter()
            .find(|l| l.kind == LineKind::Delete)
            .unwrap();
        assert_eq!(deleted.position_in_hunk, 3);
        assert_eq!(deleted.old_line_number, Some(12));
    }

    #[test]
    fn test_parse_new_file() {
        let diff = r#"diff --git a/new_file.rs b/new_file.rs
new file mode 100644
index 0000000..abc1234
--- /dev/null
+++ b/new_file.rs
@@ -0,0 +1,3 @@
+fn new_function() {
+    // new code
+}
"#;

        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Added);
        assert_eq!(files[0].additions, 3);
        assert_eq!(files[0].hunks[0].diff_lines[1].new_line_number, Some(1));
    }

    #[test]
    fn test_parse_deleted_file() {
        let diff = r#"diff --git a/old_file.rs b/old_file.rs
deleted file mode 100644
index abc1234..0000000
--- a/old_file.rs
+++ /dev/null
@@ -1,3 +0,0 @@
-fn old_function() {
-    // old code
-}
"#;

        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "old_file.rs");
        assert_eq!(files[0].status, FileStatus::Deleted);
        assert_eq!(files[0].deletions, 3);
    }

    #[test]
    fn test_parse_renamed_file() {
        let diff = r#"diff --git a/old_name.rs b/new_name.rs
similarity index 95%
rename from old_name.rs
rename to new_name.rs
index abc123..def456 100644
--- a/old_name.rs
+++ b/new_name.rs
@@ -1,3 +1,3 @@
 fn example() {
-    // old
+    // new
 }
"#;

        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);

        let file = &files[0];
        assert_eq!(file.path, "new_name.rs");
        assert_eq!(file.old_path, Some("old_name.rs".to_string()));
        assert_eq!(file.status, FileStatus::Renamed);
        assert_eq!(file.display_name(), "old_name.rs → new_name.rs");
    }

    #[test]
    fn test_parse_binary_file() {
        let diff = "diff --git a/logo.png b/logo.png\n\
                    index 1111111..2222222 100644\n\
                    Binary files a/logo.png and b/logo.png differ\n";

        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert!(files[0].is_binary);
        assert!(files[0].hunks.is_empty());
        assert_eq!(files[0].path, "logo.png");
    }

    #[test]
    fn test_bare_patch_is_single_file() {
        let files = parse_unified_diff("@@ -1 +1 @@\n-a\n+b\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "");
        assert_eq!(files[0].hunks.len(), 1);
    }

    #[test]
    fn test_empty_diff() {
        assert!(parse_unified_diff("").is_empty());
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("a/src/main.rs"), "src/main.rs");
        assert_eq!(clean_path("b/src/main.rs"), "src/main.rs");
        assert_eq!(clean_path("src/main.rs"), "src/main.rs");
        assert_eq!(clean_path("/dev/null"), "/dev/null");
    }

    #[test]
    fn test_strip_timestamp() {
        assert_eq!(strip_timestamp("b/file.txt\t2024-01-15 10:30:00"), "b/file.txt");
        assert_eq!(strip_timestamp("/dev/null"), "/dev/null");
    }
}
