//! Patches shared by the unit tests.

/// A 2-line JSON tail rewritten into a 3-line one.
pub(crate) const JSON_PATCH: &str = r#"@@ -1,5 +1,6 @@
 {
     "a": true,
     "b": [
-    ]
-}
+    ],
+    "c": false
+}
"#;

/// One insertion in the first hunk, one deletion in the second.
pub(crate) const MULTI_HUNK_PATCH: &str = "\
@@ -1,3 +1,4 @@ fn first()
 fn first() {
+    setup();
     run();
 }
@@ -20,4 +21,3 @@ fn second()
 fn second() {
-    let unused = 1;
     run();
 }
";

/// Adds one import line, deletes nothing.
pub(crate) const IMPORT_PATCH: &str = "\
@@ -8,6 +8,7 @@ use std::fmt;
 use std::io;
 use std::path::Path;
+use std::sync::Arc;
 
 use crate::model;
 use crate::parser;
 
";

/// Removes the whole five-line file.
pub(crate) const DELETE_ALL_PATCH: &str = "\
@@ -1,5 +0,0 @@
-one
-two
-three
-four
-five
";
