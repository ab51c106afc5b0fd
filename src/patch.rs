//! Unified diff parsing into per-file old/new reconstructions.
//!
//! A raw patch is processed line by line as a small state machine with
//! two states: between files and inside a hunk. The output is one
//! [`PatchFile`] per `diff --git` header, holding the newline-joined
//! reconstruction of each version restricted to hunk context. A patch
//! produced with little or no context therefore yields partial file
//! text; callers diff the two reconstructions against each other, never
//! against the true on-disk content.
//!
//! Malformed input never fails the parse. A header with an unparseable
//! path pair is skipped together with its hunk lines, and a header that
//! is never followed by a hunk yields a record with empty texts that
//! callers treat as "no effective change".

use nom::IResult;
use nom::Parser;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{digit1, one_of, space1};
use nom::combinator::eof;
use nom::multi::many1;

/// Old and new text of one file touched by a patch.
///
/// Immutable once built. Both texts are empty when no hunk contributed
/// a line; see [`PatchFile::is_unchanged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchFile {
    /// File name from the `b/` side of the header, prefix stripped
    pub file_name: String,
    /// Reconstructed old version (hunk-covered lines only)
    pub old_text: String,
    /// Reconstructed new version (hunk-covered lines only)
    pub new_text: String,
}

impl PatchFile {
    fn named(file_name: String) -> Self {
        PatchFile {
            file_name,
            old_text: String::new(),
            new_text: String::new(),
        }
    }

    /// True when no hunk contributed any line to either version.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.old_text.is_empty() && self.new_text.is_empty()
    }
}

/// Parse a raw unified diff into per-file reconstructions.
///
/// Recognized lines: `diff --git a/X b/Y` headers, `---`/`+++` file
/// markers (dropped), `@@` hunk markers, and hunk content prefixed with
/// `' '`, `'-'` or `'+'`. Context lines land in both texts, removals in
/// the old text only, additions in the new text only, each followed by
/// a newline. Diffstat summary lines embedded in a hunk are treated as
/// noise and dropped.
#[must_use]
pub fn parse_patch(patch_text: &str) -> Vec<PatchFile> {
    let mut files = Vec::new();
    let mut current: Option<PatchFile> = None;
    let mut in_hunk = false;

    for line in patch_text.lines() {
        if line.starts_with("diff --git ") {
            if let Some(file) = current.take() {
                files.push(file);
            }
            in_hunk = false;
            current = header_file_name(line).map(PatchFile::named);
        } else if line.starts_with("--- ") || line.starts_with("+++ ") {
            // File markers carry no content
        } else if line.starts_with("@@") {
            in_hunk = true;
        } else if in_hunk && !is_stat_line(line) {
            let Some(file) = current.as_mut() else {
                continue;
            };
            if let Some(content) = line.strip_prefix(' ') {
                push_line(&mut file.old_text, content);
                push_line(&mut file.new_text, content);
            } else if let Some(content) = line.strip_prefix('-') {
                push_line(&mut file.old_text, content);
            } else if let Some(content) = line.strip_prefix('+') {
                push_line(&mut file.new_text, content);
            }
        }
    }

    if let Some(file) = current.take() {
        files.push(file);
    }

    files
}

fn push_line(text: &mut String, content: &str) {
    text.push_str(content);
    text.push('\n');
}

/// Extract the `b/` side of a `diff --git a/<p1> b/<p2>` header.
///
/// Returns `None` when the path pair cannot be split, which makes the
/// caller skip everything up to the next parseable header.
fn header_file_name(line: &str) -> Option<String> {
    let (_, (_, new_path)) = header_paths(line).ok()?;
    if new_path.is_empty() {
        return None;
    }
    Some(new_path.to_string())
}

/// Split a header line into its `(old, new)` path pair. The remainder
/// after ` b/` is consumed whole as the new path.
fn header_paths(line: &str) -> IResult<&str, (&str, &str)> {
    let (new_path, (_, old_path, _)) =
        (tag("diff --git a/"), take_until(" b/"), tag(" b/")).parse(line)?;
    Ok(("", (old_path, new_path)))
}

/// Diffstat summary noise: whitespace, a pipe, a change count and a
/// `+`/`-` bar ending the line (e.g. ` src/x.py | 4 ++--`). Some tools
/// prepend the stat block to the patch body, so these are dropped even
/// inside a hunk.
fn is_stat_line(line: &str) -> bool {
    line.match_indices('|').any(|(idx, _)| {
        line[..idx].ends_with(|c: char| c.is_whitespace()) && stat_tail(&line[idx..]).is_ok()
    })
}

fn stat_tail(input: &str) -> IResult<&str, ()> {
    let (rest, _) = (tag("|"), space1, digit1, space1, many1(one_of("+-")), eof).parse(input)?;
    Ok((rest, ()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn parse_single_file_reconstruction() {
        let patch = r#"diff --git a/app.py b/app.py
index 83db48f..bf269f4 100644
--- a/app.py
+++ b/app.py
@@ -1,3 +1,3 @@
 def foo():
-    pass
+    return 1
 # trailing comment
"#;
        let files = parse_patch(patch);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "app.py");
        assert_eq!(files[0].old_text, "def foo():\n    pass\n# trailing comment\n");
        assert_eq!(files[0].new_text, "def foo():\n    return 1\n# trailing comment\n");
    }

    #[test]
    fn parse_multiple_files() {
        let patch = r#"diff --git a/first.py b/first.py
--- a/first.py
+++ b/first.py
@@ -1 +1 @@
-a = 1
+a = 2
diff --git a/second.py b/second.py
--- a/second.py
+++ b/second.py
@@ -1 +1 @@
-b = 1
+b = 2
"#;
        let files = parse_patch(patch);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name, "first.py");
        assert_eq!(files[0].old_text, "a = 1\n");
        assert_eq!(files[1].file_name, "second.py");
        assert_eq!(files[1].new_text, "b = 2\n");
    }

    #[test]
    fn file_name_comes_from_new_side() {
        let patch = "diff --git a/old_name.py b/new_name.py\n@@ -1 +1 @@\n-x\n+y\n";
        let files = parse_patch(patch);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "new_name.py");
    }

    #[test]
    fn header_without_hunks_is_unchanged() {
        let patch = "diff --git a/app.py b/app.py\nindex 83db48f..bf269f4 100644\n--- a/app.py\n+++ b/app.py\n";
        let files = parse_patch(patch);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].old_text, "");
        assert_eq!(files[0].new_text, "");
        assert!(files[0].is_unchanged());
    }

    #[test]
    fn unparseable_header_skips_to_next_file() {
        let patch = "diff --git broken-header-line\n@@ -1 +1 @@\n-x\n+y\ndiff --git a/ok.py b/ok.py\n--- a/ok.py\n+++ b/ok.py\n@@ -1 +1 @@\n-a = 1\n+a = 2\n";
        let files = parse_patch(patch);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "ok.py");
        assert_eq!(files[0].old_text, "a = 1\n");
        assert_eq!(files[0].new_text, "a = 2\n");
    }

    #[test]
    fn stat_lines_are_dropped_inside_hunks() {
        let patch =
            "diff --git a/app.py b/app.py\n@@ -1,2 +1,2 @@\n keep = True\n src/x.py | 4 ++--\n-x = 1\n+x = 2\n";
        let files = parse_patch(patch);
        assert_eq!(files[0].old_text, "keep = True\nx = 1\n");
        assert_eq!(files[0].new_text, "keep = True\nx = 2\n");
    }

    #[test]
    fn lines_before_first_hunk_are_ignored() {
        let patch = "diff --git a/app.py b/app.py\nnew file mode 100644\nindex 0000000..d5f7fc3\nstray content\n@@ -0,0 +1 @@\n+x = 1\n";
        let files = parse_patch(patch);
        assert_eq!(files[0].old_text, "");
        assert_eq!(files[0].new_text, "x = 1\n");
    }

    #[test]
    fn hunk_mode_persists_across_hunks() {
        let patch = "diff --git a/app.py b/app.py\n@@ -1 +1 @@\n-a = 1\n+a = 2\n@@ -9 +9 @@\n-z = 1\n+z = 2\n";
        let files = parse_patch(patch);
        assert_eq!(files[0].old_text, "a = 1\nz = 1\n");
        assert_eq!(files[0].new_text, "a = 2\nz = 2\n");
    }

    #[test]
    fn additions_only_on_empty_base() {
        let patch = "diff --git a/new.py b/new.py\n--- /dev/null\n+++ b/new.py\n@@ -0,0 +1,2 @@\n+def foo():\n+    pass\n";
        let files = parse_patch(patch);
        assert_eq!(files[0].old_text, "");
        assert_eq!(files[0].new_text, "def foo():\n    pass\n");
    }

    #[test]
    fn empty_patch_yields_no_files() {
        assert_eq!(parse_patch(""), vec![]);
    }

    #[test]
    fn content_resembling_markers_is_kept_verbatim() {
        let patch = "diff --git a/app.py b/app.py\n@@ -1 +1,2 @@\n-x = \"a|b\"\n+x = \"a|b\"\n+y = \"-- not a marker\"\n";
        let files = parse_patch(patch);
        assert_eq!(files[0].old_text, "x = \"a|b\"\n");
        assert_eq!(files[0].new_text, "x = \"a|b\"\ny = \"-- not a marker\"\n");
    }

    #[test]
    fn stat_tail_requires_full_shape() {
        assert!(is_stat_line(" src/x.py | 4 ++--"));
        assert!(is_stat_line(" a.py | 12 +"));
        assert!(!is_stat_line("x = a | b"));
        assert!(!is_stat_line(" src/x.py | ++--"));
        assert!(!is_stat_line(" src/x.py | 4"));
        assert!(!is_stat_line("|4 ++"));
    }
}
