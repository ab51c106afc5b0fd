//! Plain-text rendering of grouped block changes.

use crate::diff::ChangeStatus;
use crate::group::FileEntries;

/// Format grouped entries for terminal display: one section per file,
/// one labelled entry per block, code payloads prefixed with `-`/`+`.
#[must_use]
pub fn format_grouped(files: &[FileEntries]) -> String {
    let mut result = String::new();

    for (file_name, entries) in files {
        result.push_str(file_name);
        result.push_str(":\n");

        for entry in entries {
            result.push_str(&format!(
                "  {} {}\n",
                status_label(entry.status),
                entry.method_name
            ));
            if let Some(code) = &entry.old_code {
                push_code(&mut result, '-', code);
            }
            if let Some(code) = &entry.new_code {
                push_code(&mut result, '+', code);
            }
            result.push('\n');
        }
    }

    // Remove trailing blank separator if present
    if result.ends_with("\n\n") {
        result.pop();
    }

    result
}

fn status_label(status: ChangeStatus) -> &'static str {
    match status {
        ChangeStatus::Added => "added",
        ChangeStatus::Removed => "removed",
        ChangeStatus::Modified => "modified",
    }
}

fn push_code(out: &mut String, marker: char, code: &str) {
    for line in code.lines() {
        if line.is_empty() {
            out.push_str(&format!("    {marker}\n"));
        } else {
            out.push_str(&format!("    {marker} {line}\n"));
        }
    }
}
