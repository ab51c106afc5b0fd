//! Block-level classification between two versions of one file.

use std::collections::BTreeSet;

use crate::blocks::BlockMap;

/// Closed status tag for one block-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Removed,
    Modified,
}

/// One block-level change in one file.
///
/// Exactly one of `old_code`/`new_code` is `None` for added/removed
/// entries; both are populated for modified entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub file_name: String,
    /// Qualified block key
    pub method_name: String,
    pub old_code: Option<String>,
    pub new_code: Option<String>,
    pub status: ChangeStatus,
}

/// Classify every block across two versions of one file.
///
/// Works over the union of both key sets. Blocks present in both
/// versions with equal normalized code emit nothing; differing blocks
/// emit a modified entry carrying both codes verbatim, not normalized.
/// Emission order follows the key union; ordering guarantees, if any,
/// belong to the presentation layer.
#[must_use]
pub fn diff_blocks(file_name: &str, old: &BlockMap, new: &BlockMap) -> Vec<DiffEntry> {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    let mut entries = Vec::new();
    for key in keys {
        let entry = match (old.get(key), new.get(key)) {
            (Some(before), Some(after)) => {
                if normalize(&before.code) == normalize(&after.code) {
                    continue;
                }
                DiffEntry {
                    file_name: file_name.to_string(),
                    method_name: key.clone(),
                    old_code: Some(before.code.clone()),
                    new_code: Some(after.code.clone()),
                    status: ChangeStatus::Modified,
                }
            }
            (None, Some(after)) => DiffEntry {
                file_name: file_name.to_string(),
                method_name: key.clone(),
                old_code: None,
                new_code: Some(after.code.clone()),
                status: ChangeStatus::Added,
            },
            (Some(before), None) => DiffEntry {
                file_name: file_name.to_string(),
                method_name: key.clone(),
                old_code: Some(before.code.clone()),
                new_code: None,
                status: ChangeStatus::Removed,
            },
            (None, None) => continue,
        };
        entries.push(entry);
    }

    entries
}

/// Strip trailing whitespace, including trailing blank lines. Internal
/// whitespace is untouched, so a reformatted body counts as modified.
fn normalize(code: &str) -> &str {
    code.trim_end()
}
