//! Presentation-level grouping of diff entries.
//!
//! Entries are bucketed per file, then a block deleted in one place
//! and an equivalently-named block added elsewhere in the same file is
//! fused into a single modified entry. The pairing key deliberately
//! ignores parameter lists, so a signature change reads as one
//! modification instead of two disconnected facts. The cost is that an
//! unrelated same-named add/remove pair can fuse too; that trade-off is
//! accepted, not worked around.

use crate::diff::{ChangeStatus, DiffEntry};

/// Entries for one file after grouping.
pub type FileEntries = (String, Vec<DiffEntry>);

/// Group a flat entry list by file and fuse split add/remove pairs.
///
/// File order follows first appearance in the input. Within a file,
/// entries sharing a normalized name form a bucket; a bucket of exactly
/// one added plus one removed entry collapses into a modified entry,
/// any other bucket shape passes through with its order preserved.
#[must_use]
pub fn group_entries(entries: Vec<DiffEntry>) -> Vec<FileEntries> {
    let mut files: Vec<FileEntries> = Vec::new();
    for entry in entries {
        match files.iter_mut().find(|(name, _)| *name == entry.file_name) {
            Some((_, bucket)) => bucket.push(entry),
            None => files.push((entry.file_name.clone(), vec![entry])),
        }
    }

    files
        .into_iter()
        .map(|(name, entries)| (name, fuse_moved_pairs(entries)))
        .collect()
}

/// Split entries into `(functions, classes)` on the leaf segment's
/// keyword. Applied before grouping by callers that present the two
/// kinds separately.
#[must_use]
pub fn split_by_kind(entries: Vec<DiffEntry>) -> (Vec<DiffEntry>, Vec<DiffEntry>) {
    entries.into_iter().partition(|entry| !is_class_entry(entry))
}

fn is_class_entry(entry: &DiffEntry) -> bool {
    leaf_segment(&entry.method_name).starts_with("class ")
}

/// The final path segment of a qualified key. Dots inside a parameter
/// list or superclass clause never split the key.
fn leaf_segment(method_name: &str) -> &str {
    let head_end = method_name
        .find(['(', ':'])
        .unwrap_or(method_name.len());
    let leaf_start = method_name[..head_end].rfind('.').map_or(0, |i| i + 1);
    &method_name[leaf_start..]
}

fn fuse_moved_pairs(entries: Vec<DiffEntry>) -> Vec<DiffEntry> {
    let mut buckets: Vec<(String, Vec<DiffEntry>)> = Vec::new();
    for entry in entries {
        let name = normalized_name(&entry.method_name).to_string();
        match buckets.iter_mut().find(|(key, _)| *key == name) {
            Some((_, bucket)) => bucket.push(entry),
            None => buckets.push((name, vec![entry])),
        }
    }

    let mut merged = Vec::new();
    for (_, bucket) in buckets {
        match fuse_pair(&bucket) {
            Some(fused) => merged.push(fused),
            None => merged.extend(bucket),
        }
    }
    merged
}

/// Collapse a bucket of exactly one added plus one removed entry into a
/// single modified entry. Any other shape is left alone.
fn fuse_pair(bucket: &[DiffEntry]) -> Option<DiffEntry> {
    let [first, second] = bucket else {
        return None;
    };
    let (added, removed) = match (first.status, second.status) {
        (ChangeStatus::Added, ChangeStatus::Removed) => (first, second),
        (ChangeStatus::Removed, ChangeStatus::Added) => (second, first),
        _ => return None,
    };

    let method_name = if added.method_name.is_empty() {
        removed.method_name.clone()
    } else {
        added.method_name.clone()
    };

    Some(DiffEntry {
        file_name: added.file_name.clone(),
        method_name,
        old_code: removed.old_code.clone(),
        new_code: added.new_code.clone(),
        status: ChangeStatus::Modified,
    })
}

/// Bare identifier path used only for pairing: a leading `class ` or
/// `def ` token is stripped (a dotted qualifier prefix is not), then
/// the name is truncated at the first `(` or `:`.
fn normalized_name(method_name: &str) -> &str {
    let stripped = method_name
        .strip_prefix("class ")
        .or_else(|| method_name.strip_prefix("def "))
        .unwrap_or(method_name);
    match stripped.find(['(', ':']) {
        Some(idx) => &stripped[..idx],
        None => stripped,
    }
}
