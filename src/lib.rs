//! Block-level diffs for unified patches.
//!
//! Instead of line runs, changes are reported per function or class:
//! a raw patch is reconstructed into per-file old/new text, both
//! versions are parsed into qualified block maps, and every block is
//! classified as added, removed or modified. A presentation pass then
//! fuses split add/remove pairs that describe the same logical unit.

use error_set::error_set;

pub mod blocks;
pub mod diff;
pub mod fetch;
pub mod group;
pub mod patch;
pub mod render;

pub use blocks::{Block, BlockKind, BlockMap, ExtractError};
pub use diff::{ChangeStatus, DiffEntry};
pub use fetch::{ContentSource, FetchError};
pub use group::FileEntries;
pub use patch::PatchFile;

error_set! {
    /// Top-level error for block diff operations
    BlockDiffError := {
        ExtractError(ExtractError),
        FetchError(FetchError),
    }
}

/// Compute grouped block-level changes from a raw unified diff.
///
/// Files whose reconstructions are both empty (a header with no hunks)
/// carry no effective change and contribute no entries.
///
/// # Examples
///
/// ```
/// let patch = "\
/// diff --git a/app.py b/app.py
/// --- a/app.py
/// +++ b/app.py
/// @@ -1,2 +1,2 @@
///  def foo():
/// -    pass
/// +    return 1
/// ";
/// let grouped = blockdiff::semantic_diff(patch).unwrap();
/// assert_eq!(grouped.len(), 1);
/// assert_eq!(grouped[0].0, "app.py");
/// assert_eq!(grouped[0].1[0].method_name, "def foo()");
/// ```
///
/// # Errors
///
/// Fails only when the syntax-tree producer does; malformed patch text
/// degrades to fewer entries instead of failing.
pub fn semantic_diff(patch_text: &str) -> Result<Vec<FileEntries>, BlockDiffError> {
    Ok(group::group_entries(block_entries(patch_text)?))
}

/// Flat, ungrouped block-level entries for every file in a raw patch.
///
/// Building block for callers that filter or re-group entries before
/// presentation (e.g. [`group::split_by_kind`]); [`semantic_diff`] is
/// the grouped convenience wrapper.
///
/// # Errors
///
/// Fails only when the syntax-tree producer does.
pub fn block_entries(patch_text: &str) -> Result<Vec<DiffEntry>, BlockDiffError> {
    let mut entries = Vec::new();
    for file in patch::parse_patch(patch_text) {
        if file.is_unchanged() {
            continue;
        }
        entries.extend(diff_sources(&file.file_name, &file.old_text, &file.new_text)?);
    }
    Ok(entries)
}

/// Block-level changes between two full versions of one file.
///
/// For callers that already hold both texts, e.g. fetched through a
/// [`ContentSource`] for a (base ref, head ref) pair.
///
/// # Examples
///
/// ```
/// let entries = blockdiff::diff_sources("app.py", "", "class A:\n    pass\n").unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].status, blockdiff::ChangeStatus::Added);
/// ```
///
/// # Errors
///
/// Fails only when the syntax-tree producer does.
pub fn diff_sources(
    file_name: &str,
    old_source: &str,
    new_source: &str,
) -> Result<Vec<DiffEntry>, BlockDiffError> {
    let old_map = blocks::extract(old_source)?;
    let new_map = blocks::extract(new_source)?;
    Ok(diff::diff_blocks(file_name, &old_map, &new_map))
}
