//! Tag rewriting pass
//!
//! Strips provenance and private attributes, then walks the file meta
//! group and the main dataset with one fixed rule per attribute:
//! removal-set identifiers are replaced, dates keep only their year and
//! times are zeroed.

mod meta;
mod rules;
mod uid;
mod walk;

pub use meta::{meta_as_tree, meta_builder, rewrite_file_meta};
pub use rules::{
    action_for, in_removal_set, rewrite_value, truncate_date, Action, ANON, ANONYMIZED_TIMES,
    DATE_SUFFIX, REMOVAL_SET, ZERO_TIME,
};
pub use uid::{generate_uid, is_valid_uid, MAX_UID_LENGTH, UUID_UID_ROOT};
pub use walk::{remove_private_tags, remove_provenance, rewrite_tree, WalkStats};

use crate::error::Result;
use dicom_object::{FileDicomObject, InMemDicomObject};
use log::debug;

/// Runs the whole rewriting pass on a file object
///
/// # Algorithm
///
/// 1. Remove the Original Attributes Sequence
/// 2. Remove private attributes at every depth
/// 3. Rewrite the file meta group
/// 4. Rewrite the main dataset
pub fn deidentify_tree(obj: &mut FileDicomObject<InMemDicomObject>) -> Result<WalkStats> {
    let mut stats = WalkStats::default();

    if remove_provenance(obj) {
        debug!("Removed Original Attributes Sequence");
    }
    stats.private_removed = remove_private_tags(obj);

    let (meta, meta_stats) = rewrite_file_meta(obj.meta())?;
    *obj.meta_mut() = meta;

    let dataset_stats = rewrite_tree(obj);
    stats.rewritten = meta_stats.rewritten + dataset_stats.rewritten;
    stats.items_visited = dataset_stats.items_visited;

    debug!(
        "Rewrote {} attributes, removed {} private attributes",
        stats.rewritten, stats.private_removed
    );
    Ok(stats)
}
