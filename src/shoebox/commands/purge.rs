use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gallery::Gallery;
use crate::index::{DisplayIndex, DisplayPhoto, PhotoSelector};
use crate::store::{BlobStore, MetadataStore, SnapshotStore};

use super::helpers::{indexed_photos, push_report_warnings, resolve_selectors};

/// Photos a purge would remove: the given selectors, or the whole trash.
fn targets<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &Gallery<B, M, S>,
    selectors: &[PhotoSelector],
) -> Result<Vec<DisplayPhoto>> {
    if selectors.is_empty() {
        return Ok(indexed_photos(gallery)
            .into_iter()
            .filter(|dp| matches!(dp.index, DisplayIndex::Deleted(_)))
            .collect());
    }
    resolve_selectors(gallery, selectors)
}

/// List what `run` would remove, without touching anything.
pub fn preview<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &Gallery<B, M, S>,
    selectors: &[PhotoSelector],
) -> Result<CmdResult> {
    let targets = targets(gallery, selectors)?;
    let mut result = CmdResult::default();
    if targets.is_empty() {
        result.add_message(CmdMessage::info("No photos to purge."));
        return Ok(result);
    }
    result.add_message(CmdMessage::info(
        "This will permanently remove the following photos (re-run with --yes):",
    ));
    Ok(result.with_listed_photos(targets))
}

/// Permanently delete the selected photos, active or trashed. With no
/// selectors, empty the trash.
pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &mut Gallery<B, M, S>,
    selectors: &[PhotoSelector],
) -> Result<CmdResult> {
    let targets = targets(gallery, selectors)?;
    let mut result = CmdResult::default();
    if targets.is_empty() {
        result.add_message(CmdMessage::info("No photos to purge."));
        return Ok(result);
    }

    let mut removed = Vec::with_capacity(targets.len());
    if selectors.is_empty() {
        let report = gallery.empty_trash();
        push_report_warnings(&mut result, &report);
        removed = report.photos;
    } else {
        for dp in &targets {
            let report = gallery.permanently_delete(&dp.photo.id);
            push_report_warnings(&mut result, &report);
            removed.extend(report.photos);
        }
    }

    for dp in &targets {
        if removed.iter().any(|p| p.id == dp.photo.id) {
            result.add_message(CmdMessage::success(format!(
                "Purged: {} {}",
                dp.index, dp.photo.name
            )));
        }
    }
    result.affected_photos = removed;

    Ok(result)
}
