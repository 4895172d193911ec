use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gallery::Gallery;
use crate::index::PhotoSelector;
use crate::store::{BlobStore, MetadataStore, SnapshotStore};

use super::helpers::{push_report_warnings, resolve_selectors};

/// Move photos to the trash.
pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &mut Gallery<B, M, S>,
    selectors: &[PhotoSelector],
) -> Result<CmdResult> {
    let resolved = resolve_selectors(gallery, selectors)?;
    let mut result = CmdResult::default();
    let retention_days = gallery.settings().retention.num_days();

    for dp in resolved {
        let report = gallery.soft_delete(&dp.photo.id);
        if report.photos.is_empty() {
            result.add_message(CmdMessage::info(format!(
                "Already in trash ({}): {}",
                dp.index, dp.photo.name
            )));
        } else {
            result.add_message(CmdMessage::success(format!(
                "Photo deleted ({}): {}",
                dp.index, dp.photo.name
            )));
        }
        push_report_warnings(&mut result, &report);
        result.affected_photos.extend(report.photos);
    }

    if !result.affected_photos.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Deleted photos are removed for good after {} days.",
            retention_days
        )));
    }

    Ok(result)
}
