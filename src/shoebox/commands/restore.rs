use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gallery::Gallery;
use crate::index::{DisplayIndex, PhotoSelector};
use crate::store::{BlobStore, MetadataStore, SnapshotStore};

use super::helpers::{indexed_photos, push_report_warnings, resolve_selectors};

/// Bring photos back from the trash. They keep their original position.
pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &mut Gallery<B, M, S>,
    selectors: &[PhotoSelector],
) -> Result<CmdResult> {
    let resolved = resolve_selectors(gallery, selectors)?;
    let mut result = CmdResult::default();

    for dp in resolved {
        let report = gallery.restore(&dp.photo.id);
        push_report_warnings(&mut result, &report);
        if report.photos.is_empty() {
            result.add_message(CmdMessage::info(format!(
                "Not in trash ({}): {}",
                dp.index, dp.photo.name
            )));
            continue;
        }

        // Report the index the photo has now, not the d-index it was picked by.
        let indexed = indexed_photos(gallery);
        let new_index = indexed
            .iter()
            .find(|p| p.photo.id == dp.photo.id && matches!(p.index, DisplayIndex::Regular(_)))
            .map(|p| p.index.to_string())
            .unwrap_or_else(|| "?".to_string());
        result.add_message(CmdMessage::success(format!(
            "Photo restored ({} -> {}): {}",
            dp.index, new_index, dp.photo.name
        )));
        result.affected_photos.extend(report.photos);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::delete;
    use crate::gallery::Settings;
    use crate::model::PhotoSource;
    use crate::store::memory::fixtures::{self, OWNER};
    use crate::store::memory::{MemBlobStore, MemMetadataStore, MemSnapshotStore};
    use crate::store::Snapshot;

    fn gallery(
        photos: Vec<crate::model::Photo>,
    ) -> Gallery<MemBlobStore, MemMetadataStore, MemSnapshotStore> {
        Gallery::open(
            OWNER,
            Settings::default(),
            None,
            MemBlobStore::new(),
            MemSnapshotStore::with_snapshot(Snapshot {
                photos,
                last_cleanup: None,
            }),
        )
        .unwrap()
    }

    #[test]
    fn restores_deleted_photo() {
        let mut g = gallery(vec![fixtures::photo("a.jpg", PhotoSource::Upload)]);
        delete::run(&mut g, &[PhotoSelector::Index(DisplayIndex::Regular(1))]).unwrap();
        assert!(g.active().is_empty());

        let result = run(&mut g, &[PhotoSelector::Index(DisplayIndex::Deleted(1))]).unwrap();

        assert_eq!(result.affected_photos.len(), 1);
        assert!(result.messages[0].content.contains("Photo restored (d1 -> 1): a.jpg"));
        let photo = &g.all()[0];
        assert!(photo.is_active());
        assert!(photo.deleted_at.is_none());
    }

    #[test]
    fn restored_photo_keeps_insertion_position() {
        let first = fixtures::trashed_photo("first.jpg", 1);
        let second = fixtures::photo("second.jpg", PhotoSource::Upload);
        let mut g = gallery(vec![first.clone(), second.clone()]);

        run(&mut g, &[PhotoSelector::Index(DisplayIndex::Deleted(1))]).unwrap();

        let names: Vec<String> = g.active().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["first.jpg", "second.jpg"]);
    }

    #[test]
    fn restoring_active_photo_is_a_noop() {
        let mut g = gallery(vec![fixtures::photo("a.jpg", PhotoSource::Upload)]);
        let result = run(&mut g, &[PhotoSelector::Index(DisplayIndex::Regular(1))]).unwrap();

        assert!(result.affected_photos.is_empty());
        assert!(result.messages[0].content.contains("Not in trash"));
    }
}
