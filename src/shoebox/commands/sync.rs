use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gallery::Gallery;
use crate::store::{BlobStore, MetadataStore, SnapshotStore};

use super::helpers::push_report_warnings;

/// Push photos that were kept locally to the backing store.
pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &mut Gallery<B, M, S>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !gallery.has_remote() {
        result.add_message(CmdMessage::info(
            "No backing store configured (see `shoebox config remote-root`).",
        ));
        return Ok(result);
    }

    let report = gallery.sync();
    if report.photos.is_empty() && report.unchanged.is_empty() {
        result.add_message(CmdMessage::info("Everything is already synced."));
        return Ok(result);
    }

    for photo in &report.photos {
        result.add_message(CmdMessage::success(format!("Synced: {}", photo.name)));
    }
    push_report_warnings(&mut result, &report);
    if !report.unchanged.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "{} photo(s) still kept locally.",
            report.unchanged.len()
        )));
    }
    result.affected_photos = report.photos;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Settings;
    use crate::model::{NewPhoto, Persistence, PhotoSource};
    use crate::store::memory::fixtures::OWNER;
    use crate::store::memory::{MemBlobStore, MemMetadataStore, MemSnapshotStore};
    use crate::store::Remote;

    fn gallery() -> Gallery<MemBlobStore, MemMetadataStore, MemSnapshotStore> {
        Gallery::open(
            OWNER,
            Settings::default(),
            Some(Remote::new(MemBlobStore::new(), MemMetadataStore::new())),
            MemBlobStore::new(),
            MemSnapshotStore::new(),
        )
        .unwrap()
    }

    #[test]
    fn syncs_after_backing_store_recovers() {
        let mut g = gallery();
        g.remote().unwrap().blobs.set_fail_writes(true);
        g.add(vec![NewPhoto::new("a.jpg", vec![0u8; 16])], PhotoSource::Upload);

        let result = run(&mut g).unwrap();
        assert!(result.affected_photos.is_empty());
        assert!(result.has_warnings());
        assert_eq!(g.all()[0].persistence, Persistence::Local);

        g.remote().unwrap().blobs.set_fail_writes(false);
        let result = run(&mut g).unwrap();
        assert_eq!(result.affected_photos.len(), 1);
        assert!(result.messages[0].content.contains("Synced: a.jpg"));
        assert_eq!(g.all()[0].persistence, Persistence::Remote);
    }

    #[test]
    fn nothing_to_sync() {
        let mut g = gallery();
        let result = run(&mut g).unwrap();
        assert!(result.messages[0].content.contains("already synced"));
    }
}
