use crate::commands::CmdResult;
use crate::error::Result;
use crate::gallery::Gallery;
use crate::lifecycle::PhotoFilter;
use crate::store::{BlobStore, MetadataStore, SnapshotStore};
use chrono::{DateTime, Utc};

use super::helpers::indexed_photos;

/// List photos matching `filter`, in insertion order. Trashed entries carry
/// the days they have left before the sweep removes them.
pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &Gallery<B, M, S>,
    filter: PhotoFilter,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let listed = indexed_photos(gallery)
        .into_iter()
        .filter(|dp| filter.matches(&dp.photo))
        .map(|mut dp| {
            if dp.photo.is_deleted() {
                dp.days_left = gallery.days_left(&dp.photo, now);
            }
            dp
        })
        .collect();

    Ok(CmdResult::default().with_listed_photos(listed))
}
