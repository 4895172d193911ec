use crate::commands::CmdResult;
use crate::error::Result;
use crate::gallery::Gallery;
use crate::index::PhotoSelector;
use crate::store::{BlobStore, MetadataStore, SnapshotStore};
use chrono::{DateTime, Utc};

use super::helpers::resolve_selectors;

pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &Gallery<B, M, S>,
    selectors: &[PhotoSelector],
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let photos = resolve_selectors(gallery, selectors)?
        .into_iter()
        .map(|mut dp| {
            dp.days_left = gallery.days_left(&dp.photo, now);
            dp
        })
        .collect();
    Ok(CmdResult::default().with_listed_photos(photos))
}
