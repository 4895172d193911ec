use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gallery::{Gallery, Report};
use crate::store::{BlobStore, MetadataStore, SnapshotStore};
use chrono::{DateTime, Utc};

use super::helpers::push_report_warnings;

/// Sweep the trash now, whatever the schedule says.
pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &mut Gallery<B, M, S>,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let report = gallery.cleanup_at(now);
    Ok(summarize(gallery, report, true))
}

/// Sweep the trash only when the cleanup interval has elapsed. Quiet when
/// nothing was removed.
pub fn run_if_due<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &mut Gallery<B, M, S>,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    match gallery.run_scheduled_cleanup(now) {
        Some(report) => Ok(summarize(gallery, report, false)),
        None => Ok(CmdResult::default()),
    }
}

fn summarize<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &Gallery<B, M, S>,
    report: Report,
    verbose: bool,
) -> CmdResult {
    let mut result = CmdResult::default();
    let days = gallery.settings().retention.num_days();

    if report.photos.is_empty() {
        if verbose {
            result.add_message(CmdMessage::info(format!(
                "Nothing in the trash older than {} days.",
                days
            )));
        }
    } else {
        result.add_message(CmdMessage::success(format!(
            "Removed {} photo(s) trashed more than {} days ago.",
            report.photos.len(),
            days
        )));
    }
    push_report_warnings(&mut result, &report);
    result.affected_photos = report.photos;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::Settings;
    use crate::model::{Photo, PhotoSource};
    use crate::store::memory::fixtures::{self, OWNER};
    use crate::store::memory::{MemBlobStore, MemMetadataStore, MemSnapshotStore};
    use crate::store::Snapshot;
    use chrono::Duration;

    fn gallery(
        photos: Vec<Photo>,
        last_cleanup: Option<DateTime<Utc>>,
    ) -> Gallery<MemBlobStore, MemMetadataStore, MemSnapshotStore> {
        Gallery::open(
            OWNER,
            Settings::default(),
            None,
            MemBlobStore::new(),
            MemSnapshotStore::with_snapshot(Snapshot {
                photos,
                last_cleanup,
            }),
        )
        .unwrap()
    }

    #[test]
    fn removes_expired_and_keeps_recent() {
        let old = fixtures::trashed_photo("old.jpg", 11);
        let recent = fixtures::trashed_photo("recent.jpg", 9);
        let mut g = gallery(vec![old.clone(), recent.clone()], None);

        let result = run(&mut g, Utc::now()).unwrap();

        assert_eq!(result.affected_photos.len(), 1);
        assert_eq!(result.affected_photos[0].id, old.id);
        assert!(result.messages[0].content.contains("Removed 1 photo(s)"));
        assert_eq!(g.all(), &[recent]);
    }

    #[test]
    fn reports_empty_sweep() {
        let mut g = gallery(Vec::new(), None);
        let result = run(&mut g, Utc::now()).unwrap();
        assert!(result.messages[0].content.contains("Nothing in the trash"));
    }

    #[test]
    fn scheduled_run_waits_for_interval() {
        let now = Utc::now();
        let old = fixtures::trashed_photo("old.jpg", 20);
        let mut g = gallery(vec![old], Some(now - Duration::hours(2)));

        let result = run_if_due(&mut g, now).unwrap();
        assert!(result.affected_photos.is_empty());
        assert!(result.messages.is_empty());
        assert_eq!(g.all().len(), 1);

        let result = run_if_due(&mut g, now + Duration::hours(23)).unwrap();
        assert_eq!(result.affected_photos.len(), 1);
        assert!(g.all().is_empty());
        assert_eq!(g.last_cleanup(), Some(now + Duration::hours(23)));
    }

    #[test]
    fn scheduled_run_is_quiet_when_nothing_expired() {
        let live = fixtures::photo("live.jpg", PhotoSource::Upload);
        let mut g = gallery(vec![live], None);
        let result = run_if_due(&mut g, Utc::now()).unwrap();
        assert!(result.messages.is_empty());
        assert!(g.last_cleanup().is_some());
    }
}
