//! # Photo Lifecycle Store
//!
//! [`Gallery`] owns the authoritative photo collection for one owner. It is
//! constructed once at startup with [`Gallery::open`] and passed around by
//! reference; there is no global state.
//!
//! Every mutation follows the same three steps:
//!
//! 1. Attempt the paired call on the backing store, if one is configured.
//! 2. Apply the [`Transition`] to the collection, whatever step 1 returned.
//! 3. Mirror the collection into the local snapshot.
//!
//! Failures in steps 1 and 3 are logged and returned as warnings in the
//! [`Report`]; they never abort the operation. Missing ids are reported, not
//! raised.

use crate::error::{Result, ShoeboxError};
use crate::lifecycle::{self, PhotoFilter, Transition};
use crate::model::{NewPhoto, Persistence, Photo, PhotoPatch, PhotoSource, PhotoStatus};
use crate::store::{BlobStore, MetadataStore, Remote, Snapshot, SnapshotStore};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub retention: Duration,
    pub cleanup_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            retention: lifecycle::retention(lifecycle::DEFAULT_RETENTION_DAYS),
            cleanup_interval: Duration::hours(i64::from(
                lifecycle::DEFAULT_CLEANUP_INTERVAL_HOURS,
            )),
        }
    }
}

/// What a lifecycle operation did.
#[derive(Debug, Default)]
pub struct Report {
    /// Records the operation changed, as they look afterwards. Removed records
    /// are listed as they were just before removal.
    pub photos: Vec<Photo>,
    /// Ids that matched no record.
    pub missing: Vec<Uuid>,
    /// Records that were already in the requested state.
    pub unchanged: Vec<Photo>,
    /// Input files that could not be stored anywhere, with the reason.
    pub skipped: Vec<(String, String)>,
    /// Absorbed failures, for user-facing notices.
    pub warnings: Vec<String>,
}

impl Report {
    fn warn(&mut self, context: &str, err: &ShoeboxError) {
        warn!("{}: {}", context, err);
        self.warnings.push(format!("{}: {}", context, err));
    }

    fn merge(&mut self, other: Report) {
        self.photos.extend(other.photos);
        self.missing.extend(other.missing);
        self.unchanged.extend(other.unchanged);
        self.skipped.extend(other.skipped);
        self.warnings.extend(other.warnings);
    }
}

pub struct Gallery<B: BlobStore, M: MetadataStore, S: SnapshotStore> {
    owner: String,
    settings: Settings,
    remote: Option<Remote<B, M>>,
    local_blobs: B,
    snapshots: S,
    photos: Vec<Photo>,
    last_cleanup: Option<DateTime<Utc>>,
    /// Set when startup had to fall back to the snapshot.
    offline: bool,
}

impl<B: BlobStore, M: MetadataStore, S: SnapshotStore> Gallery<B, M, S> {
    /// Load the collection: from the backing store when it answers, from the
    /// local snapshot otherwise.
    ///
    /// Local-only records in the snapshot are kept alongside the remote rows,
    /// since the backing store never saw them. Only an unreadable snapshot is
    /// an error: starting empty would overwrite it on the next mutation.
    pub fn open(
        owner: impl Into<String>,
        settings: Settings,
        remote: Option<Remote<B, M>>,
        local_blobs: B,
        snapshots: S,
    ) -> Result<Self> {
        let owner = owner.into();
        let snapshot = snapshots.load()?.unwrap_or_default();

        let mut offline = false;
        let photos = match &remote {
            Some(r) => match r.metadata.list(&owner) {
                Ok(rows) => {
                    let mut photos = rows;
                    let local_only: Vec<Photo> = snapshot
                        .photos
                        .iter()
                        .filter(|p| p.persistence == Persistence::Local)
                        .filter(|p| !photos.iter().any(|r| r.id == p.id))
                        .cloned()
                        .collect();
                    photos.extend(local_only);
                    photos
                }
                Err(e) => {
                    warn!("Backing store unavailable, using local snapshot: {}", e);
                    offline = true;
                    snapshot.photos.clone()
                }
            },
            None => {
                debug!("No backing store configured, using local snapshot");
                snapshot.photos.clone()
            }
        };

        let photos = photos.into_iter().filter_map(normalize).collect();

        Ok(Self {
            owner,
            settings,
            remote,
            local_blobs,
            snapshots,
            photos,
            last_cleanup: snapshot.last_cleanup,
            offline,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn remote(&self) -> Option<&Remote<B, M>> {
        self.remote.as_ref()
    }

    pub fn local_blobs(&self) -> &B {
        &self.local_blobs
    }

    pub fn last_cleanup(&self) -> Option<DateTime<Utc>> {
        self.last_cleanup
    }

    /// The whole collection, in insertion order.
    pub fn all(&self) -> &[Photo] {
        &self.photos
    }

    pub fn get(&self, id: &Uuid) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == *id)
    }

    pub fn photos(&self, filter: PhotoFilter) -> Vec<Photo> {
        lifecycle::filter(&self.photos, filter)
    }

    pub fn active(&self) -> Vec<Photo> {
        self.photos(PhotoFilter::Active)
    }

    pub fn deleted(&self) -> Vec<Photo> {
        self.photos(PhotoFilter::Deleted)
    }

    pub fn uploads(&self) -> Vec<Photo> {
        self.photos(PhotoFilter::Uploads)
    }

    pub fn captures(&self) -> Vec<Photo> {
        self.photos(PhotoFilter::Camera)
    }

    /// Days before the cleanup sweep removes a trashed record.
    pub fn days_left(&self, photo: &Photo, now: DateTime<Utc>) -> Option<i64> {
        lifecycle::days_left(photo, now, self.settings.retention)
    }

    /// Store each file and append a record for it. A file the backing store
    /// rejects is kept locally instead; the batch always runs to the end.
    pub fn add(&mut self, files: Vec<NewPhoto>, source: PhotoSource) -> Report {
        let mut report = Report::default();
        let mut added = Vec::with_capacity(files.len());

        for file in files {
            let mut photo = Photo::new(&self.owner, &file.name, file.bytes.len() as u64, source);

            match self.store_remote(&mut photo, &file.bytes) {
                Ok(()) => {
                    photo.persistence = Persistence::Remote;
                }
                Err(e) => {
                    if self.remote.is_some() {
                        report.warn(&format!("Upload of {} failed, kept locally", file.name), &e);
                    }
                    match self.local_blobs.put(&photo.blob_key, &file.bytes) {
                        Ok(url) => {
                            photo.url = url;
                            photo.persistence = Persistence::Local;
                        }
                        Err(e) => {
                            warn!("Could not store {} locally: {}", file.name, e);
                            report.skipped.push((file.name, e.to_string()));
                            continue;
                        }
                    }
                }
            }

            debug!(id = %photo.id, name = %photo.name, source = %source, "photo added");
            added.push(photo);
        }

        report.photos = added.clone();
        self.apply(Transition::Add(added), &mut report);
        report
    }

    fn store_remote(&self, photo: &mut Photo, bytes: &[u8]) -> Result<()> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| ShoeboxError::Store("No backing store configured".to_string()))?;

        photo.url = remote.blobs.put(&photo.blob_key, bytes)?;
        if let Err(e) = remote.metadata.insert(&self.owner, photo) {
            // Don't leave an orphaned binary behind.
            let _ = remote.blobs.delete(&photo.blob_key);
            return Err(e);
        }
        Ok(())
    }

    pub fn soft_delete(&mut self, id: &Uuid) -> Report {
        self.soft_delete_at(id, Utc::now())
    }

    pub fn soft_delete_at(&mut self, id: &Uuid, at: DateTime<Utc>) -> Report {
        let mut report = Report::default();
        let Some(photo) = self.get(id).cloned() else {
            report.missing.push(*id);
            return report;
        };
        if !photo.is_active() {
            report.unchanged.push(photo);
            return report;
        }

        self.patch_remote(&photo, &PhotoPatch::deleted(at), &mut report);
        self.apply(Transition::SoftDelete { id: *id, at }, &mut report);
        report.photos.extend(self.get(id).cloned());
        report
    }

    pub fn restore(&mut self, id: &Uuid) -> Report {
        let mut report = Report::default();
        let Some(photo) = self.get(id).cloned() else {
            report.missing.push(*id);
            return report;
        };
        if !photo.is_deleted() {
            report.unchanged.push(photo);
            return report;
        }

        self.patch_remote(&photo, &PhotoPatch::restored(), &mut report);
        self.apply(Transition::Restore { id: *id }, &mut report);
        report.photos.extend(self.get(id).cloned());
        report
    }

    fn patch_remote(&self, photo: &Photo, patch: &PhotoPatch, report: &mut Report) {
        if photo.persistence != Persistence::Remote {
            return;
        }
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.metadata.update(&self.owner, &photo.id, patch) {
                report.warn(&format!("Could not update {} in backing store", photo.name), &e);
            }
        }
    }

    /// Remove a record and release its binary. Unknown ids are a no-op.
    pub fn permanently_delete(&mut self, id: &Uuid) -> Report {
        self.remove(&[*id])
    }

    fn remove(&mut self, ids: &[Uuid]) -> Report {
        let mut report = Report::default();
        let mut removed = Vec::new();

        for id in ids {
            let Some(photo) = self.get(id).cloned() else {
                report.missing.push(*id);
                continue;
            };
            self.release(&photo, &mut report);
            removed.push(photo);
        }

        if removed.is_empty() {
            return report;
        }
        let ids = removed.iter().map(|p| p.id).collect();
        report.photos = removed;
        self.apply(Transition::Remove { ids }, &mut report);
        report
    }

    fn release(&self, photo: &Photo, report: &mut Report) {
        match (photo.persistence, &self.remote) {
            (Persistence::Remote, Some(remote)) => {
                if let Err(e) = remote.blobs.delete(&photo.blob_key) {
                    report.warn(&format!("Could not delete binary of {}", photo.name), &e);
                }
                if let Err(e) = remote.metadata.delete(&self.owner, &photo.id) {
                    report.warn(&format!("Could not delete row of {}", photo.name), &e);
                }
            }
            (Persistence::Remote, None) => {
                debug!(id = %photo.id, "no backing store to release from");
            }
            (Persistence::Local, _) => {
                if let Err(e) = self.local_blobs.delete(&photo.blob_key) {
                    report.warn(&format!("Could not delete local copy of {}", photo.name), &e);
                }
            }
        }
    }

    /// Permanently delete every trashed record past the retention window.
    pub fn cleanup(&mut self) -> Report {
        self.cleanup_at(Utc::now())
    }

    pub fn cleanup_at(&mut self, now: DateTime<Utc>) -> Report {
        let expired = lifecycle::expired(&self.photos, now, self.settings.retention);
        let mut report = self.remove(&expired);
        self.last_cleanup = Some(now);
        self.persist(&mut report);
        info!(removed = report.photos.len(), "trash cleanup finished");
        report
    }

    pub fn cleanup_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_cleanup {
            None => true,
            Some(last) => now - last >= self.settings.cleanup_interval,
        }
    }

    /// Run the sweep only if the schedule says it is time.
    pub fn run_scheduled_cleanup(&mut self, now: DateTime<Utc>) -> Option<Report> {
        if self.cleanup_due(now) {
            Some(self.cleanup_at(now))
        } else {
            None
        }
    }

    /// Permanently delete everything in the trash, regardless of age.
    pub fn empty_trash(&mut self) -> Report {
        let ids: Vec<Uuid> = self.deleted().iter().map(|p| p.id).collect();
        self.remove(&ids)
    }

    /// Push local-only records to the backing store. Safe to re-run after a
    /// partial failure: rows that already made it are not inserted twice.
    pub fn sync(&mut self) -> Report {
        let mut report = Report::default();
        let pending: Vec<Photo> = self
            .photos
            .iter()
            .filter(|p| p.persistence == Persistence::Local)
            .cloned()
            .collect();

        if pending.is_empty() {
            return report;
        }
        if self.remote.is_none() {
            report.unchanged = pending;
            return report;
        }

        for photo in pending {
            match self.promote(&photo) {
                Ok(url) => {
                    if let Err(e) = self.local_blobs.delete(&photo.blob_key) {
                        report.warn(&format!("Could not drop local copy of {}", photo.name), &e);
                    }
                    let mut step = Report::default();
                    self.apply(
                        Transition::Promote {
                            id: photo.id,
                            url,
                        },
                        &mut step,
                    );
                    report.merge(step);
                    report.photos.extend(self.get(&photo.id).cloned());
                }
                Err(e) => {
                    report.warn(&format!("Could not sync {}", photo.name), &e);
                    report.unchanged.push(photo);
                }
            }
        }
        report
    }

    fn promote(&self, photo: &Photo) -> Result<String> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| ShoeboxError::Store("No backing store configured".to_string()))?;
        let bytes = self.local_blobs.get(&photo.blob_key)?;
        let url = remote.blobs.put(&photo.blob_key, &bytes)?;

        let mut row = photo.clone();
        row.url = url.clone();
        row.persistence = Persistence::Remote;
        if !remote.metadata.exists(&self.owner, &photo.id)? {
            if let Err(e) = remote.metadata.insert(&self.owner, &row) {
                // The local copy is still authoritative; drop the upload.
                let _ = remote.blobs.delete(&photo.blob_key);
                return Err(e);
            }
        }
        Ok(url)
    }

    /// The single entry point for collection changes.
    fn apply(&mut self, transition: Transition, report: &mut Report) {
        let current = std::mem::take(&mut self.photos);
        self.photos = lifecycle::apply(current, &transition);
        self.persist(report);
    }

    fn persist(&self, report: &mut Report) {
        let snapshot = Snapshot {
            photos: self.photos.clone(),
            last_cleanup: self.last_cleanup,
        };
        if let Err(e) = self.snapshots.save(&snapshot) {
            report.warn("Could not save local snapshot", &e);
        }
    }
}

/// Repair a loaded record whose `deleted_at` disagrees with its status.
///
/// A trashed record without a timestamp starts its retention clock at
/// `added_at`. `PermanentlyDeleted` is never stored, so such rows are dropped.
fn normalize(mut photo: Photo) -> Option<Photo> {
    if photo.is_consistent() {
        return Some(photo);
    }
    match photo.status {
        PhotoStatus::Deleted => {
            warn!(id = %photo.id, "Trashed photo has no deletion time, using its add time");
            photo.deleted_at = Some(photo.added_at);
            Some(photo)
        }
        PhotoStatus::Active => {
            warn!(id = %photo.id, "Active photo carries a deletion time, clearing it");
            photo.deleted_at = None;
            Some(photo)
        }
        PhotoStatus::PermanentlyDeleted => {
            warn!(id = %photo.id, "Dropping stored record marked as removed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{self, OWNER};
    use crate::store::memory::{MemBlobStore, MemMetadataStore, MemSnapshotStore};

    type MemGallery = Gallery<MemBlobStore, MemMetadataStore, MemSnapshotStore>;

    fn remote() -> Option<Remote<MemBlobStore, MemMetadataStore>> {
        Some(Remote::new(MemBlobStore::new(), MemMetadataStore::new()))
    }

    fn gallery() -> MemGallery {
        Gallery::open(
            OWNER,
            Settings::default(),
            remote(),
            MemBlobStore::new(),
            MemSnapshotStore::new(),
        )
        .unwrap()
    }

    fn gallery_with(photos: Vec<Photo>) -> MemGallery {
        let snapshot = Snapshot {
            photos,
            last_cleanup: None,
        };
        Gallery::open(
            OWNER,
            Settings::default(),
            None,
            MemBlobStore::new(),
            MemSnapshotStore::with_snapshot(snapshot),
        )
        .unwrap()
    }

    fn files(sizes: &[usize]) -> Vec<NewPhoto> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, size)| NewPhoto::new(format!("img-{}.jpg", i), vec![0u8; *size]))
            .collect()
    }

    #[test]
    fn add_two_uploads() {
        let mut g = gallery();
        let report = g.add(files(&[1000, 2000]), PhotoSource::Upload);

        assert!(report.warnings.is_empty());
        let active = g.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].size, 1000);
        assert_eq!(active[1].size, 2000);
        assert_ne!(active[0].id, active[1].id);
        assert!(active.iter().all(|p| p.source == PhotoSource::Upload));
        assert!(active.iter().all(|p| p.persistence == Persistence::Remote));

        let remote = g.remote().unwrap();
        assert!(remote.blobs.contains(&active[0].blob_key));
        assert!(remote.metadata.row(&active[1].id).is_some());
    }

    #[test]
    fn add_degrades_to_local_when_upload_fails() {
        let mut g = gallery();
        g.remote().unwrap().blobs.set_fail_writes(true);

        let report = g.add(files(&[10, 20]), PhotoSource::Camera);

        assert_eq!(report.warnings.len(), 2);
        assert_eq!(g.active().len(), 2);
        assert!(g.all().iter().all(|p| p.persistence == Persistence::Local));
        assert_eq!(g.local_blobs().len(), 2);
    }

    #[test]
    fn failed_row_insert_removes_uploaded_binary() {
        let mut g = gallery();
        g.remote().unwrap().metadata.set_fail_writes(true);

        g.add(files(&[10]), PhotoSource::Upload);

        let photo = &g.all()[0];
        assert_eq!(photo.persistence, Persistence::Local);
        assert!(g.remote().unwrap().blobs.is_empty());
    }

    #[test]
    fn add_skips_file_that_cannot_be_stored_anywhere() {
        let mut g = gallery_with(Vec::new());
        g.local_blobs().set_fail_writes(true);

        let report = g.add(files(&[10]), PhotoSource::Upload);
        assert_eq!(report.skipped.len(), 1);
        assert!(g.all().is_empty());
    }

    #[test]
    fn unconfigured_remote_is_not_a_warning() {
        let mut g = gallery_with(Vec::new());
        let report = g.add(files(&[10]), PhotoSource::Upload);
        assert!(report.warnings.is_empty());
        assert_eq!(g.all()[0].persistence, Persistence::Local);
    }

    #[test]
    fn soft_delete_then_restore() {
        let mut g = gallery();
        g.add(files(&[10]), PhotoSource::Upload);
        let id = g.all()[0].id;

        g.soft_delete(&id);
        let photo = g.get(&id).unwrap();
        assert_eq!(photo.status, PhotoStatus::Deleted);
        assert!(photo.deleted_at.is_some());
        assert_eq!(
            g.remote().unwrap().metadata.row(&id).unwrap().status,
            PhotoStatus::Deleted
        );

        g.restore(&id);
        let photo = g.get(&id).unwrap();
        assert_eq!(photo.status, PhotoStatus::Active);
        assert!(photo.deleted_at.is_none());
        assert!(g.all().iter().all(Photo::is_consistent));
    }

    #[test]
    fn transitions_apply_locally_when_remote_update_fails() {
        let mut g = gallery();
        g.add(files(&[10]), PhotoSource::Upload);
        let id = g.all()[0].id;
        g.remote().unwrap().metadata.set_fail_writes(true);

        let report = g.soft_delete(&id);
        assert_eq!(report.warnings.len(), 1);
        assert!(g.get(&id).unwrap().is_deleted());
        assert!(g.remote().unwrap().metadata.row(&id).unwrap().is_active());
    }

    #[test]
    fn missing_ids_are_reported_not_raised() {
        let mut g = gallery();
        let id = Uuid::new_v4();
        assert_eq!(g.soft_delete(&id).missing, vec![id]);
        assert_eq!(g.restore(&id).missing, vec![id]);
        assert_eq!(g.permanently_delete(&id).missing, vec![id]);
    }

    #[test]
    fn restore_of_active_photo_is_unchanged() {
        let mut g = gallery();
        g.add(files(&[10]), PhotoSource::Upload);
        let id = g.all()[0].id;
        let report = g.restore(&id);
        assert!(report.photos.is_empty());
        assert_eq!(report.unchanged.len(), 1);
    }

    #[test]
    fn permanently_delete_is_idempotent() {
        let mut g = gallery();
        g.add(files(&[10, 20]), PhotoSource::Upload);
        let id = g.all()[0].id;

        g.permanently_delete(&id);
        let once = g.all().to_vec();
        g.permanently_delete(&id);
        assert_eq!(g.all(), once.as_slice());
        assert_eq!(once.len(), 1);
        assert!(g.remote().unwrap().metadata.row(&id).is_none());
    }

    #[test]
    fn permanently_delete_releases_local_binary() {
        let mut g = gallery_with(Vec::new());
        g.add(files(&[10]), PhotoSource::Upload);
        let photo = g.all()[0].clone();
        assert!(g.local_blobs().contains(&photo.blob_key));

        g.permanently_delete(&photo.id);
        assert!(!g.local_blobs().contains(&photo.blob_key));
    }

    #[test]
    fn cleanup_purges_only_expired_trash() {
        let old = fixtures::trashed_photo("old.jpg", 11);
        let recent = fixtures::trashed_photo("recent.jpg", 9);
        let live = fixtures::photo("live.jpg", PhotoSource::Upload);
        let mut g = gallery_with(vec![old.clone(), recent.clone(), live.clone()]);

        let report = g.cleanup();

        assert_eq!(report.photos.len(), 1);
        assert_eq!(report.photos[0].id, old.id);
        assert_eq!(g.all(), &[recent, live]);
    }

    #[test]
    fn cleanup_schedule() {
        let mut g = gallery_with(Vec::new());
        let now = Utc::now();
        assert!(g.cleanup_due(now));

        g.cleanup_at(now);
        assert!(!g.cleanup_due(now + Duration::hours(23)));
        assert!(g.cleanup_due(now + Duration::hours(24)));
        assert!(g.run_scheduled_cleanup(now + Duration::hours(1)).is_none());
        assert!(g.run_scheduled_cleanup(now + Duration::hours(25)).is_some());
    }

    #[test]
    fn empty_trash_ignores_age() {
        let fresh = fixtures::trashed_photo("fresh.jpg", 0);
        let live = fixtures::photo("live.jpg", PhotoSource::Upload);
        let mut g = gallery_with(vec![fresh, live.clone()]);

        g.empty_trash();
        assert_eq!(g.all(), &[live]);
    }

    #[test]
    fn queries_filter_by_source() {
        let mut g = gallery();
        g.add(files(&[1]), PhotoSource::Upload);
        g.add(files(&[2]), PhotoSource::Camera);
        g.add(files(&[3]), PhotoSource::Upload);
        let id = g.all()[2].id;
        g.soft_delete(&id);

        let uploads: Vec<u64> = g.uploads().iter().map(|p| p.size).collect();
        assert_eq!(uploads, vec![1]);
        assert_eq!(g.captures().len(), 1);
        assert_eq!(g.deleted().len(), 1);
    }

    #[test]
    fn open_falls_back_to_snapshot_when_remote_unreachable() {
        let saved = fixtures::photo("saved.jpg", PhotoSource::Upload);
        let snapshot = Snapshot {
            photos: vec![saved.clone()],
            last_cleanup: None,
        };
        let metadata = MemMetadataStore::new();
        metadata.set_unreachable(true);

        let g: MemGallery = Gallery::open(
            OWNER,
            Settings::default(),
            Some(Remote::new(MemBlobStore::new(), metadata)),
            MemBlobStore::new(),
            MemSnapshotStore::with_snapshot(snapshot),
        )
        .unwrap();

        assert!(g.is_offline());
        assert_eq!(g.all(), &[saved]);
    }

    #[test]
    fn open_merges_local_only_records_with_remote_rows() {
        let remote_photo = fixtures::photo("remote.jpg", PhotoSource::Upload);
        let mut local_photo = fixtures::photo("local.jpg", PhotoSource::Camera);
        local_photo.persistence = Persistence::Local;

        let metadata = MemMetadataStore::new();
        metadata.insert(OWNER, &remote_photo).unwrap();
        let snapshot = Snapshot {
            photos: vec![remote_photo.clone(), local_photo.clone()],
            last_cleanup: None,
        };

        let g: MemGallery = Gallery::open(
            OWNER,
            Settings::default(),
            Some(Remote::new(MemBlobStore::new(), metadata)),
            MemBlobStore::new(),
            MemSnapshotStore::with_snapshot(snapshot),
        )
        .unwrap();

        assert!(!g.is_offline());
        assert_eq!(g.all(), &[remote_photo, local_photo]);
    }

    #[test]
    fn sync_promotes_local_records() {
        let mut g = gallery();
        g.remote().unwrap().blobs.set_fail_writes(true);
        g.add(files(&[10]), PhotoSource::Upload);
        let id = g.all()[0].id;
        assert_eq!(g.get(&id).unwrap().persistence, Persistence::Local);

        g.remote().unwrap().blobs.set_fail_writes(false);
        let report = g.sync();

        assert_eq!(report.photos.len(), 1);
        let photo = g.get(&id).unwrap();
        assert_eq!(photo.persistence, Persistence::Remote);
        assert!(photo.url.starts_with("memory://"));
        assert!(g.remote().unwrap().metadata.row(&id).is_some());
        assert!(g.local_blobs().is_empty());

        // Nothing left to push.
        assert!(g.sync().photos.is_empty());
    }

    #[test]
    fn failed_sync_insert_leaves_no_remote_binary() {
        let mut g = gallery();
        g.remote().unwrap().blobs.set_fail_writes(true);
        g.add(files(&[10]), PhotoSource::Upload);
        let id = g.all()[0].id;

        g.remote().unwrap().blobs.set_fail_writes(false);
        g.remote().unwrap().metadata.set_fail_writes(true);
        let report = g.sync();

        assert!(report.photos.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(g.get(&id).unwrap().persistence, Persistence::Local);
        assert!(g.remote().unwrap().blobs.is_empty());
        assert_eq!(g.local_blobs().len(), 1);
    }

    #[test]
    fn open_repairs_inconsistent_records() {
        let mut trashed = fixtures::photo("a.jpg", PhotoSource::Upload);
        trashed.status = PhotoStatus::Deleted;
        let mut active = fixtures::photo("b.jpg", PhotoSource::Upload);
        active.deleted_at = Some(Utc::now());
        let mut removed = fixtures::photo("c.jpg", PhotoSource::Upload);
        removed.status = PhotoStatus::PermanentlyDeleted;

        let g = gallery_with(vec![trashed.clone(), active.clone(), removed]);

        assert_eq!(g.all().len(), 2);
        let repaired = g.get(&trashed.id).unwrap();
        assert_eq!(repaired.deleted_at, Some(trashed.added_at));
        assert_eq!(g.deleted().len(), 1);
        assert_eq!(g.get(&active.id).unwrap().deleted_at, None);
        assert_eq!(g.active().len(), 1);
    }
}
