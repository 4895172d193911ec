use super::{BlobStore, MetadataStore, Snapshot, SnapshotStore};
use crate::error::{Result, ShoeboxError};
use crate::model::{Photo, PhotoPatch};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use uuid::Uuid;

fn simulated(what: &str) -> ShoeboxError {
    ShoeboxError::Store(format!("Simulated {} failure", what))
}

/// In-memory blob storage for testing.
#[derive(Default)]
pub struct MemBlobStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
    fail_writes: Cell<bool>,
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` and `delete` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

impl BlobStore for MemBlobStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        if self.fail_writes.get() {
            return Err(simulated("blob write"));
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), bytes.to_vec());
        Ok(format!("memory://{}", key))
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.blobs
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| ShoeboxError::Store(format!("No blob at {}", key)))
    }

    fn delete(&self, key: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(simulated("blob delete"));
        }
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

/// In-memory photo table for testing.
#[derive(Default)]
pub struct MemMetadataStore {
    rows: RefCell<Vec<(String, Photo)>>,
    fail_writes: Cell<bool>,
    unreachable: Cell<bool>,
}

impl MemMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make inserts, updates and deletes fail. Reads still work.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make every call fail, reads included.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.set(unreachable);
    }

    /// Direct read of a row, bypassing failure injection.
    pub fn row(&self, id: &Uuid) -> Option<Photo> {
        self.rows
            .borrow()
            .iter()
            .find(|(_, p)| p.id == *id)
            .map(|(_, p)| p.clone())
    }

    fn check_read(&self) -> Result<()> {
        if self.unreachable.get() {
            return Err(simulated("metadata connection"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        self.check_read()?;
        if self.fail_writes.get() {
            return Err(simulated("metadata write"));
        }
        Ok(())
    }
}

impl MetadataStore for MemMetadataStore {
    fn list(&self, owner: &str) -> Result<Vec<Photo>> {
        self.check_read()?;
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|(o, _)| o == owner)
            .map(|(_, p)| p.clone())
            .collect())
    }

    fn insert(&self, owner: &str, photo: &Photo) -> Result<()> {
        self.check_write()?;
        self.rows
            .borrow_mut()
            .push((owner.to_string(), photo.clone()));
        Ok(())
    }

    fn update(&self, owner: &str, id: &Uuid, patch: &PhotoPatch) -> Result<()> {
        self.check_write()?;
        let mut rows = self.rows.borrow_mut();
        let (_, photo) = rows
            .iter_mut()
            .find(|(o, p)| o == owner && p.id == *id)
            .ok_or(ShoeboxError::PhotoNotFound(*id))?;
        patch.apply_to(photo);
        Ok(())
    }

    fn delete(&self, owner: &str, id: &Uuid) -> Result<()> {
        self.check_write()?;
        self.rows
            .borrow_mut()
            .retain(|(o, p)| !(o == owner && p.id == *id));
        Ok(())
    }

    fn exists(&self, owner: &str, id: &Uuid) -> Result<bool> {
        self.check_read()?;
        Ok(self
            .rows
            .borrow()
            .iter()
            .any(|(o, p)| o == owner && p.id == *id))
    }
}

/// In-memory snapshot for testing.
#[derive(Default)]
pub struct MemSnapshotStore {
    snapshot: RefCell<Option<Snapshot>>,
}

impl MemSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RefCell::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for MemSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::{Photo, PhotoSource, PhotoStatus};
    use chrono::{Duration, Utc};

    pub const OWNER: &str = "tester";

    pub fn photo(name: &str, source: PhotoSource) -> Photo {
        let mut photo = Photo::new(OWNER, name, 100, source);
        photo.url = format!("memory://{}", photo.blob_key);
        photo
    }

    pub fn trashed_photo(name: &str, days_ago: i64) -> Photo {
        let mut photo = photo(name, PhotoSource::Upload);
        photo.status = PhotoStatus::Deleted;
        photo.deleted_at = Some(Utc::now() - Duration::days(days_ago));
        photo
    }
}
