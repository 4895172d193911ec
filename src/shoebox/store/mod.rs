//! # Storage Layer
//!
//! Shoebox never owns its data outright. Binaries and rows live in a backing
//! store; a local snapshot mirrors the in-memory collection so the library keeps
//! working when that store is unreachable or not configured at all.
//!
//! Three collaborators, each behind a trait:
//!
//! - [`BlobStore`]: binary storage. `put(key, bytes)` returns the public URL.
//! - [`MetadataStore`]: the photo table, scoped by owner.
//! - [`SnapshotStore`]: key-value snapshot of the full collection.
//!
//! ## Implementations
//!
//! - [`fs`]: Production implementations backed by directories on disk.
//!   A blob store rooted at a shared directory plays the role of the hosted
//!   object storage; a second one under the local data dir holds binaries of
//!   local-only photos.
//! - [`memory`]: In-memory implementations for tests, with write failure
//!   injection to exercise the fallback paths.
//!
//! ## Storage Layout
//!
//! ```text
//! <remote root>/
//! ├── photos.json            # Metadata table (PhotoRow array)
//! └── {owner}/{id}-{name}    # Binaries
//!
//! <data dir>/
//! ├── config.json
//! ├── snapshot.json          # Local fallback snapshot
//! └── blobs/{owner}/{id}-{name}
//! ```
//!
//! All methods take `&self`. The filesystem stores are stateless and the
//! in-memory ones use `RefCell`, since shoebox is single-threaded.

use crate::error::Result;
use crate::model::{Photo, PhotoPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Binary storage collaborator.
pub trait BlobStore {
    /// Store bytes under `key`, returning the URL the binary is reachable at.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String>;

    /// Read a binary back. Used when promoting local-only photos to the backing store.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove the binary. Missing keys are not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Photo metadata table collaborator.
pub trait MetadataStore {
    /// All rows belonging to `owner`, in insertion order.
    fn list(&self, owner: &str) -> Result<Vec<Photo>>;

    fn insert(&self, owner: &str, photo: &Photo) -> Result<()>;

    /// Partial update of status fields. Errors with `PhotoNotFound` for unknown ids.
    fn update(&self, owner: &str, id: &Uuid, patch: &PhotoPatch) -> Result<()>;

    /// Delete a row. Missing rows are not an error.
    fn delete(&self, owner: &str, id: &Uuid) -> Result<()>;

    fn exists(&self, owner: &str, id: &Uuid) -> Result<bool>;
}

/// Everything the local fallback remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub last_cleanup: Option<DateTime<Utc>>,
}

/// Local fallback persistence.
pub trait SnapshotStore {
    /// `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// The backing store pair. Photos are only `Persistence::Remote` when both
/// halves accepted them.
pub struct Remote<B: BlobStore, M: MetadataStore> {
    pub blobs: B,
    pub metadata: M,
}

impl<B: BlobStore, M: MetadataStore> Remote<B, M> {
    pub fn new(blobs: B, metadata: M) -> Self {
        Self { blobs, metadata }
    }
}
