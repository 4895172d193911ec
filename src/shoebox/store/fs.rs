use super::{BlobStore, MetadataStore, Snapshot, SnapshotStore};
use crate::error::{Result, ShoeboxError};
use crate::model::{Photo, PhotoPatch};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TABLE_FILENAME: &str = "photos.json";
const SNAPSHOT_FILENAME: &str = "snapshot.json";

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(ShoeboxError::Io)?;
    }
    Ok(())
}

/// Write to a sibling tmp file then rename, so readers never see partial content.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| ShoeboxError::Store(format!("No parent dir for {}", path.display())))?;
    ensure_dir(dir)?;
    let tmp = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp, bytes).map_err(ShoeboxError::Io)?;
    fs::rename(&tmp, path).map_err(ShoeboxError::Io)?;
    Ok(())
}

/// Blob storage in a directory. Keys map to relative paths.
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: Option<String>,
    create_root: bool,
}

impl FsBlobStore {
    /// A blob store whose root must already exist; a missing root reads as
    /// an unreachable backing store.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            public_base_url: None,
            create_root: false,
        }
    }

    /// A blob store that creates its root on first write (local fallback binaries).
    pub fn local(root: PathBuf) -> Self {
        Self {
            root,
            public_base_url: None,
            create_root: true,
        }
    }

    pub fn with_public_base_url(mut self, base: Option<String>) -> Self {
        self.public_base_url = base.map(|b| b.trim_end_matches('/').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        if key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(ShoeboxError::Store(format!("Invalid blob key: {}", key)));
        }
        Ok(self.root.join(key))
    }

    fn check_root(&self) -> Result<()> {
        if self.create_root {
            return ensure_dir(&self.root);
        }
        if !self.root.is_dir() {
            return Err(ShoeboxError::Store(format!(
                "Blob storage unreachable: {}",
                self.root.display()
            )));
        }
        Ok(())
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        self.check_root()?;
        let path = self.blob_path(key)?;
        write_atomic(&path, bytes)?;

        Ok(match &self.public_base_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("file://{}", path.display()),
        })
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.check_root()?;
        let path = self.blob_path(key)?;
        fs::read(path).map_err(ShoeboxError::Io)
    }

    fn delete(&self, key: &str) -> Result<()> {
        // A missing local root just means nothing to delete.
        if !self.create_root {
            self.check_root()?;
        }
        let path = self.blob_path(key)?;
        if path.exists() {
            fs::remove_file(path).map_err(ShoeboxError::Io)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PhotoRow {
    owner: String,
    #[serde(flatten)]
    photo: Photo,
}

/// Photo table kept as a JSON array in `<root>/photos.json`.
pub struct FsMetadataStore {
    root: PathBuf,
}

impl FsMetadataStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn load_rows(&self) -> Result<Vec<PhotoRow>> {
        if !self.root.is_dir() {
            return Err(ShoeboxError::Store(format!(
                "Metadata store unreachable: {}",
                self.root.display()
            )));
        }
        let table = self.root.join(TABLE_FILENAME);
        if !table.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(table).map_err(ShoeboxError::Io)?;
        let rows: Vec<PhotoRow> =
            serde_json::from_str(&content).map_err(ShoeboxError::Serialization)?;
        Ok(rows)
    }

    fn save_rows(&self, rows: &[PhotoRow]) -> Result<()> {
        let content = serde_json::to_string_pretty(rows).map_err(ShoeboxError::Serialization)?;
        write_atomic(&self.root.join(TABLE_FILENAME), content.as_bytes())
    }
}

impl MetadataStore for FsMetadataStore {
    fn list(&self, owner: &str) -> Result<Vec<Photo>> {
        Ok(self
            .load_rows()?
            .into_iter()
            .filter(|row| row.owner == owner)
            .map(|row| row.photo)
            .collect())
    }

    fn insert(&self, owner: &str, photo: &Photo) -> Result<()> {
        let mut rows = self.load_rows()?;
        if rows.iter().any(|r| r.photo.id == photo.id) {
            return Err(ShoeboxError::Store(format!(
                "Duplicate photo id: {}",
                photo.id
            )));
        }
        rows.push(PhotoRow {
            owner: owner.to_string(),
            photo: photo.clone(),
        });
        self.save_rows(&rows)
    }

    fn update(&self, owner: &str, id: &Uuid, patch: &PhotoPatch) -> Result<()> {
        let mut rows = self.load_rows()?;
        let row = rows
            .iter_mut()
            .find(|r| r.owner == owner && r.photo.id == *id)
            .ok_or(ShoeboxError::PhotoNotFound(*id))?;
        patch.apply_to(&mut row.photo);
        self.save_rows(&rows)
    }

    fn delete(&self, owner: &str, id: &Uuid) -> Result<()> {
        let mut rows = self.load_rows()?;
        let before = rows.len();
        rows.retain(|r| !(r.owner == owner && r.photo.id == *id));
        if rows.len() != before {
            self.save_rows(&rows)?;
        }
        Ok(())
    }

    fn exists(&self, owner: &str, id: &Uuid) -> Result<bool> {
        Ok(self
            .load_rows()?
            .iter()
            .any(|r| r.owner == owner && r.photo.id == *id))
    }
}

/// Snapshot kept in `<dir>/snapshot.json`.
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILENAME)
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(ShoeboxError::Io)?;
        let snapshot = serde_json::from_str(&content).map_err(ShoeboxError::Serialization)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let content =
            serde_json::to_string_pretty(snapshot).map_err(ShoeboxError::Serialization)?;
        write_atomic(&self.path(), content.as_bytes())
    }
}
