use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where a photo came from. Set once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSource {
    Upload,
    Camera,
}

impl fmt::Display for PhotoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoSource::Upload => write!(f, "upload"),
            PhotoSource::Camera => write!(f, "camera"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoStatus {
    Active,
    Deleted,
    /// Never stored: a record reaching this state is removed from the collection.
    PermanentlyDeleted,
}

impl fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoStatus::Active => write!(f, "active"),
            PhotoStatus::Deleted => write!(f, "deleted"),
            PhotoStatus::PermanentlyDeleted => write!(f, "permanently-deleted"),
        }
    }
}

/// Whether the binary and row made it to the backing store, or only exist
/// in the local fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persistence {
    #[default]
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub size: u64,
    pub source: PhotoSource,
    pub status: PhotoStatus,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub blob_key: String,
    #[serde(default)]
    pub persistence: Persistence,
}

impl Photo {
    /// Builds a fresh active record. The url is filled in once the binary is stored.
    pub fn new(owner: &str, name: &str, size: u64, source: PhotoSource) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            url: String::new(),
            name: name.to_string(),
            size,
            source,
            status: PhotoStatus::Active,
            added_at: Utc::now(),
            deleted_at: None,
            blob_key: blob_key(owner, &id, name),
            persistence: Persistence::Remote,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PhotoStatus::Active
    }

    pub fn is_deleted(&self) -> bool {
        self.status == PhotoStatus::Deleted
    }

    /// `deleted_at` is present exactly when the record sits in the trash.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            PhotoStatus::Deleted => self.deleted_at.is_some(),
            PhotoStatus::Active => self.deleted_at.is_none(),
            PhotoStatus::PermanentlyDeleted => false,
        }
    }
}

/// Partial update sent to the metadata store on status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPatch {
    pub status: PhotoStatus,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl PhotoPatch {
    pub fn deleted(at: DateTime<Utc>) -> Self {
        Self {
            status: PhotoStatus::Deleted,
            deleted_at: Some(at),
        }
    }

    pub fn restored() -> Self {
        Self {
            status: PhotoStatus::Active,
            deleted_at: None,
        }
    }

    pub fn apply_to(&self, photo: &mut Photo) {
        photo.status = self.status;
        photo.deleted_at = self.deleted_at;
    }
}

/// A file handed to `add`, already read into memory.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NewPhoto {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

fn blob_key(owner: &str, id: &Uuid, name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}/{}-{}", owner, id, safe)
}
