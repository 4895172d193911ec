//! # Display Indexes
//!
//! UUIDs are unwieldy on a command line, so photos are addressed by short
//! indexes assigned at listing time:
//!
//! - Active photos: `1`, `2`, `3`… in insertion order.
//! - Trashed photos: `d1`, `d2`… in insertion order.
//!
//! Indexes are recomputed from the collection every time, so they shift when
//! photos are added or removed. Anything that must survive that (scripts,
//! links) should use the id, which selectors also accept as a prefix. A
//! prefix that reads as an index (`1234`, `d12`) is taken as the index; add
//! characters until it contains a letter a-f or a dash.

use crate::model::Photo;
use std::str::FromStr;

/// Shortest id prefix accepted as a selector.
pub const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DisplayIndex {
    Regular(usize),
    Deleted(usize),
}

impl std::fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayIndex::Regular(i) => write!(f, "{}", i),
            DisplayIndex::Deleted(i) => write!(f, "d{}", i),
        }
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix('d') {
            if let Ok(n) = rest.parse::<usize>() {
                if n > 0 {
                    return Ok(DisplayIndex::Deleted(n));
                }
            }
        } else if let Ok(n) = s.parse::<usize>() {
            if n > 0 {
                return Ok(DisplayIndex::Regular(n));
            }
        }
        Err(format!("Invalid index: {}", s))
    }
}

/// A user input naming a photo: a display index or an id prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSelector {
    Index(DisplayIndex),
    Id(String),
}

impl std::fmt::Display for PhotoSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoSelector::Index(idx) => write!(f, "{}", idx),
            PhotoSelector::Id(prefix) => write!(f, "{}", prefix),
        }
    }
}

impl FromStr for PhotoSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(idx) = DisplayIndex::from_str(s) {
            return Ok(PhotoSelector::Index(idx));
        }
        let prefix = s.to_ascii_lowercase();
        let is_id_like = prefix.len() >= MIN_ID_PREFIX
            && prefix.chars().all(|c| c.is_ascii_hexdigit() || c == '-');
        if is_id_like {
            return Ok(PhotoSelector::Id(prefix));
        }
        Err(format!(
            "Invalid selector: {} (expected 1, d1, or an id prefix of at least {} characters)",
            s, MIN_ID_PREFIX
        ))
    }
}

#[derive(Debug, Clone)]
pub struct DisplayPhoto {
    pub photo: Photo,
    pub index: DisplayIndex,
    /// Days left in the trash, filled in by listings of deleted photos.
    pub days_left: Option<i64>,
}

/// Assigns display indexes. Active entries come first, then trashed ones,
/// each group in insertion order.
pub fn index_photos(photos: &[Photo]) -> Vec<DisplayPhoto> {
    let mut results = Vec::with_capacity(photos.len());

    let mut regular_idx = 1;
    for photo in photos.iter().filter(|p| p.is_active()) {
        results.push(DisplayPhoto {
            photo: photo.clone(),
            index: DisplayIndex::Regular(regular_idx),
            days_left: None,
        });
        regular_idx += 1;
    }

    let mut deleted_idx = 1;
    for photo in photos.iter().filter(|p| p.is_deleted()) {
        results.push(DisplayPhoto {
            photo: photo.clone(),
            index: DisplayIndex::Deleted(deleted_idx),
            days_left: None,
        });
        deleted_idx += 1;
    }

    results
}
