//! # Photo Lifecycle
//!
//! The pure half of the lifecycle store: a transition function taking the
//! current collection and a [`Transition`] and returning the next collection.
//! Nothing here touches storage, clocks or logs; [`crate::gallery`] pairs each
//! transition with its remote call.
//!
//! ```text
//! active ⇄ deleted → (removed)
//! ```
//!
//! `(removed)` is not stored. A record that is permanently deleted simply
//! stops being part of the collection.

use crate::model::{Persistence, Photo, PhotoSource, PhotoStatus};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub const DEFAULT_RETENTION_DAYS: u32 = 10;
pub const DEFAULT_CLEANUP_INTERVAL_HOURS: u32 = 24;

#[derive(Debug, Clone)]
pub enum Transition {
    /// Append new records, in order.
    Add(Vec<Photo>),
    /// Move an active record to the trash.
    SoftDelete { id: Uuid, at: DateTime<Utc> },
    /// Bring a trashed record back.
    Restore { id: Uuid },
    /// Drop records from the collection entirely.
    Remove { ids: Vec<Uuid> },
    /// A local-only record reached the backing store.
    Promote { id: Uuid, url: String },
}

pub fn apply(mut photos: Vec<Photo>, transition: &Transition) -> Vec<Photo> {
    match transition {
        Transition::Add(new) => {
            photos.extend(new.iter().cloned());
        }
        Transition::SoftDelete { id, at } => {
            if let Some(photo) = photos.iter_mut().find(|p| p.id == *id && p.is_active()) {
                photo.status = PhotoStatus::Deleted;
                photo.deleted_at = Some(*at);
            }
        }
        Transition::Restore { id } => {
            if let Some(photo) = photos.iter_mut().find(|p| p.id == *id && p.is_deleted()) {
                photo.status = PhotoStatus::Active;
                photo.deleted_at = None;
            }
        }
        Transition::Remove { ids } => {
            photos.retain(|p| !ids.contains(&p.id));
        }
        Transition::Promote { id, url } => {
            if let Some(photo) = photos.iter_mut().find(|p| p.id == *id) {
                photo.url = url.clone();
                photo.persistence = Persistence::Remote;
            }
        }
    }
    photos
}

/// Ids of trashed records whose `deleted_at` is strictly older than `now - retention`.
pub fn expired(photos: &[Photo], now: DateTime<Utc>, retention: Duration) -> Vec<Uuid> {
    // A window reaching past the start of time expires nothing.
    let Some(cutoff) = now.checked_sub_signed(retention) else {
        return Vec::new();
    };
    photos
        .iter()
        .filter(|p| p.is_deleted())
        .filter(|p| p.deleted_at.is_some_and(|at| at < cutoff))
        .map(|p| p.id)
        .collect()
}

/// Days a trashed record has left before the cleanup sweep takes it. A
/// started day counts as a whole one.
pub fn days_left(photo: &Photo, now: DateTime<Utc>, retention: Duration) -> Option<i64> {
    let deleted_at = photo.deleted_at?;
    let remaining = retention - (now - deleted_at);
    if remaining <= Duration::zero() {
        return Some(0);
    }
    let day = Duration::days(1).num_milliseconds();
    Some((remaining.num_milliseconds() + day - 1) / day)
}

pub fn retention(days: u32) -> Duration {
    Duration::days(i64::from(days))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoFilter {
    All,
    #[default]
    Active,
    Deleted,
    /// Active photos that were uploaded.
    Uploads,
    /// Active photos captured with the camera.
    Camera,
}

impl PhotoFilter {
    pub fn matches(&self, photo: &Photo) -> bool {
        match self {
            PhotoFilter::All => true,
            PhotoFilter::Active => photo.is_active(),
            PhotoFilter::Deleted => photo.is_deleted(),
            PhotoFilter::Uploads => photo.is_active() && photo.source == PhotoSource::Upload,
            PhotoFilter::Camera => photo.is_active() && photo.source == PhotoSource::Camera,
        }
    }
}

pub fn filter(photos: &[Photo], filter: PhotoFilter) -> Vec<Photo> {
    photos
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(name: &str, source: PhotoSource) -> Photo {
        Photo::new("local", name, 10, source)
    }

    fn trashed(name: &str, days_ago: i64, now: DateTime<Utc>) -> Photo {
        let mut p = photo(name, PhotoSource::Upload);
        p.status = PhotoStatus::Deleted;
        p.deleted_at = Some(now - Duration::days(days_ago));
        p
    }

    #[test]
    fn soft_delete_sets_timestamp() {
        let p = photo("a.jpg", PhotoSource::Upload);
        let id = p.id;
        let at = Utc::now();
        let next = apply(vec![p], &Transition::SoftDelete { id, at });

        assert_eq!(next[0].status, PhotoStatus::Deleted);
        assert_eq!(next[0].deleted_at, Some(at));
        assert!(next[0].is_consistent());
    }

    #[test]
    fn restore_after_soft_delete_clears_timestamp() {
        let p = photo("a.jpg", PhotoSource::Upload);
        let id = p.id;
        let photos = apply(vec![p], &Transition::SoftDelete { id, at: Utc::now() });
        let photos = apply(photos, &Transition::Restore { id });

        assert_eq!(photos[0].status, PhotoStatus::Active);
        assert!(photos[0].deleted_at.is_none());
    }

    #[test]
    fn soft_delete_keeps_original_timestamp_when_already_trashed() {
        let now = Utc::now();
        let p = trashed("a.jpg", 3, now);
        let original = p.deleted_at;
        let id = p.id;
        let photos = apply(vec![p], &Transition::SoftDelete { id, at: now });
        assert_eq!(photos[0].deleted_at, original);
    }

    #[test]
    fn unknown_id_is_noop() {
        let p = photo("a.jpg", PhotoSource::Upload);
        let before = vec![p];
        let after = apply(
            before.clone(),
            &Transition::SoftDelete {
                id: Uuid::new_v4(),
                at: Utc::now(),
            },
        );
        assert_eq!(before, after);
    }

    #[test]
    fn remove_is_idempotent() {
        let a = photo("a.jpg", PhotoSource::Upload);
        let b = photo("b.jpg", PhotoSource::Upload);
        let remove = Transition::Remove { ids: vec![a.id] };

        let once = apply(vec![a.clone(), b.clone()], &remove);
        let twice = apply(once.clone(), &remove);
        assert_eq!(once, twice);
        assert_eq!(once, vec![b]);
    }

    #[test]
    fn expired_respects_retention_window() {
        let now = Utc::now();
        let old = trashed("old.jpg", 11, now);
        let recent = trashed("recent.jpg", 9, now);
        let active = photo("live.jpg", PhotoSource::Upload);

        let ids = expired(
            &[old.clone(), recent, active],
            now,
            retention(DEFAULT_RETENTION_DAYS),
        );
        assert_eq!(ids, vec![old.id]);
    }

    #[test]
    fn expired_is_strict_at_the_boundary() {
        let now = Utc::now();
        let exact = trashed("edge.jpg", 10, now);
        assert!(expired(&[exact], now, retention(10)).is_empty());
    }

    #[test]
    fn days_left_counts_down_and_floors_at_zero() {
        let now = Utc::now();
        let p = trashed("a.jpg", 3, now);
        assert_eq!(days_left(&p, now, retention(10)), Some(7));

        let stale = trashed("b.jpg", 15, now);
        assert_eq!(days_left(&stale, now, retention(10)), Some(0));

        let edge = trashed("e.jpg", 10, now);
        assert_eq!(days_left(&edge, now, retention(10)), Some(0));

        let live = photo("c.jpg", PhotoSource::Upload);
        assert_eq!(days_left(&live, now, retention(10)), None);
    }

    #[test]
    fn days_left_rounds_partial_days_up() {
        let now = Utc::now();
        let mut p = trashed("a.jpg", 0, now);
        p.deleted_at = Some(now - Duration::seconds(5));
        assert_eq!(days_left(&p, now, retention(10)), Some(10));

        p.deleted_at = Some(now - Duration::days(9) - Duration::hours(23));
        assert_eq!(days_left(&p, now, retention(10)), Some(1));
    }

    #[test]
    fn huge_retention_expires_nothing() {
        let now = Utc::now();
        let old = trashed("old.jpg", 400, now);
        assert!(expired(&[old], now, retention(100_000_000)).is_empty());
    }

    #[test]
    fn source_filters_keep_insertion_order() {
        let now = Utc::now();
        let u1 = photo("u1.jpg", PhotoSource::Upload);
        let c1 = photo("c1.jpg", PhotoSource::Camera);
        let u2 = photo("u2.jpg", PhotoSource::Upload);
        let gone = trashed("u3.jpg", 1, now);
        let c2 = photo("c2.jpg", PhotoSource::Camera);
        let all = vec![u1.clone(), c1.clone(), u2.clone(), gone.clone(), c2.clone()];

        assert_eq!(filter(&all, PhotoFilter::Uploads), vec![u1.clone(), u2.clone()]);
        assert_eq!(filter(&all, PhotoFilter::Camera), vec![c1.clone(), c2.clone()]);
        assert_eq!(filter(&all, PhotoFilter::Deleted), vec![gone]);
        assert_eq!(filter(&all, PhotoFilter::Active), vec![u1, c1, u2, c2]);
        assert_eq!(filter(&all, PhotoFilter::All).len(), 5);
    }
}
