use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::gallery::Gallery;
use crate::model::{NewPhoto, Persistence, PhotoSource};
use crate::store::{BlobStore, MetadataStore, SnapshotStore};
use std::fs;
use std::path::{Path, PathBuf};

use super::helpers::{fmt_size, push_report_warnings};

/// Read image files from disk and add them to the gallery.
///
/// Files that are not images, or cannot be read, are skipped with a warning;
/// the rest of the batch goes ahead.
pub fn run<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &mut Gallery<B, M, S>,
    paths: &[PathBuf],
    source: PhotoSource,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        match read_image(path) {
            Ok(file) => files.push(file),
            Err(reason) => {
                result.add_message(CmdMessage::warning(format!(
                    "Skipped {}: {}",
                    path.display(),
                    reason
                )));
            }
        }
    }

    if files.is_empty() {
        result.add_message(CmdMessage::info("No photos added."));
        return Ok(result);
    }

    let report = gallery.add(files, source);
    for photo in &report.photos {
        // Without a backing store every photo is local; only flag fallbacks.
        let suffix = match photo.persistence {
            Persistence::Local if gallery.has_remote() => " (kept locally)",
            _ => "",
        };
        result.add_message(CmdMessage::success(format!(
            "Added: {} ({}){}",
            photo.name,
            fmt_size(photo.size),
            suffix
        )));
    }
    push_report_warnings(&mut result, &report);
    result.affected_photos = report.photos;

    Ok(result)
}

fn read_image(path: &Path) -> std::result::Result<NewPhoto, String> {
    let is_image = mime_guess::from_path(path)
        .first()
        .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE);
    if !is_image {
        return Err("not an image".to_string());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| "no file name".to_string())?;
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    Ok(NewPhoto::new(name, bytes))
}
