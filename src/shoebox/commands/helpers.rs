use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShoeboxError};
use crate::gallery::{Gallery, Report};
use crate::index::{index_photos, DisplayPhoto, PhotoSelector};
use crate::store::{BlobStore, MetadataStore, SnapshotStore};

pub fn indexed_photos<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &Gallery<B, M, S>,
) -> Vec<DisplayPhoto> {
    index_photos(gallery.all())
}

/// Resolve selectors against the current indexes. Fails on the first selector
/// that matches nothing (or, for id prefixes, more than one photo), before any
/// mutation happens. Duplicates are dropped.
pub fn resolve_selectors<B: BlobStore, M: MetadataStore, S: SnapshotStore>(
    gallery: &Gallery<B, M, S>,
    selectors: &[PhotoSelector],
) -> Result<Vec<DisplayPhoto>> {
    let indexed = indexed_photos(gallery);
    let mut resolved: Vec<DisplayPhoto> = Vec::with_capacity(selectors.len());

    for selector in selectors {
        let found = match selector {
            PhotoSelector::Index(idx) => indexed
                .iter()
                .find(|dp| &dp.index == idx)
                .ok_or_else(|| ShoeboxError::Api(format!("Index {} not found", idx)))?,
            PhotoSelector::Id(prefix) => {
                let matches: Vec<&DisplayPhoto> = indexed
                    .iter()
                    .filter(|dp| dp.photo.id.to_string().starts_with(prefix.as_str()))
                    .collect();
                match matches.as_slice() {
                    [one] => *one,
                    [] => {
                        return Err(ShoeboxError::Api(format!(
                            "No photo with id starting with {}",
                            prefix
                        )))
                    }
                    many => {
                        return Err(ShoeboxError::Api(format!(
                            "Id prefix {} is ambiguous ({} photos)",
                            prefix,
                            many.len()
                        )))
                    }
                }
            }
        };

        if !resolved.iter().any(|dp| dp.photo.id == found.photo.id) {
            resolved.push(found.clone());
        }
    }

    Ok(resolved)
}

/// Turn the absorbed failures of a gallery report into warning messages.
pub fn push_report_warnings(result: &mut CmdResult, report: &Report) {
    for (name, reason) in &report.skipped {
        result.add_message(CmdMessage::warning(format!("Skipped {}: {}", name, reason)));
    }
    for warning in &report.warnings {
        result.add_message(CmdMessage::warning(warning.clone()));
    }
}

/// Human-readable byte count.
pub fn fmt_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
