//! # API Facade
//!
//! A thin layer over the commands: it parses user-facing selectors into
//! [`PhotoSelector`]s, supplies the current time, and dispatches. No business
//! logic and no I/O beyond what the commands do.
//!
//! `ShoeboxApi` is generic over the three storage traits. The CLI uses
//! [`FsApi`], opened from the data directory with [`open`]; tests use the
//! in-memory stores.

use crate::commands;
use crate::config::ShoeboxConfig;
use crate::error::{Result, ShoeboxError};
use crate::gallery::Gallery;
use crate::index::PhotoSelector;
use crate::model::PhotoSource;
use crate::store::fs::{FsBlobStore, FsMetadataStore, FsSnapshotStore};
use crate::store::{BlobStore, MetadataStore, Remote, SnapshotStore};
use chrono::Utc;
use std::path::PathBuf;
use std::str::FromStr;

pub struct ShoeboxApi<B: BlobStore, M: MetadataStore, S: SnapshotStore> {
    gallery: Gallery<B, M, S>,
    paths: commands::ShoeboxPaths,
}

pub type FsApi = ShoeboxApi<FsBlobStore, FsMetadataStore, FsSnapshotStore>;

/// Open the gallery described by `config.json` in the data directory.
pub fn open(paths: commands::ShoeboxPaths) -> Result<FsApi> {
    let config = ShoeboxConfig::load(&paths.data_dir)?;
    let remote = config.remote.as_ref().map(|r| {
        Remote::new(
            FsBlobStore::new(r.root.clone()).with_public_base_url(r.public_base_url.clone()),
            FsMetadataStore::new(r.root.clone()),
        )
    });
    let gallery = Gallery::open(
        config.owner.clone(),
        config.settings(),
        remote,
        FsBlobStore::local(paths.local_blobs()),
        FsSnapshotStore::new(paths.data_dir.clone()),
    )?;
    Ok(ShoeboxApi::new(gallery, paths))
}

impl<B: BlobStore, M: MetadataStore, S: SnapshotStore> ShoeboxApi<B, M, S> {
    pub fn new(gallery: Gallery<B, M, S>, paths: commands::ShoeboxPaths) -> Self {
        Self { gallery, paths }
    }

    pub fn add_photos(
        &mut self,
        files: &[PathBuf],
        source: PhotoSource,
    ) -> Result<commands::CmdResult> {
        commands::add::run(&mut self.gallery, files, source)
    }

    pub fn list_photos(&self, filter: PhotoFilter) -> Result<commands::CmdResult> {
        commands::list::run(&self.gallery, filter, Utc::now())
    }

    pub fn view_photos<I: AsRef<str>>(&self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs)?;
        commands::view::run(&self.gallery, &selectors, Utc::now())
    }

    pub fn delete_photos<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs)?;
        commands::delete::run(&mut self.gallery, &selectors)
    }

    pub fn restore_photos<I: AsRef<str>>(
        &mut self,
        inputs: &[I],
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs)?;
        commands::restore::run(&mut self.gallery, &selectors)
    }

    pub fn purge_preview<I: AsRef<str>>(&self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs)?;
        commands::purge::preview(&self.gallery, &selectors)
    }

    pub fn purge_photos<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(inputs)?;
        commands::purge::run(&mut self.gallery, &selectors)
    }

    pub fn cleanup(&mut self) -> Result<commands::CmdResult> {
        commands::cleanup::run(&mut self.gallery, Utc::now())
    }

    pub fn cleanup_if_due(&mut self) -> Result<commands::CmdResult> {
        commands::cleanup::run_if_due(&mut self.gallery, Utc::now())
    }

    pub fn sync(&mut self) -> Result<commands::CmdResult> {
        commands::sync::run(&mut self.gallery)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn gallery(&self) -> &Gallery<B, M, S> {
        &self.gallery
    }

    pub fn paths(&self) -> &commands::ShoeboxPaths {
        &self.paths
    }
}

/// Every input must be a valid selector; nothing runs otherwise.
fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<PhotoSelector>> {
    inputs
        .iter()
        .map(|s| PhotoSelector::from_str(s.as_ref().trim()).map_err(ShoeboxError::Api))
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use crate::lifecycle::PhotoFilter;
pub use commands::{CmdMessage, CmdResult, MessageLevel, ShoeboxPaths};
