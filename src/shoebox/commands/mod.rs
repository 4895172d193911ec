//! # Command Layer
//!
//! One module per user-facing operation. Commands take the [`Gallery`] and
//! plain Rust arguments, and return a [`CmdResult`]: the photos they touched
//! or listed plus leveled messages. They never print, prompt or exit; the
//! CLI decides how to render the result.
//!
//! Absorbed storage failures from the gallery come back as
//! [`MessageLevel::Warning`] messages, so a caller can show them as notices
//! without treating the command as failed.
//!
//! Command tests run against the in-memory stores.
//!
//! [`Gallery`]: crate::gallery::Gallery

use crate::config::ShoeboxConfig;
use crate::index::DisplayPhoto;
use crate::model::Photo;
use std::path::PathBuf;

pub mod add;
pub mod cleanup;
pub mod config;
pub mod delete;
pub mod helpers;
pub mod list;
pub mod purge;
pub mod restore;
pub mod sync;
pub mod view;

#[derive(Debug, Clone)]
pub struct ShoeboxPaths {
    /// Holds `config.json`, `snapshot.json` and local binaries.
    pub data_dir: PathBuf,
}

impl ShoeboxPaths {
    pub fn local_blobs(&self) -> PathBuf {
        self.data_dir.join("blobs")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_photos: Vec<Photo>,
    pub listed_photos: Vec<DisplayPhoto>,
    pub config: Option<ShoeboxConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_photos(mut self, photos: Vec<DisplayPhoto>) -> Self {
        self.listed_photos = photos;
        self
    }

    pub fn with_config(mut self, config: ShoeboxConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}
