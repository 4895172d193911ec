//! # Shoebox
//!
//! Shoebox is a photo library with a trash. It keeps the list of photos a user
//! has added (file uploads and camera captures), lets them move photos to the
//! trash and back, and permanently removes trashed photos once they have sat
//! there longer than the retention window.
//!
//! It is a library first; the `shoebox` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Parses selectors, supplies the clock, dispatches         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Gallery (gallery.rs) + lifecycle reducer (lifecycle.rs)    │
//! │  - Remote call, state transition, snapshot save             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - BlobStore, MetadataStore, SnapshotStore traits           │
//! │  - Filesystem (production) and in-memory (tests) backends   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing below the CLI prints or exits. Storage failures on the backing
//! store are absorbed by the gallery: it logs them through `tracing`, falls
//! back to local storage where it can, and hands them up as warnings.
//!
//! ## Photo lifecycle
//!
//! ```text
//! add ──▶ active ──soft delete──▶ deleted ──cleanup / purge──▶ (removed)
//!           ▲                        │
//!           └───────restore──────────┘
//! ```
//!
//! A record is `deleted` exactly when it has a `deleted_at` timestamp.
//! `(removed)` is never stored.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade every client goes through
//! - [`commands`]: One module per user-facing operation
//! - [`gallery`]: The photo collection and its orchestration
//! - [`lifecycle`]: Pure state transitions, retention and filters
//! - [`store`]: Storage traits and implementations
//! - [`model`]: `Photo` and friends
//! - [`index`]: Display indexes (`1`, `d1`) and selectors
//! - [`config`]: `config.json` handling
//! - [`telemetry`]: `tracing` subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod gallery;
pub mod index;
pub mod lifecycle;
pub mod model;
pub mod store;
pub mod telemetry;
