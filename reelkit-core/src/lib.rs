//! # Reelkit Core
//!
//! Core library for Reelkit, a sandboxed media-library browser: durable
//! registration of filesystem directories, capability-scoped re-access
//! across process restarts, and navigation/scanning of those directories
//! for playable media.
//!
//! ## Overview
//!
//! - [`store`]: the persistent registry of library roots and their
//!   capability tokens (single local SQLite file).
//! - [`capability`]: the provider seam around platform access grants and
//!   the broker enforcing the single-active-handle invariant.
//! - [`scan`]: stateless directory enumeration and playable-media
//!   classification.
//! - [`session`]: the navigation state machine UI code drives, with
//!   asynchronous scans and stale-result suppression.
//! - [`library`]: the thin façade wiring the above together.
//!
//! Window chrome, grid UI, and the playback pipeline are external
//! collaborators: they consume [`session::LibrarySession`] and
//! [`library::Library`] and nothing deeper.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reelkit_core::{FsCapabilityProvider, Library, LibraryStore};
//!
//! async fn startup() -> reelkit_core::Result<Library> {
//!     let db_path = reelkit_core::default_database_path()?;
//!     let store = LibraryStore::open(&db_path).await?;
//!     Ok(Library::new(
//!         Arc::new(store),
//!         Arc::new(FsCapabilityProvider::new()),
//!     ))
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod capability;
pub mod error;
pub mod library;
pub mod scan;
pub mod session;
pub mod store;

pub use capability::{
    CapabilityBroker, CapabilityProvider, FsCapabilityProvider, StubCapabilityProvider,
};
pub use error::{CoreError, Result};
pub use library::Library;
pub use session::LibrarySession;
pub use store::{default_database_path, LibraryRegistry, LibraryStore};

pub use reelkit_model as model;
