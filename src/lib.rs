//! SaveBackup - timestamped copies of documents taken just before they are saved
//!
//! Whenever the host editor is about to save a document, this library writes
//! the document's current text to a backup file under a configurable root,
//! mirroring the original path and stamping the save time into the filename.
//! Backups are best-effort: failures are logged and never interfere with the
//! host's own save.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Home-relative paths and the `key=value` settings file
//! - `error`: Custom error types
//! - `timestamp`: Date patterns for filenames and log lines
//! - `backup`: Save notifications, destination derivation, and the writer
//! - `logging`: Policy-gated info and error channels
//! - `storage`: Atomic text-file primitives
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use save_backup::backup::{BackupWriter, SaveEvent, SaveListener};
//! use save_backup::config::{LazyConfig, SaveBackupPaths};
//!
//! let config = Arc::new(LazyConfig::new(SaveBackupPaths::new()?));
//! let writer = BackupWriter::new(config);
//! writer.before_document_saving(&SaveEvent::new(path, text));
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod timestamp;

pub use backup::{BackupOutcome, BackupWriter, SaveEvent, SaveListener};
pub use error::{SaveBackupError, SaveBackupResult};
