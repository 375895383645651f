//! Backup system for SaveBackup
//!
//! Takes a timestamped copy of a document whenever the host is about to save
//! it.
//!
//! # Architecture
//!
//! The backup system consists of three components:
//!
//! - `SaveEvent` / `SaveListener`: the notification the host delivers, and the
//!   single capability it calls
//! - `PathDeriver`: pure mapping from a source path to its backup destination
//! - `BackupWriter`: handles each notification and logs the outcome
//!
//! # Backup Layout
//!
//! The source path is mirrored below the backup root, with the save time
//! inserted before the extension:
//!
//! ```text
//! <destinationPath>/home/u/proj/main-2024-01-05_09-30-15.txt
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use save_backup::backup::{BackupWriter, SaveEvent, SaveListener};
//!
//! let writer = BackupWriter::from_environment();
//! writer.before_document_saving(&SaveEvent::new("/home/u/proj/main.txt", text));
//! ```

mod event;
mod path;
mod writer;

pub use event::{SaveEvent, SaveListener};
pub use path::{
    derive_destination, extension_of, sanitize, stem_of, HostOs, PathDeriver, StemRule,
    ILLEGAL_PATH_CHARS,
};
pub use writer::{BackupOutcome, BackupWriter};
