//! Backup writer for SaveBackup
//!
//! Handles one save notification at a time: derive the destination, make sure
//! its directory exists, write the document text, and log what happened. A
//! failure is logged and dropped; it never reaches the host's save.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::event::{SaveEvent, SaveListener};
use super::path::{HostOs, PathDeriver, StemRule};
use crate::config::{LazyConfig, SaveBackupPaths};
use crate::error::{SaveBackupError, SaveBackupResult};
use crate::logging::Logger;
use crate::storage::file_io;
use crate::timestamp::{local_now, Clock};

/// What happened to one save notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The document had no backing file
    Skipped,
    /// The backup was written here
    Written(PathBuf),
    /// Writing the backup here failed; the failure has been logged
    Failed(PathBuf),
}

impl BackupOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Settings-derived state, built on the first backed-up document
#[derive(Debug)]
struct Resolved {
    logger: Logger,
    deriver: PathDeriver,
}

/// Writes a timestamped copy of each document the host is about to save
pub struct BackupWriter {
    config: Arc<LazyConfig>,
    host: HostOs,
    stem_rule: StemRule,
    clock: Clock,
    resolved: OnceLock<Resolved>,
}

impl BackupWriter {
    /// Create a writer reading its settings from `config`
    pub fn new(config: Arc<LazyConfig>) -> Self {
        Self {
            config,
            host: HostOs::current(),
            stem_rule: StemRule::default(),
            clock: local_now,
            resolved: OnceLock::new(),
        }
    }

    /// Create a writer for the current user's home directory
    pub fn from_environment() -> Self {
        Self::new(Arc::new(LazyConfig::new(SaveBackupPaths::resolve())))
    }

    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    pub fn with_stem_rule(mut self, stem_rule: StemRule) -> Self {
        self.stem_rule = stem_rule;
        self
    }

    /// Replace the clock used for backup filenames and log lines
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &LazyConfig {
        &self.config
    }

    fn resolved(&self) -> &Resolved {
        self.resolved.get_or_init(|| {
            let store = self.config.get();
            Resolved {
                logger: Logger::from_config(store).with_clock(self.clock),
                deriver: PathDeriver::new(
                    store.destination_path(),
                    store.file_date_pattern(),
                    self.host,
                )
                .with_stem_rule(self.stem_rule),
            }
        })
    }

    /// Back up one document
    ///
    /// A document without a backing file is skipped without touching the
    /// filesystem or the logs.
    pub fn handle(&self, event: &SaveEvent) -> BackupOutcome {
        let Some(source_path) = event.source_path() else {
            return BackupOutcome::Skipped;
        };

        let Resolved { logger, deriver } = self.resolved();
        let source = source_path.to_string_lossy();
        let destination = PathBuf::from(deriver.derive(&source, &(self.clock)()));

        logger.log_info(&format!("Saving file {}", destination.display()));

        match write_backup(logger, &destination, event.text()) {
            Ok(()) => {
                debug!(
                    destination = %destination.display(),
                    bytes = event.text().len(),
                    "backup written"
                );
                BackupOutcome::Written(destination)
            }
            Err(e) => {
                logger.log_error(
                    &format!("A problem has occurred with writing the file {}", source),
                    &e,
                );
                BackupOutcome::Failed(destination)
            }
        }
    }

    /// Back up every document in a batch, independently
    pub fn handle_batch<'a, I>(&self, events: I) -> Vec<BackupOutcome>
    where
        I: IntoIterator<Item = &'a SaveEvent>,
    {
        events.into_iter().map(|event| self.handle(event)).collect()
    }
}

/// Create the destination's directories, then write the text
///
/// A directory failure is logged and the write is still attempted; the write
/// then reports its own failure.
fn write_backup(logger: &Logger, destination: &Path, text: &str) -> SaveBackupResult<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            if let Err(source) = file_io::ensure_dir(parent) {
                let err = SaveBackupError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                };
                logger.log_error("An error occurred creating the required folder.", &err);
            }
        }
    }

    file_io::write_text_atomic(destination, text).map_err(|source| SaveBackupError::Write {
        path: destination.to_path_buf(),
        source,
    })
}

impl SaveListener for BackupWriter {
    fn before_document_saving(&self, event: &SaveEvent) {
        self.handle(event);
    }

    fn before_all_documents_saving(&self, unsaved: &[SaveEvent]) {
        self.handle_batch(unsaved);
    }
}
