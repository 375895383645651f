//! Custom error types for SaveBackup
//!
//! Every failure in this crate is recoverable: the variants below are produced
//! inside the crate, logged, and swallowed at the event-handler and logger
//! boundaries. None of them ever reaches the host's save pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for SaveBackup operations
#[derive(Error, Debug)]
pub enum SaveBackupError {
    /// The settings file could not be created or read
    #[error("Configuration I/O error at {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backup directory could not be created
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backup file itself could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The logger could not append to its own log file
    #[error("Failed to append to log {}: {source}", path.display())]
    LogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured date pattern could not be compiled
    #[error("Invalid date pattern: {0}")]
    DatePattern(String),

    /// Neither the override variable nor the platform yielded a home directory
    #[error("Could not determine the home directory")]
    HomeDir,
}

impl SaveBackupError {
    /// Check if this error came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::ConfigIo { .. }
                | Self::DirectoryCreate { .. }
                | Self::Write { .. }
                | Self::LogIo { .. }
        )
    }

    /// Path the failing operation was touching, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::ConfigIo { path, .. }
            | Self::DirectoryCreate { path, .. }
            | Self::Write { path, .. }
            | Self::LogIo { path, .. } => Some(path),
            Self::DatePattern(_) | Self::HomeDir => None,
        }
    }
}

/// Result type alias for SaveBackup operations
pub type SaveBackupResult<T> = Result<T, SaveBackupError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = SaveBackupError::DatePattern("unknown letter 'q'".into());
        assert_eq!(err.to_string(), "Invalid date pattern: unknown letter 'q'");
    }

    #[test]
    fn test_write_error_keeps_source() {
        let err = SaveBackupError::Write {
            path: PathBuf::from("/backups/main.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write /backups/main.txt: denied");
        assert!(err.source().is_some());
        assert!(err.is_io());
        assert_eq!(err.path(), Some(&PathBuf::from("/backups/main.txt")));
    }

    #[test]
    fn test_non_io_errors() {
        assert!(!SaveBackupError::HomeDir.is_io());
        assert!(SaveBackupError::HomeDir.path().is_none());
    }
}
