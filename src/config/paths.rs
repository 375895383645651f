//! Path management for SaveBackup
//!
//! Every well-known location hangs off the user's home directory.
//!
//! ## Home Resolution Order
//!
//! 1. `SAVE_BACKUP_HOME` environment variable (if set)
//! 2. The platform home directory (`$HOME`, `%USERPROFILE%`)

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::SaveBackupError;

/// Environment variable that overrides the home directory
pub const HOME_OVERRIDE_VAR: &str = "SAVE_BACKUP_HOME";

/// Manages all paths used by SaveBackup
#[derive(Debug, Clone)]
pub struct SaveBackupPaths {
    /// Directory every default path is relative to
    home_dir: PathBuf,
}

impl SaveBackupPaths {
    /// Create a new SaveBackupPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SaveBackupError> {
        let home_dir = match std::env::var_os(HOME_OVERRIDE_VAR) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .ok_or(SaveBackupError::HomeDir)?,
        };

        Ok(Self { home_dir })
    }

    /// Resolve paths, falling back to the current directory when no home exists
    ///
    /// The backup feature must keep working even in stripped-down
    /// environments, so the failure is echoed and swallowed here.
    pub fn resolve() -> Self {
        Self::new().unwrap_or_else(|e| {
            eprintln!("{}; using the current directory instead", e);
            Self::with_home_dir(PathBuf::from("."))
        })
    }

    /// Create SaveBackupPaths with a custom home directory (useful for testing)
    pub fn with_home_dir(home_dir: PathBuf) -> Self {
        Self { home_dir }
    }

    /// Get the home directory
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Get the path to the settings file (~/SaveBackup.ini)
    pub fn settings_file(&self) -> PathBuf {
        self.home_dir.join("SaveBackup.ini")
    }

    /// Get the default backup root (~/.SaveBackup)
    pub fn default_backup_root(&self) -> PathBuf {
        self.home_dir.join(".SaveBackup")
    }

    /// Get the default info log (~/SaveBackupInfo.txt)
    pub fn default_info_log(&self) -> PathBuf {
        self.home_dir.join("SaveBackupInfo.txt")
    }

    /// Get the default error log (~/SaveBackupError.txt)
    pub fn default_error_log(&self) -> PathBuf {
        self.home_dir.join("SaveBackupError.txt")
    }

    /// Check if the settings file has been written yet
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
