//! Policy-gated logger
//!
//! Every message is echoed to the console. When a channel is enabled the
//! message is also appended, timestamped, to that channel's log file. Nothing
//! here ever returns an error to the caller.

use std::error::Error;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::settings::ConfigStore;
use crate::error::SaveBackupError;
use crate::storage::file_io;
use crate::timestamp::{local_now, Clock, DatePattern};

/// A logging channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Info,
    Error,
}

/// Whether a channel writes to its file, and which file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPolicy {
    pub enabled: bool,
    pub file: PathBuf,
}

impl ChannelPolicy {
    pub fn new(enabled: bool, file: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            file: file.into(),
        }
    }
}

/// Writes info and error messages to the console and, when enabled, to files
#[derive(Debug, Clone)]
pub struct Logger {
    info: ChannelPolicy,
    error: ChannelPolicy,
    pattern: DatePattern,
    clock: Clock,
}

impl Logger {
    /// Create a logger from explicit channel policies
    pub fn new(info: ChannelPolicy, error: ChannelPolicy, pattern: DatePattern) -> Self {
        Self {
            info,
            error,
            pattern,
            clock: local_now,
        }
    }

    /// Create a logger from loaded settings
    pub fn from_config(store: &ConfigStore) -> Self {
        Self::new(
            ChannelPolicy::new(store.info_logging(), store.info_log_file()),
            ChannelPolicy::new(store.error_logging(), store.error_log_file()),
            store.log_date_pattern(),
        )
    }

    /// Replace the clock used for line timestamps
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_enabled(&self, channel: Channel) -> bool {
        self.policy(channel).enabled
    }

    fn policy(&self, channel: Channel) -> &ChannelPolicy {
        match channel {
            Channel::Info => &self.info,
            Channel::Error => &self.error,
        }
    }

    /// Log an informational message
    pub fn log_info(&self, message: &str) {
        println!("{}", message);
        self.append(Channel::Info, message);
    }

    /// Log an error message together with its cause chain
    pub fn log_error(&self, message: &str, cause: &dyn Error) {
        let trace = diagnostic_trace(cause);
        eprintln!("{}\n{}", message, trace);
        self.append(Channel::Error, &format!("{}\n{}", message, trace));
    }

    fn append(&self, channel: Channel, body: &str) {
        let policy = self.policy(channel);
        if !policy.enabled {
            return;
        }

        let line = format!("[{}] {}\n", self.pattern.format(&(self.clock)()), body);
        if let Err(source) = file_io::append_text(&policy.file, &line) {
            report_log_failure(&policy.file, source);
        }
    }
}

/// Console-only report; a failing log file must not take anything else down
fn report_log_failure(path: &Path, source: std::io::Error) {
    let err = SaveBackupError::LogIo {
        path: path.to_path_buf(),
        source,
    };
    warn!(error = %err, "log file append failed");
    eprintln!("{}", err);
}

/// Render an error and every underlying cause, one per line
pub fn diagnostic_trace(cause: &dyn Error) -> String {
    let mut trace = cause.to_string();
    let mut source = cause.source();
    while let Some(err) = source {
        trace.push_str("\nCaused by: ");
        trace.push_str(&err.to_string());
        source = err.source();
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SaveBackupPaths;
    use crate::config::settings::{ConfigKey, DEFAULT_LOG_DATE_FORMAT};
    use chrono::{DateTime, FixedOffset, TimeZone};
    use std::fs;
    use tempfile::TempDir;

    fn fixed_clock() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 15, 4, 9)
            .unwrap()
    }

    fn create_test_logger(info: bool, error: bool) -> (Logger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(
            ChannelPolicy::new(info, temp_dir.path().join("info.txt")),
            ChannelPolicy::new(error, temp_dir.path().join("error.txt")),
            DatePattern::compile(DEFAULT_LOG_DATE_FORMAT).unwrap(),
        )
        .with_clock(fixed_clock);
        (logger, temp_dir)
    }

    fn write_error() -> SaveBackupError {
        SaveBackupError::Write {
            path: PathBuf::from("/backups/a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
    }

    #[test]
    fn test_disabled_info_never_touches_file() {
        let (logger, temp) = create_test_logger(false, false);

        logger.log_info("Saving file /backups/a.txt");
        logger.log_info("Saving file /backups/b.txt");

        assert!(!temp.path().join("info.txt").exists());
    }

    #[test]
    fn test_enabled_info_appends_timestamped_lines() {
        let (logger, temp) = create_test_logger(true, false);

        logger.log_info("first");
        logger.log_info("second");

        let contents = fs::read_to_string(temp.path().join("info.txt")).unwrap();
        assert_eq!(
            contents,
            "[05 Jan 2024, 3:04:09 PM] first\n[05 Jan 2024, 3:04:09 PM] second\n"
        );
    }

    #[test]
    fn test_error_entry_includes_cause_chain() {
        let (logger, temp) = create_test_logger(false, true);

        logger.log_error("A problem has occurred with writing the file /src/a.txt", &write_error());

        let contents = fs::read_to_string(temp.path().join("error.txt")).unwrap();
        assert!(contents.starts_with("[05 Jan 2024, 3:04:09 PM] A problem has occurred"));
        assert!(contents.contains("Failed to write /backups/a.txt: denied"));
        assert!(contents.contains("Caused by: denied"));
        assert!(!temp.path().join("info.txt").exists());
    }

    #[test]
    fn test_channels_are_independent() {
        let (logger, temp) = create_test_logger(true, false);

        logger.log_error("boom", &write_error());
        logger.log_info("fine");

        assert!(!temp.path().join("error.txt").exists());
        assert!(temp.path().join("info.txt").exists());
    }

    #[test]
    fn test_unwritable_log_file_is_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing").join("info.txt");
        let logger = Logger::new(
            ChannelPolicy::new(true, missing.clone()),
            ChannelPolicy::new(true, missing.clone()),
            DatePattern::compile("HH:mm").unwrap(),
        );

        logger.log_info("still fine");
        logger.log_error("still fine", &write_error());

        assert!(!missing.exists());
        assert!(logger.is_enabled(Channel::Info));
    }

    #[test]
    fn test_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SaveBackupPaths::with_home_dir(temp_dir.path().to_path_buf());
        let mut store = ConfigStore::empty(paths);
        store.set(ConfigKey::InfoLogging, "true");

        let logger = Logger::from_config(&store);
        assert!(logger.is_enabled(Channel::Info));
        assert!(!logger.is_enabled(Channel::Error));

        logger.log_info("configured");
        assert!(temp_dir.path().join("SaveBackupInfo.txt").exists());
    }

    #[test]
    fn test_diagnostic_trace() {
        let trace = diagnostic_trace(&write_error());
        assert_eq!(trace, "Failed to write /backups/a.txt: denied\nCaused by: denied");
    }
}
