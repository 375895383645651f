//! User settings for SaveBackup
//!
//! Settings live in a flat `key=value` file in the home directory. The file is
//! created with every default on first use and read back afterwards; users are
//! free to edit it by hand between runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::paths::SaveBackupPaths;
use crate::error::SaveBackupError;
use crate::storage::file_io;
use crate::timestamp::DatePattern;

/// Default pattern embedded in backup filenames
pub const DEFAULT_FILE_DATE_FORMAT: &str = "yyyy-MM-dd_HH-mm-ss";

/// Default pattern prefixed to log lines
pub const DEFAULT_LOG_DATE_FORMAT: &str = "dd MMM yyyy, h:mm:ss a";

const FILE_HEADER: &str = "#SaveBackup settings";

/// A recognised settings key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Backup root directory
    DestinationPath,
    /// Timestamp pattern embedded in backup filenames
    FileDateFormat,
    /// Timestamp pattern for log lines
    LogDateFormat,
    /// Enable info-channel file logging
    InfoLogging,
    /// Enable error-channel file logging
    ErrorLogging,
    /// Info log destination
    InfoLogFile,
    /// Error log destination
    ErrorLogFile,
}

impl ConfigKey {
    /// Every key, in the order the settings file is written
    pub const ALL: [ConfigKey; 7] = [
        ConfigKey::DestinationPath,
        ConfigKey::FileDateFormat,
        ConfigKey::LogDateFormat,
        ConfigKey::InfoLogging,
        ConfigKey::ErrorLogging,
        ConfigKey::InfoLogFile,
        ConfigKey::ErrorLogFile,
    ];

    /// Name of the key as it appears in the settings file
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::DestinationPath => "destinationPath",
            ConfigKey::FileDateFormat => "fileDateFormat",
            ConfigKey::LogDateFormat => "logDateFormat",
            ConfigKey::InfoLogging => "infoLogging",
            ConfigKey::ErrorLogging => "errorLogging",
            ConfigKey::InfoLogFile => "infoLogFile",
            ConfigKey::ErrorLogFile => "errorLogFile",
        }
    }

    /// Look a key up by its settings-file name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// The documented default for this key
    pub fn default_value(self, paths: &SaveBackupPaths) -> String {
        match self {
            ConfigKey::DestinationPath => path_string(paths.default_backup_root()),
            ConfigKey::FileDateFormat => DEFAULT_FILE_DATE_FORMAT.to_string(),
            ConfigKey::LogDateFormat => DEFAULT_LOG_DATE_FORMAT.to_string(),
            ConfigKey::InfoLogging | ConfigKey::ErrorLogging => "false".to_string(),
            ConfigKey::InfoLogFile => path_string(paths.default_info_log()),
            ConfigKey::ErrorLogFile => path_string(paths.default_error_log()),
        }
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

/// Result of the create-if-absent-then-load sequence
#[derive(Debug)]
pub struct Bootstrap {
    /// The loaded settings
    pub store: ConfigStore,
    /// Whether the settings file was written during this bootstrap
    pub created: bool,
    /// Failures encountered along the way, none of them fatal
    pub problems: Vec<SaveBackupError>,
}

/// Loaded key/value settings with typed accessors
///
/// Lookups never fail: a missing or unreadable entry falls back to the
/// documented default for its key.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    paths: SaveBackupPaths,
    values: BTreeMap<String, String>,
}

impl ConfigStore {
    /// A store with no entries; every lookup yields its default
    pub fn empty(paths: SaveBackupPaths) -> Self {
        Self {
            paths,
            values: BTreeMap::new(),
        }
    }

    /// A store holding every default explicitly
    pub fn with_defaults(paths: SaveBackupPaths) -> Self {
        let values = ConfigKey::ALL
            .into_iter()
            .map(|key| (key.as_str().to_string(), key.default_value(&paths)))
            .collect();
        Self { paths, values }
    }

    /// Create the settings file if absent, then read it
    ///
    /// Running this again against an existing file never rewrites it, so
    /// values a user edited survive.
    pub fn bootstrap(paths: &SaveBackupPaths) -> Bootstrap {
        let settings_path = paths.settings_file();
        let mut store = Self::empty(paths.clone());
        let mut problems = Vec::new();
        let mut created = false;

        if !settings_path.exists() {
            store = Self::with_defaults(paths.clone());
            match file_io::create_text_new(&settings_path, &store.render()) {
                Ok(wrote) => {
                    created = wrote;
                    if wrote {
                        debug!(path = %settings_path.display(), "created default settings file");
                    }
                }
                Err(source) => problems.push(SaveBackupError::ConfigIo {
                    path: settings_path.clone(),
                    source,
                }),
            }
        }

        match fs::read_to_string(&settings_path) {
            Ok(contents) => store.values.extend(parse(&contents)),
            Err(source) => problems.push(SaveBackupError::ConfigIo {
                path: settings_path,
                source,
            }),
        }

        Bootstrap {
            store,
            created,
            problems,
        }
    }

    /// Value for a key, or its default
    pub fn get(&self, key: ConfigKey) -> String {
        self.values
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| key.default_value(&self.paths))
    }

    /// Raw entry by name, including keys this crate does not recognise
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a value in memory
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.values.insert(key.as_str().to_string(), value.into());
    }

    /// Paths the defaults are derived from
    pub fn paths(&self) -> &SaveBackupPaths {
        &self.paths
    }

    /// Backup root directory
    pub fn destination_path(&self) -> String {
        self.get(ConfigKey::DestinationPath)
    }

    /// Compiled backup filename pattern, falling back to the default
    pub fn file_date_pattern(&self) -> DatePattern {
        DatePattern::compile_or(&self.get(ConfigKey::FileDateFormat), DEFAULT_FILE_DATE_FORMAT)
    }

    /// Compiled log line pattern, falling back to the default
    pub fn log_date_pattern(&self) -> DatePattern {
        DatePattern::compile_or(&self.get(ConfigKey::LogDateFormat), DEFAULT_LOG_DATE_FORMAT)
    }

    pub fn info_logging(&self) -> bool {
        parse_bool(&self.get(ConfigKey::InfoLogging))
    }

    pub fn error_logging(&self) -> bool {
        parse_bool(&self.get(ConfigKey::ErrorLogging))
    }

    pub fn info_log_file(&self) -> PathBuf {
        PathBuf::from(self.get(ConfigKey::InfoLogFile))
    }

    pub fn error_log_file(&self) -> PathBuf {
        PathBuf::from(self.get(ConfigKey::ErrorLogFile))
    }

    /// Check configured values that can be invalid
    ///
    /// Only date patterns can be malformed; every other value is accepted as
    /// written.
    pub fn validate(&self) -> Vec<SaveBackupError> {
        [ConfigKey::FileDateFormat, ConfigKey::LogDateFormat]
            .into_iter()
            .filter_map(|key| {
                DatePattern::compile(&self.get(key)).err().map(|e| match e {
                    SaveBackupError::DatePattern(reason) => {
                        SaveBackupError::DatePattern(format!("{}: {}", key.as_str(), reason))
                    }
                    other => other,
                })
            })
            .collect()
    }

    /// Serialize the recognised keys in settings-file form
    ///
    /// Only used to seed a missing file; an existing file is never rewritten.
    pub fn render(&self) -> String {
        let mut out = String::from(FILE_HEADER);
        out.push('\n');
        for key in ConfigKey::ALL {
            out.push_str(key.as_str());
            out.push('=');
            out.push_str(&self.get(key));
            out.push('\n');
        }
        out
    }
}

/// Parse settings-file text into key/value pairs
///
/// Blank lines and lines starting with `#` or `!` are comments. The key ends
/// at the first `=` or `:`; keys and values are trimmed. A line with no
/// separator is a key with an empty value. A leading byte-order mark is
/// dropped.
pub fn parse(contents: &str) -> Vec<(String, String)> {
    contents
        .strip_prefix('\u{feff}')
        .unwrap_or(contents)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(|line| match line.find(&['=', ':'][..]) {
            Some(idx) => (
                line[..idx].trim().to_string(),
                line[idx + 1..].trim().to_string(),
            ),
            None => (line.to_string(), String::new()),
        })
        .collect()
}

fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
