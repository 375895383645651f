//! Configuration module for SaveBackup
//!
//! This module provides configuration management including:
//! - Home-relative path resolution
//! - The `key=value` settings file and its defaults
//! - A one-time, lazily-loaded settings handle

pub mod lazy;
pub mod paths;
pub mod settings;

pub use lazy::LazyConfig;
pub use paths::SaveBackupPaths;
pub use settings::{ConfigKey, ConfigStore};
