//! One-time settings bootstrap behind an explicit handle
//!
//! The handle is constructed by the host and passed down to whatever needs
//! settings. The first `get` runs the bootstrap; every later call, from any
//! thread, sees the same loaded store.

use std::sync::OnceLock;

use tracing::debug;

use super::paths::SaveBackupPaths;
use super::settings::ConfigStore;
use crate::error::SaveBackupError;
use crate::logging::Logger;

/// Lazily-loaded, then immutable, settings
#[derive(Debug)]
pub struct LazyConfig {
    paths: SaveBackupPaths,
    store: OnceLock<ConfigStore>,
}

impl LazyConfig {
    pub fn new(paths: SaveBackupPaths) -> Self {
        Self {
            paths,
            store: OnceLock::new(),
        }
    }

    /// A handle whose settings are already loaded
    pub fn preloaded(store: ConfigStore) -> Self {
        let paths = store.paths().clone();
        let cell = OnceLock::new();
        let _ = cell.set(store);
        Self { paths, store: cell }
    }

    pub fn paths(&self) -> &SaveBackupPaths {
        &self.paths
    }

    /// Whether the bootstrap has run
    pub fn is_loaded(&self) -> bool {
        self.store.get().is_some()
    }

    /// Loaded settings, bootstrapping on first access
    pub fn get(&self) -> &ConfigStore {
        self.store.get_or_init(|| load(&self.paths))
    }
}

fn load(paths: &SaveBackupPaths) -> ConfigStore {
    let boot = ConfigStore::bootstrap(paths);
    debug!(
        path = %paths.settings_file().display(),
        created = boot.created,
        problems = boot.problems.len(),
        "settings loaded"
    );

    let logger = Logger::from_config(&boot.store);
    report_problems(&logger, &boot.problems);
    report_problems(&logger, &boot.store.validate());

    boot.store
}

/// Send non-fatal bootstrap problems to the error channel
fn report_problems(logger: &Logger, problems: &[SaveBackupError]) {
    for problem in problems {
        let message = match problem {
            SaveBackupError::ConfigIo { path, .. } => format!(
                "A problem has occurred with the settings file {}",
                path.display()
            ),
            _ => "An invalid setting was ignored; the default is used instead.".to_string(),
        };
        logger.log_error(&message, problem);
    }
}
