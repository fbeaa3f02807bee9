use std::path::PathBuf;

use crate::types::Environment;

/// Configuration for the event handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Local directory scanned for spreadsheet files, `None` disables the scan
    pub scan_dir: Option<PathBuf>,
    /// Number of records or files handled at the same time, 1 is sequential
    pub max_concurrency: usize,
}

impl HandlerConfig {
    /// Creates a new HandlerConfig from the given environment
    #[must_use]
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            scan_dir: Environment::scan_dir(),
            max_concurrency: env.max_concurrency(),
        }
    }

    /// Concurrency limit, never below one
    #[must_use]
    pub fn concurrency_limit(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            scan_dir: None,
            max_concurrency: 1,
        }
    }
}
