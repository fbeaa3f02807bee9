//! Discovery of local spreadsheet files

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tokio::fs;
use tracing::debug;

static SPREADSHEET_FILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[^\s]+\.(csv|xls|xlsx)$").expect("Invalid regex"));

/// File name filter applied to scanned directory entries
#[derive(Debug, Clone)]
pub struct FileFilter {
    pattern: Regex,
}

impl Default for FileFilter {
    /// Matches `.csv`, `.xls` and `.xlsx` files, ignoring case
    fn default() -> Self {
        Self {
            pattern: SPREADSHEET_FILE_REGEX.clone(),
        }
    }
}

impl FileFilter {
    /// Whether `path` passes the filter
    ///
    /// The whole path is tested, so a bare `.csv` inside a directory matches.
    /// Paths that are not valid UTF-8 never match.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.to_str().is_some_and(|path| self.pattern.is_match(path))
    }
}

/// Lists the regular files in `dir` that pass `filter`, sorted by path
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be read
pub async fn scan_directory(dir: &Path, filter: &FileFilter) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !filter.matches(&path) {
            continue;
        }

        // Follows symlinks, a dangling link is skipped
        let is_file = fs::metadata(&path)
            .await
            .is_ok_and(|metadata| metadata.is_file());
        if is_file {
            files.push(path);
        }
    }

    files.sort();
    debug!("Found {} matching files in {}", files.len(), dir.display());

    Ok(files)
}
