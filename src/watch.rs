//! Which files in the history directory are hand histories.

use crate::config::Config;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    suffix: String,
    exclude: String,
}

impl HistoryFilter {
    pub fn new(suffix: impl Into<String>, exclude: impl Into<String>) -> Self {
        Self { suffix: suffix.into(), exclude: exclude.into() }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.file_suffix.clone(), cfg.exclude_pattern.clone())
    }

    /// Name ends with the suffix and does not contain the exclusion.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(&self.suffix) && (self.exclude.is_empty() || !name.contains(&self.exclude))
    }
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Accepted regular files directly inside `dir`, sorted by path.
pub fn scan_dir(dir: &Path, filter: &HistoryFilter) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && filter.accepts(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
