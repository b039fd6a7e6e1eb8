//! Locate data files (presets, impulse responses) by extension.
//!
//! Search order for [`DataFileSearch::find_in`]:
//! 1. an absolute `subdir` is searched on its own;
//! 2. otherwise `<user data dir>/<subdir>` (`$XDG_DATA_HOME`, falling back to
//!    `~/.local/share` on Linux);
//! 3. then `<dir>/<subdir>` for every entry of `$XDG_DATA_DIRS`
//!    (default `/usr/local/share/:/usr/share/`).
//!
//! Within one directory results are sorted; across directories they keep
//! search order. Missing directories are skipped silently.

use crate::compat::{String, Vec};
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Overrides the directory searched by [`DataFileSearch::find`].
pub const LOCAL_PATH_VAR: &str = "OSTINATO_LOCAL_PATH";

const DEFAULT_DATA_DIRS: &str = "/usr/local/share/:/usr/share/";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFileSearch {
    local_dir: Option<PathBuf>,
    data_roots: Vec<PathBuf>,
}

impl DataFileSearch {
    /// Build the search roots from the process environment.
    pub fn from_env() -> Self {
        let local_dir = env::var_os(LOCAL_PATH_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok());

        let mut data_roots = Vec::new();
        if let Some(home) = dirs::data_dir() {
            data_roots.push(home);
        }
        let system = env::var_os("XDG_DATA_DIRS")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIRS.into());
        data_roots.extend(env::split_paths(&system).filter(|p| !p.as_os_str().is_empty()));

        Self {
            local_dir,
            data_roots,
        }
    }

    /// Explicit roots, mostly for tests and embedded setups.
    pub fn with_roots(
        local_dir: impl Into<PathBuf>,
        data_roots: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            local_dir: Some(local_dir.into()),
            data_roots: data_roots.into_iter().collect(),
        }
    }

    pub fn data_roots(&self) -> &[PathBuf] {
        &self.data_roots
    }

    /// Files with extension `ext` in the local directory.
    pub fn find(&self, ext: &str) -> Vec<PathBuf> {
        let mut results = Vec::new();
        if let Some(dir) = &self.local_dir {
            search_directory(dir, ext, &mut results);
        }
        results
    }

    /// Files with extension `ext` under `subdir` of every data root.
    pub fn find_in(&self, ext: &str, subdir: impl AsRef<Path>) -> Vec<PathBuf> {
        let subdir = subdir.as_ref();
        let mut results = Vec::new();

        if subdir.is_absolute() {
            search_directory(subdir, ext, &mut results);
            return results;
        }
        for root in &self.data_roots {
            search_directory(&root.join(subdir), ext, &mut results);
        }
        results
    }
}

fn search_directory(dir: &Path, ext: &str, results: &mut Vec<PathBuf>) {
    if !dir.is_dir() {
        return;
    }
    tracing::trace!(dir = %dir.display(), ext, "searching for data files");

    let ext = normalize_ext(ext);
    let base = results.len();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&ext));
        if matches {
            results.push(entry.into_path());
        }
    }
    results[base..].sort();

    for path in &results[base..] {
        tracing::debug!(path = %path.display(), "found data file");
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').into()
}
