//! Markdown discovery by filesystem walking.
//!
//! Discovery only finds files. Reading and parsing happens in
//! [`FsSource`](crate::FsSource).

use std::fs;
use std::path::{Path, PathBuf};

/// Finds Markdown files below a source directory.
pub(crate) struct Scanner {
    source_dir: PathBuf,
}

impl Scanner {
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Walk the source directory and return every `.md` file, sorted.
    ///
    /// Returns an empty Vec if the source directory doesn't exist.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if self.source_dir.is_dir() {
            Self::scan_directory(&self.source_dir, &mut files);
        } else {
            tracing::warn!(path = %self.source_dir.display(), "Source directory not found, skipping");
        }
        files.sort();
        files
    }

    fn scan_directory(dir_path: &Path, files: &mut Vec<PathBuf>) {
        let entries = match fs::read_dir(dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir_path.display(), error = %e, "Failed to read directory, skipping");
                return;
            }
        };

        for entry in entries.filter_map(Result::ok) {
            // Skip hidden files/dirs
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                Self::scan_directory(&path, files);
            } else if path.extension().is_some_and(|e| e == "md") {
                files.push(path);
            }
        }
    }
}
