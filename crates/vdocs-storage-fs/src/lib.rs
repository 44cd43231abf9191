//! Filesystem content source for vdocs.
//!
//! [`FsSource`] walks the configured source directories and turns every
//! Markdown file into a [`ContentNode`]:
//!
//! - Recursive directory scanning (hidden entries skipped)
//! - YAML frontmatter parsing
//! - Heading outline extraction
//!
//! Node ids are paths relative to the project root, so
//! `<project>/data/v2/guides/setup.md` gets the id `data/v2/guides/setup.md`.
//!
//! # Example
//!
//! ```ignore
//! use vdocs_storage_fs::FsSource;
//!
//! let source = FsSource::new("/site", vec!["/site/data".into()]);
//! for node in source.load()? {
//!     println!("{}: {:?}", node.id, node.frontmatter.path);
//! }
//! ```

mod markdown;
mod scanner;

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use vdocs_site::ContentNode;

use markdown::{parse_frontmatter, parse_markdown};
use scanner::Scanner;

/// Error loading content from the filesystem.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Frontmatter block is not valid YAML or has fields of the wrong type.
    #[error("Invalid frontmatter in {}: {source}", path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads Markdown content nodes from source directories.
#[derive(Debug, Clone)]
pub struct FsSource {
    project_root: PathBuf,
    sources: Vec<PathBuf>,
}

impl FsSource {
    /// Create a source over `sources`, with node ids relative to `project_root`.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>, sources: Vec<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            sources,
        }
    }

    /// Load every Markdown file as a content node.
    ///
    /// Sources are read in configuration order, files within a source in
    /// path order. A file found through two overlapping sources is loaded once.
    /// Unreadable files are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Frontmatter`] for the first file whose
    /// frontmatter fails to parse.
    pub fn load(&self) -> Result<Vec<ContentNode>, SourceError> {
        let mut nodes = Vec::new();
        let mut seen = HashSet::new();

        for source in &self.sources {
            for path in Scanner::new(source.clone()).scan() {
                if !seen.insert(path.clone()) {
                    continue;
                }
                if let Some(node) = self.load_file(&path)? {
                    nodes.push(node);
                }
            }
        }

        tracing::info!(count = nodes.len(), sources = self.sources.len(), "Loaded content nodes");
        Ok(nodes)
    }

    fn load_file(&self, path: &Path) -> Result<Option<ContentNode>, SourceError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read file, skipping");
                return Ok(None);
            }
        };

        let parsed = parse_markdown(&content);
        let frontmatter = parse_frontmatter(parsed.frontmatter.as_deref().unwrap_or_default())
            .map_err(|source| SourceError::Frontmatter {
                path: path.to_path_buf(),
                source,
            })?;

        let node = ContentNode::markdown(self.node_id(path), path)
            .with_frontmatter(frontmatter)
            .with_headings(parsed.headings);
        tracing::debug!(id = %node.id, headings = node.headings.len(), "Loaded node");
        Ok(Some(node))
    }

    /// Project-relative path with `/` separators, or the full path for
    /// files outside the project root.
    fn node_id(&self, path: &Path) -> String {
        let Ok(relative) = path.strip_prefix(&self.project_root) else {
            return path.to_string_lossy().into_owned();
        };
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
