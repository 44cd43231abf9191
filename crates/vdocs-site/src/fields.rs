//! Derived node fields.
//!
//! [`FieldDeriver`] runs once per content node during indexing. For Markdown
//! files under the content directory it computes the fields templates and
//! the page registrar need:
//!
//! | File | `hash` | Other fields |
//! |------|--------|--------------|
//! | `data/v2/guides/setup.md` | `documentation` | `category`, `version`, `root`, `slug`, `path` |
//! | `data/v2/_sidebar.md` | `documentation-template` | `version` |
//! | `content/blog/post.md` | none | none |
//!
//! # Version Routing
//!
//! The version is the directory right below the content directory. Documents
//! of the catalog's `current` version are published without a version segment:
//!
//! - `data/v3/guides/setup.md` (current = `v3`) -> `/docs/guides/setup/`
//! - `data/v2/guides/setup.md` -> `/docs/v2/guides/setup/`

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::VersionCatalog;
use crate::node::ContentNode;

/// `hash` of documents rendered as standalone pages.
pub const DOCUMENTATION_HASH: &str = "documentation";

/// `hash` of template files.
pub const TEMPLATE_HASH: &str = "documentation-template";

/// Error deriving fields for a node inside the content directory.
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    /// Document has no `path` in its frontmatter.
    #[error("{}: frontmatter must declare a `path`", .file.display())]
    MissingFrontmatterPath { file: PathBuf },
    /// File sits directly in the content directory, outside any version.
    #[error("{}: documentation must live in a version directory (<content>/<version>/...)", .file.display())]
    UnversionedContent { file: PathBuf },
}

/// Fields derived for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "hash")]
pub enum DerivedFields {
    /// A document rendered as its own page.
    #[serde(rename = "documentation")]
    Documentation {
        /// First segment of the frontmatter path.
        category: String,
        /// Version directory name.
        version: String,
        /// Frontmatter path has exactly two segments.
        root: bool,
        /// File-path slug.
        slug: String,
        /// Canonical URL path, always with a trailing slash.
        path: String,
    },
    /// A template file, indexed but never rendered as a page.
    #[serde(rename = "documentation-template")]
    Template {
        /// Version directory name.
        version: String,
    },
}

impl DerivedFields {
    /// Value of the `hash` field.
    #[must_use]
    pub fn hash(&self) -> &'static str {
        match self {
            Self::Documentation { .. } => DOCUMENTATION_HASH,
            Self::Template { .. } => TEMPLATE_HASH,
        }
    }

    /// Version directory name.
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Documentation { version, .. } | Self::Template { version } => version,
        }
    }

    /// Attach every field to `node` through `sink`, `hash` first.
    pub fn emit<S: FieldSink + ?Sized>(&self, node: &ContentNode, sink: &mut S) {
        sink.create_node_field(node, "hash", Value::from(self.hash()));
        match self {
            Self::Documentation {
                category,
                version,
                root,
                slug,
                path,
            } => {
                sink.create_node_field(node, "category", Value::from(category.as_str()));
                sink.create_node_field(node, "version", Value::from(version.as_str()));
                sink.create_node_field(node, "root", Value::from(*root));
                sink.create_node_field(node, "slug", Value::from(slug.as_str()));
                sink.create_node_field(node, "path", Value::from(path.as_str()));
            }
            Self::Template { version } => {
                sink.create_node_field(node, "version", Value::from(version.as_str()));
            }
        }
    }
}

/// Receives named fields for a node.
///
/// May be called several times per node; a later value for the same name
/// replaces the earlier one.
pub trait FieldSink {
    fn create_node_field(&mut self, node: &ContentNode, name: &str, value: Value);
}

/// Field bag of a single node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldBag(Map<String, Value>);

impl FieldBag {
    /// Look up a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Look up a string field.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Whether no field was attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of attached fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FieldSink for FieldBag {
    fn create_node_field(&mut self, _node: &ContentNode, name: &str, value: Value) {
        self.0.insert(name.to_owned(), value);
    }
}

/// Maps a node's source file to a URL slug.
pub trait SlugResolver {
    fn slug(&self, node: &ContentNode) -> String;
}

/// Slug from the file location relative to a source root.
///
/// - `<root>/v2/guides/setup.md` -> `/v2/guides/setup/`
/// - `<root>/v2/guides/index.md` -> `/v2/guides/`
/// - `<root>/pages/about.md` (base `pages`) -> `/about/`
#[derive(Debug, Clone)]
pub struct FilePathSlugResolver {
    source_root: PathBuf,
    base_path: String,
}

impl FilePathSlugResolver {
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, base_path: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            base_path: base_path.into(),
        }
    }
}

impl SlugResolver for FilePathSlugResolver {
    fn slug(&self, node: &ContentNode) -> String {
        let path = &node.file_absolute_path;
        let relative = path.strip_prefix(&self.source_root).unwrap_or_else(|_| {
            path.file_name().map_or(Path::new(""), Path::new)
        });
        file_path_to_slug(relative, &self.base_path)
    }
}

/// Convert a relative file path to a slug with leading and trailing slashes.
///
/// Drops `base` when it is the first segment, the extension, and a trailing
/// `index` file name.
pub(crate) fn file_path_to_slug(rel_path: &Path, base: &str) -> String {
    let mut segments = path_segments(rel_path);
    if !base.is_empty() && segments.first().is_some_and(|first| first == base) {
        segments.remove(0);
    }

    if let Some(last) = segments.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map_or_else(|| last.clone(), |s| s.to_string_lossy().into_owned());
        if stem != "index" {
            segments.push(stem);
        }
    }

    normalize_url_path(&segments.join("/"))
}

/// Normalize a URL path to `/a/b/` form.
///
/// Collapses repeated slashes, resolves `.` and `..` segments, and ends the
/// result with exactly one slash. The result is always absolute.
#[must_use]
pub fn normalize_url_path(url: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in url.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return "/".to_owned();
    }
    format!("/{}/", segments.join("/"))
}

/// Normal components of a path as strings.
fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Layout settings for [`FieldDeriver`].
#[derive(Debug, Clone)]
pub struct DeriverConfig {
    /// Directory node paths are taken relative to.
    pub project_root: PathBuf,
    /// First relative path segment of versioned documentation (`data`).
    pub content_dir: String,
    /// First URL segment of documentation pages (`docs`).
    pub docs_prefix: String,
    /// Filename prefix marking templates (`_`).
    pub template_prefix: String,
}

impl DeriverConfig {
    /// Default layout rooted at `project_root`.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            content_dir: "data".to_owned(),
            docs_prefix: "docs".to_owned(),
            template_prefix: "_".to_owned(),
        }
    }
}

/// Computes derived fields for content nodes.
///
/// Pure with respect to its inputs: deriving the same node twice yields the
/// same fields.
#[derive(Debug)]
pub struct FieldDeriver<'a> {
    catalog: &'a VersionCatalog,
    config: DeriverConfig,
}

impl<'a> FieldDeriver<'a> {
    #[must_use]
    pub fn new(catalog: &'a VersionCatalog, config: DeriverConfig) -> Self {
        Self { catalog, config }
    }

    /// Derive fields for `node` and attach them through `sink`.
    ///
    /// Returns the derived fields, or `None` for nodes that are skipped
    /// (non-Markdown, or outside the content directory).
    ///
    /// # Errors
    ///
    /// See [`FieldDeriver::derive`].
    pub fn derive_fields<S: FieldSink + ?Sized>(
        &self,
        node: &ContentNode,
        slugs: &dyn SlugResolver,
        sink: &mut S,
    ) -> Result<Option<DerivedFields>, DeriveError> {
        let derived = self.derive(node, slugs)?;
        if let Some(fields) = &derived {
            fields.emit(node, sink);
        }
        Ok(derived)
    }

    /// Compute the fields for `node` without attaching them.
    ///
    /// # Errors
    ///
    /// Returns [`DeriveError::UnversionedContent`] for files directly in the
    /// content directory and [`DeriveError::MissingFrontmatterPath`] for
    /// documents without a frontmatter `path`.
    pub fn derive(
        &self,
        node: &ContentNode,
        slugs: &dyn SlugResolver,
    ) -> Result<Option<DerivedFields>, DeriveError> {
        if !node.is_markdown() {
            return Ok(None);
        }

        let Ok(relative) = node.file_absolute_path.strip_prefix(&self.config.project_root) else {
            tracing::debug!(file = %node.file_absolute_path.display(), "Outside project root, skipping");
            return Ok(None);
        };

        let segments = path_segments(relative);
        if segments.first() != Some(&self.config.content_dir) {
            return Ok(None);
        }

        // content dir, version dir, file name
        let [_, version, .., filename] = segments.as_slice() else {
            return Err(DeriveError::UnversionedContent {
                file: node.file_absolute_path.clone(),
            });
        };

        if filename.starts_with(&self.config.template_prefix) {
            tracing::debug!(file = %relative.display(), %version, "Documentation template");
            return Ok(Some(DerivedFields::Template {
                version: version.clone(),
            }));
        }

        let logical_path = node
            .frontmatter
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DeriveError::MissingFrontmatterPath {
                file: node.file_absolute_path.clone(),
            })?;

        let category = logical_path.split('/').next().unwrap_or_default().to_owned();
        let root = logical_path.split('/').count() == 2;
        let prefix = &self.config.docs_prefix;
        let url = if version == self.catalog.current() {
            format!("/{prefix}/{logical_path}")
        } else {
            format!("/{prefix}/{version}/{logical_path}")
        };
        let path = normalize_url_path(&url);

        tracing::debug!(file = %relative.display(), %version, %path, "Documentation page");

        Ok(Some(DerivedFields::Documentation {
            category,
            version: version.clone(),
            root,
            slug: slugs.slug(node),
            path,
        }))
    }
}
