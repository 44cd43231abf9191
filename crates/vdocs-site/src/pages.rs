//! Page registration.
//!
//! [`PageRegistrar`] turns the version catalog and the documentation query
//! into pages:
//!
//! - one version-index page per catalog entry that isn't excluded
//!   (`/docs/{version}/`)
//! - one documentation page per queried document (at its derived `path`)
//!
//! # Build Modes
//!
//! | Mode | Excluded catalog keys | `next` documentation pages |
//! |------|-----------------------|----------------------------|
//! | Production | `current`, `next` | suppressed |
//! | Development | `current` | created |
//!
//! The two phases are independent and run as a join: registration completes
//! when both have finished, and fails with the query error if the query fails.

use std::path::PathBuf;

use serde::Serialize;

use crate::catalog::{CURRENT_KEY, NEXT_KEY, VersionCatalog};
use crate::node::Heading;
use crate::style::StyleCheck;

/// Default cap on documentation nodes returned by the query.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// Whether the build previews unreleased documentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Published build: the `next` version is hidden.
    #[default]
    Production,
    /// Local preview: the `next` version is exposed.
    Development,
}

impl BuildMode {
    /// Mode from a development flag.
    #[must_use]
    pub fn from_development(development: bool) -> Self {
        if development {
            Self::Development
        } else {
            Self::Production
        }
    }

    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }

    /// Catalog keys that get no version-index page in this mode.
    #[must_use]
    pub fn excluded_keys(self) -> &'static [&'static str] {
        match self {
            Self::Production => &[CURRENT_KEY, NEXT_KEY],
            Self::Development => &[CURRENT_KEY],
        }
    }
}

/// Template a page is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTemplate {
    /// Landing page of a version.
    Version,
    /// A documentation page.
    Documentation,
}

impl PageTemplate {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Documentation => "documentation",
        }
    }
}

/// Data handed to the page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageContext {
    #[serde(rename_all = "camelCase")]
    VersionIndex { version: String, version_path: String },
    Documentation { slug: String, version: String },
}

/// A page to materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// URL path with leading and trailing slash.
    pub path: String,
    pub template: PageTemplate,
    pub context: PageContext,
}

/// A documentation node as returned by the content query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationNode {
    pub id: String,
    pub file_absolute_path: PathBuf,
    pub headings: Vec<Heading>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Derived canonical path.
    pub path: String,
    /// Derived version.
    pub version: String,
}

/// Query over indexed content.
///
/// Implementations return documentation nodes (`hash == "documentation"`)
/// whose frontmatter has no `exclude`, at most `limit` of them.
pub trait ContentQuery: Sync {
    /// Error reported by the query; surfaced unchanged by the registrar.
    type Error: Send;

    fn documentation_nodes(&self, limit: usize) -> Result<Vec<DocumentationNode>, Self::Error>;
}

/// Receives pages to materialize.
///
/// Called from both registration phases, possibly concurrently. Duplicate
/// paths are the sink's concern.
pub trait PageSink: Sync {
    fn create_page(&self, page: Page);
}

/// Counts from one registration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    /// Version-index pages created.
    pub version_pages: usize,
    /// Documentation pages created.
    pub documentation_pages: usize,
    /// Documentation nodes of the `next` version left out.
    pub suppressed: usize,
    /// Warnings raised by the style check.
    pub style_warnings: usize,
}

/// Creates version-index and documentation pages.
#[derive(Debug)]
pub struct PageRegistrar<'a> {
    catalog: &'a VersionCatalog,
    mode: BuildMode,
    excluded_keys: Vec<String>,
    docs_prefix: String,
    query_limit: usize,
}

impl<'a> PageRegistrar<'a> {
    /// Registrar with the mode's excluded keys, `docs` prefix and the default query limit.
    #[must_use]
    pub fn new(catalog: &'a VersionCatalog, mode: BuildMode) -> Self {
        Self {
            catalog,
            mode,
            excluded_keys: mode.excluded_keys().iter().map(|k| (*k).to_owned()).collect(),
            docs_prefix: "docs".to_owned(),
            query_limit: DEFAULT_QUERY_LIMIT,
        }
    }

    /// Replace the excluded catalog keys.
    #[must_use]
    pub fn with_excluded_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.excluded_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the first URL segment of version-index pages.
    #[must_use]
    pub fn with_docs_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.docs_prefix = prefix.into();
        self
    }

    /// Set the maximum number of queried documentation nodes.
    #[must_use]
    pub fn with_query_limit(mut self, limit: usize) -> Self {
        self.query_limit = limit;
        self
    }

    /// Path of a version's index page, whether or not it gets created.
    #[must_use]
    pub fn version_index_path(&self, version_id: &str) -> String {
        format!("/{}/{version_id}/", self.docs_prefix)
    }

    /// Register all pages with `sink`.
    ///
    /// Pages already handed to the sink stay there if the query fails.
    ///
    /// # Errors
    ///
    /// Returns the query's error unchanged.
    pub fn register_pages<Q, P, C>(
        &self,
        query: &Q,
        sink: &P,
        style: &C,
    ) -> Result<RegisterSummary, Q::Error>
    where
        Q: ContentQuery + ?Sized,
        P: PageSink + ?Sized,
        C: StyleCheck + ?Sized,
    {
        let (version_pages, documentation) = rayon::join(
            || self.create_version_pages(sink),
            || self.create_documentation_pages(query, sink, style),
        );
        let mut summary = documentation?;
        summary.version_pages = version_pages;

        tracing::info!(
            version_pages = summary.version_pages,
            documentation_pages = summary.documentation_pages,
            suppressed = summary.suppressed,
            style_warnings = summary.style_warnings,
            development = self.mode.is_development(),
            "Registered pages"
        );

        Ok(summary)
    }

    fn create_version_pages<P: PageSink + ?Sized>(&self, sink: &P) -> usize {
        let mut created = 0;
        for (key, version) in self.catalog.entries() {
            if self.excluded_keys.iter().any(|k| k == key) {
                continue;
            }
            let version_path = self.version_index_path(version);
            sink.create_page(Page {
                path: version_path.clone(),
                template: PageTemplate::Version,
                context: PageContext::VersionIndex {
                    version: version.to_owned(),
                    version_path,
                },
            });
            created += 1;
        }
        created
    }

    fn create_documentation_pages<Q, P, C>(
        &self,
        query: &Q,
        sink: &P,
        style: &C,
    ) -> Result<RegisterSummary, Q::Error>
    where
        Q: ContentQuery + ?Sized,
        P: PageSink + ?Sized,
        C: StyleCheck + ?Sized,
    {
        let nodes = query.documentation_nodes(self.query_limit)?;
        let mut summary = RegisterSummary::default();

        for node in nodes {
            for warning in style.check(&node) {
                tracing::warn!(
                    file = %node.file_absolute_path.display(),
                    "{warning}"
                );
                summary.style_warnings += 1;
            }

            if !self.mode.is_development() && self.is_next(&node.version) {
                tracing::debug!(path = %node.path, "Skipping unreleased documentation");
                summary.suppressed += 1;
                continue;
            }

            sink.create_page(Page {
                path: node.path.clone(),
                template: PageTemplate::Documentation,
                context: PageContext::Documentation {
                    slug: node.path,
                    version: node.version,
                },
            });
            summary.documentation_pages += 1;
        }

        Ok(summary)
    }

    /// Whether `version` names the pre-release, by label or by identifier.
    fn is_next(&self, version: &str) -> bool {
        version == NEXT_KEY || self.catalog.next() == Some(version)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::style::{NoStyleCheck, StyleWarning};

    assert_impl_all!(PageRegistrar<'static>: Send, Sync);
    assert_impl_all!(Page: Send, Sync);

    #[derive(Default)]
    struct RecordingSink {
        pages: Mutex<Vec<Page>>,
    }

    impl PageSink for RecordingSink {
        fn create_page(&self, page: Page) {
            self.pages.lock().unwrap().push(page);
        }
    }

    impl RecordingSink {
        fn paths(&self) -> Vec<String> {
            let mut paths: Vec<_> = self
                .pages
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.path.clone())
                .collect();
            paths.sort();
            paths
        }

        fn page(&self, path: &str) -> Option<Page> {
            self.pages
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.path == path)
                .cloned()
        }
    }

    struct StaticQuery(Vec<DocumentationNode>);

    impl ContentQuery for StaticQuery {
        type Error = String;

        fn documentation_nodes(&self, limit: usize) -> Result<Vec<DocumentationNode>, String> {
            Ok(self.0.iter().take(limit).cloned().collect())
        }
    }

    struct FailingQuery;

    impl ContentQuery for FailingQuery {
        type Error = String;

        fn documentation_nodes(&self, _limit: usize) -> Result<Vec<DocumentationNode>, String> {
            Err("Cannot query field \"hash\"".to_owned())
        }
    }

    struct WarnEverything;

    impl StyleCheck for WarnEverything {
        fn check(&self, node: &DocumentationNode) -> Vec<StyleWarning> {
            vec![StyleWarning::new(&node.id, "always")]
        }
    }

    fn catalog() -> VersionCatalog {
        VersionCatalog::new([("current", "v3"), ("next", "v4"), ("v2", "v2")]).unwrap()
    }

    fn doc(path: &str, version: &str) -> DocumentationNode {
        DocumentationNode {
            id: path.to_owned(),
            file_absolute_path: PathBuf::from(format!("/site/data/{version}{path}index.md")),
            headings: Vec::new(),
            title: Some("Title".to_owned()),
            description: None,
            path: path.to_owned(),
            version: version.to_owned(),
        }
    }

    #[test]
    fn test_production_creates_only_released_version_index() {
        let catalog = catalog();
        let sink = RecordingSink::default();

        let summary = PageRegistrar::new(&catalog, BuildMode::Production)
            .register_pages(&StaticQuery(Vec::new()), &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(sink.paths(), vec!["/docs/v2/"]);
        assert_eq!(summary.version_pages, 1);
    }

    #[test]
    fn test_development_exposes_next_version_index() {
        let catalog = catalog();
        let sink = RecordingSink::default();

        PageRegistrar::new(&catalog, BuildMode::Development)
            .register_pages(&StaticQuery(Vec::new()), &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(sink.paths(), vec!["/docs/v2/", "/docs/v4/"]);
    }

    #[test]
    fn test_version_index_context() {
        let catalog = catalog();
        let sink = RecordingSink::default();

        PageRegistrar::new(&catalog, BuildMode::Production)
            .register_pages(&StaticQuery(Vec::new()), &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(
            sink.page("/docs/v2/"),
            Some(Page {
                path: "/docs/v2/".to_owned(),
                template: PageTemplate::Version,
                context: PageContext::VersionIndex {
                    version: "v2".to_owned(),
                    version_path: "/docs/v2/".to_owned(),
                },
            })
        );
    }

    #[test]
    fn test_version_index_path_ignores_exclusion() {
        let catalog = catalog();
        let registrar = PageRegistrar::new(&catalog, BuildMode::Production);
        for (_, version) in catalog.entries() {
            assert_eq!(
                registrar.version_index_path(version),
                format!("/docs/{version}/")
            );
        }
    }

    #[test]
    fn test_documentation_pages_created_at_derived_path() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let query = StaticQuery(vec![
            doc("/docs/v2/guides/setup/", "v2"),
            doc("/docs/intro/", "v3"),
        ]);

        let summary = PageRegistrar::new(&catalog, BuildMode::Production)
            .register_pages(&query, &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(summary.documentation_pages, 2);
        assert_eq!(
            sink.page("/docs/intro/"),
            Some(Page {
                path: "/docs/intro/".to_owned(),
                template: PageTemplate::Documentation,
                context: PageContext::Documentation {
                    slug: "/docs/intro/".to_owned(),
                    version: "v3".to_owned(),
                },
            })
        );
    }

    #[test]
    fn test_production_suppresses_next_documentation() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let query = StaticQuery(vec![
            doc("/docs/next/guides/setup/", "next"),
            doc("/docs/v4/guides/setup/", "v4"),
            doc("/docs/v2/guides/setup/", "v2"),
        ]);

        let summary = PageRegistrar::new(&catalog, BuildMode::Production)
            .register_pages(&query, &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(summary.suppressed, 2);
        assert_eq!(sink.paths(), vec!["/docs/v2/", "/docs/v2/guides/setup/"]);
    }

    #[test]
    fn test_development_creates_next_documentation() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let query = StaticQuery(vec![doc("/docs/next/guides/setup/", "next")]);

        let summary = PageRegistrar::new(&catalog, BuildMode::Development)
            .register_pages(&query, &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(summary.suppressed, 0);
        assert!(sink.page("/docs/next/guides/setup/").is_some());
    }

    #[test]
    fn test_query_error_is_propagated_unchanged() {
        let catalog = catalog();
        let sink = RecordingSink::default();

        let err = PageRegistrar::new(&catalog, BuildMode::Production)
            .register_pages(&FailingQuery, &sink, &NoStyleCheck)
            .unwrap_err();

        assert_eq!(err, "Cannot query field \"hash\"");
        // version-index pages already submitted stay submitted
        assert_eq!(sink.paths(), vec!["/docs/v2/"]);
    }

    #[test]
    fn test_style_warnings_are_not_fatal() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let query = StaticQuery(vec![doc("/docs/v2/a/b/", "v2"), doc("/docs/next/a/", "next")]);

        let summary = PageRegistrar::new(&catalog, BuildMode::Production)
            .register_pages(&query, &sink, &WarnEverything)
            .unwrap();

        // suppressed nodes are still checked
        assert_eq!(summary.style_warnings, 2);
        assert_eq!(summary.documentation_pages, 1);
    }

    #[test]
    fn test_custom_excluded_keys_and_prefix() {
        let catalog = catalog();
        let sink = RecordingSink::default();

        PageRegistrar::new(&catalog, BuildMode::Production)
            .with_excluded_keys(["v2"])
            .with_docs_prefix("reference")
            .register_pages(&StaticQuery(Vec::new()), &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(sink.paths(), vec!["/reference/v3/", "/reference/v4/"]);
    }

    #[test]
    fn test_query_limit_is_passed_to_query() {
        let catalog = catalog();
        let sink = RecordingSink::default();
        let query = StaticQuery(vec![doc("/docs/v2/a/", "v2"), doc("/docs/v2/b/", "v2")]);

        let summary = PageRegistrar::new(&catalog, BuildMode::Production)
            .with_query_limit(1)
            .register_pages(&query, &sink, &NoStyleCheck)
            .unwrap();

        assert_eq!(summary.documentation_pages, 1);
    }

    #[test]
    fn test_page_serializes_template_context() {
        let page = Page {
            path: "/docs/v2/".to_owned(),
            template: PageTemplate::Version,
            context: PageContext::VersionIndex {
                version: "v2".to_owned(),
                version_path: "/docs/v2/".to_owned(),
            },
        };
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            serde_json::json!({
                "path": "/docs/v2/",
                "template": "version",
                "context": {"version": "v2", "versionPath": "/docs/v2/"}
            })
        );
    }

    #[test]
    fn test_build_mode_excluded_keys() {
        assert_eq!(BuildMode::Production.excluded_keys(), &["current", "next"]);
        assert_eq!(BuildMode::Development.excluded_keys(), &["current"]);
        assert_eq!(BuildMode::from_development(true), BuildMode::Development);
        assert_eq!(BuildMode::default(), BuildMode::Production);
    }
}
