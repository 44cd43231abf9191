//! Version-aware routing for vdocs.
//!
//! This crate provides:
//! - [`VersionCatalog`]: release labels mapped to version identifiers
//! - [`FieldDeriver`]: per-node routing fields (`hash`, `version`, `path`, ...)
//! - [`ContentIndex`]: nodes with their fields, queryable for documentation
//! - [`PageRegistrar`]: version-index and documentation pages for a build mode
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Mutex;
//! use vdocs_site::{
//!     BuildMode, ContentIndex, ContentNode, DeriverConfig, FieldDeriver,
//!     FilePathSlugResolver, HeadingStyleCheck, Page, PageRegistrar, PageSink,
//!     VersionCatalog,
//! };
//!
//! struct Pages(Mutex<Vec<Page>>);
//!
//! impl PageSink for Pages {
//!     fn create_page(&self, page: Page) {
//!         if let Ok(mut pages) = self.0.lock() {
//!             pages.push(page);
//!         }
//!     }
//! }
//!
//! let catalog = VersionCatalog::from_file(Path::new("versions.json"))?;
//! let mut index: ContentIndex = [ContentNode::markdown(
//!     "data/v2/guides/setup.md",
//!     "/site/data/v2/guides/setup.md",
//! )
//! .with_path("guides/setup")]
//! .into_iter()
//! .collect();
//!
//! let deriver = FieldDeriver::new(&catalog, DeriverConfig::new("/site"));
//! index.derive_all(&deriver, &FilePathSlugResolver::new("/site/data", "pages"))?;
//!
//! let pages = Pages(Mutex::new(Vec::new()));
//! PageRegistrar::new(&catalog, BuildMode::Production)
//!     .register_pages(&index, &pages, &HeadingStyleCheck)?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod fields;
mod index;
mod node;
mod pages;
mod style;

pub use catalog::{CURRENT_KEY, CatalogError, NEXT_KEY, VersionCatalog};
pub use fields::{
    DOCUMENTATION_HASH, DeriveError, DerivedFields, DeriverConfig, FieldBag, FieldDeriver,
    FieldSink, FilePathSlugResolver, SlugResolver, TEMPLATE_HASH, normalize_url_path,
};
pub use index::{ContentIndex, IndexSummary, IndexedNode, QueryError};
pub use node::{ContentNode, Frontmatter, Heading, MARKDOWN_REMARK};
pub use pages::{
    BuildMode, ContentQuery, DEFAULT_QUERY_LIMIT, DocumentationNode, Page, PageContext,
    PageRegistrar, PageSink, PageTemplate, RegisterSummary,
};
pub use style::{HeadingStyleCheck, NoStyleCheck, StyleCheck, StyleWarning};
