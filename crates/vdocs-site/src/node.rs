//! Content nodes produced by a content source.
//!
//! A [`ContentNode`] is one source file after parsing: its location, its
//! frontmatter, and its heading outline. Nodes are immutable; derived fields
//! live in a separate field bag (see [`crate::FieldBag`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Content type of nodes parsed from Markdown files.
pub const MARKDOWN_REMARK: &str = "MarkdownRemark";

/// Parsed frontmatter of a Markdown file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Logical path inside a version (e.g. `guides/setup`).
    /// Required for documents, ignored for templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Any non-null value removes the document from the documentation query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<serde_json::Value>,
}

impl Frontmatter {
    /// Whether the document opted out of page generation.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.exclude.as_ref().is_some_and(|v| !v.is_null())
    }
}

/// One heading of a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text.
    pub value: String,
    /// Heading level (1-6).
    pub depth: u8,
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    /// Stable node identifier.
    pub id: String,
    /// Content type (e.g. [`MARKDOWN_REMARK`]).
    pub internal_type: String,
    /// Absolute path of the source file.
    pub file_absolute_path: PathBuf,
    /// Parsed frontmatter.
    pub frontmatter: Frontmatter,
    /// Heading outline in document order.
    pub headings: Vec<Heading>,
}

impl ContentNode {
    /// Create a Markdown node with empty frontmatter and no headings.
    #[must_use]
    pub fn markdown(id: impl Into<String>, file_absolute_path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            internal_type: MARKDOWN_REMARK.to_owned(),
            file_absolute_path: file_absolute_path.into(),
            frontmatter: Frontmatter::default(),
            headings: Vec::new(),
        }
    }

    /// Set the frontmatter.
    #[must_use]
    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = frontmatter;
        self
    }

    /// Set the logical frontmatter path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.frontmatter.path = Some(path.into());
        self
    }

    /// Set the heading outline.
    #[must_use]
    pub fn with_headings(mut self, headings: Vec<Heading>) -> Self {
        self.headings = headings;
        self
    }

    /// Whether this node was parsed from Markdown.
    #[must_use]
    pub fn is_markdown(&self) -> bool {
        self.internal_type == MARKDOWN_REMARK
    }
}
