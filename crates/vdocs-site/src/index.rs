//! In-memory content index.
//!
//! Holds every content node together with its field bag, runs the
//! [`FieldDeriver`] over all nodes, and answers the documentation query
//! used by [`PageRegistrar`](crate::PageRegistrar).

use crate::fields::{DOCUMENTATION_HASH, DeriveError, FieldBag, FieldDeriver, SlugResolver};
use crate::node::ContentNode;
use crate::pages::{ContentQuery, DocumentationNode};

/// Error answering the documentation query.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    /// A documentation node lacks a field the query selects.
    #[error("Node {node_id} has hash \"documentation\" but no string `{field}` field")]
    MissingField { node_id: String, field: &'static str },
}

/// A content node and the fields attached to it.
#[derive(Debug, Clone)]
pub struct IndexedNode {
    pub node: ContentNode,
    pub fields: FieldBag,
}

/// Counts from one indexing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    /// Nodes tagged `documentation`.
    pub documents: usize,
    /// Nodes tagged `documentation-template`.
    pub templates: usize,
    /// Nodes left without fields.
    pub skipped: usize,
}

/// Content nodes in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    nodes: Vec<IndexedNode>,
}

impl ContentIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with an empty field bag.
    pub fn insert(&mut self, node: ContentNode) {
        self.nodes.push(IndexedNode {
            node,
            fields: FieldBag::default(),
        });
    }

    #[must_use]
    pub fn nodes(&self) -> &[IndexedNode] {
        &self.nodes
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexedNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Derive fields for every node, replacing previously attached fields.
    ///
    /// # Errors
    ///
    /// Stops at the first node the deriver rejects.
    pub fn derive_all(
        &mut self,
        deriver: &FieldDeriver<'_>,
        slugs: &dyn SlugResolver,
    ) -> Result<IndexSummary, DeriveError> {
        let mut summary = IndexSummary::default();
        for indexed in &mut self.nodes {
            let mut fields = FieldBag::default();
            match deriver.derive_fields(&indexed.node, slugs, &mut fields)? {
                Some(derived) if derived.hash() == DOCUMENTATION_HASH => summary.documents += 1,
                Some(_) => summary.templates += 1,
                None => summary.skipped += 1,
            }
            indexed.fields = fields;
        }

        tracing::info!(
            documents = summary.documents,
            templates = summary.templates,
            skipped = summary.skipped,
            "Derived node fields"
        );
        Ok(summary)
    }
}

impl FromIterator<ContentNode> for ContentIndex {
    fn from_iter<I: IntoIterator<Item = ContentNode>>(iter: I) -> Self {
        let mut index = Self::new();
        for node in iter {
            index.insert(node);
        }
        index
    }
}

impl ContentQuery for ContentIndex {
    type Error = QueryError;

    fn documentation_nodes(&self, limit: usize) -> Result<Vec<DocumentationNode>, QueryError> {
        self.nodes
            .iter()
            .filter(|n| n.fields.get_str("hash") == Some(DOCUMENTATION_HASH))
            .filter(|n| !n.node.frontmatter.is_excluded())
            .take(limit)
            .map(IndexedNode::to_documentation_node)
            .collect()
    }
}

impl IndexedNode {
    fn to_documentation_node(&self) -> Result<DocumentationNode, QueryError> {
        let field = |name: &'static str| {
            self.fields
                .get_str(name)
                .map(str::to_owned)
                .ok_or_else(|| QueryError::MissingField {
                    node_id: self.node.id.clone(),
                    field: name,
                })
        };

        Ok(DocumentationNode {
            id: self.node.id.clone(),
            file_absolute_path: self.node.file_absolute_path.clone(),
            headings: self.node.headings.clone(),
            title: self.node.frontmatter.title.clone(),
            description: self.node.frontmatter.description.clone(),
            path: field("path")?,
            version: field("version")?,
        })
    }
}
