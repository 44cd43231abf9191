//! Documentation style checks.
//!
//! A [`StyleCheck`] runs for every queried documentation node during page
//! registration. Warnings are logged and counted, never fatal.

use std::fmt;

use crate::pages::DocumentationNode;

/// A convention violation found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleWarning {
    /// Node the warning belongs to.
    pub node_id: String,
    pub message: String,
}

impl StyleWarning {
    #[must_use]
    pub fn new(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StyleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.node_id, self.message)
    }
}

/// Checks a documentation node against writing conventions.
pub trait StyleCheck: Sync {
    fn check(&self, node: &DocumentationNode) -> Vec<StyleWarning>;
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyleCheck;

impl StyleCheck for NoStyleCheck {
    fn check(&self, _node: &DocumentationNode) -> Vec<StyleWarning> {
        Vec::new()
    }
}

/// Frontmatter and heading outline conventions.
///
/// Warns when:
/// - the frontmatter has no `title`
/// - the frontmatter has no `description`
/// - a heading is more than one level deeper than the one before it
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingStyleCheck;

impl StyleCheck for HeadingStyleCheck {
    fn check(&self, node: &DocumentationNode) -> Vec<StyleWarning> {
        let mut warnings = Vec::new();

        if node.title.as_deref().is_none_or(str::is_empty) {
            warnings.push(StyleWarning::new(&node.id, "missing frontmatter title"));
        }
        if node.description.as_deref().is_none_or(str::is_empty) {
            warnings.push(StyleWarning::new(&node.id, "missing frontmatter description"));
        }

        let mut previous: Option<u8> = None;
        for heading in &node.headings {
            if let Some(prev) = previous
                && heading.depth > prev + 1
            {
                warnings.push(StyleWarning::new(
                    &node.id,
                    format!(
                        "heading {:?} jumps from level {prev} to level {}",
                        heading.value, heading.depth
                    ),
                ));
            }
            previous = Some(heading.depth);
        }

        warnings
    }
}
