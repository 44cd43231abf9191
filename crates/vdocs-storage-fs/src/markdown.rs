//! Markdown parsing: YAML frontmatter block and heading outline.

use pulldown_cmark::{Event, HeadingLevel, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use vdocs_site::{Frontmatter, Heading};

/// Frontmatter source and headings of one Markdown document.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedMarkdown {
    /// Raw YAML between the `---` fences, if the document has a block.
    pub frontmatter: Option<String>,
    pub headings: Vec<Heading>,
}

/// Parse a Markdown document in a single pass.
pub(crate) fn parse_markdown(content: &str) -> ParsedMarkdown {
    let parser = Parser::new_ext(content, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut parsed = ParsedMarkdown::default();
    let mut in_metadata = false;
    let mut heading: Option<(u8, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => in_metadata = true,
            Event::End(TagEnd::MetadataBlock(_)) => in_metadata = false,
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((heading_level_to_num(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, text)) = heading.take() {
                    parsed.headings.push(Heading {
                        value: text.trim().to_owned(),
                        depth,
                    });
                }
            }
            Event::Text(text) if in_metadata => {
                parsed
                    .frontmatter
                    .get_or_insert_with(String::new)
                    .push_str(&text);
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = heading.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = heading.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }

    parsed
}

/// Deserialize frontmatter YAML. Empty input yields empty frontmatter.
pub(crate) fn parse_frontmatter(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(trimmed)
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn heading(depth: u8, value: &str) -> Heading {
        Heading {
            value: value.to_owned(),
            depth,
        }
    }

    #[test]
    fn test_parse_frontmatter_and_headings() {
        let content = "---\ntitle: Setup\npath: guides/setup\n---\n\n# Setup\n\nText.\n\n## Install `pkg`\n";

        let parsed = parse_markdown(content);

        assert_eq!(
            parsed.frontmatter.as_deref().map(str::trim),
            Some("title: Setup\npath: guides/setup")
        );
        assert_eq!(
            parsed.headings,
            vec![heading(1, "Setup"), heading(2, "Install pkg")]
        );
    }

    #[test]
    fn test_document_without_frontmatter() {
        let parsed = parse_markdown("# Title\n\n### Deep\n");
        assert!(parsed.frontmatter.is_none());
        assert_eq!(parsed.headings, vec![heading(1, "Title"), heading(3, "Deep")]);
    }

    #[test]
    fn test_heading_with_emphasis_keeps_text() {
        let parsed = parse_markdown("## The *quick* fox\n");
        assert_eq!(parsed.headings, vec![heading(2, "The quick fox")]);
    }

    #[test]
    fn test_setext_headings() {
        let parsed = parse_markdown("Title\n=====\n\nSection\n-------\n");
        assert_eq!(parsed.headings, vec![heading(1, "Title"), heading(2, "Section")]);
    }

    #[test]
    fn test_parse_frontmatter_fields() {
        let frontmatter = parse_frontmatter(
            "title: \"Setup\"\ndescription: |\n  Two\n  lines\npath: guides/setup\nexclude: true\ntags: [a, b]",
        )
        .unwrap();

        assert_eq!(frontmatter.title.as_deref(), Some("Setup"));
        assert_eq!(frontmatter.description.as_deref(), Some("Two\nlines"));
        assert_eq!(frontmatter.path.as_deref(), Some("guides/setup"));
        assert!(frontmatter.is_excluded());
    }

    #[test]
    fn test_parse_empty_frontmatter() {
        assert_eq!(parse_frontmatter("  \n").unwrap(), Frontmatter::default());
    }

    #[test]
    fn test_parse_malformed_frontmatter() {
        assert!(parse_frontmatter("title: [unclosed").is_err());
    }
}
