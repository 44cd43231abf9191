//! `vdocs routes` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use vdocs_site::{
    BuildMode, HeadingStyleCheck, NoStyleCheck, Page, PageContext, PageRegistrar,
    RegisterSummary, StyleCheck,
};

use super::{Project, ProjectArgs};
use crate::collector::PageCollector;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Print pages as JSON.
    #[arg(long)]
    json: bool,

    /// Write pages as JSON to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip frontmatter and heading style checks.
    #[arg(long)]
    no_style_check: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the query fails, or two pages share a path.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let project = self.project.load()?;
        let style: &dyn StyleCheck = if self.no_style_check {
            &NoStyleCheck
        } else {
            &HeadingStyleCheck
        };
        let (pages, summary) = register(&project, style)?;

        if let Some(path) = &self.output {
            fs::write(path, serde_json::to_string_pretty(&pages)?)?;
            output.info(&format!("Wrote {} pages to {}", pages.len(), path.display()));
        } else if self.json {
            output.data(&serde_json::to_string_pretty(&pages)?)?;
        } else {
            print_table(output, &pages)?;
        }

        let mode = if project.config.build_resolved.development {
            "development"
        } else {
            "production"
        };
        output.success(&format!(
            "{} version pages, {} documentation pages ({mode})",
            summary.version_pages, summary.documentation_pages
        ));
        if summary.suppressed > 0 {
            output.info(&format!(
                "{} unreleased documents hidden (use --dev to include)",
                summary.suppressed
            ));
        }
        if summary.style_warnings > 0 {
            output.warning(&format!(
                "{} style warnings (run with --verbose or RUST_LOG=warn for details)",
                summary.style_warnings
            ));
        }

        Ok(())
    }
}

/// Register every page of `project` in its configured build mode.
pub(crate) fn register(
    project: &Project,
    style: &dyn StyleCheck,
) -> Result<(Vec<Page>, RegisterSummary), CliError> {
    let config = &project.config;
    let mode = BuildMode::from_development(config.build_resolved.development);
    let registrar = PageRegistrar::new(&project.catalog, mode)
        .with_docs_prefix(config.site.docs_prefix.clone())
        .with_query_limit(config.build_resolved.query_limit);

    let collector = PageCollector::default();
    let summary = registrar.register_pages(&project.index, &collector, style)?;
    Ok((collector.into_pages()?, summary))
}

fn print_table(output: &Output, pages: &[Page]) -> Result<(), CliError> {
    for page in pages {
        let version = match &page.context {
            PageContext::VersionIndex { version, .. }
            | PageContext::Documentation { version, .. } => version,
        };
        output.data(&format!(
            "{:<14} {:<8} {}",
            page.template.as_str(),
            version,
            output.dimmed(&page.path)
        ))?;
    }
    Ok(())
}
