//! CLI command implementations.

pub(crate) mod fields;
pub(crate) mod routes;

use std::path::PathBuf;

use clap::Args;
use vdocs_config::{CliSettings, Config};
use vdocs_site::{
    ContentIndex, DeriverConfig, FieldDeriver, FilePathSlugResolver, IndexSummary, VersionCatalog,
};
use vdocs_storage_fs::FsSource;

use crate::error::CliError;

pub(crate) use fields::FieldsArgs;
pub(crate) use routes::RoutesArgs;

/// Project selection shared by all commands.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Path to configuration file (default: auto-discover vdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root directory (overrides config).
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Version catalog JSON file (overrides config).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Development build: expose the `next` version.
    #[arg(long)]
    dev: bool,

    /// Production build: hide the `next` version.
    #[arg(long, conflicts_with = "dev")]
    production: bool,
}

/// Loaded and indexed project.
pub(crate) struct Project {
    pub config: Config,
    pub catalog: VersionCatalog,
    pub index: ContentIndex,
    pub summary: IndexSummary,
}

impl ProjectArgs {
    fn development(&self) -> Option<bool> {
        if self.dev {
            Some(true)
        } else if self.production {
            Some(false)
        } else {
            None
        }
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            project_root: self.project_root.clone(),
            catalog: self.catalog.clone(),
            development: self.development(),
        }
    }

    /// Load configuration, catalog and content, then derive node fields.
    pub(crate) fn load(&self) -> Result<Project, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        load_project(config)
    }
}

/// Build the content index for a resolved configuration.
pub(crate) fn load_project(config: Config) -> Result<Project, CliError> {
    let catalog = VersionCatalog::from_file(&config.versions_resolved.catalog)?;

    let content = &config.content_resolved;
    let nodes = FsSource::new(&content.project_root, content.sources.clone()).load()?;
    let mut index: ContentIndex = nodes.into_iter().collect();

    let deriver = FieldDeriver::new(
        &catalog,
        DeriverConfig {
            project_root: content.project_root.clone(),
            content_dir: content.content_dir.clone(),
            docs_prefix: config.site.docs_prefix.clone(),
            template_prefix: content.template_prefix.clone(),
        },
    );
    let slugs = FilePathSlugResolver::new(content.content_path(), content.slug_base.clone());
    let summary = index.derive_all(&deriver, &slugs)?;

    Ok(Project {
        config,
        catalog,
        index,
        summary,
    })
}
