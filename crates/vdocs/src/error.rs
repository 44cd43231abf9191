//! CLI error types.

use vdocs_config::ConfigError;
use vdocs_site::{CatalogError, DeriveError, QueryError};
use vdocs_storage_fs::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Derive(#[from] DeriveError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("More than one page registered at {0}")]
    DuplicatePath(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
