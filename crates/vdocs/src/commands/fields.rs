//! `vdocs fields` command implementation.

use clap::Args;
use serde::Serialize;
use vdocs_site::FieldBag;

use super::{Project, ProjectArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fields command.
#[derive(Args)]
pub(crate) struct FieldsArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Print fields as JSON.
    #[arg(long)]
    json: bool,

    /// Include nodes without derived fields.
    #[arg(short, long)]
    all: bool,
}

/// One node and its derived fields.
#[derive(Debug, Serialize)]
pub(crate) struct NodeFields<'a> {
    id: &'a str,
    fields: &'a FieldBag,
}

impl FieldsArgs {
    /// Execute the fields command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, catalog or content fail to load.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let project = self.project.load()?;
        let rows = node_fields(&project, self.all);

        if self.json {
            output.data(&serde_json::to_string_pretty(&rows)?)?;
        } else {
            for row in &rows {
                let field = |name| row.fields.get_str(name).unwrap_or("-");
                output.data(&format!(
                    "{:<24} {:<8} {} {}",
                    field("hash"),
                    field("version"),
                    field("path"),
                    output.dimmed(row.id)
                ))?;
            }
        }

        output.success(&format!(
            "{} documents, {} templates, {} other nodes",
            project.summary.documents, project.summary.templates, project.summary.skipped
        ));
        Ok(())
    }
}

/// Field rows in index order, skipping nodes without fields unless `all`.
pub(crate) fn node_fields(project: &Project, all: bool) -> Vec<NodeFields<'_>> {
    project
        .index
        .nodes()
        .iter()
        .filter(|n| all || !n.fields.is_empty())
        .map(|n| NodeFields {
            id: &n.node.id,
            fields: &n.fields,
        })
        .collect()
}
