//! Clap adapter for yamlmend.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Embed
//! [`MigrateArgs`] in a host's clap derive to get `run|check|preview`
//! subcommands, then hand [`MigrateArgs::into_action()`] to
//! [`Migrator::handle()`](crate::Migrator::handle).

use clap::{Args, Subcommand};

use crate::types::MigrateAction;

/// Clap-derived args for the migration subcommand group.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Migrate(MigrateArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: Option<MigrateSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum MigrateSubcommand {
    /// Migrate config files and rewrite them in place.
    Run {
        /// Only these files (default: every managed file).
        files: Vec<String>,
    },
    /// Report versions and deprecated keys without writing anything.
    Check {
        /// Only these files (default: every managed file).
        files: Vec<String>,
    },
    /// Print the merged text of one file without writing it.
    Preview {
        /// Managed file name, e.g. "config.yml".
        file: String,
    },
}

impl MigrateArgs {
    /// Bare invocation (no subcommand) maps to `MigrateAction::Run` over every file.
    pub fn into_action(self) -> MigrateAction {
        match self.action {
            None => MigrateAction::Run { files: vec![] },
            Some(MigrateSubcommand::Run { files }) => MigrateAction::Run { files },
            Some(MigrateSubcommand::Check { files }) => MigrateAction::Check { files },
            Some(MigrateSubcommand::Preview { file }) => MigrateAction::Preview { file },
        }
    }
}
