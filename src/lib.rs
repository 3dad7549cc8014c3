//! Keep hand-edited YAML config files in step with the templates that ship
//! with each release.
//!
//! An application bundles a reference copy of every config file it owns.
//! Users edit their own copies; releases add keys, remove keys and rewrite
//! comments in the bundled ones. yamlmend reconciles the two: the template's
//! layout and comments win, the user's values are carried over, keys the
//! template no longer declares are dropped and reported, and a per-file
//! version key records that the migration happened.
//!
//! ```ignore
//! let migrator = Migrator::builder()
//!     .app_name("elytraguard")
//!     .file("config.yml")
//!     .file("messages.yml")
//!     .templates(DirTemplates::new("/opt/elytraguard/defaults"))
//!     .build()?;
//! migrator.run();
//! ```
//!
//! # Versions
//!
//! Each managed file has a reserved integer key named after the file:
//! `config.yml` → `config_version`, `messages.yml` → `messages_version`.
//! When the user file already carries the template's value, the file is
//! left alone. Otherwise it is rewritten and the key is forced to the
//! template's value (1 when the template has none). Version keys of every
//! managed file are reserved everywhere: they are never merged and never
//! reported as deprecated.
//!
//! # Merging
//!
//! The merge walks the template line by line. Comments, blank lines and
//! section headers are copied verbatim. A scalar line takes the user's
//! value when the user file has a value of the same kind at that dotted
//! path, keeping the template's inline comment. A list takes the user's
//! items when the user has a list there. Anything else keeps the template
//! text, so keys new in this release appear with their default.
//!
//! Values are re-emitted through a formatter that quotes whatever YAML
//! would otherwise read differently, so a value survives the rewrite
//! unchanged.
//!
//! # Failure
//!
//! [`Migrator::migrate`] returns [`MigrateError`]. [`Migrator::run`] never
//! fails: a file that cannot be migrated is left exactly as it was and
//! reported as [`MigrationOutcome::Untouched`]. Writes go through a
//! temporary file and an atomic rename, so a crash cannot leave a
//! half-written config behind.
//!
//! # Typed access
//!
//! [`LiveConfig`] pairs a [`Migrator`] with a [confique](https://docs.rs/confique)
//! struct: it migrates, loads the file, and hands out immutable snapshots
//! that are replaced wholesale on [`reload`](LiveConfig::reload).
//!
//! # Logging
//!
//! The library logs through [`tracing`]. Removed keys are reported at
//! `info`; migration failures at `warn` when the migrator is verbose and at
//! `debug` otherwise. Installing a subscriber is up to the host.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), [`MigrateArgs`] gives a host
//! `run|check|preview` subcommands that convert into a [`MigrateAction`].

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod deprecated;
mod format;
mod line;
mod merge;
mod migrate;
mod ops;
mod path;
mod snapshot;
mod source;
mod tree;
mod version;

#[cfg(test)]
mod fixtures;

pub use builder::{Migrator, MigratorBuilder};
#[cfg(feature = "clap")]
pub use cli::{MigrateArgs, MigrateSubcommand};
pub use deprecated::find_deprecated;
pub use error::MigrateError;
pub use format::format_value;
pub use merge::merge;
pub use migrate::{MigrateInput, Plan, plan, write_atomic};
pub use ops::{FileReport, MigrateResult, MigrationOutcome};
pub use snapshot::LiveConfig;
pub use source::{DirTemplates, EmbeddedTemplates, TemplateSource};
pub use tree::{ConfigTree, Node, NodeKind};
pub use types::{DataDir, MigrateAction};
pub use version::{update_version, version_key_for};
