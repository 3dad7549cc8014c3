use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::MigrateError;
use crate::migrate::migrate_file;
use crate::ops::{self, FileReport, MigrateResult, MigrationOutcome};
use crate::source::{TemplateSource, resolve_data_dir};
use crate::types::{DataDir, MigrateAction};
use crate::version::version_key_for;

/// Migrates a fixed set of user config files against their bundled templates.
///
/// Built with [`Migrator::builder()`]. Each managed file carries its own
/// version key (`config.yml` → `config_version`), and the version keys of
/// every managed file are reserved in every file.
pub struct Migrator {
    data_dir: PathBuf,
    files: Vec<String>,
    reserved: Vec<String>,
    verbose: bool,
    source: Box<dyn TemplateSource>,
}

impl std::fmt::Debug for Migrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("data_dir", &self.data_dir)
            .field("files", &self.files)
            .field("reserved", &self.reserved)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Migrator {
    pub fn builder() -> MigratorBuilder {
        MigratorBuilder::new()
    }

    /// Directory holding the user's files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Managed file names, in the order they were registered.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Keys that are never merged or reported as deprecated.
    pub fn reserved_keys(&self) -> &[String] {
        &self.reserved
    }

    /// Whether failures are reported at `warn` rather than `debug`.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Full path of a managed file.
    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    fn ensure_managed(&self, file_name: &str) -> Result<(), MigrateError> {
        if self.files.iter().any(|f| f == file_name) {
            Ok(())
        } else {
            Err(MigrateError::UnknownFile(file_name.to_string()))
        }
    }

    /// Migrate one managed file, propagating any failure.
    pub fn migrate(&self, file_name: &str) -> Result<MigrationOutcome, MigrateError> {
        self.ensure_managed(file_name)?;
        migrate_file(
            &self.data_dir,
            file_name,
            self.source.as_ref(),
            &self.reserved,
        )
    }

    /// Migrate one managed file, turning any failure into
    /// [`MigrationOutcome::Untouched`]. The file is never half-written.
    pub fn migrate_or_keep(&self, file_name: &str) -> MigrationOutcome {
        match self.migrate(file_name) {
            Ok(outcome) => {
                if self.verbose {
                    info!("{outcome}");
                } else {
                    debug!("{outcome}");
                }
                outcome
            }
            Err(e) => {
                if self.verbose {
                    warn!("Could not migrate {file_name}: {e}");
                } else {
                    debug!("Could not migrate {file_name}: {e}");
                }
                MigrationOutcome::Untouched {
                    file: file_name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Migrate every managed file. Never fails; see [`migrate_or_keep`](Self::migrate_or_keep).
    pub fn run(&self) -> Vec<MigrationOutcome> {
        self.files.iter().map(|f| self.migrate_or_keep(f)).collect()
    }

    /// Report what migrating `file_name` would do without writing.
    pub fn check(&self, file_name: &str) -> Result<FileReport, MigrateError> {
        self.ensure_managed(file_name)?;
        ops::check_file(
            &self.data_dir,
            file_name,
            self.source.as_ref(),
            &self.reserved,
        )
    }

    /// The text `file_name` would contain after migration.
    pub fn preview(&self, file_name: &str) -> Result<String, MigrateError> {
        self.ensure_managed(file_name)?;
        ops::preview_file(
            &self.data_dir,
            file_name,
            self.source.as_ref(),
            &self.reserved,
        )
    }

    fn selected<'a>(&'a self, files: &'a [String]) -> &'a [String] {
        if files.is_empty() { &self.files } else { files }
    }

    /// Handle a [`MigrateAction`] (run / check / preview).
    ///
    /// Unlike [`run`](Self::run), an explicit `Run` reports the first failure
    /// as an error.
    pub fn handle(&self, action: &MigrateAction) -> Result<MigrateResult, MigrateError> {
        match action {
            MigrateAction::Run { files } => {
                let outcomes = self
                    .selected(files)
                    .iter()
                    .map(|f| self.migrate(f))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MigrateResult::Migrated(outcomes))
            }
            MigrateAction::Check { files } => {
                let reports = self
                    .selected(files)
                    .iter()
                    .map(|f| self.check(f))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MigrateResult::Checked(reports))
            }
            MigrateAction::Preview { file } => Ok(MigrateResult::Preview {
                file: file.clone(),
                text: self.preview(file)?,
            }),
        }
    }

    /// Handle a [`MigrateAction`] and print the result to stdout.
    pub fn handle_and_print(&self, action: &MigrateAction) -> Result<(), MigrateError> {
        let result = self.handle(action)?;
        match result {
            MigrateResult::Preview { .. } => print!("{result}"),
            _ => println!("{result}"),
        }
        Ok(())
    }
}

/// Builder for a [`Migrator`].
///
/// Only [`templates()`](Self::templates) is mandatory. Without an explicit
/// [`data_dir()`](Self::data_dir) the platform config directory is used,
/// which needs [`app_name()`](Self::app_name).
pub struct MigratorBuilder {
    app_name: Option<String>,
    data_dir: DataDir,
    files: Vec<String>,
    extra_reserved: Vec<String>,
    verbose: bool,
    source: Option<Box<dyn TemplateSource>>,
}

impl MigratorBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            data_dir: DataDir::Platform,
            files: Vec::new(),
            extra_reserved: Vec::new(),
            verbose: false,
            source: None,
        }
    }

    /// Application name, used to locate the platform config directory.
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Where the user's files live (default: [`DataDir::Platform`]).
    pub fn data_dir(mut self, dir: DataDir) -> Self {
        self.data_dir = dir;
        self
    }

    /// Add a managed file. Defaults to `config.yml` alone when none are added.
    pub fn file(mut self, name: &str) -> Self {
        if !self.files.iter().any(|f| f == name) {
            self.files.push(name.to_string());
        }
        self
    }

    /// Reserve a key in addition to the managed files' version keys.
    pub fn reserve_key(mut self, key: &str) -> Self {
        self.extra_reserved.push(key.to_string());
        self
    }

    /// Report migration failures at `warn` instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Where bundled templates are read from.
    pub fn templates(mut self, source: impl TemplateSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    fn effective_files(&self) -> Vec<String> {
        if self.files.is_empty() {
            vec!["config.yml".to_string()]
        } else {
            self.files.clone()
        }
    }

    fn effective_data_dir(&self) -> Result<PathBuf, MigrateError> {
        if self.data_dir == DataDir::Platform && self.app_name.is_none() {
            return Err(MigrateError::AppNameRequired);
        }
        resolve_data_dir(&self.data_dir, self.app_name.as_deref()).ok_or(MigrateError::NoDataDir)
    }

    fn reserved_for(&self, files: &[String]) -> Vec<String> {
        let mut reserved: Vec<String> = files.iter().map(|f| version_key_for(f)).collect();
        for key in &self.extra_reserved {
            if !reserved.contains(key) {
                reserved.push(key.clone());
            }
        }
        reserved
    }

    pub fn build(self) -> Result<Migrator, MigrateError> {
        let data_dir = self.effective_data_dir()?;
        let files = self.effective_files();
        let reserved = self.reserved_for(&files);
        let source = self.source.ok_or(MigrateError::NoTemplateSource)?;
        Ok(Migrator {
            data_dir,
            files,
            reserved,
            verbose: self.verbose,
            source,
        })
    }
}
