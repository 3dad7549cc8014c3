//! Result types returned by migration operations, plus the dry-run helpers
//! behind `check` and `preview`.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::deprecated::find_deprecated;
use crate::error::MigrateError;
use crate::migrate::{MigrateInput, Plan, plan};
use crate::source::{TemplateSource, read_user_file};
use crate::tree::ConfigTree;
use crate::version::version_key_for;

/// What happened to one managed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum MigrationOutcome {
    /// The user file did not exist and was seeded from the template.
    Created { file: String },
    /// The user file already carried the template's version.
    UpToDate { file: String, version: i64 },
    /// The user file was rewritten.
    Migrated {
        file: String,
        from: Option<i64>,
        to: i64,
        deprecated: Vec<String>,
    },
    /// Migration failed and the file was left as it was.
    Untouched { file: String, reason: String },
}

impl MigrationOutcome {
    pub fn file(&self) -> &str {
        match self {
            MigrationOutcome::Created { file }
            | MigrationOutcome::UpToDate { file, .. }
            | MigrationOutcome::Migrated { file, .. }
            | MigrationOutcome::Untouched { file, .. } => file,
        }
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOutcome::Created { file } => write!(f, "{file}: created from template"),
            MigrationOutcome::UpToDate { file, version } => {
                write!(f, "{file}: up to date (version {version})")
            }
            MigrationOutcome::Migrated {
                file,
                from,
                to,
                deprecated,
            } => {
                match from {
                    Some(from) => write!(f, "{file}: migrated version {from} -> {to}")?,
                    None => write!(f, "{file}: migrated to version {to}")?,
                }
                if !deprecated.is_empty() {
                    write!(f, ", removed {}", deprecated.join(", "))?;
                }
                Ok(())
            }
            MigrationOutcome::Untouched { file, reason } => {
                write!(f, "{file}: left untouched ({reason})")
            }
        }
    }
}

/// Dry-run report for one managed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub exists: bool,
    pub user_version: Option<i64>,
    pub template_version: i64,
    pub deprecated: Vec<String>,
}

impl FileReport {
    pub fn needs_migration(&self) -> bool {
        !self.exists || self.user_version != Some(self.template_version)
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.exists {
            return write!(
                f,
                "{}: missing, would be created (version {})",
                self.file, self.template_version
            );
        }
        let user = self
            .user_version
            .map_or_else(|| "none".to_string(), |v| v.to_string());
        let state = if self.needs_migration() {
            "needs migration"
        } else {
            "up to date"
        };
        write!(
            f,
            "{}: version {user}, template {} ({state})",
            self.file, self.template_version
        )?;
        if !self.deprecated.is_empty() {
            write!(f, "\n  deprecated: {}", self.deprecated.join(", "))?;
        }
        Ok(())
    }
}

/// Result of a [`MigrateAction`](crate::MigrateAction). Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrateResult {
    Migrated(Vec<MigrationOutcome>),
    Checked(Vec<FileReport>),
    Preview { file: String, text: String },
}

impl fmt::Display for MigrateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrateResult::Migrated(outcomes) => write_lines(f, outcomes),
            MigrateResult::Checked(reports) => write_lines(f, reports),
            MigrateResult::Preview { text, .. } => write!(f, "{text}"),
        }
    }
}

fn write_lines<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn load_template(source: &dyn TemplateSource, file_name: &str) -> Result<String, MigrateError> {
    source
        .load(file_name)?
        .ok_or_else(|| MigrateError::MissingTemplate {
            file: file_name.to_string(),
        })
}

/// Compare a user file with its template without writing anything.
pub fn check_file(
    dir: &Path,
    file_name: &str,
    source: &dyn TemplateSource,
    reserved: &[String],
) -> Result<FileReport, MigrateError> {
    let template_text = load_template(source, file_name)?;
    let template = ConfigTree::parse(&template_text, Path::new(file_name))?;
    let key = version_key_for(file_name);
    let template_version = template.get_int(&key).unwrap_or(1);

    let path = dir.join(file_name);
    let Some(user_text) = read_user_file(&path)? else {
        return Ok(FileReport {
            file: file_name.to_string(),
            exists: false,
            user_version: None,
            template_version,
            deprecated: vec![],
        });
    };
    let user = ConfigTree::parse(&user_text, &path)?;

    Ok(FileReport {
        file: file_name.to_string(),
        exists: true,
        user_version: user.get_int(&key),
        template_version,
        deprecated: find_deprecated(&user, &template, reserved)
            .into_iter()
            .collect(),
    })
}

/// The text a migration of `file_name` would leave on disk.
pub fn preview_file(
    dir: &Path,
    file_name: &str,
    source: &dyn TemplateSource,
    reserved: &[String],
) -> Result<String, MigrateError> {
    let template = load_template(source, file_name)?;
    let path = dir.join(file_name);
    let Some(user) = read_user_file(&path)? else {
        return Ok(template);
    };

    let input = MigrateInput {
        file_name,
        path: &path,
        template: &template,
        user: &user,
        reserved,
    };
    match plan(&input)? {
        Plan::UpToDate { .. } => Ok(user),
        Plan::Rewrite { text, .. } => Ok(text),
    }
}
