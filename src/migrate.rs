//! Per-file migration pipeline.
//!
//! [`plan`] works on text already in memory and performs no I/O, so the whole
//! decision (version check, merge, deprecation scan, version forcing) can be
//! tested with plain strings. [`migrate_file`] wraps it with template loading,
//! user file reading and an atomic write.
//!
//! There is no partial success: either the full merged text replaces the
//! user file, or the file is not touched at all.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::deprecated::find_deprecated;
use crate::error::MigrateError;
use crate::merge::merge;
use crate::ops::MigrationOutcome;
use crate::source::{TemplateSource, read_user_file};
use crate::tree::ConfigTree;
use crate::version::{update_version, version_key_for};

/// Everything needed to migrate one file. No I/O happens here.
pub struct MigrateInput<'a> {
    /// Managed file name, e.g. `config.yml`. Determines the version key.
    pub file_name: &'a str,
    /// Location of the user file, for error messages.
    pub path: &'a Path,
    pub template: &'a str,
    pub user: &'a str,
    /// Version keys of every managed file.
    pub reserved: &'a [String],
}

/// What migrating a file would do.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// The user file already carries the template's version.
    UpToDate { version: i64 },
    /// The user file must be replaced by `text`.
    Rewrite {
        from: Option<i64>,
        to: i64,
        deprecated: BTreeSet<String>,
        text: String,
    },
}

/// Decide the outcome of migrating `input.user` against `input.template`.
///
/// The template version defaults to 1 when the template has no version key.
/// A user file whose version key is missing or differs is always rewritten.
pub fn plan(input: &MigrateInput<'_>) -> Result<Plan, MigrateError> {
    let template_text = strip_bom(input.template);
    let template_lines: Vec<&str> = template_text.lines().collect();
    let template = ConfigTree::parse(template_text, Path::new(input.file_name))?;
    let user = ConfigTree::parse(strip_bom(input.user), input.path)?;

    let key = version_key_for(input.file_name);
    let to = template.get_int(&key).unwrap_or(1);
    let from = user.get_int(&key);
    if from == Some(to) {
        return Ok(Plan::UpToDate { version: to });
    }

    let mut reserved = input.reserved.to_vec();
    if !reserved.contains(&key) {
        reserved.push(key.clone());
    }

    let merged = merge(&template_lines, &user, &template, &reserved);
    let deprecated = find_deprecated(&user, &template, &reserved);
    let lines = update_version(merged, to, &template_lines, &key);
    let text = render(&lines);
    // Never hand back text that would not load again.
    ConfigTree::parse(&text, input.path)?;

    Ok(Plan::Rewrite {
        from,
        to,
        deprecated,
        text,
    })
}

/// Migrate `file_name` inside `dir`, loading its template from `source`.
///
/// A missing user file is created from the template text unchanged.
pub fn migrate_file(
    dir: &Path,
    file_name: &str,
    source: &dyn TemplateSource,
    reserved: &[String],
) -> Result<MigrationOutcome, MigrateError> {
    let template = source
        .load(file_name)?
        .ok_or_else(|| MigrateError::MissingTemplate {
            file: file_name.to_string(),
        })?;
    let path = dir.join(file_name);

    let Some(user) = read_user_file(&path)? else {
        write_atomic(&path, &template)?;
        return Ok(MigrationOutcome::Created {
            file: file_name.to_string(),
        });
    };

    let input = MigrateInput {
        file_name,
        path: &path,
        template: &template,
        user: &user,
        reserved,
    };

    match plan(&input)? {
        Plan::UpToDate { version } => Ok(MigrationOutcome::UpToDate {
            file: file_name.to_string(),
            version,
        }),
        Plan::Rewrite {
            from,
            to,
            deprecated,
            text,
        } => {
            write_atomic(&path, &text)?;
            let deprecated: Vec<String> = deprecated.into_iter().collect();
            if !deprecated.is_empty() {
                info!(
                    "Removed deprecated keys from {file_name}: {}",
                    deprecated.join(", ")
                );
            }
            Ok(MigrationOutcome::Migrated {
                file: file_name.to_string(),
                from,
                to,
                deprecated,
            })
        }
    }
}

/// Replace `path` with `content` through a temporary file in the same
/// directory, so a crash never leaves a half-written config behind.
/// Creates parent directories as needed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), MigrateError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source: std::io::Error| MigrateError::Write {
        path: path.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(|source| MigrateError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn render(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
