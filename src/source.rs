//! Template loading and data directory resolution.
//!
//! Templates are the bundled reference files shipped with a release. They are
//! read through a [`TemplateSource`], so a host can serve them from a
//! directory next to the binary, from strings compiled in with
//! `include_str!`, or from anything else that can produce text by file name.
//!
//! User files live in the data directory named by [`DataDir`]. Only
//! [`DataDir::Platform`] needs an app name.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::MigrateError;
use crate::types::DataDir;

/// Loads the bundled template text for a managed file.
pub trait TemplateSource {
    /// The template for `file_name`, or `None` when no such template ships.
    fn load(&self, file_name: &str) -> Result<Option<String>, MigrateError>;
}

/// Templates stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    dir: PathBuf,
}

impl DirTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateSource for DirTemplates {
    fn load(&self, file_name: &str) -> Result<Option<String>, MigrateError> {
        let path = self.dir.join(file_name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MigrateError::Io { path, source: e }),
        }
    }
}

/// Templates held in memory, typically compiled in with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedTemplates {
    files: BTreeMap<String, Cow<'static, str>>,
}

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the template text for `file_name`.
    pub fn with(mut self, file_name: &str, text: impl Into<Cow<'static, str>>) -> Self {
        self.files.insert(file_name.to_string(), text.into());
        self
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn load(&self, file_name: &str) -> Result<Option<String>, MigrateError> {
        Ok(self.files.get(file_name).map(|text| text.to_string()))
    }
}

/// Resolve a [`DataDir`] to a concrete directory.
///
/// `app_name` is used by `DataDir::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the directory cannot be determined (no app name for
/// `Platform`, or no home directory).
pub fn resolve_data_dir(dir: &DataDir, app_name: Option<&str>) -> Option<PathBuf> {
    match dir {
        DataDir::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name?)?;
            Some(proj.config_dir().to_path_buf())
        }
        DataDir::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        DataDir::Path(p) => Some(p.clone()),
    }
}

/// Read a user file. A missing file is `Ok(None)`; other I/O errors propagate.
pub fn read_user_file(path: &Path) -> Result<Option<String>, MigrateError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MigrateError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
