use std::path::PathBuf;

/// Where the user's config files live.
#[derive(Debug, Clone, PartialEq)]
pub enum DataDir {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myplugin")`.
    Home(&'static str),
    /// An explicit directory.
    Path(PathBuf),
}

/// A migration operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
///
/// An empty `files` list means every managed file.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrateAction {
    /// Migrate and rewrite files.
    Run { files: Vec<String> },
    /// Report versions and deprecated keys without writing.
    Check { files: Vec<String> },
    /// Print the merged text of one file without writing.
    Preview { file: String },
}
