use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use yamlmend::{DataDir, DirTemplates, MigrateArgs, Migrator};

/// Bring hand-edited YAML config files up to date with their bundled templates.
#[derive(Debug, Parser)]
#[command(name = "yamlmend", version)]
struct Cli {
    /// Directory holding the bundled templates.
    #[arg(short, long)]
    templates: PathBuf,

    /// Directory holding the user's config files.
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Managed file name; repeat for several (default: config.yml).
    #[arg(short, long = "file")]
    files: Vec<String>,

    /// Log migration failures and results at info/warn level.
    #[arg(short, long)]
    verbose: bool,

    #[command(flatten)]
    migrate: MigrateArgs,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("YAMLMEND_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "yamlmend=debug"
        } else {
            "yamlmend=info"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut builder = Migrator::builder()
        .data_dir(DataDir::Path(cli.data_dir))
        .templates(DirTemplates::new(cli.templates))
        .verbose(cli.verbose);
    for file in &cli.files {
        builder = builder.file(file);
    }

    let result = builder
        .build()
        .and_then(|migrator| migrator.handle_and_print(&cli.migrate.into_action()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("yamlmend: {e}");
            ExitCode::FAILURE
        }
    }
}
