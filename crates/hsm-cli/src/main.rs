//! Holland-Skinner Teaching Machine CLI
//!
//! Starts or resumes a study session on the terminal.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use hsm_machine::{install_dir, Catalog, Config, Console, Session, SessionOutcome};
use tracing_subscriber::EnvFilter;

/// Holland-Skinner Teaching Machine
///
/// Presents the course one frame at a time and checks your answers. Progress
/// is saved as you go, so quitting and running again resumes where you left
/// off.
#[derive(Parser, Debug)]
#[command(name = "hsm")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the lesson files
    #[arg(long, value_name = "DIR")]
    course: Option<PathBuf>,

    /// Path to the progress file
    #[arg(long, value_name = "FILE")]
    progress: Option<PathBuf>,

    /// Path to configuration file (default: hsm.json next to the executable)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so they never interleave with the quiz.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Session ended");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Resolves the configuration, loads the course and runs one session.
fn run(args: &Args) -> anyhow::Result<SessionOutcome> {
    let base = install_dir()?;
    let mut config = load_config(args.config.as_deref(), &base)?;
    config.apply_env_overrides();
    config.validate()?;

    // Paths given on the command line are taken relative to the working
    // directory; configured paths relative to the install directory.
    let course_dir = args
        .course
        .clone()
        .unwrap_or_else(|| config.course_dir_in(&base));
    let progress_file = args
        .progress
        .clone()
        .unwrap_or_else(|| config.progress_file_in(&base));

    tracing::debug!(
        course_dir = %course_dir.display(),
        progress_file = %progress_file.display(),
        show_banner = config.show_banner,
        "Configuration resolved"
    );

    let catalog = Catalog::load(&course_dir)?;
    let mut session =
        Session::new(catalog, progress_file, Console::stdio()).with_banner(config.show_banner);
    Ok(session.run()?)
}

/// Loads configuration from the specified path or the install directory.
fn load_config(config_path: Option<&Path>, base: &Path) -> anyhow::Result<Config> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Ok(Config::load_from_file(path)?)
        }
        None => Ok(Config::load_from_dir(base)?),
    }
}
