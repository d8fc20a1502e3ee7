#![forbid(unsafe_code)]

//! vlist-demo binary entry point.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vlist_demo::app::ListApp;
use vlist_demo::cli::{self, Command, Opts};
use vlist_runtime::{Program, ProgramConfig};

fn main() {
    let opts = match Opts::parse() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Command::Version) => {
            println!("vlist-demo {}", cli::VERSION);
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    if let Some(path) = &opts.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Failed to open log file {}: {e}", path.display());
        std::process::exit(1);
    }

    let mut config = ProgramConfig::fullscreen();
    if opts.mouse {
        config = config.with_mouse();
    }
    if opts.exit_after_ms > 0 {
        config = config.with_exit_after(Duration::from_millis(opts.exit_after_ms));
    }

    tracing::info!(
        items = opts.items,
        seed = ?opts.seed,
        policy = %opts.recompute,
        "starting vlist-demo"
    );

    let model = ListApp::new(opts.app_config());
    match Program::with_config(model, config) {
        Ok(mut program) => {
            if let Err(e) = program.run() {
                eprintln!("Runtime error: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    }
}

/// Route tracing output to `path`. The terminal belongs to the UI.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)
}
