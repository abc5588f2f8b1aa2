//! apigen - pre-build step for the API server
//!
//! Reads the API catalog, regenerates the registration source, the handler
//! header and the build manifest, creates stubs for handlers that do not exist
//! yet and refreshes the documentation block of every handler.
//!
//! ```text
//! apigen --config server/apigen.toml --root .
//! ```

use apigen_core::GenError;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod generate;

#[derive(Parser)]
#[command(name = "apigen")]
#[command(author, version, about = "Keeps API handler sources in sync with the JSON catalog", long_about = None)]
struct Cli {
    /// Path to the generator configuration (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    config: PathBuf,

    /// Project root every configured path is relative to
    #[arg(short, long)]
    root: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match generate::run(&cli.config, &cli.root) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            if err
                .downcast_ref::<GenError>()
                .is_some_and(GenError::is_catalog_error)
            {
                error!("Catalog is invalid, no files were written");
            }
            ExitCode::FAILURE
        }
    }
}
