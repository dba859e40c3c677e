//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the log subscriber
//! - runs the blob pipeline or reloads an export
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{BlobArgs, Cli, Command, ShowArgs};
use crate::error::KFinderError;

pub mod pipeline;

/// Entry point for the `kfind` binary.
pub fn run() -> Result<(), KFinderError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Blobs(args) => handle_blobs(&args),
        Command::Show(args) => handle_show(&args),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // A subscriber may already be installed when embedded; keep that one.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_blobs(args: &BlobArgs) -> Result<(), KFinderError> {
    let run = pipeline::run_blobs(&args.blob_config(), &args.finder_config(), &args.kmeans_config())?;

    println!(
        "{}",
        crate::report::format_analysis(&run.best.analysis, &run.meta)
    );
    println!("{}", crate::report::format_clusters(&run.best.model));

    if let Some(path) = &args.export {
        crate::io::write_analysis_json(path, &run.best.analysis, run.meta.clone())?;
        info!(path = %path.display(), "analysis exported");
    }

    Ok(())
}

fn handle_show(args: &ShowArgs) -> Result<(), KFinderError> {
    let file = crate::io::read_analysis_json(&args.analysis)?;
    info!(
        tool = %file.tool,
        generated_at = %file.generated_at,
        "loaded analysis"
    );

    println!("{}", crate::report::format_analysis(&file.analysis, &file.meta));
    Ok(())
}
