#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use anyhow::{bail, Result};
use clap::Parser;
use manga_unzipper_core::{Config, MangaUnzipper};
use tracing::{debug, info};

use crate::args::Args;
use crate::manifest::Manifest;

mod args;
mod manifest;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = match args.temp_root {
        Some(temp_root) => Config::with_temp_root(temp_root),
        None => Config::from_env()?,
    };
    config.cleanup_workspace = args.cleanup;
    debug!("using config {config:?}");
    let unzipper = MangaUnzipper::new(config);

    let mut batches = Vec::new();
    if !args.archives.is_empty() {
        batches.push(unzipper.unzip_manga(args.archives, args.outdir.clone())?);
    }
    if let Some(path) = args.manifest {
        let manifest = Manifest::from_path(&path)?;
        let outdir = manifest.outdir.unwrap_or(args.outdir);
        batches.push(unzipper.unzip_manga(manifest.archives, outdir)?);
    }

    let mut total = 0;
    let mut failed = 0;
    for batch in batches {
        for outcome in batch.join().await {
            total += 1;
            match outcome.result {
                Ok(output) => info!("{} -> {output}", outcome.archive),
                Err(_) => failed += 1,
            }
        }
    }

    info!("converted {}/{total} archives", total - failed);
    if failed > 0 {
        bail!("{failed} archive(s) couldn't be converted");
    }

    Ok(())
}
