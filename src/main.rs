//! Pullsar CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use pullsar::catalog::CatalogSource;
use pullsar::cli::Cli;
use pullsar::config::Settings;
use pullsar::resolver::UsageStatsResolver;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `--quiet` flag sets level to WARN
/// 3. `RUST_LOG` environment variable (if set)
/// 4. Default is INFO
fn init_tracing(debug: bool, quiet: bool) {
    let filter = if debug {
        EnvFilter::new("pullsar=debug")
    } else if quiet {
        EnvFilter::new("pullsar=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pullsar=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.quiet);

    tracing::debug!("Pullsar starting with args: {:?}", cli);

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let sources: Vec<CatalogSource> = cli
        .catalog_json_files
        .iter()
        .cloned()
        .map(CatalogSource::RenderedFile)
        .chain(cli.catalog_images.iter().cloned().map(CatalogSource::Image))
        .collect();

    if sources.is_empty() {
        tracing::warn!(
            "No catalogs given. Pass --catalog-json-file and/or --catalog-image to process one."
        );
        return ExitCode::SUCCESS;
    }

    // One resolver instance for the whole run: registry responses fetched
    // for one catalog are reused for every later catalog.
    let mut resolver = UsageStatsResolver::from_settings(settings);

    for source in &sources {
        let stats = resolver.resolve(source, cli.log_days);
        if let Some((name, version)) = &stats.catalog {
            tracing::info!(
                "Finished catalog {name} (OCP {version}): {} bundles resolved",
                stats.index.len()
            );
        } else {
            tracing::info!(
                "Finished catalog {}: {} bundles resolved",
                source.describe(),
                stats.index.len()
            );
        }
    }

    ExitCode::SUCCESS
}
