//! Command-line interface.
//!
//! Pullsar is a single-purpose batch tool, so there are no subcommands:
//! each invocation processes the given catalogs (pre-rendered JSON files
//! and/or catalog images) and prints the resolved usage stats.

use clap::Parser;
use std::path::PathBuf;

/// Retrieve latest pull counts for all the operators and their versions
/// defined in the input operator catalogs.
#[derive(Debug, Parser)]
#[command(name = "pullsar")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Path to a pre-rendered catalog JSON file (repeatable)
    #[arg(long = "catalog-json-file", value_name = "CATALOG_JSON")]
    pub catalog_json_files: Vec<PathBuf>,

    /// Catalog image pullspec to render with opm (repeatable)
    #[arg(long = "catalog-image", value_name = "CATALOG_IMAGE")]
    pub catalog_images: Vec<String>,

    /// Aggregate stats from logs of the last N completed days
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub log_days: u32,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Suppress informational logging, keep warnings and errors
    #[arg(long, conflicts_with = "debug")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeatable_catalog_flags() {
        let cli = Cli::parse_from([
            "pullsar",
            "--catalog-json-file",
            "a.json",
            "--catalog-json-file",
            "b.json",
            "--catalog-image",
            "registry.example/index:v4.18",
        ]);

        assert_eq!(cli.catalog_json_files.len(), 2);
        assert_eq!(cli.catalog_images.len(), 1);
        assert_eq!(cli.log_days, 1);
        assert!(!cli.debug);
    }

    #[test]
    fn parses_log_days_and_debug() {
        let cli = Cli::parse_from(["pullsar", "--log-days", "30", "--debug"]);
        assert_eq!(cli.log_days, 30);
        assert!(cli.debug);
        assert!(!cli.quiet);
    }

    #[test]
    fn quiet_conflicts_with_debug() {
        assert!(Cli::try_parse_from(["pullsar", "--quiet", "--debug"]).is_err());
        assert!(Cli::try_parse_from(["pullsar", "--quiet"]).unwrap().quiet);
    }

    #[test]
    fn defaults_to_no_catalogs() {
        let cli = Cli::parse_from(["pullsar"]);
        assert!(cli.catalog_json_files.is_empty());
        assert!(cli.catalog_images.is_empty());
    }
}
