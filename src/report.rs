//! Operator-visible stats dump.
//!
//! Renders the resolved repository map as human-readable text: one banner
//! per repository, then every bundle that recorded at least one pull,
//! numbered. Intended for operator eyes on stdout, not for parsing.

use std::fmt::Write;

use crate::catalog::CatalogIndex;

const BANNER: &str = "===================================================================";
const RULE: &str = "-------------------------------------------------------------------";

/// Render the per-repository, per-bundle stats text.
pub fn render_usage_stats(index: &CatalogIndex) -> String {
    let mut out = String::new();

    for (repo_path, ids) in index.primary() {
        writeln!(out, "\n{BANNER}").unwrap();
        writeln!(out, "{repo_path}").unwrap();
        writeln!(out, "{RULE}").unwrap();

        let mut counter = 1;
        for &id in ids {
            let bundle = index.bundle(id);
            if !bundle.pull_count().is_empty() {
                writeln!(out, "\n{counter}.").unwrap();
                writeln!(out, "{bundle}").unwrap();
                counter += 1;
            }
        }
    }

    out
}
