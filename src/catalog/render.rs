//! Catalog rendering.
//!
//! Renders an OLM catalog image to a local JSON file by invoking
//! `opm render <image> -o json`. Requires `opm` on the PATH and registry
//! authentication for private catalogs (e.g. via `podman login`).

use std::path::Path;
use std::process::Command;

use crate::error::{PullsarError, Result};

/// Render a catalog image to `output_file`.
///
/// A failed render is fatal for the catalog being processed, never for the
/// whole run; the caller skips the catalog and moves on.
pub fn render_catalog(catalog_image: &str, output_file: &Path) -> Result<()> {
    tracing::info!(
        "Executing: opm render {catalog_image} -o json > {}",
        output_file.display()
    );
    tracing::info!("Might take up to a few minutes...");

    let output = Command::new("opm")
        .args(["render", catalog_image, "-o", "json"])
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PullsarError::CatalogRender {
                    image: catalog_image.to_string(),
                    message: "'opm' command not found. Please, add it to your PATH.".to_string(),
                }
            } else {
                PullsarError::CatalogRender {
                    image: catalog_image.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::error!(
            "Rendering of catalog image failed (exit code: {:?}):",
            output.status.code()
        );
        tracing::error!("Stderr:\n{stderr}");
        return Err(PullsarError::CatalogRender {
            image: catalog_image.to_string(),
            message: format!("opm exited with code {:?}", output.status.code()),
        });
    }

    std::fs::write(output_file, &output.stdout)?;
    tracing::info!("Successfully rendered catalog to {}", output_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rendering shells out to `opm`; these tests only cover the failure
    // paths that do not require the binary to exist.

    #[test]
    fn missing_opm_binary_is_catalog_render_error() {
        // Point PATH at an empty directory so `opm` cannot be found.
        let temp = tempfile::TempDir::new().unwrap();
        let old_path = std::env::var_os("PATH");
        std::env::set_var("PATH", temp.path());

        let result = render_catalog("registry.example/catalog:v4.18", &temp.path().join("out.json"));

        match old_path {
            Some(p) => std::env::set_var("PATH", p),
            None => std::env::remove_var("PATH"),
        }

        match result {
            Err(PullsarError::CatalogRender { image, message }) => {
                assert_eq!(image, "registry.example/catalog:v4.18");
                assert!(message.contains("not found"));
            }
            other => panic!("Expected CatalogRender error, got {other:?}"),
        }
    }
}
