//! Placeholder images for symbol frames the build doesn't contain

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use kanim::MissingReport;
use kanim_shared::ids::sanitize_path_component;

/// Map a `folder/file.png` reference to a path under `dir`, one sanitized
/// component at a time.
pub fn relative_path(dir: &Path, reference: &str) -> PathBuf {
    reference
        .split('/')
        .fold(dir.to_path_buf(), |path, component| {
            path.join(sanitize_path_component(component, "_"))
        })
}

/// Write a 1x1 transparent PNG for every missing reference.
///
/// Returns the written paths in report order.
pub fn write_placeholders(dir: &Path, missing: &MissingReport) -> Result<Vec<PathBuf>> {
    let pixel = RgbaImage::new(1, 1);
    let mut written = Vec::new();

    for reference in missing.placeholder_files() {
        let path = relative_path(dir, &reference);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        pixel
            .save(&path)
            .with_context(|| format!("Failed to write placeholder: {:?}", path))?;
        tracing::debug!("Placeholder {:?}", path);
        written.push(path);
    }

    Ok(written)
}
