//! Atlas frame extraction (BILD + atlas textures -> one PNG per frame)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kanim::FileInfo;

use crate::placeholders::relative_path;
use crate::scml::load_build;
use crate::texture::decode_mip;

/// Write every symbol frame of a build as `{folder}/{folder}-{frame}.png`.
///
/// Atlas textures are looked up by the names stored in the build, relative
/// to `atlas_dir` (the build's own directory when `None`). Frames without
/// geometry are skipped.
pub fn extract_frames(
    build_path: &Path,
    atlas_dir: Option<&Path>,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let build = load_build(build_path)?;
    let atlas_dir = atlas_dir
        .or_else(|| build_path.parent())
        .unwrap_or_else(|| Path::new("."));

    let atlases = build
        .atlases
        .iter()
        .map(|name| decode_mip(&atlas_dir.join(name), 0))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::new();
    for symbol in &build.symbols {
        let folder = build.hashes.name_or_hash(symbol.hash);
        for frame in &symbol.frames {
            if frame.geometry.bbox.is_none() {
                tracing::debug!("{} frame {} has no geometry", folder, frame.frame());
                continue;
            }

            let image = build
                .frame_image(symbol.hash, frame.frame(), &atlases)
                .with_context(|| format!("Failed to extract {} frame {}", folder, frame.frame()))?;

            let path = relative_path(output_dir, &FileInfo::file_name(&folder, frame.frame()));
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            image
                .save(&path)
                .with_context(|| format!("Failed to write frame: {:?}", path))?;
            written.push(path);
        }
    }

    tracing::info!("Extracted {} frames from '{}'", written.len(), build.name);
    Ok(written)
}
