//! Texture converter (.tex -> PNG)

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use kanim_shared::fs::read_container;
use ktex::TextureContainer;

pub fn load_texture(path: &Path) -> Result<TextureContainer> {
    let data = read_container(path)?;
    TextureContainer::read(&data).with_context(|| format!("Failed to parse texture: {:?}", path))
}

/// Decode one mip of a texture file
pub fn decode_mip(path: &Path, mip: usize) -> Result<RgbaImage> {
    let texture = load_texture(path)?;
    texture
        .mip_image(mip)
        .with_context(|| format!("Failed to decode mip {} of {:?}", mip, path))
}

/// Decode one mip of a texture file and save it as PNG
pub fn convert_texture(input: &Path, output: &Path, mip: usize) -> Result<()> {
    let image = decode_mip(input, mip)?;
    image
        .save(output)
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Converted texture: {}x{}, mip {}",
        image.width(),
        image.height(),
        mip
    );

    Ok(())
}
