//! Dump any container as JSON

use std::path::Path;

use anyhow::{Context, Result};
use kanim::{ANIM_MAGIC, AnimBank, BUILD_MAGIC, Build};
use kanim_shared::fs::read_container;
use ktex::{KTEX_MAGIC, TextureContainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Texture,
    Build,
    Animation,
}

impl ContainerKind {
    /// Identify a container by its magic tag
    pub fn sniff(data: &[u8]) -> Option<Self> {
        match data.get(..4)? {
            tag if tag == KTEX_MAGIC => Some(Self::Texture),
            tag if tag == BUILD_MAGIC => Some(Self::Build),
            tag if tag == ANIM_MAGIC => Some(Self::Animation),
            _ => None,
        }
    }
}

/// Parse a container and render it as pretty JSON
pub fn inspect_bytes(data: &[u8]) -> Result<String> {
    let json = match ContainerKind::sniff(data) {
        Some(ContainerKind::Texture) => serde_json::to_string_pretty(&TextureContainer::read(data)?)?,
        Some(ContainerKind::Build) => serde_json::to_string_pretty(&Build::read(data)?)?,
        Some(ContainerKind::Animation) => serde_json::to_string_pretty(&AnimBank::read(data)?)?,
        None => {
            let tag = String::from_utf8_lossy(&data[..data.len().min(4)]).into_owned();
            anyhow::bail!("Unrecognized container tag {:?}", tag);
        }
    };
    Ok(json)
}

pub fn inspect_file(path: &Path) -> Result<String> {
    let data = read_container(path)?;
    inspect_bytes(&data).with_context(|| format!("Failed to inspect {:?}", path))
}
