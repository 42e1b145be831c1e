//! Manifest parsing and build orchestration
//!
//! Parses assets.toml and runs every conversion it lists:
//!
//! ```toml
//! [output]
//! dir = "export/"
//!
//! [animations.wilson]
//! anim = "anim/wilson.bin"
//! build = "build/wilson.bin"
//! all_frames = false
//! placeholders = true
//!
//! [textures]
//! atlas = "build/atlas-0.tex"
//! icon = { path = "icon.tex", mip = 1 }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kanim::EmitOptions;
use serde::Deserialize;

use crate::{PNG_EXT, SCML_EXT};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub animations: BTreeMap<String, AnimationEntry>,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("export/")
}

#[derive(Debug, Deserialize)]
pub struct AnimationEntry {
    pub anim: PathBuf,
    pub build: PathBuf,
    /// Reconcile layers over every frame instead of the first two
    #[serde(default)]
    pub all_frames: bool,
    /// Write placeholder PNGs next to the project for missing references
    #[serde(default)]
    pub placeholders: bool,
}

impl AnimationEntry {
    pub fn options(&self) -> EmitOptions {
        if self.all_frames {
            EmitOptions::all_frames()
        } else {
            EmitOptions::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextureEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        mip: usize,
    },
}

impl TextureEntry {
    pub fn path(&self) -> &Path {
        match self {
            TextureEntry::Simple(p) => p,
            TextureEntry::Detailed { path, .. } => path,
        }
    }

    pub fn mip(&self) -> usize {
        match self {
            TextureEntry::Simple(_) => 0,
            TextureEntry::Detailed { mip, .. } => *mip,
        }
    }
}

/// Load and parse a manifest file.
///
/// Relative source paths are resolved against the manifest's directory.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;

    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        manifest.rebase(base);
    }
    Ok(manifest)
}

impl Manifest {
    fn rebase(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.output.dir);
        for entry in self.animations.values_mut() {
            join(&mut entry.anim);
            join(&mut entry.build);
        }
        for entry in self.textures.values_mut() {
            match entry {
                TextureEntry::Simple(p) => join(p),
                TextureEntry::Detailed { path, .. } => join(path),
            }
        }
    }
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    // Check that all source files exist
    for (name, entry) in &manifest.animations {
        if !entry.anim.exists() {
            anyhow::bail!("Animation '{}' source not found: {:?}", name, entry.anim);
        }
        if !entry.build.exists() {
            anyhow::bail!("Animation '{}' build not found: {:?}", name, entry.build);
        }
    }
    for (name, entry) in &manifest.textures {
        if !entry.path().exists() {
            anyhow::bail!("Texture '{}' source not found: {:?}", name, entry.path());
        }
    }
    Ok(())
}

/// Build all assets from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)?;

    for (name, entry) in &manifest.animations {
        let project_dir = output_dir.join(name);
        let output = project_dir.join(format!("{}.{}", name, SCML_EXT));
        tracing::info!("Converting animation: {} -> {:?}", name, output);

        let placeholders = entry.placeholders.then_some(project_dir.as_path());
        let summary = crate::scml::convert_scml(
            &entry.anim,
            &entry.build,
            &output,
            placeholders,
            &entry.options(),
        )?;
        for line in summary.missing.lines() {
            tracing::warn!("{}: missing {}", name, line);
        }
    }

    for (name, entry) in &manifest.textures {
        let output = output_dir.join(format!("{}.{}", name, PNG_EXT));
        tracing::info!("Converting texture: {} -> {:?}", name, output);
        crate::texture::convert_texture(entry.path(), &output, entry.mip())?;
    }

    Ok(())
}
