//! ANIM + BILD -> .scml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kanim::{AnimBank, Build, EmitOptions, MissingReport, emit_scml, write_document};
use kanim_shared::fs::read_container;

use crate::placeholders::write_placeholders;

/// What a conversion produced
#[derive(Debug)]
pub struct ScmlSummary {
    pub animations: usize,
    pub missing: MissingReport,
    pub unplaced: usize,
    pub placeholders: Vec<PathBuf>,
}

pub fn load_bank(path: &Path) -> Result<AnimBank> {
    let data = read_container(path)?;
    AnimBank::read(&data).with_context(|| format!("Failed to parse animation: {:?}", path))
}

pub fn load_build(path: &Path) -> Result<Build> {
    let data = read_container(path)?;
    Build::read(&data).with_context(|| format!("Failed to parse build: {:?}", path))
}

/// Convert an animation bank and its build to an SCML project
///
/// # Arguments
/// * `placeholder_dir` - Where to write 1x1 images for missing references
pub fn convert_scml(
    anim_path: &Path,
    build_path: &Path,
    output: &Path,
    placeholder_dir: Option<&Path>,
    options: &EmitOptions,
) -> Result<ScmlSummary> {
    let bank = load_bank(anim_path)?;
    let build = load_build(build_path)?;

    let result = emit_scml(&bank, &build, options);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    std::fs::write(output, write_document(&result.document))
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    let placeholders = match placeholder_dir {
        Some(dir) if !result.missing.is_empty() => write_placeholders(dir, &result.missing)?,
        _ => Vec::new(),
    };

    tracing::info!(
        "Converted {} animations, {} missing symbols",
        bank.clips.len(),
        result.missing.len()
    );

    Ok(ScmlSummary {
        animations: bank.clips.len(),
        missing: result.missing,
        unplaced: result.unplaced,
        placeholders,
    })
}
