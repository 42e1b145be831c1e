//! kanim-export - animation asset export tool
//!
//! Converts ANIM/BILD containers to SCML projects and KTEX textures to PNG.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kanim::EmitOptions;

use kanim_export::{PNG_EXT, SCML_EXT, frames, inspect, manifest, scml, texture};

#[derive(Parser)]
#[command(name = "kanim-export")]
#[command(about = "Animation asset export tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an animation bank and its build to SCML
    Scml {
        /// Input ANIM file
        anim: PathBuf,

        /// Input BILD file
        build: PathBuf,

        /// Output .scml file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write 1x1 placeholder PNGs for missing references into this directory
        #[arg(long)]
        placeholders: Option<PathBuf>,

        /// Reconcile layers over every frame instead of the first two
        #[arg(long)]
        all_frames: bool,
    },

    /// Decode a texture mip to PNG
    Texture {
        /// Input KTEX file
        input: PathBuf,

        /// Output .png file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mip level (0 = largest)
        #[arg(short, long, default_value_t = 0)]
        mip: usize,
    },

    /// Cut every symbol frame of a build out of its atlases
    Frames {
        /// Input BILD file
        build: PathBuf,

        /// Directory holding the atlas textures (default: next to the build)
        #[arg(long)]
        atlas_dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Print a parsed container as JSON
    Inspect {
        /// Input KTEX, BILD or ANIM file
        input: PathBuf,
    },

    /// Build assets from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Scml {
            anim,
            build,
            output,
            placeholders,
            all_frames,
        } => {
            let output = output.unwrap_or_else(|| anim.with_extension(SCML_EXT));
            let options = if all_frames {
                EmitOptions::all_frames()
            } else {
                EmitOptions::default()
            };
            tracing::info!("Converting {:?} + {:?} -> {:?}", anim, build, output);

            let summary =
                scml::convert_scml(&anim, &build, &output, placeholders.as_deref(), &options)?;
            if !summary.missing.is_empty() {
                println!("Missing Symbols:");
                for line in summary.missing.lines() {
                    println!("{}", line);
                }
            }
            if summary.unplaced > 0 {
                tracing::warn!("{} elements matched no layer", summary.unplaced);
            }
            if !summary.placeholders.is_empty() {
                tracing::info!("Wrote {} placeholders", summary.placeholders.len());
            }
            tracing::info!("Done!");
        }

        Commands::Texture { input, output, mip } => {
            let output = output.unwrap_or_else(|| input.with_extension(PNG_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            texture::convert_texture(&input, &output, mip)?;
            tracing::info!("Done!");
        }

        Commands::Frames {
            build,
            atlas_dir,
            output,
        } => {
            tracing::info!("Extracting frames {:?} -> {:?}", build, output);
            frames::extract_frames(&build, atlas_dir.as_deref(), &output)?;
            tracing::info!("Done!");
        }

        Commands::Inspect { input } => {
            println!("{}", inspect::inspect_file(&input)?);
        }

        Commands::Build { manifest, output } => {
            tracing::debug!("Building assets from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }
    }

    Ok(())
}
