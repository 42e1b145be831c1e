//! Build + bank -> SCML tree
//!
//! ```text
//! spriter_data
//! ├── folder*              one per build symbol, then one per symbol the build lacks
//! │   └── file*            one per symbol frame
//! └── entity
//!     └── animation*       clips sorted by name
//!         ├── mainline
//!         │   └── key*     one per frame, last frame repeated
//!         │       └── object_ref*
//!         └── timeline*    one per reconciled layer
//!             └── key*
//!                 └── object
//! ```

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;
use serde::Serialize;

use super::document::Node;
use crate::anim::{AnimBank, AnimationClip};
use crate::atlas::{Build, SymbolFrame};
use crate::layers::LayerSet;
use crate::transform::{SpinTracker, decompose, display_angle};

// =============================================================================
// Options and results
// =============================================================================

/// Knobs for [`emit_scml`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// How many leading frames (of the extended frame list) are reconciled
    /// into layers. `None` uses every frame.
    pub layer_frames: Option<usize>,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            layer_frames: Some(2),
        }
    }
}

impl EmitOptions {
    pub fn all_frames() -> Self {
        Self { layer_frames: None }
    }
}

/// One `file` entry of a folder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    /// `{folder}/{folder}-{frame}.png`
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pivot_x: f64,
    pub pivot_y: f64,
}

impl FileInfo {
    pub fn file_name(folder: &str, frame: u32) -> String {
        format!("{}/{}-{}.png", folder, folder, frame)
    }

    pub fn from_frame(folder: &str, frame: &SymbolFrame) -> Self {
        let (pivot_x, pivot_y) = frame.pivot();
        Self {
            name: Self::file_name(folder, frame.frame()),
            width: frame.width(),
            height: frame.height(),
            pivot_x,
            pivot_y,
        }
    }

    /// Zero-sized stand-in for a frame the build doesn't have
    pub fn placeholder(folder: &str, frame: u32) -> Self {
        Self {
            name: Self::file_name(folder, frame),
            width: 0,
            height: 0,
            pivot_x: 0.0,
            pivot_y: 0.0,
        }
    }

    fn node(&self, id: usize) -> Node {
        Node::new("file")
            .attr("id", id)
            .attr("name", &self.name)
            .attr("width", self.width)
            .attr("height", self.height)
            .attr("pivot_x", format_decimal(self.pivot_x, 6))
            .attr("pivot_y", format_decimal(self.pivot_y, 6))
    }
}

/// Frames of one symbol that the animation uses but the build lacks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingSymbol {
    /// Name from the animation's hash table, or the decimal hash
    pub name: String,
    pub frames: BTreeSet<u32>,
}

/// Unresolved `(symbol, frame)` references, grouped by symbol hash
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissingReport {
    symbols: BTreeMap<u32, MissingSymbol>,
}

impl MissingReport {
    pub fn record(&mut self, hash: u32, name: &str, frame: u32) {
        self.symbols
            .entry(hash)
            .or_insert_with(|| MissingSymbol {
                name: name.to_string(),
                frames: BTreeSet::new(),
            })
            .frames
            .insert(frame);
    }

    pub fn get(&self, hash: u32) -> Option<&MissingSymbol> {
        self.symbols.get(&hash)
    }

    /// Symbols in ascending hash order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &MissingSymbol)> {
        self.symbols.iter().map(|(&hash, symbol)| (hash, symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// One `name (hash): f0,f1,...` line per symbol
    pub fn lines(&self) -> Vec<String> {
        self.iter()
            .map(|(hash, symbol)| {
                let frames: Vec<String> = symbol.frames.iter().map(u32::to_string).collect();
                format!("{} ({}): {}", symbol.name, hash, frames.join(","))
            })
            .collect()
    }

    /// Relative paths of every placeholder file the document references
    pub fn placeholder_files(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(_, symbol)| {
                symbol
                    .frames
                    .iter()
                    .map(|&frame| FileInfo::file_name(&symbol.name, frame))
            })
            .collect()
    }
}

/// Everything [`emit_scml`] produces
#[derive(Debug, Clone, PartialEq)]
pub struct ScmlOutput {
    pub document: Node,
    pub missing: MissingReport,
    /// Mainline elements that matched no layer and were left out
    pub unplaced: usize,
}

// =============================================================================
// Number formatting
// =============================================================================

/// Render a number the shortest way that reads back to the same value.
///
/// Integral values have no decimal point and negative zero prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Round to `places` decimals, then [`format_number`]
pub fn format_decimal(value: f64, places: i32) -> String {
    format_number(round_to(value, places))
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// =============================================================================
// Emitter
// =============================================================================

struct Folder {
    name: String,
    files: Vec<FileInfo>,
}

impl Folder {
    fn node(&self, id: usize) -> Node {
        let mut node = Node::new("folder").attr("id", id).attr("name", &self.name);
        for (index, file) in self.files.iter().enumerate() {
            node.push(file.node(index));
        }
        node
    }
}

/// Folder table plus the `(symbol, frame)` -> `(folder, file)` index
struct FileTable {
    folders: Vec<Folder>,
    lookup: HashMap<(u32, u32), (usize, usize)>,
    /// First folder of each build symbol
    symbol_folders: HashMap<u32, usize>,
}

impl FileTable {
    fn from_build(build: &Build) -> Self {
        let mut folders = Vec::with_capacity(build.symbols.len());
        let mut lookup = HashMap::new();
        let mut symbol_folders = HashMap::new();

        for (folder_index, symbol) in build.symbols.iter().enumerate() {
            let name = match build.hashes.get(symbol.hash) {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!("Symbol {} has no name in build '{}'", symbol.hash, build.name);
                    symbol.hash.to_string()
                }
            };

            let files: Vec<FileInfo> = symbol
                .frames
                .iter()
                .map(|frame| FileInfo::from_frame(&name, frame))
                .collect();

            for (file_index, frame) in symbol.frames.iter().enumerate() {
                lookup
                    .entry((symbol.hash, frame.frame()))
                    .or_insert((folder_index, file_index));
            }

            symbol_folders.entry(symbol.hash).or_insert(folder_index);
            folders.push(Folder { name, files });
        }

        Self {
            folders,
            lookup,
            symbol_folders,
        }
    }

    fn get(&self, symbol: u32, frame: u32) -> Option<(usize, usize)> {
        self.lookup.get(&(symbol, frame)).copied()
    }

    fn file(&self, (folder, file): (usize, usize)) -> &FileInfo {
        &self.folders[folder].files[file]
    }

    /// Add zero-sized files for missing references.
    ///
    /// Frames missing from a symbol the build has go into that symbol's
    /// folder; symbols the build lacks get one new folder each.
    fn add_placeholders(&mut self, missing: &MissingReport) {
        for (hash, symbol) in missing.iter() {
            let folder_index = match self.symbol_folders.get(&hash) {
                Some(&index) => index,
                None => {
                    self.folders.push(Folder {
                        name: symbol.name.clone(),
                        files: Vec::with_capacity(symbol.frames.len()),
                    });
                    self.folders.len() - 1
                }
            };

            let folder = &mut self.folders[folder_index];
            for &frame in &symbol.frames {
                self.lookup
                    .insert((hash, frame), (folder_index, folder.files.len()));
                folder.files.push(FileInfo::placeholder(&folder.name, frame));
            }
        }
    }
}

/// Frames fed to the layer reconciler
fn layer_window(options: &EmitOptions, frame_count: usize) -> usize {
    options
        .layer_frames
        .map_or(frame_count, |n| n.min(frame_count))
}

/// Build the SCML tree for every clip of `anim` against `build`.
///
/// References the build can't satisfy never abort: they are listed in
/// [`ScmlOutput::missing`] and point at zero-sized placeholder files.
pub fn emit_scml(anim: &AnimBank, build: &Build, options: &EmitOptions) -> ScmlOutput {
    let clips = anim.sorted_clips();
    let mut files = FileTable::from_build(build);

    let mut missing = MissingReport::default();
    for clip in &clips {
        for element in clip.frames.iter().flat_map(|f| &f.elements) {
            if files.get(element.symbol_hash, element.build_frame).is_none() {
                let name = anim.hashes.name_or_hash(element.symbol_hash);
                missing.record(element.symbol_hash, &name, element.build_frame);
            }
        }
    }
    for line in missing.lines() {
        tracing::warn!("Missing symbol frames: {}", line);
    }
    files.add_placeholders(&missing);

    let mut root = Node::new("spriter_data")
        .attr("scml_version", "1.0")
        .attr("generator", "BrashMonkey Spriter")
        .attr("generator_version", "b5");
    for (id, folder) in files.folders.iter().enumerate() {
        root.push(folder.node(id));
    }

    let entity_name = anim.bank_name().unwrap_or_else(|| build.name.clone());
    let mut entity = Node::new("entity").attr("id", 0).attr("name", entity_name);

    let mut unplaced = 0;
    for (id, clip) in clips.iter().enumerate() {
        let (node, skipped) = emit_animation(id, clip, anim, &files, options);
        entity.push(node);
        unplaced += skipped;
    }
    root.push(entity);

    tracing::debug!(
        "SCML: {} folders, {} animations, {} missing symbols, {} unplaced elements",
        files.folders.len(),
        clips.len(),
        missing.len(),
        unplaced
    );

    ScmlOutput {
        document: root,
        missing,
        unplaced,
    }
}

/// One `animation` element plus the number of unplaced mainline elements
fn emit_animation(
    id: usize,
    clip: &AnimationClip,
    anim: &AnimBank,
    files: &FileTable,
    options: &EmitOptions,
) -> (Node, usize) {
    if clip.frame_rate <= 0.0 {
        tracing::warn!(
            "Clip '{}' has frame rate {}, keys will share time 0",
            clip.name,
            clip.frame_rate
        );
    }
    let duration = clip.frame_duration_ms();
    let time = |frame: usize| (frame as f64 * duration).floor() as u64;

    let frames = clip.extended_frames();
    let window = layer_window(options, frames.len());
    let layers = LayerSet::from_frames(frames[..window].iter().copied());

    let mut animation = Node::new("animation")
        .attr("id", id)
        .attr("name", clip.display_name())
        .attr("length", clip.length_ms());

    // Mainline: every element of every frame, pointed at its layer
    let mut unplaced = 0;
    let mut mainline = Node::new("mainline");
    for (index, frame) in frames.iter().enumerate() {
        let mut key = Node::new("key").attr("id", index).attr("time", time(index));
        let count = frame.elements.len();

        for (element_index, element) in frame.elements.iter().enumerate() {
            let Some(layer) = layers.resolve(element) else {
                tracing::debug!(
                    "Clip '{}' frame {}: element {} matches no layer",
                    clip.name,
                    index,
                    element.symbol_hash
                );
                unplaced += 1;
                continue;
            };
            let (pivot_x, pivot_y) = files
                .get(element.symbol_hash, element.build_frame)
                .map(|slot| {
                    let file = files.file(slot);
                    (file.pivot_x, file.pivot_y)
                })
                .unwrap_or((0.0, 0.0));

            key.push(
                Node::new("object_ref")
                    .attr("id", layer)
                    .attr("name", anim.hashes.name_or_hash(element.symbol_hash))
                    .attr("abs_x", 0)
                    .attr("abs_y", 0)
                    .attr("abs_pivot_x", format_decimal(pivot_x, 6))
                    .attr("abs_pivot_y", format_decimal(pivot_y, 6))
                    .attr("abs_angle", 0)
                    .attr("abs_scale_x", 1)
                    .attr("abs_scale_y", 1)
                    .attr("abs_a", 1)
                    .attr("timeline", layer)
                    .attr("z_index", count - element_index),
            );
        }
        mainline.push(key);
    }
    animation.push(mainline);

    // One timeline per layer, keyed at the frames the layer was seen in
    for (index, layer) in layers.layers().iter().enumerate() {
        let mut timeline = Node::new("timeline")
            .attr("id", index)
            .attr("name", anim.hashes.name_or_hash(layer.hash))
            .attr("data-zIndex", format_number(f64::from(layer.z)))
            .attr("data-hash", layer.hash);

        let mut spin = SpinTracker::new();
        for entry in &layer.entries {
            let element = &entry.element;
            let parts = decompose(&element.matrix);
            let angle = display_angle(parts.rotation);
            let (folder, file) = files
                .get(element.symbol_hash, element.build_frame)
                .unwrap_or((0, 0));

            let object = Node::new("object")
                .attr("folder", folder)
                .attr("file", file)
                .attr("x", format_decimal(parts.translate_x, 2))
                .attr("y", format_number(-round_to(parts.translate_y, 2)))
                .attr("scale_x", format_decimal(parts.scale_x, 6))
                .attr("scale_y", format_decimal(parts.scale_y, 6))
                .attr("angle", format_decimal(angle, 3));

            timeline.push(
                Node::new("key")
                    .attr("id", entry.frame)
                    .attr("time", time(entry.frame))
                    .attr("spin", spin.next(angle))
                    .child(object),
            );
        }
        animation.push(timeline);
    }

    (animation, unplaced)
}
