//! `BILD` build reader
//!
//! A build describes every sprite a character can show. Each symbol owns a
//! list of frames; each frame owns a triangle list whose `u`/`v` place it
//! inside one of the atlas textures and whose `w` selects which atlas.
//!
//! ```text
//! "BILD" version symbols frames name atlases[]
//! symbol*   { hash frame_count frame*{ frame duration x y w h alpha_index alpha_count } }
//! alpha_vertex_count
//! triangle* { vertex*3 { x y z u v w } }   (symbol-major, alpha_count / 3 per frame)
//! hash_count { hash name }*
//! ```

use hashbrown::HashMap;
use image::{RgbaImage, imageops};
use kanim_shared::{ByteCursor, HashTable, ReadError};
use serde::Serialize;

use crate::error::KanimError;

/// Magic tag of a build container
pub const BUILD_MAGIC: &[u8; 4] = b"BILD";

/// How far a vertex depth may stray from the first vertex of its frame
pub const DEPTH_TOLERANCE: f32 = 0.5;

/// Build versions seen in the wild
const KNOWN_VERSIONS: [u32; 2] = [5, 6];

// =============================================================================
// Geometry
// =============================================================================

/// One triangle vertex.
///
/// `x`/`y`/`z` are screen space; `u`/`v` are normalized atlas coordinates and
/// `w` is the atlas depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub u: f32,
    pub v: f32,
    pub w: f32,
}

impl Vertex {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ReadError> {
        Ok(Self {
            x: cursor.read_f32_le()?,
            y: cursor.read_f32_le()?,
            z: cursor.read_f32_le()?,
            u: cursor.read_f32_le()?,
            v: cursor.read_f32_le()?,
            w: cursor.read_f32_le()?,
        })
    }
}

pub type Triangle = [Vertex; 3];

fn read_triangle(cursor: &mut ByteCursor<'_>) -> Result<Triangle, ReadError> {
    Ok([
        Vertex::read(cursor)?,
        Vertex::read(cursor)?,
        Vertex::read(cursor)?,
    ])
}

/// Extent of a frame in normalized atlas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Everything derived from a frame's triangles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameGeometry {
    /// Atlas page, `None` for frames without triangles
    pub atlas_depth: Option<i32>,
    pub bbox: Option<BoundingBox>,
    #[serde(skip)]
    pub triangles: Vec<Triangle>,
}

/// Derive depth and bounding box from a frame's triangles.
///
/// All vertices must lie within [`DEPTH_TOLERANCE`] of each other; the
/// depth is then `floor(w + 0.5)` of the first vertex.
///
/// # Arguments
/// * `triangles` - The frame's triangle list, in file order
/// * `symbol` / `frame` - Only used to label an error
pub fn derive_geometry(
    triangles: Vec<Triangle>,
    symbol: u32,
    frame: u32,
) -> Result<FrameGeometry, KanimError> {
    let Some(first) = triangles.first().map(|t| t[0]) else {
        return Ok(FrameGeometry {
            atlas_depth: None,
            bbox: None,
            triangles,
        });
    };

    let mut bbox = BoundingBox {
        left: first.u,
        right: first.u,
        top: first.v,
        bottom: first.v,
    };

    let (mut min_w, mut max_w) = (first.w, first.w);
    for vertex in triangles.iter().flatten() {
        // Every pair of vertices must agree, not just each against the first
        let other = if vertex.w - min_w > DEPTH_TOLERANCE {
            Some(min_w)
        } else if max_w - vertex.w > DEPTH_TOLERANCE {
            Some(max_w)
        } else {
            None
        };
        if let Some(other) = other {
            return Err(KanimError::InconsistentDepth {
                symbol,
                frame,
                first: other,
                found: vertex.w,
            });
        }
        min_w = min_w.min(vertex.w);
        max_w = max_w.max(vertex.w);
        bbox.left = bbox.left.min(vertex.u);
        bbox.right = bbox.right.max(vertex.u);
        bbox.top = bbox.top.min(vertex.v);
        bbox.bottom = bbox.bottom.max(vertex.v);
    }

    Ok(FrameGeometry {
        atlas_depth: Some((first.w + 0.5).floor() as i32),
        bbox: Some(bbox),
        triangles,
    })
}

// =============================================================================
// Symbols
// =============================================================================

/// A symbol frame exactly as stored
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawSymbolFrame {
    /// Frame number referenced by animation elements
    pub frame: u32,
    pub duration: u32,
    /// Offset of the sprite center from the symbol origin
    pub x: f32,
    pub y: f32,
    /// Sprite size in pixels
    pub w: f32,
    pub h: f32,
    /// First vertex of this frame in the triangle stream
    pub alpha_index: u32,
    /// Vertex count, normally a multiple of 3
    pub alpha_count: u32,
}

impl RawSymbolFrame {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ReadError> {
        Ok(Self {
            frame: cursor.read_u32_le()?,
            duration: cursor.read_u32_le()?,
            x: cursor.read_f32_le()?,
            y: cursor.read_f32_le()?,
            w: cursor.read_f32_le()?,
            h: cursor.read_f32_le()?,
            alpha_index: cursor.read_u32_le()?,
            alpha_count: cursor.read_u32_le()?,
        })
    }

    fn triangle_count(&self) -> usize {
        (self.alpha_count / 3) as usize
    }
}

/// A symbol frame with its derived geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolFrame {
    #[serde(flatten)]
    pub raw: RawSymbolFrame,
    #[serde(flatten)]
    pub geometry: FrameGeometry,
}

/// Pivot on one axis: `0.5 - offset / size`, or centered when the size is 0
fn pivot_axis(offset: f32, size: u32) -> f64 {
    if size == 0 {
        0.5
    } else {
        0.5 - f64::from(offset) / f64::from(size)
    }
}

impl SymbolFrame {
    pub fn frame(&self) -> u32 {
        self.raw.frame
    }

    /// Image width in whole pixels
    pub fn width(&self) -> u32 {
        self.raw.w.ceil() as u32
    }

    /// Image height in whole pixels
    pub fn height(&self) -> u32 {
        self.raw.h.ceil() as u32
    }

    /// Normalized pivot as `(pivot_x, pivot_y)`.
    ///
    /// The y offset points down in the build and up in the editor, hence the
    /// sign difference.
    pub fn pivot(&self) -> (f64, f64) {
        (
            pivot_axis(self.raw.x, self.width()),
            pivot_axis(-self.raw.y, self.height()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub hash: u32,
    pub frames: Vec<SymbolFrame>,
}

impl Symbol {
    /// Position in `frames` of the frame numbered `frame`
    pub fn frame_position(&self, frame: u32) -> Option<usize> {
        self.frames.iter().position(|f| f.frame() == frame)
    }

    pub fn frame(&self, frame: u32) -> Option<&SymbolFrame> {
        self.frame_position(frame).map(|i| &self.frames[i])
    }
}

// =============================================================================
// Build
// =============================================================================

/// A parsed `BILD` file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Build {
    pub version: u32,
    /// Declared total frame count (informational)
    pub frame_count: u32,
    pub name: String,
    /// Atlas texture file names, indexed by `depth - sampler_offset`
    pub atlases: Vec<String>,
    /// Declared size of the triangle stream, in vertices
    pub alpha_vertex_count: u32,
    pub symbols: Vec<Symbol>,
    pub hashes: HashTable,
    #[serde(skip)]
    index: HashMap<u32, usize>,
}

impl Build {
    /// Parse a build container from raw file bytes
    ///
    /// # Errors
    /// * `KanimError::Read` - wrong magic or truncated data
    /// * `KanimError::InconsistentDepth` - a frame's vertices span atlas pages
    pub fn read(data: &[u8]) -> Result<Self, KanimError> {
        let mut cursor = ByteCursor::new(data);
        cursor.expect_magic(BUILD_MAGIC)?;

        let version = cursor.read_u32_le()?;
        if !KNOWN_VERSIONS.contains(&version) {
            tracing::warn!("Unexpected BILD version {}", version);
        }

        let symbol_count = cursor.read_u32_le()? as usize;
        let frame_count = cursor.read_u32_le()?;
        let name = cursor.read_string()?;

        let atlas_count = cursor.read_u32_le()? as usize;
        let atlases = cursor.repeat(atlas_count, |c, _| c.read_string())?;

        let headers = cursor.repeat(symbol_count, |c, _| {
            let hash = c.read_u32_le()?;
            let count = c.read_u32_le()? as usize;
            let frames = c.repeat(count, |c, _| RawSymbolFrame::read(c))?;
            Ok::<_, ReadError>((hash, frames))
        })?;

        let alpha_vertex_count = cursor.read_u32_le()?;

        // Triangles follow in the same symbol/frame order as the headers
        let mut symbols = Vec::with_capacity(headers.len());
        let mut vertex_total = 0u64;
        for (hash, raw_frames) in headers {
            let mut frames = Vec::with_capacity(raw_frames.len());
            for raw in raw_frames {
                if raw.alpha_count % 3 != 0 {
                    tracing::warn!(
                        "Symbol {} frame {}: {} vertices is not a whole triangle count",
                        hash,
                        raw.frame,
                        raw.alpha_count
                    );
                }
                let triangles = cursor.repeat(raw.triangle_count(), |c, _| read_triangle(c))?;
                vertex_total += triangles.len() as u64 * 3;
                let geometry = derive_geometry(triangles, hash, raw.frame)?;
                frames.push(SymbolFrame { raw, geometry });
            }
            symbols.push(Symbol { hash, frames });
        }

        if vertex_total != u64::from(alpha_vertex_count) {
            tracing::warn!(
                "BILD declares {} vertices but frames hold {}",
                alpha_vertex_count,
                vertex_total
            );
        }

        let hashes = HashTable::read(&mut cursor)?;

        if !cursor.at_end() {
            tracing::debug!("BILD has {} trailing bytes", cursor.remaining());
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (position, symbol) in symbols.iter().enumerate() {
            if index.contains_key(&symbol.hash) {
                tracing::warn!("Duplicate symbol {} in build {}", symbol.hash, name);
                continue;
            }
            index.insert(symbol.hash, position);
        }

        tracing::debug!(
            "BILD '{}' v{}: {} symbols, {} atlases, {} names",
            name,
            version,
            symbols.len(),
            atlases.len(),
            hashes.len()
        );

        Ok(Self {
            version,
            frame_count,
            name,
            atlases,
            alpha_vertex_count,
            symbols,
            hashes,
            index,
        })
    }

    /// Position of the symbol with this hash in [`Build::symbols`]
    pub fn symbol_position(&self, hash: u32) -> Option<usize> {
        self.index.get(&hash).copied()
    }

    pub fn symbol(&self, hash: u32) -> Option<&Symbol> {
        self.symbol_position(hash).map(|i| &self.symbols[i])
    }

    fn depths(&self) -> impl Iterator<Item = i32> + '_ {
        self.symbols
            .iter()
            .flat_map(|s| &s.frames)
            .filter_map(|f| f.geometry.atlas_depth)
    }

    /// Lowest atlas depth used by any frame; depth of atlas 0
    pub fn sampler_offset(&self) -> Option<i32> {
        self.depths().min()
    }

    /// Fail if frame depths span more atlases than the build names
    pub fn check_atlas_capacity(&self) -> Result<(), KanimError> {
        let (Some(min), Some(max)) = (self.depths().min(), self.depths().max()) else {
            return Ok(());
        };
        let required = (i64::from(max) - i64::from(min) + 1) as usize;
        if required > self.atlases.len() {
            return Err(KanimError::AtlasLimit {
                required,
                available: self.atlases.len(),
            });
        }
        Ok(())
    }

    /// Atlas index holding pixels for frames at `depth`
    pub fn atlas_index_for_depth(&self, depth: i32) -> Result<usize, KanimError> {
        self.check_atlas_capacity()?;
        let offset = self.sampler_offset().unwrap_or(depth);
        Ok((i64::from(depth) - i64::from(offset)).max(0) as usize)
    }

    /// Cut one symbol frame out of its decoded atlas.
    ///
    /// `atlases` are the decoded mip 0 images, in [`Build::atlases`] order.
    /// The bounding box is scaled to the atlas size and widened to whole
    /// pixels.
    pub fn frame_image(
        &self,
        symbol: u32,
        frame: u32,
        atlases: &[RgbaImage],
    ) -> Result<RgbaImage, KanimError> {
        let unknown = KanimError::UnknownFrame { symbol, frame };
        let entry = self
            .symbol(symbol)
            .and_then(|s| s.frame(frame))
            .ok_or(unknown)?;

        let (Some(depth), Some(bbox)) = (entry.geometry.atlas_depth, entry.geometry.bbox) else {
            return Err(KanimError::NoGeometry { symbol, frame });
        };

        let index = self.atlas_index_for_depth(depth)?;
        let atlas = atlases.get(index).ok_or(KanimError::AtlasLimit {
            required: index + 1,
            available: atlases.len(),
        })?;

        let (aw, ah) = atlas.dimensions();
        let scale = |value: f32, size: u32, round: fn(f32) -> f32| -> u32 {
            (round(value * size as f32).max(0.0) as u32).min(size)
        };
        let left = scale(bbox.left, aw, f32::floor);
        let right = scale(bbox.right, aw, f32::ceil);
        let top = scale(bbox.top, ah, f32::floor);
        let bottom = scale(bbox.bottom, ah, f32::ceil);

        Ok(imageops::crop_imm(atlas, left, top, right - left, bottom - top).to_image())
    }
}
