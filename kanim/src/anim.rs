//! `ANIM` bank reader
//!
//! ```text
//! "ANIM" version element_count frame_count event_count clip_count
//! clip*  { name facing:u8 bank_hash frame_rate:f32 frame_count
//!          frame* { x y w h  event_count event_hash*
//!                   element_count element* { hash build_frame layer_hash a b c d tx ty z } } }
//! hash_count { hash name }*
//! ```

use kanim_shared::{ByteCursor, HashTable, ReadError};
use serde::Serialize;

use crate::error::KanimError;
use crate::facing;

/// Magic tag of an animation container
pub const ANIM_MAGIC: &[u8; 4] = b"ANIM";

const KNOWN_VERSION: u32 = 4;

/// 2x3 affine matrix, column-major: `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ReadError> {
        Ok(Self {
            a: cursor.read_f32_le()?,
            b: cursor.read_f32_le()?,
            c: cursor.read_f32_le()?,
            d: cursor.read_f32_le()?,
            tx: cursor.read_f32_le()?,
            ty: cursor.read_f32_le()?,
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One placed symbol frame inside an animation frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Element {
    /// Build symbol shown by this element
    pub symbol_hash: u32,
    /// Frame number within that symbol
    pub build_frame: u32,
    /// Identity of the visual layer, stable across frames
    pub layer_hash: u32,
    pub matrix: Affine,
    /// Stacking key
    pub z: f32,
}

impl Element {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ReadError> {
        Ok(Self {
            symbol_hash: cursor.read_u32_le()?,
            build_frame: cursor.read_u32_le()?,
            layer_hash: cursor.read_u32_le()?,
            matrix: Affine::read(cursor)?,
            z: cursor.read_f32_le()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimFrame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Event hashes in file order
    pub events: Vec<u32>,
    pub elements: Vec<Element>,
}

impl AnimFrame {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ReadError> {
        let x = cursor.read_f32_le()?;
        let y = cursor.read_f32_le()?;
        let w = cursor.read_f32_le()?;
        let h = cursor.read_f32_le()?;

        let event_count = cursor.read_u32_le()? as usize;
        let events = cursor.repeat(event_count, |c, _| c.read_u32_le())?;

        let element_count = cursor.read_u32_le()? as usize;
        let elements = cursor.repeat(element_count, |c, _| Element::read(c))?;

        Ok(Self {
            x,
            y,
            w,
            h,
            events,
            elements,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationClip {
    pub name: String,
    /// Facing bit mask, see [`crate::facing`]
    pub facing: u8,
    /// Bank this clip belongs to; names the exported entity
    pub bank_hash: u32,
    /// Frames per second
    pub frame_rate: f32,
    pub frames: Vec<AnimFrame>,
}

impl AnimationClip {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ReadError> {
        let name = cursor.read_string()?;
        let facing = cursor.read_u8()?;
        let bank_hash = cursor.read_u32_le()?;
        let frame_rate = cursor.read_f32_le()?;
        let frame_count = cursor.read_u32_le()? as usize;
        let frames = cursor.repeat(frame_count, |c, _| AnimFrame::read(c))?;

        Ok(Self {
            name,
            facing,
            bank_hash,
            frame_rate,
            frames,
        })
    }

    /// Milliseconds per frame, 0 for a non-positive frame rate
    pub fn frame_duration_ms(&self) -> f64 {
        if self.frame_rate > 0.0 {
            1000.0 / f64::from(self.frame_rate)
        } else {
            0.0
        }
    }

    /// Clip length in whole milliseconds
    pub fn length_ms(&self) -> u64 {
        (self.frames.len() as f64 * self.frame_duration_ms()).floor() as u64
    }

    /// Clip name with the facing suffix the editor expects
    pub fn display_name(&self) -> String {
        facing::animation_name(&self.name, self.facing)
    }

    /// Frames with the last one repeated once, so the editor holds the
    /// final pose for a full frame before looping.
    pub fn extended_frames(&self) -> Vec<&AnimFrame> {
        let mut frames: Vec<&AnimFrame> = self.frames.iter().collect();
        if let Some(last) = self.frames.last() {
            frames.push(last);
        }
        frames
    }
}

/// A parsed `ANIM` file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimBank {
    pub version: u32,
    /// Declared totals across all clips (informational)
    pub element_count: u32,
    pub frame_count: u32,
    pub event_count: u32,
    /// Clips in file order
    pub clips: Vec<AnimationClip>,
    pub hashes: HashTable,
}

impl AnimBank {
    /// Parse an animation container from raw file bytes
    ///
    /// # Errors
    /// * `KanimError::Read` - wrong magic or truncated data
    pub fn read(data: &[u8]) -> Result<Self, KanimError> {
        let mut cursor = ByteCursor::new(data);
        cursor.expect_magic(ANIM_MAGIC)?;

        let version = cursor.read_u32_le()?;
        if version != KNOWN_VERSION {
            tracing::warn!("Unexpected ANIM version {}", version);
        }

        let element_count = cursor.read_u32_le()?;
        let frame_count = cursor.read_u32_le()?;
        let event_count = cursor.read_u32_le()?;
        let clip_count = cursor.read_u32_le()? as usize;

        let clips = cursor.repeat(clip_count, |c, _| AnimationClip::read(c))?;
        let hashes = HashTable::read(&mut cursor)?;

        if !cursor.at_end() {
            tracing::debug!("ANIM has {} trailing bytes", cursor.remaining());
        }

        tracing::debug!(
            "ANIM v{}: {} clips, {} names",
            version,
            clips.len(),
            hashes.len()
        );

        Ok(Self {
            version,
            element_count,
            frame_count,
            event_count,
            clips,
            hashes,
        })
    }

    /// Clips in export order: by name, ascending
    pub fn sorted_clips(&self) -> Vec<&AnimationClip> {
        let mut clips: Vec<&AnimationClip> = self.clips.iter().collect();
        clips.sort_by(|a, b| a.name.cmp(&b.name));
        clips
    }

    /// Name of the bank the first clip belongs to, if any
    pub fn bank_name(&self) -> Option<String> {
        let clip = self.clips.first()?;
        Some(self.hashes.name_or_hash(clip.bank_hash).into_owned())
    }
}
