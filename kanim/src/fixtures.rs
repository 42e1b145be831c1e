//! In-memory builders for test containers

use crate::{ANIM_MAGIC, BUILD_MAGIC};

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_f32(out: &mut Vec<u8>, v: f32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_str(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

fn put_hashes(out: &mut Vec<u8>, hashes: &[(u32, &str)]) {
    put_u32(out, hashes.len() as u32);
    for (hash, name) in hashes {
        put_u32(out, *hash);
        put_str(out, name);
    }
}

/// One frame of a fixture symbol
#[derive(Clone, Debug)]
pub struct FrameSpec {
    pub frame: u32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Each triangle is three (u, v, w) vertices
    pub triangles: Vec<[(f32, f32, f32); 3]>,
}

impl FrameSpec {
    pub fn new(frame: u32, w: f32, h: f32) -> Self {
        Self {
            frame,
            x: 0.0,
            y: 0.0,
            w,
            h,
            triangles: Vec::new(),
        }
    }

    pub fn offset(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Add a quad (two triangles) covering the given uv rect on atlas `depth`
    pub fn quad(mut self, left: f32, top: f32, right: f32, bottom: f32, depth: f32) -> Self {
        self.triangles.push([
            (left, top, depth),
            (right, top, depth),
            (left, bottom, depth),
        ]);
        self.triangles.push([
            (right, top, depth),
            (right, bottom, depth),
            (left, bottom, depth),
        ]);
        self
    }

    pub fn triangle(mut self, verts: [(f32, f32, f32); 3]) -> Self {
        self.triangles.push(verts);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct BuildFixture {
    pub name: String,
    pub atlases: Vec<String>,
    pub symbols: Vec<(u32, Vec<FrameSpec>)>,
    pub hashes: Vec<(u32, String)>,
}

impl BuildFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn atlas(mut self, name: &str) -> Self {
        self.atlases.push(name.to_string());
        self
    }

    pub fn symbol(mut self, hash: u32, name: &str, frames: Vec<FrameSpec>) -> Self {
        self.symbols.push((hash, frames));
        self.hashes.push((hash, name.to_string()));
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = BUILD_MAGIC.to_vec();
        put_u32(&mut out, 6);
        put_u32(&mut out, self.symbols.len() as u32);
        let frame_total: usize = self.symbols.iter().map(|(_, f)| f.len()).sum();
        put_u32(&mut out, frame_total as u32);
        put_str(&mut out, &self.name);
        put_u32(&mut out, self.atlases.len() as u32);
        for atlas in &self.atlases {
            put_str(&mut out, atlas);
        }

        let mut alpha_index = 0u32;
        for (hash, frames) in &self.symbols {
            put_u32(&mut out, *hash);
            put_u32(&mut out, frames.len() as u32);
            for frame in frames {
                let alpha_count = frame.triangles.len() as u32 * 3;
                put_u32(&mut out, frame.frame);
                put_u32(&mut out, 1);
                put_f32(&mut out, frame.x);
                put_f32(&mut out, frame.y);
                put_f32(&mut out, frame.w);
                put_f32(&mut out, frame.h);
                put_u32(&mut out, alpha_index);
                put_u32(&mut out, alpha_count);
                alpha_index += alpha_count;
            }
        }

        put_u32(&mut out, alpha_index);
        for (_, frames) in &self.symbols {
            for frame in frames {
                for triangle in &frame.triangles {
                    for &(u, v, w) in triangle {
                        // x, y, z are screen space and unused by the reader
                        put_f32(&mut out, u * 100.0);
                        put_f32(&mut out, v * 100.0);
                        put_f32(&mut out, 0.0);
                        put_f32(&mut out, u);
                        put_f32(&mut out, v);
                        put_f32(&mut out, w);
                    }
                }
            }
        }

        let hashes: Vec<(u32, &str)> = self.hashes.iter().map(|(h, n)| (*h, n.as_str())).collect();
        put_hashes(&mut out, &hashes);
        out
    }
}

/// One element of a fixture animation frame
#[derive(Clone, Copy, Debug)]
pub struct ElementSpec {
    pub hash: u32,
    pub build_frame: u32,
    pub layer: u32,
    pub matrix: [f32; 6],
    pub z: f32,
}

impl ElementSpec {
    pub fn new(hash: u32, build_frame: u32, layer: u32, z: f32) -> Self {
        Self {
            hash,
            build_frame,
            layer,
            matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            z,
        }
    }

    pub fn matrix(mut self, matrix: [f32; 6]) -> Self {
        self.matrix = matrix;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ClipSpec {
    pub name: String,
    pub facing: u8,
    pub bank: u32,
    pub frame_rate: f32,
    pub frames: Vec<Vec<ElementSpec>>,
    pub events: Vec<Vec<u32>>,
}

impl ClipSpec {
    pub fn new(name: &str, bank: u32, frames: Vec<Vec<ElementSpec>>) -> Self {
        Self {
            name: name.to_string(),
            facing: 0xFF,
            bank,
            frame_rate: 40.0,
            events: vec![Vec::new(); frames.len()],
            frames,
        }
    }

    pub fn facing(mut self, facing: u8) -> Self {
        self.facing = facing;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct AnimFixture {
    pub clips: Vec<ClipSpec>,
    pub hashes: Vec<(u32, String)>,
}

impl AnimFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip(mut self, clip: ClipSpec) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn hash(mut self, hash: u32, name: &str) -> Self {
        self.hashes.push((hash, name.to_string()));
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = ANIM_MAGIC.to_vec();
        put_u32(&mut out, 4);

        let frames = self.clips.iter().flat_map(|c| &c.frames);
        let element_total: usize = frames.clone().map(Vec::len).sum();
        let frame_total = frames.count();
        let event_total: usize = self.clips.iter().flat_map(|c| &c.events).map(Vec::len).sum();
        put_u32(&mut out, element_total as u32);
        put_u32(&mut out, frame_total as u32);
        put_u32(&mut out, event_total as u32);
        put_u32(&mut out, self.clips.len() as u32);

        for clip in &self.clips {
            put_str(&mut out, &clip.name);
            out.push(clip.facing);
            put_u32(&mut out, clip.bank);
            put_f32(&mut out, clip.frame_rate);
            put_u32(&mut out, clip.frames.len() as u32);

            for (index, elements) in clip.frames.iter().enumerate() {
                for v in [-10.0, -20.0, 20.0, 40.0] {
                    put_f32(&mut out, v);
                }
                let events = &clip.events[index];
                put_u32(&mut out, events.len() as u32);
                for event in events {
                    put_u32(&mut out, *event);
                }
                put_u32(&mut out, elements.len() as u32);
                for element in elements {
                    put_u32(&mut out, element.hash);
                    put_u32(&mut out, element.build_frame);
                    put_u32(&mut out, element.layer);
                    for m in element.matrix {
                        put_f32(&mut out, m);
                    }
                    put_f32(&mut out, element.z);
                }
            }
        }

        let hashes: Vec<(u32, &str)> = self.hashes.iter().map(|(h, n)| (*h, n.as_str())).collect();
        put_hashes(&mut out, &hashes);
        out
    }
}
