//! Layer reconciliation
//!
//! Animation frames store flat element lists with no link from one frame to
//! the next. The editor wants the opposite: a fixed set of timelines, each
//! following one visual layer through time. [`LayerSet`] rebuilds that set
//! by aligning every frame against the layers found so far.
//!
//! The first frame seeds one layer per element. Each later frame is walked
//! in order with a search cursor: an element matching a layer (by layer
//! hash) at or after the cursor joins it and moves the cursor past it; an
//! element with no match opens a new layer that sorts directly after the
//! last match. Layers already established never change relative order.

use serde::Serialize;

use crate::anim::{AnimFrame, Element};

/// Priority of the first layer opened before any match in a frame
const INSERT_PRIORITY_START: f64 = -100.0;

/// Gap between consecutive inserted layers
const INSERT_PRIORITY_STEP: f64 = 0.01;

/// One element placed on a layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerEntry {
    /// Index of the frame the element came from
    pub frame: usize,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Layer identity shared by all entries
    pub hash: u32,
    /// Stacking key of the element that opened the layer
    pub z: f32,
    #[serde(skip)]
    priority: f64,
    pub entries: Vec<LayerEntry>,
}

impl Layer {
    fn open(frame: usize, element: Element, priority: f64) -> Self {
        Self {
            hash: element.layer_hash,
            z: element.z,
            priority,
            entries: vec![LayerEntry { frame, element }],
        }
    }
}

/// Ordered layers of one clip
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerSet {
    layers: Vec<Layer>,
    #[serde(skip)]
    seeded: bool,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the given frames in order, numbering them from 0
    pub fn from_frames<'a>(frames: impl IntoIterator<Item = &'a AnimFrame>) -> Self {
        let mut set = Self::new();
        for (index, frame) in frames.into_iter().enumerate() {
            set.push_frame(index, &frame.elements);
        }
        set
    }

    /// Merge one more frame's elements into the layer list
    pub fn push_frame(&mut self, frame: usize, elements: &[Element]) {
        if !self.seeded {
            self.seeded = true;
            self.layers = elements
                .iter()
                .enumerate()
                .map(|(i, element)| Layer::open(frame, *element, i as f64))
                .collect();
            return;
        }

        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.priority = i as f64;
        }

        let mut insert_priority = INSERT_PRIORITY_START;
        let mut cursor = 0;

        for element in elements {
            let found = self.layers[cursor.min(self.layers.len())..]
                .iter()
                .position(|layer| layer.hash == element.layer_hash)
                .map(|offset| cursor + offset);

            match found {
                Some(index) => {
                    let layer = &mut self.layers[index];
                    layer.entries.push(LayerEntry {
                        frame,
                        element: *element,
                    });
                    cursor = index + 1;
                    insert_priority = layer.priority + INSERT_PRIORITY_STEP;
                }
                None => {
                    // Opening at the front shifts everything the cursor
                    // points at by one
                    self.layers
                        .insert(0, Layer::open(frame, *element, insert_priority));
                    insert_priority += INSERT_PRIORITY_STEP;
                    cursor += 1;
                }
            }
        }

        self.layers
            .sort_by(|a, b| a.priority.total_cmp(&b.priority));
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// First layer opened with stacking key `z`
    pub fn index_of_z(&self, z: f32) -> Option<usize> {
        self.layers.iter().position(|layer| layer.z == z)
    }

    /// First layer with identity `hash`
    pub fn index_of_hash(&self, hash: u32) -> Option<usize> {
        self.layers.iter().position(|layer| layer.hash == hash)
    }

    /// Layer index for an element: by stacking key, then by identity
    pub fn resolve(&self, element: &Element) -> Option<usize> {
        self.index_of_z(element.z)
            .or_else(|| self.index_of_hash(element.layer_hash))
    }
}
