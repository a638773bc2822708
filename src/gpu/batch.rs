//! CPU-side batching of draw calls into GPU instance data.
//!
//! Draw calls are appended to one of two instance arrays (circles, lines).
//! Runs of the same primitive are merged into a [`Batch`], and batches are
//! replayed in order so painter's order survives the split.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::surface::{Color, Fill, Rect, Stroke};

/// Per-instance data for one disc.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub glow: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub fn new(center: Vec2, radius: f32, fill: &Fill) -> Self {
        Self {
            center: center.to_array(),
            radius,
            glow: fill.glow,
            color: fill.color.to_array(),
        }
    }
}

/// Per-instance data for one thick line segment.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct LineInstance {
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub color: [f32; 4],
    pub width: f32,
    pub _pad: [f32; 3],
}

impl LineInstance {
    pub fn new(from: Vec2, to: Vec2, stroke: &Stroke) -> Self {
        Self {
            start: from.to_array(),
            end: to.to_array(),
            color: stroke.color.to_array(),
            width: stroke.width,
            _pad: [0.0; 3],
        }
    }

    /// A solid rectangle, drawn as a horizontal segment as thick as the rect is tall.
    pub fn rect(rect: Rect, color: Color) -> Self {
        let mid_y = rect.origin.y + rect.size.y * 0.5;
        Self {
            start: [rect.origin.x, mid_y],
            end: [rect.origin.x + rect.size.x, mid_y],
            color: color.to_array(),
            width: rect.size.y,
            _pad: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchKind {
    Circles,
    Lines,
}

/// A run of same-kind instances, as a range into that kind's array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Batch {
    pub kind: BatchKind,
    pub range: Range<u32>,
}

#[derive(Debug, Default)]
pub(crate) struct Batcher {
    pub circles: Vec<CircleInstance>,
    pub lines: Vec<LineInstance>,
    pub batches: Vec<Batch>,
}

impl Batcher {
    pub fn push_circle(&mut self, instance: CircleInstance) {
        let index = self.circles.len() as u32;
        self.circles.push(instance);
        self.extend(BatchKind::Circles, index);
    }

    pub fn push_line(&mut self, instance: LineInstance) {
        let index = self.lines.len() as u32;
        self.lines.push(instance);
        self.extend(BatchKind::Lines, index);
    }

    fn extend(&mut self, kind: BatchKind, index: u32) {
        match self.batches.last_mut() {
            Some(batch) if batch.kind == kind && batch.range.end == index => {
                batch.range.end += 1;
            }
            _ => self.batches.push(Batch {
                kind,
                range: index..index + 1,
            }),
        }
    }

    pub fn reset(&mut self) {
        self.circles.clear();
        self.lines.clear();
        self.batches.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
