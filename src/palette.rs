extern crate alloc;
use alloc::vec::Vec;

use rgb::RGB8;

use crate::vbox::{Bounds, VBox};

/// A finished color box: its region, population and representative color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBox {
    bounds: Bounds,
    population: u64,
    volume: u32,
    color: RGB8,
}

impl ColorBox {
    fn from_vbox(vbox: &VBox<'_>) -> Self {
        Self {
            bounds: vbox.bounds(),
            population: vbox.count(),
            volume: vbox.volume(),
            color: vbox.average(),
        }
    }

    /// Region of quantized color space covered by this box.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Number of sampled pixels inside the box.
    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn volume(&self) -> u32 {
        self.volume
    }

    /// Population-weighted average color.
    pub fn color(&self) -> RGB8 {
        self.color
    }
}

/// The quantization result: boxes ordered most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    boxes: Vec<ColorBox>,
}

impl ColorMap {
    pub(crate) fn from_boxes(vboxes: &[VBox<'_>]) -> Self {
        Self {
            boxes: vboxes.iter().map(ColorBox::from_vbox).collect(),
        }
    }

    pub fn boxes(&self) -> &[ColorBox] {
        &self.boxes
    }

    /// Box average colors in map order.
    pub fn colors(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.boxes.iter().map(ColorBox::color)
    }

    /// Box average colors in map order, collected.
    pub fn palette(&self) -> Vec<RGB8> {
        self.colors().collect()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Palette color closest to `color` by Euclidean RGB distance.
    ///
    /// Scans in map order and keeps the first color at the smallest distance,
    /// so equidistant entries resolve to the more significant box. An empty
    /// map yields black.
    pub fn nearest(&self, color: RGB8) -> RGB8 {
        let mut best = RGB8 { r: 0, g: 0, b: 0 };
        let mut best_dist = u32::MAX;

        for candidate in self.colors() {
            // squared distance orders the same as the root
            let d = distance_sq(color, candidate);
            if d < best_dist {
                best_dist = d;
                best = candidate;
            }
        }

        best
    }
}

#[inline]
fn distance_sq(a: RGB8, b: RGB8) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}
