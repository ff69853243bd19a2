extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use rgb::RGB8;

/// Significant bits kept per channel.
pub const SIGNAL_BITS: u32 = 5;
/// Low bits dropped from each 8-bit channel.
pub const RIGHT_SHIFT: u32 = 8 - SIGNAL_BITS;
/// Width of one quantized bucket in full 8-bit units.
pub const MULTIPLIER: u32 = 1 << RIGHT_SHIFT;
/// Number of quantized coordinates per axis.
pub const AXIS_LEN: usize = 1 << SIGNAL_BITS;
/// Number of buckets in the 3-D histogram.
pub const HISTOGRAM_SIZE: usize = 1 << (3 * SIGNAL_BITS);

/// Histogram index of a quantized (5-bit per channel) color.
#[inline]
pub fn color_index(r: u8, g: u8, b: u8) -> usize {
    ((r as usize) << (2 * SIGNAL_BITS)) + ((g as usize) << SIGNAL_BITS) + b as usize
}

/// Reduce an 8-bit channel to its quantized coordinate.
#[inline]
pub fn quantize_channel(v: u8) -> u8 {
    v >> RIGHT_SHIFT
}

/// Dense pixel-count table over the quantized RGB cube.
///
/// Built once per quantization and only read afterwards; every box derived
/// from it borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u32>,
    total: u64,
}

impl Histogram {
    /// Count sampled pixels into their quantized buckets.
    pub fn from_pixels(pixels: &[RGB8]) -> Self {
        let mut counts = vec![0u32; HISTOGRAM_SIZE];
        for p in pixels {
            let idx = color_index(
                quantize_channel(p.r),
                quantize_channel(p.g),
                quantize_channel(p.b),
            );
            counts[idx] += 1;
        }
        Self {
            counts,
            total: pixels.len() as u64,
        }
    }

    /// Population of the bucket at quantized coordinates `(r, g, b)`.
    #[inline]
    pub fn get(&self, r: u8, g: u8, b: u8) -> u32 {
        self.counts[color_index(r, g, b)]
    }

    /// Total number of pixels counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of non-empty buckets.
    pub fn occupied(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Per-channel `(min, max)` quantized coordinates over populated buckets,
    /// or `None` for an empty histogram.
    pub fn extent(&self) -> Option<[(u8, u8); 3]> {
        if self.is_empty() {
            return None;
        }
        let mut ext = [(u8::MAX, u8::MIN); 3];
        for (idx, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let coords = [
                (idx >> (2 * SIGNAL_BITS)) as u8,
                ((idx >> SIGNAL_BITS) & (AXIS_LEN - 1)) as u8,
                (idx & (AXIS_LEN - 1)) as u8,
            ];
            for (e, c) in ext.iter_mut().zip(coords) {
                e.0 = e.0.min(c);
                e.1 = e.1.max(c);
            }
        }
        Some(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_layout() {
        assert_eq!(color_index(0, 0, 0), 0);
        assert_eq!(color_index(0, 0, 1), 1);
        assert_eq!(color_index(0, 1, 0), 32);
        assert_eq!(color_index(1, 0, 0), 1024);
        assert_eq!(color_index(31, 31, 31), HISTOGRAM_SIZE - 1);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let hist = Histogram::from_pixels(&[]);
        assert!(hist.is_empty());
        assert_eq!(hist.occupied(), 0);
        assert_eq!(hist.extent(), None);
    }

    #[test]
    fn single_color_one_bucket() {
        let pixels = vec![RGB8 { r: 128, g: 128, b: 128 }; 100];
        let hist = Histogram::from_pixels(&pixels);
        assert_eq!(hist.occupied(), 1);
        assert_eq!(hist.get(16, 16, 16), 100);
        assert_eq!(hist.total(), 100);
    }

    #[test]
    fn nearby_colors_share_a_bucket() {
        let pixels = vec![RGB8 { r: 8, g: 8, b: 8 }, RGB8 { r: 15, g: 15, b: 15 }];
        let hist = Histogram::from_pixels(&pixels);
        assert_eq!(hist.occupied(), 1);
        assert_eq!(hist.get(1, 1, 1), 2);
    }

    #[test]
    fn extent_covers_populated_buckets() {
        let pixels = vec![
            RGB8 { r: 0, g: 200, b: 40 },
            RGB8 { r: 255, g: 100, b: 40 },
        ];
        let hist = Histogram::from_pixels(&pixels);
        assert_eq!(hist.extent(), Some([(0, 31), (12, 25), (5, 5)]));
    }
}
