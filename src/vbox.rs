use core::cell::OnceCell;

use rgb::RGB8;

use crate::histogram::{Histogram, MULTIPLIER};

/// A channel of the quantized color cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    R,
    G,
    B,
}

impl Axis {
    #[inline]
    fn index(self) -> usize {
        match self {
            Axis::R => 0,
            Axis::G => 1,
            Axis::B => 2,
        }
    }
}

/// Inclusive per-channel bounds of a box in quantized space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    ranges: [(u8, u8); 3],
}

impl Bounds {
    /// Build bounds from `(min, max)` pairs in R, G, B order.
    ///
    /// Panics if any `min > max`.
    pub fn new(r: (u8, u8), g: (u8, u8), b: (u8, u8)) -> Self {
        let ranges = [r, g, b];
        assert!(
            ranges.iter().all(|&(lo, hi)| lo <= hi),
            "inverted box bounds: {ranges:?}"
        );
        Self { ranges }
    }

    #[inline]
    pub fn range(&self, axis: Axis) -> (u8, u8) {
        self.ranges[axis.index()]
    }

    /// Same bounds with `axis` narrowed to `lo..=hi`.
    pub fn with_range(mut self, axis: Axis, lo: u8, hi: u8) -> Self {
        assert!(lo <= hi, "inverted range {lo}..={hi} on {axis:?}");
        self.ranges[axis.index()] = (lo, hi);
        self
    }

    pub fn volume(&self) -> u32 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| (hi - lo) as u32 + 1)
            .product()
    }

    /// Channel with the largest `max - min`; ties go to R, then G.
    pub fn widest_axis(&self) -> Axis {
        let width = |axis: Axis| {
            let (lo, hi) = self.range(axis);
            hi - lo
        };
        let (r, g, b) = (width(Axis::R), width(Axis::G), width(Axis::B));
        let widest = r.max(g).max(b);
        if widest == r {
            Axis::R
        } else if widest == g {
            Axis::G
        } else {
            Axis::B
        }
    }

    /// Geometric center of the box in full 8-bit units.
    fn midpoint(&self) -> RGB8 {
        let mid = |axis: Axis| {
            let (lo, hi) = self.range(axis);
            (MULTIPLIER * (lo as u32 + hi as u32 + 1) / 2) as u8
        };
        RGB8 {
            r: mid(Axis::R),
            g: mid(Axis::G),
            b: mid(Axis::B),
        }
    }
}

/// A box of quantized color space over a shared histogram.
///
/// Bounds are fixed at construction. Population and average color are
/// computed on first use and cached; derive a new box instead of mutating one.
#[derive(Debug)]
pub struct VBox<'h> {
    bounds: Bounds,
    histogram: &'h Histogram,
    count: OnceCell<u64>,
    average: OnceCell<RGB8>,
}

impl<'h> VBox<'h> {
    pub fn new(bounds: Bounds, histogram: &'h Histogram) -> Self {
        Self {
            bounds,
            histogram,
            count: OnceCell::new(),
            average: OnceCell::new(),
        }
    }

    /// The box spanning every populated bucket of `histogram`, or `None` if it is empty.
    pub fn enclosing(histogram: &'h Histogram) -> Option<Self> {
        let [r, g, b] = histogram.extent()?;
        Some(Self::new(Bounds::new(r, g, b), histogram))
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn histogram(&self) -> &'h Histogram {
        self.histogram
    }

    /// A box over the same histogram with `axis` narrowed to `lo..=hi`.
    pub fn narrowed(&self, axis: Axis, lo: u8, hi: u8) -> Self {
        Self::new(self.bounds.with_range(axis, lo, hi), self.histogram)
    }

    pub fn volume(&self) -> u32 {
        self.bounds.volume()
    }

    pub fn widest_axis(&self) -> Axis {
        self.bounds.widest_axis()
    }

    /// Number of pixels inside the box.
    pub fn count(&self) -> u64 {
        *self.count.get_or_init(|| {
            let mut npix = 0u64;
            self.for_each_bucket(|_, _, _, hval| npix += hval as u64);
            npix
        })
    }

    /// Population-weighted mean color in full 8-bit range.
    ///
    /// Each bucket contributes its midpoint; an empty box yields its
    /// geometric center.
    pub fn average(&self) -> RGB8 {
        *self.average.get_or_init(|| {
            let mut ntot = 0u64;
            let mut sums = [0u64; 3];
            let mult = MULTIPLIER as f64;
            self.for_each_bucket(|r, g, b, hval| {
                if hval == 0 {
                    return;
                }
                ntot += hval as u64;
                let h = hval as f64;
                for (sum, c) in sums.iter_mut().zip([r, g, b]) {
                    *sum += (h * (c as f64 + 0.5) * mult) as u64;
                }
            });

            if ntot > 0 {
                RGB8 {
                    r: (sums[0] / ntot) as u8,
                    g: (sums[1] / ntot) as u8,
                    b: (sums[2] / ntot) as u8,
                }
            } else {
                self.bounds.midpoint()
            }
        })
    }

    fn for_each_bucket(&self, mut f: impl FnMut(u8, u8, u8, u32)) {
        let (r_lo, r_hi) = self.bounds.range(Axis::R);
        let (g_lo, g_hi) = self.bounds.range(Axis::G);
        let (b_lo, b_hi) = self.bounds.range(Axis::B);
        for r in r_lo..=r_hi {
            for g in g_lo..=g_hi {
                for b in b_lo..=b_hi {
                    f(r, g, b, self.histogram.get(r, g, b));
                }
            }
        }
    }
}

/// Clones share the histogram but start with empty caches.
impl Clone for VBox<'_> {
    fn clone(&self) -> Self {
        Self::new(self.bounds, self.histogram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn hist(pixels: &[(u8, u8, u8)]) -> Histogram {
        let pixels: Vec<RGB8> = pixels
            .iter()
            .map(|&(r, g, b)| RGB8 { r, g, b })
            .collect();
        Histogram::from_pixels(&pixels)
    }

    #[test]
    fn volume_is_inclusive() {
        let b = Bounds::new((0, 0), (0, 0), (0, 0));
        assert_eq!(b.volume(), 1);
        let b = Bounds::new((0, 31), (0, 31), (0, 31));
        assert_eq!(b.volume(), 32 * 32 * 32);
        let b = Bounds::new((2, 4), (10, 11), (7, 7));
        assert_eq!(b.volume(), 6);
    }

    #[test]
    fn widest_axis_tie_break() {
        assert_eq!(Bounds::new((0, 3), (0, 3), (0, 3)).widest_axis(), Axis::R);
        assert_eq!(Bounds::new((0, 1), (0, 3), (0, 3)).widest_axis(), Axis::G);
        assert_eq!(Bounds::new((0, 1), (0, 2), (0, 3)).widest_axis(), Axis::B);
        assert_eq!(Bounds::new((5, 5), (9, 9), (1, 1)).widest_axis(), Axis::R);
    }

    #[test]
    #[should_panic]
    fn inverted_bounds_panic() {
        let _ = Bounds::new((3, 2), (0, 0), (0, 0));
    }

    #[test]
    fn count_sums_inside_only() {
        let h = hist(&[(0, 0, 0), (0, 0, 0), (255, 255, 255), (100, 0, 0)]);
        let all = VBox::enclosing(&h).unwrap();
        assert_eq!(all.count(), 4);

        let low = all.narrowed(Axis::R, 0, 12);
        assert_eq!(low.count(), 3);
        let high = all.narrowed(Axis::R, 13, 31);
        assert_eq!(high.count(), 1);
    }

    #[test]
    fn average_uses_bucket_midpoints() {
        let h = hist(&[(0, 0, 128); 7]);
        let vbox = VBox::enclosing(&h).unwrap();
        // bucket (0, 0, 16) reconstructs to 8 * (c + 0.5)
        assert_eq!(vbox.average(), RGB8 { r: 4, g: 4, b: 132 });
    }

    #[test]
    fn average_is_population_weighted() {
        let mut pixels = vec![(0u8, 0u8, 0u8); 3];
        pixels.push((64, 0, 0));
        let h = hist(&pixels);
        let vbox = VBox::enclosing(&h).unwrap();
        // (3 * 4 + 1 * 68) / 4 = 20
        assert_eq!(vbox.average().r, 20);
    }

    #[test]
    fn empty_box_falls_back_to_midpoint() {
        let h = hist(&[(0, 0, 0)]);
        let vbox = VBox::new(Bounds::new((10, 11), (0, 3), (31, 31)), &h);
        assert_eq!(vbox.count(), 0);
        assert_eq!(vbox.average(), RGB8 { r: 88, g: 16, b: 252 });
    }

    #[test]
    fn clone_shares_histogram() {
        let h = hist(&[(1, 2, 3)]);
        let vbox = VBox::enclosing(&h).unwrap();
        let copy = vbox.clone();
        assert!(core::ptr::eq(vbox.histogram(), copy.histogram()));
        assert_eq!(copy.bounds(), vbox.bounds());
        assert_eq!(copy.count(), 1);
    }
}
