extern crate alloc;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::histogram::{Histogram, AXIS_LEN};
use crate::palette::ColorMap;
use crate::vbox::VBox;

/// Share of the requested colors produced by the population-ordered phase.
const FRACTION_BY_POPULATION_NUM: usize = 3;
const FRACTION_BY_POPULATION_DEN: usize = 4;

/// Hard bound on split attempts per phase.
pub const MAX_ITERATIONS: usize = 1000;

/// Result of offering a box to the splitter.
#[derive(Debug)]
pub enum Split<'h> {
    /// The box holds a single pixel or a single bucket; it comes back unchanged.
    Unsplittable(VBox<'h>),
    /// Low and high halves along the widest axis.
    Halves(VBox<'h>, VBox<'h>),
}

/// Cut `vbox` at the population-weighted median of its widest axis.
///
/// Panics if the box is empty: the queue never hands those out.
pub fn split_box(vbox: VBox<'_>) -> Split<'_> {
    let count = vbox.count();
    assert!(count > 0, "median cut offered an empty box {:?}", vbox.bounds());

    let axis = vbox.widest_axis();
    let (axis_min, axis_max) = vbox.bounds().range(axis);
    if count == 1 || axis_min == axis_max {
        return Split::Unsplittable(vbox);
    }

    // -1 marks coordinates outside the box
    let mut partial_sum = [-1i64; AXIS_LEN];
    let mut look_ahead_sum = [-1i64; AXIS_LEN];
    let mut total = 0i64;
    for i in axis_min..=axis_max {
        total += vbox.narrowed(axis, i, i).count() as i64;
        partial_sum[i as usize] = total;
    }
    for (ahead, &partial) in look_ahead_sum.iter_mut().zip(partial_sum.iter()) {
        if partial != -1 {
            *ahead = total - partial;
        }
    }

    let Some(median) = (axis_min..=axis_max).find(|&i| partial_sum[i as usize] > total / 2)
    else {
        unreachable!("no weighted median in box {:?}", vbox.bounds());
    };

    let (lo, hi, i) = (axis_min as i32, axis_max as i32, median as i32);
    let left = i - lo;
    let right = hi - i;
    let mut d2 = if left <= right {
        (hi - 1).min(i + right / 2)
    } else {
        // float division truncated toward zero, as color-thief.js does
        (((i - 1) as f64 - left as f64 / 2.0) as i32).max(lo)
    };

    // no empty box on the low side
    while d2 < 0 || partial_sum[d2 as usize] <= 0 {
        d2 += 1;
    }
    // no empty box on the high side
    let mut count2 = look_ahead_sum[d2 as usize];
    while count2 == 0 && d2 > 0 && partial_sum[d2 as usize - 1] > 0 {
        d2 -= 1;
        count2 = look_ahead_sum[d2 as usize];
    }
    // whole population on the top slab: the empty part goes below it
    if d2 == hi {
        d2 = hi - 1;
    }

    assert!(
        d2 >= lo && d2 < hi,
        "cut point {d2} outside {lo}..{hi} on {axis:?}"
    );
    let cut = d2 as u8;

    tracing::trace!(
        ?axis,
        axis_min,
        axis_max,
        median,
        cut,
        population = count,
        "split box"
    );

    Split::Halves(
        vbox.narrowed(axis, axis_min, cut),
        vbox.narrowed(axis, cut + 1, axis_max),
    )
}

fn compare_by_count(a: &VBox<'_>, b: &VBox<'_>) -> Ordering {
    a.count().cmp(&b.count())
}

/// Population × volume, falling back to volume alone when populations match.
fn compare_by_product(a: &VBox<'_>, b: &VBox<'_>) -> Ordering {
    let (a_count, b_count) = (a.count(), b.count());
    let (a_volume, b_volume) = (a.volume() as u64, b.volume() as u64);
    if a_count == b_count {
        a_volume.cmp(&b_volume)
    } else {
        (a_count * a_volume).cmp(&(b_count * b_volume))
    }
}

/// How a splitting phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEnd {
    /// The phase produced its target number of colors.
    TargetReached,
    /// The largest box could not be split further.
    Exhausted,
    /// [`MAX_ITERATIONS`] ran out first.
    IterationLimit,
}

/// Repeatedly split the last box of `queue` (kept sorted ascending by
/// `compare`) until `target` colors are produced.
fn iterate(
    queue: &mut Vec<VBox<'_>>,
    compare: fn(&VBox<'_>, &VBox<'_>) -> Ordering,
    target: usize,
) -> PhaseEnd {
    let mut colors = 1usize;
    let mut iteration = 0usize;

    while iteration < MAX_ITERATIONS {
        let Some(vbox) = queue.pop() else {
            return PhaseEnd::Exhausted;
        };
        if vbox.count() == 0 {
            queue.push(vbox);
            queue.sort_by(compare);
            iteration += 1;
            continue;
        }

        match split_box(vbox) {
            Split::Halves(low, high) => {
                queue.push(low);
                queue.push(high);
                colors += 1;
            }
            Split::Unsplittable(vbox) => {
                // retrying would leave the queue exactly as it is now
                queue.push(vbox);
                queue.sort_by(compare);
                return PhaseEnd::Exhausted;
            }
        }
        queue.sort_by(compare);

        if colors >= target {
            return PhaseEnd::TargetReached;
        }
        iteration += 1;
    }

    tracing::warn!(
        goal = target,
        produced = colors,
        boxes = queue.len(),
        "median cut hit the iteration limit"
    );
    PhaseEnd::IterationLimit
}

/// Run both median cut phases over `histogram`.
///
/// `max_colors` must already be validated to `2..=256` and the histogram must
/// be non-empty; [`crate::quantize`] checks both.
pub fn median_cut(histogram: &Histogram, max_colors: usize) -> ColorMap {
    let Some(initial) = VBox::enclosing(histogram) else {
        return ColorMap::default();
    };
    let mut queue = Vec::with_capacity(max_colors + 1);
    queue.push(initial);

    // ceil(0.75 * max_colors)
    let goal = (FRACTION_BY_POPULATION_NUM * max_colors + FRACTION_BY_POPULATION_DEN - 1)
        / FRACTION_BY_POPULATION_DEN;
    let first = iterate(&mut queue, compare_by_count, goal);
    tracing::debug!(goal, boxes = queue.len(), end = ?first, "population phase done");

    queue.sort_by(compare_by_product);

    if queue.len() < max_colors {
        let goal = max_colors - queue.len();
        let second = iterate(&mut queue, compare_by_product, goal);
        tracing::debug!(goal, boxes = queue.len(), end = ?second, "volume phase done");
    }

    queue.reverse();
    ColorMap::from_boxes(&queue)
}
