extern crate alloc;
use alloc::vec::Vec;

use rgb::RGB8;

use crate::error::QuantizeError;

/// Pixels with alpha below this are treated as transparent and skipped.
pub const MIN_ALPHA: u8 = 125;

/// A pixel counts as white when every channel is above this value.
pub const WHITE_THRESHOLD: u8 = 250;

/// Sample pixels from an interleaved RGBA buffer.
///
/// Takes every `quality`-th pixel (1 = every pixel), dropping mostly-transparent
/// pixels and, when `ignore_white` is set, near-white ones. The result may be
/// empty; it is up to the caller to refuse quantizing nothing.
pub fn sample_pixels(
    rgba: &[u8],
    quality: u32,
    ignore_white: bool,
) -> Result<Vec<RGB8>, QuantizeError> {
    if quality == 0 {
        return Err(QuantizeError::InvalidQuality(quality));
    }
    if rgba.len() % 4 != 0 {
        return Err(QuantizeError::InvalidBufferLength(rgba.len()));
    }

    let stride = quality as usize;
    let pixel_count = rgba.len() / 4;
    let mut sampled = Vec::with_capacity(pixel_count / stride + 1);

    for px in rgba.chunks_exact(4).step_by(stride) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        if a < MIN_ALPHA {
            continue;
        }
        if ignore_white && is_white(r, g, b) {
            continue;
        }
        sampled.push(RGB8 { r, g, b });
    }

    Ok(sampled)
}

#[inline]
fn is_white(r: u8, g: u8, b: u8) -> bool {
    r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD
}
