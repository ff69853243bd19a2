#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Dominant color and palette extraction with modified median cut
//! quantization (MMCQ).
//!
//! Pixels are counted into a 5-bit-per-channel histogram, the occupied part
//! of the color cube is cut into boxes, first by population and then by
//! population × volume, and each box's average color becomes a palette entry.
//!
//! ```
//! use mmcq::QuantizeConfig;
//!
//! let rgba = [200u8, 30, 40, 255].repeat(64);
//! let palette = mmcq::palette_from_rgba(&rgba, &QuantizeConfig::new()).unwrap();
//! assert_eq!(palette.len(), 1);
//! ```

extern crate alloc;

pub mod error;
pub mod histogram;
pub mod median_cut;
pub mod palette;
pub mod sample;
pub mod vbox;

pub use error::QuantizeError;
pub use histogram::Histogram;
pub use palette::{ColorBox, ColorMap};
pub use sample::sample_pixels;

use alloc::vec::Vec;

/// An 8-bit RGB color.
pub type Color = rgb::RGB8;

/// Palette size used when only the dominant color is wanted.
pub const DOMINANT_PALETTE_SIZE: u32 = 5;

/// Configuration for palette extraction from raw RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizeConfig {
    /// Requested number of palette colors (2..=256). The palette may come
    /// back shorter.
    pub max_colors: u32,
    /// Sampling stride: 1 looks at every pixel, 10 at every tenth.
    /// Higher is faster but more likely to miss colors.
    pub quality: u32,
    /// Skip pixels whose channels are all above 250.
    pub ignore_white: bool,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            max_colors: 10,
            quality: 10,
            ignore_white: true,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_colors(mut self, n: u32) -> Self {
        self.max_colors = n;
        self
    }

    pub fn quality(mut self, q: u32) -> Self {
        self.quality = q;
        self
    }

    pub fn ignore_white(mut self, ignore: bool) -> Self {
        self.ignore_white = ignore;
        self
    }

    /// Check the parameters that do not depend on the pixels.
    pub fn validate(&self) -> Result<(), QuantizeError> {
        validate_max_colors(self.max_colors)?;
        if self.quality == 0 {
            return Err(QuantizeError::InvalidQuality(self.quality));
        }
        Ok(())
    }
}

/// Quantize sampled pixels into at most `max_colors` colors.
///
/// Fails without doing any work when `max_colors` is outside `2..=256` or
/// there are no pixels. The map may hold fewer colors than requested.
pub fn quantize(pixels: &[Color], max_colors: u32) -> Result<ColorMap, QuantizeError> {
    validate_max_colors(max_colors)?;
    if pixels.is_empty() {
        return Err(QuantizeError::EmptyInput);
    }

    let hist = Histogram::from_pixels(pixels);
    tracing::debug!(
        pixels = pixels.len(),
        buckets = hist.occupied(),
        max_colors,
        "quantizing"
    );

    let map = median_cut::median_cut(&hist, max_colors as usize);
    tracing::debug!(colors = map.len(), "palette ready");
    Ok(map)
}

/// Sample an interleaved RGBA buffer and quantize it.
pub fn color_map_from_rgba(
    rgba: &[u8],
    config: &QuantizeConfig,
) -> Result<ColorMap, QuantizeError> {
    config.validate()?;
    let pixels = sample_pixels(rgba, config.quality, config.ignore_white)?;
    tracing::trace!(
        sampled = pixels.len(),
        total = rgba.len() / 4,
        quality = config.quality,
        "sampled pixels"
    );
    quantize(&pixels, config.max_colors)
}

/// Palette of an interleaved RGBA buffer, most significant color first.
pub fn palette_from_rgba(
    rgba: &[u8],
    config: &QuantizeConfig,
) -> Result<Vec<Color>, QuantizeError> {
    color_map_from_rgba(rgba, config).map(|map| map.palette())
}

/// The color of the most significant box of an interleaved RGBA buffer.
///
/// Runs the palette with [`DOMINANT_PALETTE_SIZE`] colors, ignoring
/// `config.max_colors`.
pub fn dominant_color(rgba: &[u8], config: &QuantizeConfig) -> Result<Color, QuantizeError> {
    let config = config.clone().max_colors(DOMINANT_PALETTE_SIZE);
    let map = color_map_from_rgba(rgba, &config)?;
    map.boxes()
        .first()
        .map(ColorBox::color)
        .ok_or(QuantizeError::EmptyInput)
}

fn validate_max_colors(max_colors: u32) -> Result<(), QuantizeError> {
    if !(2..=256).contains(&max_colors) {
        return Err(QuantizeError::InvalidMaxColors(max_colors));
    }
    Ok(())
}
