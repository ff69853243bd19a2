use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantizeError {
    #[error("max_colors must be between 2 and 256, got {0}")]
    InvalidMaxColors(u32),

    #[error("no pixels left to quantize")]
    EmptyInput,

    #[error("quality (sampling stride) must be at least 1, got {0}")]
    InvalidQuality(u32),

    #[error("RGBA buffer length {0} is not a multiple of 4")]
    InvalidBufferLength(usize),
}
