//! # pixmark
//!
//! Turns a pixel grid into rich-text markup segments that a `<color>`/`<size>`
//! aware text renderer draws back as the original picture.
//!
//! ## Features
//!
//! - **Token resolver**: per-pixel colour tags with alpha threshold, transparency
//!   policies and optional 4-bit-per-channel colours
//! - **Run merging**: identical (or, optionally, similar) neighbours share one tag
//! - **Segmenting**: output is cut by pixel count or by character length, never
//!   across image rows and never into empty segments
//! - **Preview raster**: the exact colours that were encoded, for side-by-side checks
//!
//! ## Quick Start
//!
//! ```ignore
//! use pixmark::{encode, EncoderConfig, PixelBuffer};
//!
//! // RGB image data (3 bytes per pixel)
//! let rgb = vec![255u8, 0, 0, 255, 0, 0]; // 2 red pixels
//! let buffer = PixelBuffer::from_rgb(&rgb, 2, 1)?;
//! let config = EncoderConfig { font_size: None, ..EncoderConfig::default() };
//! let result = encode(&buffer, &config)?;
//! assert_eq!(result.segments[0].text, "<color=#ff0000>██</color>");
//! ```

use thiserror::Error;

pub mod config;
pub mod encoder;
pub mod markup;
pub mod pixel;
pub mod preview;
pub mod run;
pub mod segment;
pub mod token;

pub use config::{EncoderConfig, HexColor, SegmentRule, TransparencyPolicy};
pub use encoder::{encode, encode_with_progress, EncodingResult};
pub use markup::SizeTag;
pub use pixel::{PixelBuffer, Rgba};
pub use preview::fit_zoom;
pub use segment::Segment;
pub use token::{resolve, ColorTag, Token};

/// Errors that can occur while preparing or running an encoding pass.
#[derive(Debug, Error)]
pub enum PixmarkError {
    /// Invalid image dimensions (width or height is zero)
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Buffer length doesn't match the dimensions (bytes for raw data,
    /// pixels for [`PixelBuffer::new`])
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Configuration rejected before the pass started
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Colour string that is not `#rgb` or `#rrggbb`
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// The image source could not produce a pixel buffer
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The pass did not account for every pixel exactly once
    #[error("internal consistency fault: encoded {actual} of {expected} pixels")]
    InternalConsistency { expected: usize, actual: usize },
}

/// Result type for pixmark operations.
pub type Result<T> = core::result::Result<T, PixmarkError>;

// Largest possible channel-difference sum (4 channels of 255).
pub(crate) const MAX_CHANNEL_DISTANCE: u16 = 4 * 255;
