//! Encoder configuration.

use std::fmt;
use std::str::FromStr;

use crate::{PixmarkError, Result, MAX_CHANNEL_DISTANCE};

/// What happens to pixels whose alpha is below [`EncoderConfig::alpha_threshold`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransparencyPolicy {
    /// Paint them with [`EncoderConfig::custom_color`].
    CustomColor,
    /// Emit the fully transparent `<color=#0000>` tag.
    #[default]
    KeepTransparent,
    /// Emit untagged spaces.
    SpaceReplace,
}

/// How a row is cut into segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentRule {
    /// At most [`EncoderConfig::pixel_limit`] pixels per segment.
    #[default]
    ByPixelCount,
    /// At most [`EncoderConfig::char_limit`] characters of markup per segment.
    ByCharLength,
}

/// Opaque RGB colour given as `#rrggbb` (or the `#rgb` shorthand).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::new(0x88, 0x88, 0x88)
    }
}

impl FromStr for HexColor {
    type Err = PixmarkError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || PixmarkError::InvalidColor(s.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
                Ok(Self::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                    channel(4).map_err(|_| invalid())?,
                ))
            }
            3 => {
                let channel = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map(|d| d * 17);
                Ok(Self::new(
                    channel(0).map_err(|_| invalid())?,
                    channel(1).map_err(|_| invalid())?,
                    channel(2).map_err(|_| invalid())?,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Options for one encoding pass.
///
/// Build one with struct update syntax over [`Default`] and hand it to
/// [`encode`](crate::encode); the encoder validates it before touching any pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Policy for pixels below `alpha_threshold`.
    pub transparency: TransparencyPolicy,

    /// Fill colour used by [`TransparencyPolicy::CustomColor`].
    pub custom_color: HexColor,

    /// Alpha values strictly below this count as transparent.
    /// Only applies to buffers that have an alpha channel.
    pub alpha_threshold: u8,

    /// Keep partial alpha (`0 < a < 255`) of pixels at or above the threshold.
    /// When false such pixels are emitted as opaque.
    pub keep_above_threshold_alpha: bool,

    /// Emit `#rgb` / `#rgba` tags (4 bits per channel) instead of `#rrggbb`.
    pub minimal_color: bool,

    /// Merge neighbours whose colours are close to the run's first pixel.
    pub merge_similar: bool,

    /// Largest channel-difference sum still considered similar (0-1020).
    pub similarity_threshold: u16,

    pub segment_rule: SegmentRule,

    /// Pixels per segment under [`SegmentRule::ByPixelCount`].
    pub pixel_limit: usize,

    /// Characters per segment under [`SegmentRule::ByCharLength`].
    pub char_limit: usize,

    /// Wrap every segment in `<size=N>...</size>`.
    pub font_size: Option<u32>,

    /// Spaces emitted per blank pixel.
    pub space_count: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            transparency: TransparencyPolicy::KeepTransparent,
            custom_color: HexColor::default(),
            alpha_threshold: 128,
            keep_above_threshold_alpha: false,
            minimal_color: false,
            merge_similar: false,
            similarity_threshold: 16,
            segment_rule: SegmentRule::ByPixelCount,
            pixel_limit: 40,
            char_limit: 1000,
            font_size: Some(5),
            space_count: 1,
        }
    }
}

impl EncoderConfig {
    /// Range-check the configuration.
    ///
    /// Segment limits below 1 are raised to 1. Everything else that is out of
    /// range is rejected with [`PixmarkError::InvalidConfig`].
    pub fn validated(mut self) -> Result<Self> {
        if self.pixel_limit == 0 {
            log::warn!("pixel limit 0 raised to 1");
            self.pixel_limit = 1;
        }
        if self.char_limit == 0 {
            log::warn!("char limit 0 raised to 1");
            self.char_limit = 1;
        }
        if self.space_count == 0 {
            return Err(PixmarkError::InvalidConfig(
                "space count must be at least 1".into(),
            ));
        }
        if self.font_size == Some(0) {
            return Err(PixmarkError::InvalidConfig(
                "font size must be at least 1".into(),
            ));
        }
        if self.similarity_threshold > MAX_CHANNEL_DISTANCE {
            return Err(PixmarkError::InvalidConfig(format!(
                "similarity threshold {} exceeds {}",
                self.similarity_threshold, MAX_CHANNEL_DISTANCE
            )));
        }
        Ok(self)
    }
}
