//! Pixel buffers handed to the encoder.

use crate::{PixmarkError, Result};

/// An 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Sum of absolute channel differences. Alpha only counts when `with_alpha`.
    #[inline]
    pub fn distance(&self, other: &Rgba, with_alpha: bool) -> u16 {
        let rgb = self.r.abs_diff(other.r) as u16
            + self.g.abs_diff(other.g) as u16
            + self.b.abs_diff(other.b) as u16;
        if with_alpha {
            rgb + self.a.abs_diff(other.a) as u16
        } else {
            rgb
        }
    }
}

/// Immutable row-major pixel grid.
///
/// `has_alpha` records whether the source could carry transparency at all. When
/// it is false every pixel is treated as opaque, whatever its stored alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    has_alpha: bool,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, has_alpha: bool, pixels: Vec<Rgba>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PixmarkError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(PixmarkError::InvalidDimensions { width, height })?;
        if pixels.len() != expected {
            return Err(PixmarkError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            has_alpha,
            pixels,
        })
    }

    /// Build from raw RGBA data (4 bytes per pixel: R, G, B, A).
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> Result<Self> {
        Self::from_bytes(rgba, width, height, 4)
    }

    /// Build from raw RGB data (3 bytes per pixel). The buffer has no alpha.
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize) -> Result<Self> {
        Self::from_bytes(rgb, width, height, 3)
    }

    fn from_bytes(data: &[u8], width: usize, height: usize, channels: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PixmarkError::InvalidDimensions { width, height });
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(PixmarkError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(PixmarkError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let pixels = if channels == 4 {
            data.chunks_exact(4)
                .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
                .collect()
        } else {
            data.chunks_exact(3)
                .map(|c| Rgba::opaque(c[0], c[1], c[2]))
                .collect()
        };

        Ok(Self {
            width,
            height,
            has_alpha: channels == 4,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// # Panics
    ///
    /// Panics if `x` or `y` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    #[inline]
    pub fn row(&self, y: usize) -> &[Rgba] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Flatten into RGBA bytes, e.g. for `image::RgbaImage::from_raw`.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        out
    }

    /// Nearest-neighbour zoom by an integer factor.
    pub fn scaled(&self, factor: usize) -> Result<PixelBuffer> {
        if factor == 0 {
            return Err(PixmarkError::InvalidConfig("zoom factor must be at least 1".into()));
        }
        if factor == 1 {
            return Ok(self.clone());
        }
        let (width, height) = self
            .width
            .checked_mul(factor)
            .zip(self.height.checked_mul(factor))
            .filter(|(w, h)| w.checked_mul(*h).is_some())
            .ok_or_else(|| {
                PixmarkError::InvalidConfig(format!(
                    "zoom factor {factor} is too large for {}x{}",
                    self.width, self.height
                ))
            })?;

        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..self.height {
            let mut line = Vec::with_capacity(width);
            for &p in self.row(y) {
                line.extend(std::iter::repeat_n(p, factor));
            }
            for _ in 0..factor {
                pixels.extend_from_slice(&line);
            }
        }

        PixelBuffer::new(width, height, self.has_alpha, pixels)
    }
}
