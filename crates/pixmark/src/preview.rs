//! Verification raster holding what the encoder actually emitted per pixel.
//!
//! Merged pixels show their run's colour, quantized colours show quantized,
//! blanks are transparent. Compared side by side with the source this makes
//! every lossy decision visible, so nothing here may smooth the result.

use crate::pixel::{PixelBuffer, Rgba};
use crate::Result;

// Longest preview edge, in screen pixels, that the default zoom aims for.
const FIT_EDGE: usize = 500;
const MAX_ZOOM: usize = 20;

/// Collects encoded colours while the encoder walks the image.
#[derive(Debug)]
pub struct PreviewWriter {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    written: Vec<bool>,
    written_count: usize,
}

impl PreviewWriter {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
            written: vec![false; width * height],
            written_count: 0,
        }
    }

    /// Store the encoded colour of pixel (`x`, `y`).
    #[inline]
    pub fn record(&mut self, x: usize, y: usize, color: Rgba) {
        let idx = y * self.width + x;
        self.pixels[idx] = color;
        if !self.written[idx] {
            self.written[idx] = true;
            self.written_count += 1;
        }
    }

    /// Number of distinct pixels recorded so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.written_count
    }

    pub fn finish(self) -> Result<PixelBuffer> {
        PixelBuffer::new(self.width, self.height, true, self.pixels)
    }
}

/// Default integer zoom for showing a `width` x `height` preview.
pub fn fit_zoom(width: usize, height: usize) -> usize {
    if width == 0 || height == 0 {
        return 1;
    }
    (FIT_EDGE / width).min(FIT_EDGE / height).clamp(1, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_distinct_pixels() {
        let mut writer = PreviewWriter::new(2, 2);
        writer.record(0, 0, Rgba::opaque(1, 2, 3));
        writer.record(0, 0, Rgba::opaque(4, 5, 6));
        writer.record(1, 1, Rgba::TRANSPARENT);
        assert_eq!(writer.written(), 2);

        let raster = writer.finish().unwrap();
        assert!(raster.has_alpha());
        assert_eq!(raster.pixel(0, 0), Rgba::opaque(4, 5, 6));
    }

    #[test]
    fn test_fit_zoom() {
        assert_eq!(fit_zoom(40, 30), 12);
        assert_eq!(fit_zoom(10, 10), 20);
        assert_eq!(fit_zoom(1000, 10), 1);
        assert_eq!(fit_zoom(0, 10), 1);
    }
}
