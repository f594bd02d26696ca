//! Row-by-row encoding pass.
//!
//! Rows are processed strictly in order: run and segment state never crosses a
//! row boundary, and progress is cumulative. A pass either accounts for every
//! pixel exactly once or fails with no segments at all.

use crate::config::EncoderConfig;
use crate::pixel::PixelBuffer;
use crate::preview::PreviewWriter;
use crate::segment::{Segment, SegmentBuilder};
use crate::token::{resolve, Token};
use crate::{PixmarkError, Result};

/// Output of a successful pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingResult {
    /// Segments in row-major, left-to-right order.
    pub segments: Vec<Segment>,
    /// Index into `segments` of the last segment of each row.
    pub row_end_markers: Vec<usize>,
    /// Always `width * height`.
    pub total_pixels_encoded: usize,
    /// The colours that were actually encoded, one per source pixel.
    pub preview: PixelBuffer,
    pub width: usize,
    pub height: usize,
}

impl EncodingResult {
    #[inline]
    pub fn is_row_end(&self, index: usize) -> bool {
        self.row_end_markers.binary_search(&index).is_ok()
    }

    /// Segments of a 1-based row, in ordinal order.
    pub fn segments_in_row(&self, row: usize) -> &[Segment] {
        let start = self.segments.partition_point(|s| s.row < row);
        let end = self.segments.partition_point(|s| s.row <= row);
        &self.segments[start..end]
    }

    /// The full markup stream.
    pub fn concatenated(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn page_count(&self, per_page: usize) -> usize {
        self.segments.len().div_ceil(per_page.max(1))
    }

    /// Segments on a 0-based page; empty past the last page.
    pub fn page(&self, index: usize, per_page: usize) -> &[Segment] {
        let per_page = per_page.max(1);
        let start = index.saturating_mul(per_page).min(self.segments.len());
        let end = start.saturating_add(per_page).min(self.segments.len());
        &self.segments[start..end]
    }
}

/// Encode a pixel buffer into markup segments.
pub fn encode(buffer: &PixelBuffer, config: &EncoderConfig) -> Result<EncodingResult> {
    encode_with_progress(buffer, config, |_| {})
}

/// Encode a pixel buffer, reporting progress (0-100) after every row.
///
/// Reported values never decrease, repeats are skipped, and a successful pass
/// always ends with 100.
///
/// # Example
/// ```ignore
/// use pixmark::{encode_with_progress, EncoderConfig, PixelBuffer};
///
/// let buffer = PixelBuffer::from_rgb(&[0u8; 3 * 4], 2, 2)?;
/// let result = encode_with_progress(&buffer, &EncoderConfig::default(), |p| {
///     eprintln!("{p}%");
/// })?;
/// ```
pub fn encode_with_progress<F>(
    buffer: &PixelBuffer,
    config: &EncoderConfig,
    mut on_progress: F,
) -> Result<EncodingResult>
where
    F: FnMut(u8),
{
    let config = config.clone().validated()?;
    let (width, height) = (buffer.width(), buffer.height());
    let total = buffer.pixel_count();
    if total == 0 {
        return Err(PixmarkError::InvalidDimensions { width, height });
    }

    log::debug!(
        "encoding {}x{} (alpha: {}) with {:?}",
        width,
        height,
        buffer.has_alpha(),
        config
    );

    let builder = SegmentBuilder::new(&config, buffer.has_alpha());
    let mut preview = PreviewWriter::new(width, height);
    let mut segments: Vec<Segment> = Vec::new();
    let mut row_end_markers = Vec::with_capacity(height);
    let mut processed = 0usize;
    let mut reported: Option<u8> = None;

    for y in 0..height {
        let pixels = buffer.row(y);
        let tokens: Vec<Token> = pixels
            .iter()
            .map(|&p| resolve(p, buffer.has_alpha(), &config))
            .collect();

        let row_segments = builder.build_row(y, pixels, &tokens, &mut preview);
        let row_pixels: usize = row_segments.iter().map(|s| s.pixel_count).sum();
        log::trace!(
            "row {}: {} segment(s), {} pixel(s)",
            y + 1,
            row_segments.len(),
            row_pixels
        );

        processed += row_pixels;
        segments.extend(row_segments);
        if let Some(last) = segments.len().checked_sub(1) {
            row_end_markers.push(last);
        }

        let percent = ((processed.min(total) * 100) / total) as u8;
        if reported.is_none_or(|r| percent > r) {
            on_progress(percent);
            reported = Some(percent);
        }
    }

    if processed != total {
        log::error!("encoded {processed} of {total} pixels");
        return Err(PixmarkError::InternalConsistency {
            expected: total,
            actual: processed,
        });
    }
    if preview.written() != total {
        log::error!("preview covers {} of {total} pixels", preview.written());
        return Err(PixmarkError::InternalConsistency {
            expected: total,
            actual: preview.written(),
        });
    }
    if reported != Some(100) {
        on_progress(100);
    }

    log::info!(
        "encoded {}x{} into {} segment(s)",
        width,
        height,
        segments.len()
    );

    Ok(EncodingResult {
        segments,
        row_end_markers,
        total_pixels_encoded: processed,
        preview: preview.finish()?,
        width,
        height,
    })
}
