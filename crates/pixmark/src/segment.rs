//! Cutting one image row into size-bounded markup segments.

use std::fmt;

use crate::config::{EncoderConfig, SegmentRule};
use crate::markup::SizeTag;
use crate::pixel::Rgba;
use crate::preview::PreviewWriter;
use crate::run::RunAccumulator;
use crate::token::Token;

/// A finished piece of markup. Never spans two rows and never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Markup, including the `<size>` wrapper when one is configured.
    pub text: String,
    /// 1-based image row.
    pub row: usize,
    /// 1-based position within the row.
    pub ordinal: usize,
    pub pixel_count: usize,
    /// Set on the segment that holds the row's last pixel.
    pub is_row_end: bool,
    /// 0-based column of the first pixel.
    pub first_column: usize,
}

impl Segment {
    /// Length as counted by text fields.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Short human-readable position, e.g. `row 3 segment 2`.
    pub fn label(&self) -> String {
        format!("row {} segment {}", self.row, self.ordinal)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Applies the configured [`SegmentRule`] to rows of resolved pixels.
#[derive(Debug)]
pub struct SegmentBuilder<'a> {
    config: &'a EncoderConfig,
    size_tag: SizeTag,
    has_alpha: bool,
}

/// Segment under construction.
struct Draft {
    runs: RunAccumulator,
    first_column: usize,
    pixel_count: usize,
    chars: usize,
}

impl<'a> SegmentBuilder<'a> {
    pub fn new(config: &'a EncoderConfig, has_alpha: bool) -> Self {
        Self {
            config,
            size_tag: SizeTag::new(config.font_size),
            has_alpha,
        }
    }

    /// Split one row into segments covering every pixel in order.
    ///
    /// `row` is 0-based; `pixels` and `tokens` must be the same length. Each
    /// pixel's encoded colour is written to `preview` as it is committed.
    pub fn build_row(
        &self,
        row: usize,
        pixels: &[Rgba],
        tokens: &[Token],
        preview: &mut PreviewWriter,
    ) -> Vec<Segment> {
        debug_assert_eq!(pixels.len(), tokens.len());
        let width = pixels.len().min(tokens.len());
        let mut segments = Vec::new();
        let mut x = 0;

        while x < width {
            let mut draft = self.start(x);
            while x < width {
                let (pixel, token) = (pixels[x], &tokens[x]);
                let cost = draft.runs.cost_of(pixel, token);
                if !self.admits(&draft, cost) {
                    break;
                }
                if self.config.segment_rule == SegmentRule::ByCharLength
                    && draft.pixel_count == 0
                    && draft.chars + cost > self.config.char_limit
                {
                    log::debug!(
                        "row {}: pixel {} needs {} chars, over the {} char limit",
                        row + 1,
                        x,
                        draft.chars + cost,
                        self.config.char_limit
                    );
                }
                let shown = draft.runs.push(pixel, token);
                draft.pixel_count += 1;
                draft.chars += cost;
                preview.record(x, row, shown);
                x += 1;
            }
            segments.push(self.close(draft, row, segments.len() + 1, x == width));
        }

        segments
    }

    fn start(&self, first_column: usize) -> Draft {
        Draft {
            runs: RunAccumulator::new(self.config, self.has_alpha),
            first_column,
            pixel_count: 0,
            chars: self.size_tag.overhead(),
        }
    }

    /// Whether the next pixel, costing `cost` chars, still fits the draft.
    /// An empty draft always takes one pixel so every segment makes progress.
    fn admits(&self, draft: &Draft, cost: usize) -> bool {
        if draft.pixel_count == 0 {
            return true;
        }
        match self.config.segment_rule {
            SegmentRule::ByPixelCount => draft.pixel_count < self.config.pixel_limit,
            SegmentRule::ByCharLength => draft.chars + cost <= self.config.char_limit,
        }
    }

    fn close(&self, draft: Draft, row: usize, ordinal: usize, is_row_end: bool) -> Segment {
        let mut text = String::with_capacity(draft.chars * 3);
        text.push_str(self.size_tag.open());
        draft.runs.render_into(&mut text);
        text.push_str(self.size_tag.close());
        debug_assert_eq!(text.chars().count(), draft.chars);

        Segment {
            text,
            row: row + 1,
            ordinal,
            pixel_count: draft.pixel_count,
            is_row_end,
            first_column: draft.first_column,
        }
    }
}
