//! Grouping of neighbouring pixels into runs that share one colour tag.

use crate::config::EncoderConfig;
use crate::markup;
use crate::pixel::Rgba;
use crate::token::Token;

/// Contiguous pixels drawn with one token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub token: Token,
    pub pixel_count: usize,
    /// The pixel that opened the run. Similar pixels are compared against it
    /// and never replace it.
    pub representative: Rgba,
}

/// Open runs of one segment, in order.
///
/// The accumulator only answers "does this pixel join the open run" and
/// "what would it cost"; the segment builder decides where segments end and
/// starts a fresh accumulator for every segment.
#[derive(Debug)]
pub struct RunAccumulator {
    runs: Vec<Run>,
    has_alpha: bool,
    similarity: Option<u16>,
    space_count: usize,
}

impl RunAccumulator {
    pub fn new(config: &EncoderConfig, has_alpha: bool) -> Self {
        Self {
            runs: Vec::new(),
            has_alpha,
            similarity: config.merge_similar.then_some(config.similarity_threshold),
            space_count: config.space_count,
        }
    }

    /// The run the next pixel would join, if any.
    #[inline]
    pub fn open_run(&self) -> Option<&Run> {
        self.runs.last()
    }

    /// Whether `pixel`, resolved to `token`, would join the open run.
    pub fn would_extend(&self, pixel: Rgba, token: &Token) -> bool {
        let Some(run) = self.runs.last() else {
            return false;
        };
        if run.token == *token {
            return true;
        }
        if run.token.is_blank() || token.is_blank() {
            return false;
        }
        match self.similarity {
            Some(threshold) => pixel.distance(&run.representative, self.has_alpha) <= threshold,
            None => false,
        }
    }

    /// Markup characters that adding this pixel would cost.
    pub fn cost_of(&self, pixel: Rgba, token: &Token) -> usize {
        match self.runs.last() {
            Some(run) if self.would_extend(pixel, token) => {
                markup::extend_cost(&run.token, self.space_count)
            }
            _ => markup::open_cost(token, self.space_count),
        }
    }

    /// Add a pixel and return the colour it is actually drawn with.
    pub fn push(&mut self, pixel: Rgba, token: &Token) -> Rgba {
        if self.would_extend(pixel, token) {
            if let Some(run) = self.runs.last_mut() {
                run.pixel_count += 1;
            }
        } else {
            self.runs.push(Run {
                token: token.clone(),
                pixel_count: 1,
                representative: pixel,
            });
        }
        self.runs
            .last()
            .map_or_else(|| token.rendered(), |run| run.token.rendered())
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn pixel_count(&self) -> usize {
        self.runs.iter().map(|r| r.pixel_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Render all runs, back to back.
    pub fn render_into(&self, out: &mut String) {
        for run in &self.runs {
            markup::push_run(out, &run.token, run.pixel_count, self.space_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::resolve;

    fn config(merge_similar: bool, similarity_threshold: u16) -> EncoderConfig {
        EncoderConfig {
            merge_similar,
            similarity_threshold,
            ..EncoderConfig::default()
        }
    }

    fn feed(acc: &mut RunAccumulator, pixels: &[Rgba], config: &EncoderConfig, has_alpha: bool) {
        for &p in pixels {
            let token = resolve(p, has_alpha, config);
            acc.push(p, &token);
        }
    }

    #[test]
    fn test_identical_tokens_merge() {
        let config = config(false, 0);
        let mut acc = RunAccumulator::new(&config, false);
        let red = Rgba::opaque(255, 0, 0);
        let blue = Rgba::opaque(0, 0, 255);
        feed(&mut acc, &[red, red, blue, red], &config, false);

        let counts: Vec<usize> = acc.runs().iter().map(|r| r.pixel_count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(acc.pixel_count(), 4);
    }

    #[test]
    fn test_similar_merge_keeps_first_pixel() {
        let config = config(true, 6);
        let mut acc = RunAccumulator::new(&config, false);
        let first = Rgba::opaque(100, 100, 100);
        // Each step is within 6 of its neighbour but the third drifts to 8 from the first.
        let pixels = [first, Rgba::opaque(102, 102, 100), Rgba::opaque(104, 104, 100)];
        feed(&mut acc, &pixels, &config, false);

        let runs = acc.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].pixel_count, 2);
        assert_eq!(runs[0].representative, first);
        assert_eq!(runs[1].representative, pixels[2]);
    }

    #[test]
    fn test_similarity_counts_alpha_when_present() {
        let config = EncoderConfig {
            keep_above_threshold_alpha: true,
            ..config(true, 5)
        };
        let acc = {
            let mut acc = RunAccumulator::new(&config, true);
            let p = Rgba::new(50, 50, 50, 200);
            acc.push(p, &resolve(p, true, &config));
            acc
        };
        let next = Rgba::new(52, 50, 50, 196);
        assert!(!acc.would_extend(next, &resolve(next, true, &config)));

        let closer = Rgba::new(52, 50, 50, 199);
        assert!(acc.would_extend(closer, &resolve(closer, true, &config)));
    }

    #[test]
    fn test_blank_never_merges_with_color() {
        let config = EncoderConfig {
            transparency: crate::TransparencyPolicy::SpaceReplace,
            ..config(true, 1020)
        };
        let mut acc = RunAccumulator::new(&config, true);
        let clear = Rgba::new(0, 0, 0, 0);
        let dark = Rgba::new(0, 0, 0, 255);
        feed(&mut acc, &[clear, clear, dark, clear], &config, true);

        let blanks: Vec<bool> = acc.runs().iter().map(|r| r.token.is_blank()).collect();
        assert_eq!(blanks, vec![true, false, true]);
    }

    #[test]
    fn test_cost_of() {
        let config = config(false, 0);
        let mut acc = RunAccumulator::new(&config, false);
        let red = Rgba::opaque(255, 0, 0);
        let token = resolve(red, false, &config);

        assert_eq!(acc.cost_of(red, &token), "<color=#ff0000>".len() + 1 + "</color>".len());
        acc.push(red, &token);
        assert_eq!(acc.cost_of(red, &token), 1);

        let mut out = String::new();
        acc.render_into(&mut out);
        assert_eq!(out, "<color=#ff0000>█</color>");
    }
}
