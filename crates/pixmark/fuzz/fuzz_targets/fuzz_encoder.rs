#![no_main]

use libfuzzer_sys::fuzz_target;
use pixmark::{encode, EncoderConfig, PixelBuffer, SegmentRule, TransparencyPolicy};
use arbitrary::Arbitrary;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    pixels: Vec<u8>,
    policy: u8,
    alpha_threshold: u8,
    keep_alpha: bool,
    minimal_color: bool,
    merge_similar: bool,
    similarity_threshold: u16,
    by_chars: bool,
    limit: u16,
    font_size: Option<u8>,
    space_count: u8,
}

fuzz_target!(|input: FuzzInput| {
    // Skip invalid dimensions
    let width = (input.width as usize).max(1).min(64);
    let height = (input.height as usize).max(1).min(64);

    // Ensure we have enough pixels (RGBA = 4 bytes per pixel)
    let expected_size = width * height * 4;
    if input.pixels.len() < expected_size {
        return;
    }

    let buffer = match PixelBuffer::from_rgba(&input.pixels[..expected_size], width, height) {
        Ok(b) => b,
        Err(_) => return,
    };
    let config = EncoderConfig {
        transparency: match input.policy % 3 {
            0 => TransparencyPolicy::CustomColor,
            1 => TransparencyPolicy::KeepTransparent,
            _ => TransparencyPolicy::SpaceReplace,
        },
        alpha_threshold: input.alpha_threshold,
        keep_above_threshold_alpha: input.keep_alpha,
        minimal_color: input.minimal_color,
        merge_similar: input.merge_similar,
        similarity_threshold: input.similarity_threshold,
        segment_rule: if input.by_chars {
            SegmentRule::ByCharLength
        } else {
            SegmentRule::ByPixelCount
        },
        pixel_limit: input.limit as usize,
        char_limit: input.limit as usize,
        font_size: input.font_size.map(u32::from),
        space_count: input.space_count as usize,
        ..EncoderConfig::default()
    };

    // Invalid configs are rejected up front; valid ones must cover every pixel.
    if let Ok(result) = encode(&buffer, &config) {
        let total: usize = result.segments.iter().map(|s| s.pixel_count).sum();
        assert_eq!(total, width * height);
        assert!(result.segments.iter().all(|s| s.pixel_count > 0));
    }
});
