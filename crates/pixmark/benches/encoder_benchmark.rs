use criterion::{criterion_group, criterion_main, Criterion};
use pixmark::{encode, EncoderConfig, PixelBuffer, SegmentRule, TransparencyPolicy};
use std::hint::black_box;

fn generate_gradient_rgba(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            let b = 128;
            pixels.push(r);
            pixels.push(g);
            pixels.push(b);
            // Left quarter is transparent
            pixels.push(if x < width / 4 { 0 } else { 255 });
        }
    }
    pixels
}

fn gradient(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_rgba(&generate_gradient_rgba(width, height), width, height)
        .expect("valid gradient buffer")
}

fn bench_encode_pixel_rule(c: &mut Criterion) {
    let buffer = gradient(40, 30);
    let config = EncoderConfig::default();

    c.bench_function("encode_gradient_40x30_pixels", |b| {
        b.iter(|| {
            let result = encode(black_box(&buffer), &config);
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_encode_char_rule(c: &mut Criterion) {
    let buffer = gradient(200, 200);
    let config = EncoderConfig {
        segment_rule: SegmentRule::ByCharLength,
        char_limit: 1000,
        ..EncoderConfig::default()
    };

    c.bench_function("encode_gradient_200x200_chars", |b| {
        b.iter(|| {
            let result = encode(black_box(&buffer), &config);
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_encode_merged(c: &mut Criterion) {
    let buffer = gradient(200, 200);
    let config = EncoderConfig {
        transparency: TransparencyPolicy::SpaceReplace,
        minimal_color: true,
        merge_similar: true,
        similarity_threshold: 24,
        segment_rule: SegmentRule::ByCharLength,
        ..EncoderConfig::default()
    };

    c.bench_function("encode_gradient_200x200_merged", |b| {
        b.iter(|| {
            let result = encode(black_box(&buffer), &config);
            assert!(result.is_ok());
            result
        })
    });
}

criterion_group!(
    benches,
    bench_encode_pixel_rule,
    bench_encode_char_rule,
    bench_encode_merged,
);
criterion_main!(benches);
