//! Writing segments and preview images.

use std::io::{self, Write};
use std::path::Path;

use image::{imageops, DynamicImage, RgbaImage};
use pixmark::{EncodingResult, PixelBuffer, Segment};

/// `# row 1 segment 2 [row end] pixels: 40 chars: 987`
pub fn header(segment: &Segment) -> String {
    format!(
        "# {}{} pixels: {} chars: {}",
        segment.label(),
        if segment.is_row_end { " [row end]" } else { "" },
        segment.pixel_count,
        segment.char_count()
    )
}

/// Write segments one per line, optionally preceded by a header line each.
pub fn write_segments<W: Write>(out: &mut W, segments: &[Segment], annotate: bool) -> io::Result<()> {
    for segment in segments {
        if annotate {
            writeln!(out, "{}", header(segment))?;
        }
        writeln!(out, "{}", segment.text)?;
    }
    Ok(())
}

/// One-line summary of a pass.
pub fn summary(result: &EncodingResult) -> String {
    format!(
        "{} segments, {} pixels (expected {})",
        result.segments.len(),
        result.total_pixels_encoded,
        result.width * result.height
    )
}

fn to_image(buffer: &PixelBuffer) -> Result<RgbaImage, Box<dyn std::error::Error>> {
    RgbaImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.to_rgba_bytes(),
    )
    .ok_or_else(|| "Failed to create image from preview data".into())
}

/// Save the preview at `zoom`, optionally next to the (equally zoomed) source.
pub fn save_preview(
    path: &Path,
    preview: &PixelBuffer,
    zoom: usize,
    source: Option<&DynamicImage>,
) -> Result<(), Box<dyn std::error::Error>> {
    let encoded = to_image(&preview.scaled(zoom)?)?;

    let img = match source {
        Some(src) => {
            let src = imageops::resize(
                &src.to_rgba8(),
                encoded.width(),
                encoded.height(),
                imageops::FilterType::Nearest,
            );
            let mut canvas = RgbaImage::new(src.width() + encoded.width(), encoded.height());
            imageops::replace(&mut canvas, &src, 0, 0);
            imageops::replace(&mut canvas, &encoded, src.width() as i64, 0);
            canvas
        }
        None => encoded,
    };

    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(is_row_end: bool) -> Segment {
        Segment {
            text: "<color=#ff0000>██</color>".into(),
            row: 3,
            ordinal: 2,
            pixel_count: 2,
            is_row_end,
            first_column: 4,
        }
    }

    #[test]
    fn test_header() {
        assert_eq!(
            header(&segment(true)),
            "# row 3 segment 2 [row end] pixels: 2 chars: 25"
        );
        assert_eq!(header(&segment(false)), "# row 3 segment 2 pixels: 2 chars: 25");
    }

    #[test]
    fn test_write_segments() {
        let mut out = Vec::new();
        write_segments(&mut out, &[segment(false)], true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# row 3 segment 2 pixels: 2 chars: 25\n<color=#ff0000>██</color>\n"
        );
    }
}
