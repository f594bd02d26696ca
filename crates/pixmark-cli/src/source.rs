//! Loading and resizing the source image.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use pixmark::{PixelBuffer, PixmarkError};

/// Width used when neither dimension is given.
const DEFAULT_WIDTH: u32 = 40;

/// Requested output size. Missing sides are derived from the source aspect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_aspect: bool,
}

impl TargetSize {
    /// Final dimensions for a source of `orig_w` x `orig_h`.
    pub fn resolve(&self, orig_w: u32, orig_h: u32) -> (u32, u32) {
        let scale = |value: u32, num: u32, den: u32| -> u32 {
            ((value as u64 * num as u64) / den.max(1) as u64).clamp(1, u32::MAX as u64) as u32
        };
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w.max(1), h.max(1)),
            (Some(w), None) if self.keep_aspect => (w.max(1), scale(w, orig_h, orig_w)),
            (Some(w), None) => (w.max(1), orig_h.max(1)),
            (None, Some(h)) if self.keep_aspect => (scale(h, orig_w, orig_h), h.max(1)),
            (None, Some(h)) => (orig_w.max(1), h.max(1)),
            (None, None) => {
                let w = orig_w.clamp(1, DEFAULT_WIDTH);
                (w, scale(w, orig_h, orig_w))
            }
        }
    }
}

/// A decoded, resized image ready for encoding.
pub struct LoadedImage {
    pub buffer: PixelBuffer,
    pub original_size: (u32, u32),
    /// The resized image, kept for side-by-side previews.
    pub resized: DynamicImage,
}

/// Open `path`, resize it to `target` and convert it into a pixel buffer.
///
/// The buffer has an alpha channel only when the decoded image has one.
pub fn load(path: &Path, target: TargetSize) -> Result<LoadedImage, PixmarkError> {
    let img = image::open(path).map_err(|e| {
        PixmarkError::SourceUnavailable(format!("failed to open '{}': {}", path.display(), e))
    })?;

    let original_size = (img.width(), img.height());
    let (width, height) = target.resolve(original_size.0, original_size.1);
    let has_alpha = img.color().has_alpha();
    log::debug!(
        "{}: {}x{} {:?} -> {}x{}",
        path.display(),
        original_size.0,
        original_size.1,
        img.color(),
        width,
        height
    );

    let resized = if (width, height) == original_size {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let buffer = if has_alpha {
        let rgba = resized.to_rgba8();
        PixelBuffer::from_rgba(rgba.as_raw(), width as usize, height as usize)?
    } else {
        let rgb = resized.to_rgb8();
        PixelBuffer::from_rgb(rgb.as_raw(), width as usize, height as usize)?
    };

    Ok(LoadedImage {
        buffer,
        original_size,
        resized,
    })
}
