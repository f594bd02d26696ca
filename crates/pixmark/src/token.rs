//! Per-pixel colour token resolution.

use crate::config::{EncoderConfig, TransparencyPolicy};
use crate::markup::{push_hex_byte, push_hex_nibble, TRANSPARENT_TAG};
use crate::pixel::Rgba;

/// A `<color=...>` opening tag and the colour a renderer shows for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorTag {
    pub text: String,
    /// What the renderer draws. Shorthand digits expand as `d * 17`.
    pub rendered: Rgba,
}

/// Resolved encoding of one pixel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Color(ColorTag),
    /// Untagged whitespace.
    Blank,
}

impl Token {
    /// Colour this token puts on screen. Blanks show nothing.
    #[inline]
    pub fn rendered(&self) -> Rgba {
        match self {
            Token::Color(tag) => tag.rendered,
            Token::Blank => Rgba::TRANSPARENT,
        }
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        matches!(self, Token::Blank)
    }
}

/// Resolve the token for one pixel.
///
/// Without an alpha channel the stored alpha is ignored and the pixel is opaque.
pub fn resolve(pixel: Rgba, has_alpha: bool, config: &EncoderConfig) -> Token {
    let a = if has_alpha { pixel.a } else { 255 };

    if has_alpha && a < config.alpha_threshold {
        return match config.transparency {
            TransparencyPolicy::SpaceReplace => Token::Blank,
            TransparencyPolicy::KeepTransparent => Token::Color(ColorTag {
                text: TRANSPARENT_TAG.to_string(),
                rendered: Rgba::TRANSPARENT,
            }),
            TransparencyPolicy::CustomColor => {
                let c = config.custom_color;
                color_tag(Rgba::opaque(c.r, c.g, c.b), false, config.minimal_color)
            }
        };
    }

    // a == 0 is only reachable with a zero threshold; it keeps its alpha so
    // the pixel stays invisible.
    let with_alpha = match a {
        0 => true,
        255 => false,
        _ => config.keep_above_threshold_alpha,
    };
    color_tag(Rgba::new(pixel.r, pixel.g, pixel.b, a), with_alpha, config.minimal_color)
}

fn color_tag(color: Rgba, with_alpha: bool, minimal: bool) -> Token {
    let mut text = String::with_capacity(17);
    text.push_str("<color=#");

    let mut channels = vec![color.r, color.g, color.b];
    if with_alpha {
        channels.push(color.a);
    }

    let mut shown = Vec::with_capacity(4);
    for &v in &channels {
        if minimal {
            push_hex_nibble(&mut text, v);
            shown.push((v >> 4) * 17);
        } else {
            push_hex_byte(&mut text, v);
            shown.push(v);
        }
    }
    text.push('>');

    let alpha = if with_alpha { shown[3] } else { 255 };
    Token::Color(ColorTag {
        text,
        rendered: Rgba::new(shown[0], shown[1], shown[2], alpha),
    })
}
