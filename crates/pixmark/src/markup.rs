//! The markup dialect understood by the target renderer.
//!
//! ```text
//! <size=N>                         optional, wraps a whole segment
//!   <color=#RRGGBB>███</color>     one run, glyph repeated per pixel
//!   <color=#RGBA>█</color>
//!   ␠␠                             blank run, no tag
//! </size>
//! ```
//!
//! All lengths are counted in `char`s, which is what chat boxes and text
//! fields limit.

use crate::token::Token;

/// Glyph repeated once per coloured pixel.
pub const FILLER_GLYPH: char = '█';

/// Glyph repeated `space_count` times per blank pixel.
pub const BLANK_GLYPH: char = ' ';

pub const COLOR_CLOSE: &str = "</color>";

/// Tag for pixels kept fully transparent.
pub const TRANSPARENT_TAG: &str = "<color=#0000>";

const SIZE_CLOSE: &str = "</size>";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Optional `<size=N>` wrapper around a segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizeTag {
    open: String,
}

impl SizeTag {
    pub fn new(font_size: Option<u32>) -> Self {
        Self {
            open: font_size.map(|n| format!("<size={n}>")).unwrap_or_default(),
        }
    }

    #[inline]
    pub fn open(&self) -> &str {
        &self.open
    }

    #[inline]
    pub fn close(&self) -> &str {
        if self.open.is_empty() {
            ""
        } else {
            SIZE_CLOSE
        }
    }

    /// Characters the wrapper adds to every segment.
    #[inline]
    pub fn overhead(&self) -> usize {
        self.open.len() + self.close().len()
    }
}

/// Characters needed to start a new run for `token`, including its first pixel.
#[inline]
pub fn open_cost(token: &Token, space_count: usize) -> usize {
    match token {
        Token::Blank => space_count,
        Token::Color(tag) => tag.text.len() + 1 + COLOR_CLOSE.len(),
    }
}

/// Characters needed to add one more pixel to an open run of `token`.
#[inline]
pub fn extend_cost(token: &Token, space_count: usize) -> usize {
    match token {
        Token::Blank => space_count,
        Token::Color(_) => 1,
    }
}

/// Append one run of `count` pixels.
pub fn push_run(out: &mut String, token: &Token, count: usize, space_count: usize) {
    match token {
        Token::Blank => out.extend(std::iter::repeat_n(BLANK_GLYPH, count * space_count)),
        Token::Color(tag) => {
            out.push_str(&tag.text);
            out.extend(std::iter::repeat_n(FILLER_GLYPH, count));
            out.push_str(COLOR_CLOSE);
        }
    }
}

/// Two lowercase hex digits.
#[inline]
pub(crate) fn push_hex_byte(out: &mut String, v: u8) {
    out.push(HEX_DIGITS[(v >> 4) as usize] as char);
    out.push(HEX_DIGITS[(v & 0x0f) as usize] as char);
}

/// One hex digit for the high nibble.
#[inline]
pub(crate) fn push_hex_nibble(out: &mut String, v: u8) {
    out.push(HEX_DIGITS[(v >> 4) as usize] as char);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Rgba;
    use crate::token::ColorTag;

    #[test]
    fn test_size_tag() {
        let tag = SizeTag::new(Some(5));
        assert_eq!(tag.open(), "<size=5>");
        assert_eq!(tag.close(), "</size>");
        assert_eq!(tag.overhead(), 15);

        let none = SizeTag::new(None);
        assert_eq!(none.open(), "");
        assert_eq!(none.close(), "");
        assert_eq!(none.overhead(), 0);
    }

    #[test]
    fn test_costs_match_rendered_length() {
        let token = Token::Color(ColorTag {
            text: "<color=#ff0000>".into(),
            rendered: Rgba::opaque(255, 0, 0),
        });
        let mut out = String::new();
        push_run(&mut out, &token, 3, 1);
        assert_eq!(out, "<color=#ff0000>███</color>");
        assert_eq!(out.chars().count(), open_cost(&token, 1) + 2 * extend_cost(&token, 1));

        let mut blank = String::new();
        push_run(&mut blank, &Token::Blank, 2, 3);
        assert_eq!(blank, "      ");
        assert_eq!(open_cost(&Token::Blank, 3) + extend_cost(&Token::Blank, 3), 6);
    }

    #[test]
    fn test_hex() {
        let mut out = String::new();
        push_hex_byte(&mut out, 0x0a);
        push_hex_nibble(&mut out, 0xf3);
        assert_eq!(out, "0af");
    }
}
