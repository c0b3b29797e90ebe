//! Font metrics: builtin Helvetica tables and parsed TrueType faces.
//!
//! All widths are in 1/1000 em at the nominal size, indexed for ASCII
//! 0x20..=0x7E. Non-ASCII codepoints fall back to an average width — the
//! static tables catch real layout violations while tolerating ±1–2% on
//! exotic glyphs, and the sanitizer has already stripped pictographs.

use std::sync::Arc;

use anyhow::Context;

use crate::style::FontSlot;

/// Default width for characters outside the mapped range (1/1000 em).
const DEFAULT_WIDTH: u16 = 556;

/// Character widths for Helvetica (ASCII 32..=126) in 1/1000 em.
/// Source: Adobe Helvetica AFM data.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    //  sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
      278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    //   0    1    2    3    4    5    6    7    8    9
      556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    //   :    ;    <    =    >    ?    @
      278, 278, 584, 584, 584, 556, 1015,
    //   A    B    C    D    E    F    G    H    I    J    K    L    M
      667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    //   N    O    P    Q    R    S    T    U    V    W    X    Y    Z
      722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    //   [    \    ]    ^    _    `
      278, 278, 278, 469, 556, 333,
    //   a    b    c    d    e    f    g    h    i    j    k    l    m
      556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    //   n    o    p    q    r    s    t    u    v    w    x    y    z
      556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    //   {    |    }    ~
      334, 260, 334, 584,
];

/// Character widths for Helvetica-Bold (ASCII 32..=126) in 1/1000 em.
/// Source: Adobe Helvetica-Bold AFM data.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    //  sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
      278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    //   0    1    2    3    4    5    6    7    8    9
      556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    //   :    ;    <    =    >    ?    @
      333, 333, 584, 584, 584, 611, 975,
    //   A    B    C    D    E    F    G    H    I    J    K    L    M
      722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    //   N    O    P    Q    R    S    T    U    V    W    X    Y    Z
      722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    //   [    \    ]    ^    _    `
      333, 278, 333, 584, 556, 333,
    //   a    b    c    d    e    f    g    h    i    j    k    l    m
      556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    //   n    o    p    q    r    s    t    u    v    w    x    y    z
      611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    //   {    |    }    ~
      389, 280, 389, 584,
];

/// The two builtin faces guaranteed available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFace {
    Helvetica,
    HelveticaBold,
}

impl BuiltinFace {
    /// PDF BaseFont name.
    pub fn base_name(&self) -> &'static str {
        match self {
            BuiltinFace::Helvetica => "Helvetica",
            BuiltinFace::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            BuiltinFace::Helvetica => &HELVETICA_WIDTHS,
            BuiltinFace::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

/// A custom TrueType face: raw bytes plus the metrics derived at load time.
///
/// All values are extracted once when the face is parsed so the loaded font
/// carries no lifetime into the ttf-parser internals.
#[derive(Debug)]
pub struct LoadedFont {
    /// Raw TTF program, embedded into the PDF as FontFile2.
    pub data: Vec<u8>,
    pub postscript_name: String,
    /// ASCII 32..=126 advance widths scaled to 1/1000 em.
    widths: [u16; 95],
    fallback_width: u16,
    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    pub italic_angle: f32,
    pub is_monospaced: bool,
}

impl LoadedFont {
    /// Parse a TrueType face from raw bytes, deriving the width table.
    pub fn parse(data: Vec<u8>) -> anyhow::Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0).context("TTF face failed to parse")?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            anyhow::bail!("TTF face reports zero units per em");
        }
        let scale = |v: u16| -> u16 { ((v as u32 * 1000) / units_per_em as u32) as u16 };

        let mut widths = [0u16; 95];
        for (i, slot) in widths.iter_mut().enumerate() {
            let ch = (i as u8 + 32) as char;
            let advance = face
                .glyph_index(ch)
                .and_then(|gid| face.glyph_hor_advance(gid));
            *slot = match advance {
                Some(w) => scale(w),
                None => 0,
            };
        }
        // A face without a space glyph cannot lay out text.
        if widths[0] == 0 {
            anyhow::bail!("TTF face has no space glyph");
        }
        let fallback_width = widths[('n' as usize) - 32].max(1);

        let postscript_name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME && n.is_unicode())
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| "CustomFont".to_string());

        let bbox = face.global_bounding_box();
        let ascent = face.ascender();
        let descent = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let bbox_arr = [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max];
        let italic_angle = face.italic_angle();
        let is_monospaced = face.is_monospaced();
        drop(face);

        Ok(LoadedFont {
            data,
            postscript_name,
            widths,
            fallback_width,
            units_per_em,
            ascent,
            descent,
            cap_height,
            bbox: bbox_arr,
            italic_angle,
            is_monospaced,
        })
    }

    /// Scale a raw font-unit value to 1/1000 text-space units.
    pub fn to_milli(&self, value: i16) -> i32 {
        (value as i32 * 1000) / self.units_per_em as i32
    }

    /// Width of one character in 1/1000 em; missing glyphs fall back to the
    /// lowercase-n width.
    pub fn char_width_milli(&self, ch: char) -> u16 {
        let code = ch as u32;
        if (32..=126).contains(&code) {
            let w = self.widths[(code - 32) as usize];
            if w > 0 {
                return w;
            }
        }
        self.fallback_width
    }
}

/// Unified face reference used by all measurement and rendering.
#[derive(Debug, Clone)]
pub enum FontFace {
    Builtin(BuiltinFace),
    Custom(Arc<LoadedFont>),
}

impl FontFace {
    /// Width of one character in 1/1000 em.
    pub fn char_width_milli(&self, ch: char) -> u16 {
        match self {
            FontFace::Builtin(face) => {
                let code = ch as u32;
                if (32..=126).contains(&code) {
                    face.widths()[(code - 32) as usize]
                } else {
                    DEFAULT_WIDTH
                }
            }
            FontFace::Custom(font) => font.char_width_milli(ch),
        }
    }

    /// Measured width of a string in points at the given size.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let total: u32 = text.chars().map(|ch| self.char_width_milli(ch) as u32).sum();
        total as f32 * size / 1000.0
    }
}

/// The pair of faces every render uses. Regular and bold resolve together:
/// either both are custom or both are builtin, so mixed-family output never
/// occurs.
#[derive(Debug, Clone)]
pub struct ResolvedFonts {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl ResolvedFonts {
    /// The guaranteed fallback pair.
    pub fn builtin() -> Self {
        ResolvedFonts {
            regular: FontFace::Builtin(BuiltinFace::Helvetica),
            bold: FontFace::Builtin(BuiltinFace::HelveticaBold),
        }
    }

    pub fn face(&self, slot: FontSlot) -> &FontFace {
        match slot {
            FontSlot::Regular => &self.regular,
            FontSlot::Bold => &self.bold,
        }
    }

    /// True when the custom candidates resolved (i.e. not the fallback).
    pub fn is_custom(&self) -> bool {
        matches!(self.regular, FontFace::Custom(_))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_width_helvetica() {
        let face = FontFace::Builtin(BuiltinFace::Helvetica);
        assert_eq!(face.char_width_milli(' '), 278);
    }

    #[test]
    fn test_measure_known_word() {
        // "Rust" = R(722) + u(556) + s(500) + t(278) = 2056 milli-em.
        let face = FontFace::Builtin(BuiltinFace::Helvetica);
        let width = face.text_width("Rust", 10.0);
        assert!(
            (width - 20.56).abs() < 1e-3,
            "Rust at 10pt should be ~20.56pt, got {width}"
        );
    }

    #[test]
    fn test_bold_wider_than_regular() {
        let regular = FontFace::Builtin(BuiltinFace::Helvetica);
        let bold = FontFace::Builtin(BuiltinFace::HelveticaBold);
        let text = "Engineering";
        assert!(bold.text_width(text, 10.0) > regular.text_width(text, 10.0));
    }

    #[test]
    fn test_non_ascii_uses_fallback_width() {
        let face = FontFace::Builtin(BuiltinFace::Helvetica);
        assert_eq!(face.char_width_milli('é'), DEFAULT_WIDTH);
    }

    #[test]
    fn test_empty_string_zero_width() {
        let face = FontFace::Builtin(BuiltinFace::Helvetica);
        assert_eq!(face.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = LoadedFont::parse(vec![0u8; 64]);
        assert!(err.is_err(), "garbage bytes must not parse as a face");
    }

    #[test]
    fn test_resolved_builtin_pair() {
        let fonts = ResolvedFonts::builtin();
        assert!(!fonts.is_custom());
        assert!(matches!(
            fonts.face(FontSlot::Bold),
            FontFace::Builtin(BuiltinFace::HelveticaBold)
        ));
    }
}
