//! One-shot text sanitization.
//!
//! Runs exactly once, in the model builder, so every downstream stage
//! (compressor, measurer, renderer) operates on clean text: NFC-normalized,
//! no control characters, no pictographs, bullet glyphs normalized to a
//! plain dash, whitespace collapsed.

use unicode_normalization::UnicodeNormalization;

/// Glyphs commonly used as list markers or dash variants. All normalize to
/// an ASCII dash before the pictograph strip so they survive it.
const DASH_GLYPHS: [char; 9] = ['\u{2022}', '\u{25E6}', '\u{2023}', '\u{25AA}', '\u{2219}',
    '\u{00B7}', '\u{2013}', '\u{2014}', '\u{2015}'];

/// Sanitize one text value.
pub fn sanitize_text(raw: &str) -> String {
    let normalized: String = raw
        .nfc()
        .map(|c| if DASH_GLYPHS.contains(&c) { '-' } else { c })
        .filter(|&c| !c.is_control() || c.is_whitespace())
        .filter(|&c| !is_pictograph(c))
        .collect();

    // Collapse all whitespace runs (including surviving newlines/tabs).
    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitize a bullet sentence: also strips an incoming list-marker prefix,
/// since the renderer draws its own dash.
pub fn sanitize_bullet(raw: &str) -> String {
    let clean = sanitize_text(raw);
    clean
        .trim_start_matches(['-', '*'])
        .trim_start()
        .to_string()
}

/// Emoji, symbol and pictograph ranges stripped by the sanitizer. Variation
/// selectors and the zero-width joiner go with them so emoji sequences leave
/// no residue.
fn is_pictograph(c: char) -> bool {
    matches!(u32::from(c),
        0x200D            // zero-width joiner
        | 0x20E3          // combining enclosing keycap
        | 0x2190..=0x21FF // arrows
        | 0x2300..=0x23FF // misc technical
        | 0x25A0..=0x25FF // geometric shapes
        | 0x2600..=0x27BF // misc symbols + dingbats
        | 0x2B00..=0x2BFF // misc symbols and arrows
        | 0xFE00..=0xFE0F // variation selectors
        | 0x1F000..=0x1FAFF // emoji planes
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
