//! Deterministic text-shrinking operations.
//!
//! Every function here is a pure rewrite: same input, same output, and
//! idempotent — applying one to its own output changes nothing, which is
//! what makes the whole compressor idempotent. None of them can turn a
//! non-empty string into an empty one.

/// Verbose connector phrases and their compact replacements. Replacements
/// never appear on the left-hand side, so a second pass is a no-op.
const PHRASES: &[(&str, &str)] = &[
    ("in order to", "to"),
    ("was responsible for", "owned"),
    ("responsible for", "owned"),
    ("worked closely with", "partnered with"),
    ("in collaboration with", "with"),
    ("as well as", "and"),
    ("a wide variety of", "many"),
    ("a variety of", "several"),
    ("a number of", "several"),
    ("with the goal of", "to"),
    ("with the aim of", "to"),
    ("on a regular basis", "regularly"),
    ("in a timely manner", "promptly"),
    ("utilized", "used"),
    ("utilizing", "using"),
    ("leveraged", "used"),
    ("leveraging", "using"),
    ("spearheaded", "led"),
    ("played a key role in", "drove"),
    ("was instrumental in", "drove"),
    ("resulting in", "yielding"),
    ("which resulted in", "yielding"),
    ("in addition to", "besides"),
    ("at this point in time", "now"),
    ("due to the fact that", "because"),
];

/// Filler adjectives and adverbs dropped wholesale.
const FILLERS: &[&str] = &[
    "successfully",
    "effectively",
    "efficiently",
    "seamlessly",
    "significantly",
    "substantially",
    "dramatically",
    "extremely",
    "highly",
    "very",
    "greatly",
    "various",
    "numerous",
    "robust",
    "innovative",
    "cutting-edge",
    "state-of-the-art",
    "world-class",
];

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep the first `max` words and close with terminal punctuation. Returns
/// the input unchanged when it is already within the budget. Never returns
/// an empty string for non-empty input and never clamps below one word.
pub fn clamp_words(text: &str, max: usize) -> String {
    let max = max.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max {
        return text.to_string();
    }
    let mut clamped = words[..max].join(" ");
    while clamped.ends_with([',', ';', ':']) {
        clamped.pop();
    }
    if !clamped.ends_with(['.', '!', '?']) {
        clamped.push('.');
    }
    clamped
}

/// Replace verbose phrases with their compact forms, case-insensitively at
/// word boundaries. A replacement at a sentence start keeps capitalization.
pub fn replace_phrases(text: &str) -> String {
    let mut out = text.to_string();
    for (verbose, compact) in PHRASES {
        out = replace_phrase(&out, verbose, compact);
    }
    collapse_spaces(&out)
}

fn replace_phrase(text: &str, verbose: &str, compact: &str) -> String {
    // Byte-offset case folding is only sound for ASCII; non-ASCII text keeps
    // its phrasing and is shrunk by the word clamp alone.
    if !text.is_ascii() {
        return text.to_string();
    }
    let lower = text.to_ascii_lowercase();
    let needle = verbose.to_ascii_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;

    // Bounded scan: each iteration advances the cursor, so this terminates.
    while let Some(pos) = lower[cursor..].find(&needle) {
        let start = cursor + pos;
        let end = start + needle.len();
        result.push_str(&text[cursor..start]);
        if on_word_boundary(text, start, end) {
            let matched_upper = text[start..]
                .chars()
                .next()
                .map(|c| c.is_uppercase())
                .unwrap_or(false);
            if matched_upper {
                result.push_str(&capitalize(compact));
            } else {
                result.push_str(compact);
            }
            cursor = end;
        } else {
            result.push_str(&text[start..start + 1]);
            cursor = start + 1;
        }
    }
    result.push_str(&text[cursor..]);
    result
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = start == 0
        || text[..start]
            .chars()
            .next_back()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true);
    let after_ok = end >= text.len()
        || text[end..]
            .chars()
            .next()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true);
    before_ok && after_ok
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Drop filler adjectives/adverbs as whole words. Returns the input when
/// stripping would empty it.
pub fn strip_fillers(text: &str) -> String {
    let kept: Vec<&str> = text
        .split_whitespace()
        .filter(|word| {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '-');
            !FILLERS.iter().any(|f| bare.eq_ignore_ascii_case(f))
        })
        .collect();
    if kept.is_empty() {
        return text.to_string();
    }
    kept.join(" ")
}

/// Remove parenthetical asides, including the space before them. Unbalanced
/// parens are left alone. Returns the input when stripping would empty it.
pub fn strip_parentheticals(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0_u32;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => result.push(ch),
            _ => {}
        }
    }
    if depth > 0 {
        // Unbalanced open paren: do not guess, keep the original.
        return text.to_string();
    }
    let cleaned = collapse_spaces(&result);
    let cleaned = cleaned.replace(" .", ".").replace(" ,", ",");
    if cleaned.trim().is_empty() {
        text.to_string()
    } else {
        cleaned.trim().to_string()
    }
}

/// Compact serial comma lists: `a, b, and c` becomes `a, b, c`.
pub fn compact_comma_lists(text: &str) -> String {
    text.replace(", and ", ", ").replace(", And ", ", ")
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
