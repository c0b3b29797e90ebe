//! The measurement core.
//!
//! Pure, stateless functions over the resolved fonts and style table. Both
//! paginators, the compressor, the assessor and the renderer all call the
//! same line-layout functions here, so "the preview said it fits" and "the
//! render actually fits" cannot drift: an item's drawn lines ARE its
//! measured lines.

use crate::fonts::ResolvedFonts;
use crate::geometry::{PageGeometry, BULLET_GAP, BULLET_INDENT, HEADING_GAP, ITEM_GAP};
use crate::model::{Bullet, Header, Item, Role, SectionKind};
use crate::style::{Style, StyleId, StyleTable, MIN_HEADLINE_SIZE};

/// Gap between a role/project title and right-aligned dates.
const DATE_GUTTER: f32 = 12.0;
/// Separator between packed contact items.
const CONTACT_SEP: &str = " | ";
/// Maximum contact items per header line.
const CONTACTS_PER_LINE: usize = 3;
/// Maximum contact lines in the header.
const CONTACT_LINES: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Environment
// ────────────────────────────────────────────────────────────────────────────

/// Everything measurement needs, borrowed for the duration of one render.
#[derive(Clone, Copy)]
pub struct LayoutEnv<'a> {
    pub geometry: &'a PageGeometry,
    pub styles: &'a StyleTable,
    pub fonts: &'a ResolvedFonts,
}

/// One styled run of text on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub style: StyleId,
    pub text: String,
    /// Size override for shrink-to-fit text; `None` uses the style size.
    pub size: Option<f32>,
}

impl Span {
    fn plain(style: StyleId, text: impl Into<String>) -> Self {
        Span {
            style,
            text: text.into(),
            size: None,
        }
    }
}

/// A fully laid-out line: what the renderer draws and what measurement sums.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidLine {
    /// Left-aligned spans, drawn in sequence.
    pub spans: Vec<Span>,
    /// Optional right-aligned span (dates).
    pub right: Option<Span>,
    pub indent: f32,
    /// Vertical advance consumed by this line.
    pub advance: f32,
    pub centered: bool,
    /// Draw a thin rule under this line (section headings).
    pub rule: bool,
}

impl LaidLine {
    fn text_line(style: StyleId, text: impl Into<String>, advance: f32) -> Self {
        LaidLine {
            spans: vec![Span::plain(style, text)],
            right: None,
            indent: 0.0,
            advance,
            centered: false,
            rule: false,
        }
    }
}

impl<'a> LayoutEnv<'a> {
    pub fn style(&self, id: StyleId) -> &'a Style {
        self.styles.get(id)
    }

    fn effective_size(&self, span: &Span) -> f32 {
        span.size.unwrap_or(self.style(span.style).size)
    }

    pub fn span_width(&self, span: &Span) -> f32 {
        let style = self.style(span.style);
        self.fonts
            .face(style.slot)
            .text_width(&span.text, self.effective_size(span))
    }

    /// Width of `text` in the given style.
    pub fn text_width(&self, style: &Style, text: &str) -> f32 {
        self.fonts.face(style.slot).text_width(text, style.size)
    }

    // ── Wrapping ────────────────────────────────────────────────────────────

    /// Greedy word wrap. A single word wider than `max_width` is hard-split
    /// into width-fitting chunks; nothing ever silently overflows the column.
    pub fn wrap_text(&self, style: &Style, text: &str, max_width: f32) -> Vec<String> {
        let face = self.fonts.face(style.slot);
        let space_w = face.text_width(" ", style.size);

        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_w = 0.0_f32;

        for word in text.split_whitespace() {
            let word_w = face.text_width(word, style.size);

            if word_w > max_width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_w = 0.0;
                }
                let chunks = self.hard_split(style, word, max_width);
                let (last, full) = chunks.split_last().expect("hard_split returns chunks");
                lines.extend(full.iter().cloned());
                current = last.clone();
                current_w = face.text_width(&current, style.size);
                continue;
            }

            if current.is_empty() {
                current = word.to_string();
                current_w = word_w;
            } else if current_w + space_w + word_w > max_width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
                current_w = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Split an over-wide word into chunks that each fit `max_width`.
    /// Every chunk keeps at least one character, so this always terminates.
    fn hard_split(&self, style: &Style, word: &str, max_width: f32) -> Vec<String> {
        let face = self.fonts.face(style.slot);
        let mut chunks: Vec<String> = Vec::new();
        let mut chunk = String::new();
        let mut chunk_w = 0.0_f32;
        for ch in word.chars() {
            let ch_w = face.char_width_milli(ch) as f32 * style.size / 1000.0;
            if !chunk.is_empty() && chunk_w + ch_w > max_width {
                chunks.push(std::mem::take(&mut chunk));
                chunk_w = 0.0;
            }
            chunk.push(ch);
            chunk_w += ch_w;
        }
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        if chunks.is_empty() {
            chunks.push(String::new());
        }
        chunks
    }

    /// Longest prefix of `text` that, with a trailing ellipsis, still fits
    /// `max_width`. Binary search over char-prefix lengths.
    pub fn truncate_to_width(&self, style: &Style, text: &str, max_width: f32) -> String {
        if self.text_width(style, text) <= max_width {
            return text.to_string();
        }
        const ELLIPSIS: &str = "...";
        let chars: Vec<char> = text.chars().collect();

        let fits = |n: usize| -> bool {
            let prefix: String = chars[..n].iter().collect();
            let candidate = format!("{}{}", prefix.trim_end(), ELLIPSIS);
            self.text_width(style, &candidate) <= max_width
        };

        let mut lo = 0_usize; // longest prefix known to fit
        let mut hi = chars.len();
        while lo < hi {
            let mid = (lo + hi + 1) / 2;
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        let prefix: String = chars[..lo].iter().collect();
        format!("{}{}", prefix.trim_end(), ELLIPSIS)
    }

    // ── Header layout ───────────────────────────────────────────────────────

    /// Lay out the header: name (never shortened), shrink-to-fit headline,
    /// contact items packed into at most 2 centered lines of 3.
    pub fn header_lines(&self, header: &Header) -> Vec<LaidLine> {
        let cw = self.geometry.content_width();
        let mut lines: Vec<LaidLine> = Vec::new();

        if !header.name.is_empty() {
            let style = self.style(StyleId::Name);
            lines.push(LaidLine {
                spans: vec![Span::plain(StyleId::Name, header.name.clone())],
                right: None,
                indent: 0.0,
                advance: style.leading,
                centered: true,
                rule: false,
            });
        }

        if let Some(headline) = &header.headline {
            let style = self.style(StyleId::Headline);
            let (text, size) = self.fit_headline(headline, cw);
            lines.push(LaidLine {
                spans: vec![Span {
                    style: StyleId::Headline,
                    text,
                    size: Some(size),
                }],
                right: None,
                indent: 0.0,
                advance: style.leading,
                centered: true,
                rule: false,
            });
        }

        let meta = self.style(StyleId::Meta);
        for line in self.pack_contact_lines(&header.contacts) {
            lines.push(LaidLine {
                spans: vec![Span::plain(StyleId::Meta, line)],
                right: None,
                indent: 0.0,
                advance: meta.leading,
                centered: true,
                rule: false,
            });
        }

        lines
    }

    /// Shrink the headline in 0.5pt steps down to the floor; if it still
    /// does not fit, truncate at the floor size. The name never gets this
    /// treatment.
    fn fit_headline(&self, text: &str, max_width: f32) -> (String, f32) {
        let style = self.style(StyleId::Headline);
        let face = self.fonts.face(style.slot);
        let mut size = style.size;
        while size > MIN_HEADLINE_SIZE && face.text_width(text, size) > max_width {
            size -= 0.5;
        }
        if face.text_width(text, size) <= max_width {
            return (text.to_string(), size);
        }
        let floor_style = Style {
            slot: style.slot,
            size,
            leading: style.leading,
        };
        (self.truncate_to_width(&floor_style, text, max_width), size)
    }

    /// Pack contacts into width-fitting lines of at most 3 items. URLs are
    /// never truncated — only reflowed. If width-driven packing would need
    /// more than 2 lines, fall back to a fixed 3+3 split.
    fn pack_contact_lines(&self, contacts: &[String]) -> Vec<String> {
        if contacts.is_empty() {
            return Vec::new();
        }
        let meta = self.style(StyleId::Meta);
        let cw = self.geometry.content_width();

        let mut lines: Vec<Vec<&str>> = vec![Vec::new()];
        for item in contacts {
            let line = lines.last_mut().expect("at least one line");
            let mut candidate: Vec<&str> = line.clone();
            candidate.push(item);
            let joined = candidate.join(CONTACT_SEP);
            if line.is_empty()
                || (candidate.len() <= CONTACTS_PER_LINE
                    && self.text_width(meta, &joined) <= cw)
            {
                line.push(item);
            } else {
                lines.push(vec![item.as_str()]);
            }
        }

        if lines.len() > CONTACT_LINES {
            // Priority order beats width: fixed 3+3 split, overflow tolerated.
            lines = contacts
                .chunks(CONTACTS_PER_LINE)
                .map(|chunk| chunk.iter().map(String::as_str).collect())
                .collect();
            lines.truncate(CONTACT_LINES);
        }

        lines
            .into_iter()
            .filter(|l| !l.is_empty())
            .map(|l| l.join(CONTACT_SEP))
            .collect()
    }

    pub fn measure_header(&self, header: &Header) -> f32 {
        self.header_lines(header).iter().map(|l| l.advance).sum()
    }

    // ── Section title ───────────────────────────────────────────────────────

    pub fn section_title_line(&self, kind: SectionKind) -> LaidLine {
        let heading = self.style(StyleId::Heading);
        LaidLine {
            spans: vec![Span::plain(StyleId::Heading, kind.title())],
            right: None,
            indent: 0.0,
            advance: heading.leading + HEADING_GAP,
            centered: false,
            rule: true,
        }
    }

    pub fn title_height(&self) -> f32 {
        self.style(StyleId::Heading).leading + HEADING_GAP
    }

    // ── Items ───────────────────────────────────────────────────────────────

    /// Lay out one item as drawable lines. Exhaustive over the item union.
    pub fn item_lines(&self, item: &Item) -> Vec<LaidLine> {
        let cw = self.geometry.content_width();
        match item {
            Item::Paragraph { text } => {
                let body = self.style(StyleId::Body);
                self.wrap_text(body, text, cw)
                    .into_iter()
                    .map(|l| LaidLine::text_line(StyleId::Body, l, body.leading))
                    .collect()
            }

            Item::SkillLine { categories } => {
                let body = self.style(StyleId::Body);
                let title = self.style(StyleId::RoleTitle);
                categories
                    .iter()
                    .map(|cat| {
                        let prefix = Span::plain(StyleId::RoleTitle, format!("{}: ", cat.name));
                        let prefix_w = self
                            .fonts
                            .face(title.slot)
                            .text_width(&prefix.text, title.size);
                        let list = cat.skills.join(", ");
                        let rest =
                            self.truncate_to_width(body, &list, (cw - prefix_w).max(20.0));
                        LaidLine {
                            spans: vec![prefix, Span::plain(StyleId::Body, rest)],
                            right: None,
                            indent: 0.0,
                            advance: body.leading,
                            centered: false,
                            rule: false,
                        }
                    })
                    .collect()
            }

            Item::Role(role) => {
                let mut lines = self.role_header_lines(role);
                for bullet in &role.bullets {
                    lines.extend(self.bullet_lines(bullet));
                }
                lines
            }

            Item::Project(project) => {
                let title = self.style(StyleId::ProjectTitle);
                let mut lines = vec![LaidLine::text_line(
                    StyleId::ProjectTitle,
                    project.title.clone(),
                    title.leading,
                )];
                for bullet in &project.bullets {
                    lines.extend(self.bullet_lines(bullet));
                }
                lines
            }

            Item::Education(entry) => {
                let title = self.style(StyleId::RoleTitle);
                let meta = self.style(StyleId::Meta);
                let mut lines = vec![LaidLine::text_line(
                    StyleId::RoleTitle,
                    entry.line1.clone(),
                    title.leading,
                )];
                if let Some(line2) = &entry.line2 {
                    lines.push(LaidLine::text_line(StyleId::Meta, line2.clone(), meta.leading));
                }
                lines
            }

            Item::FlatBullets { bullets } => bullets
                .iter()
                .flat_map(|b| self.bullet_lines(b))
                .collect(),
        }
    }

    /// Role title line ("Role, Company" with right-aligned dates when they
    /// fit) plus an optional meta line for location / displaced dates.
    fn role_header_lines(&self, role: &Role) -> Vec<LaidLine> {
        let cw = self.geometry.content_width();
        let title_style = self.style(StyleId::RoleTitle);
        let meta_style = self.style(StyleId::Meta);

        let title_text = match (role.role.is_empty(), role.company.is_empty()) {
            (false, false) => format!("{}, {}", role.role, role.company),
            (false, true) => role.role.clone(),
            (true, false) => role.company.clone(),
            (true, true) => String::new(),
        };

        let title_w = self.text_width(title_style, &title_text);
        let dates_w = self.text_width(meta_style, &role.dates);
        let dates_inline =
            !role.dates.is_empty() && title_w + DATE_GUTTER + dates_w <= cw;

        let mut lines = vec![LaidLine {
            spans: vec![Span::plain(StyleId::RoleTitle, title_text)],
            right: if dates_inline {
                Some(Span::plain(StyleId::Meta, role.dates.clone()))
            } else {
                None
            },
            indent: 0.0,
            advance: title_style.leading,
            centered: false,
            rule: false,
        }];

        let mut meta_parts: Vec<&str> = Vec::new();
        if !dates_inline && !role.dates.is_empty() {
            meta_parts.push(&role.dates);
        }
        if let Some(location) = &role.location {
            meta_parts.push(location);
        }
        if !meta_parts.is_empty() {
            lines.push(LaidLine::text_line(
                StyleId::Meta,
                meta_parts.join(" | "),
                meta_style.leading,
            ));
        }
        lines
    }

    /// A dash-prefixed bullet with hanging indent for wrapped lines.
    fn bullet_lines(&self, bullet: &Bullet) -> Vec<LaidLine> {
        let style = self.style(StyleId::Bullet);
        let cw = self.geometry.content_width();
        let wrapped = self.wrap_text(style, &bullet.text, cw - BULLET_INDENT);
        let count = wrapped.len();
        wrapped
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let text = if i == 0 { format!("- {line}") } else { line };
                let advance = if i + 1 == count {
                    style.leading + BULLET_GAP
                } else {
                    style.leading
                };
                LaidLine {
                    spans: vec![Span::plain(StyleId::Bullet, text)],
                    right: None,
                    indent: if i == 0 { 0.0 } else { BULLET_INDENT },
                    advance,
                    centered: false,
                    rule: false,
                }
            })
            .collect()
    }

    /// Exact height of one item.
    pub fn measure_item(&self, item: &Item) -> f32 {
        self.item_lines(item).iter().map(|l| l.advance).sum()
    }

    /// Height of a run of items with inter-item gaps.
    pub fn measure_items(&self, items: &[Item]) -> f32 {
        let mut height = 0.0;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                height += ITEM_GAP;
            }
            height += self.measure_item(item);
        }
        height
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
