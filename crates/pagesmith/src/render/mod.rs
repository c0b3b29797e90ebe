//! Rendering: a straight drawing pass over the paginated block list.
//!
//! Every layout decision already happened upstream — this module walks the
//! pages, draws each block's laid-out lines at coordinates derived from
//! style leadings and the fixed gaps, and emits the PDF byte stream. The
//! only conditional behavior is the page-number footer, drawn when the
//! document has more than one page.

pub mod pdf;

use crate::fonts::{FontFace, LoadedFont, ResolvedFonts};
use crate::geometry::{ITEM_GAP, PAGE_HEIGHT, PAGE_WIDTH, SECTION_GAP};
use crate::measure::{LaidLine, LayoutEnv, Span};
use crate::paginate::{Block, Page};
use crate::style::{FontSlot, StyleId};
use pdf::{escape_text, fmt_num, Obj, ObjId, PdfWriter};

const CATALOG: ObjId = ObjId(1);
const PAGES_TREE: ObjId = ObjId(2);
const FONT_REGULAR: ObjId = ObjId(3);
const FONT_BOLD: ObjId = ObjId(4);

/// Render the final page list into PDF bytes.
pub fn render_pdf(pages: &[Page], env: &LayoutEnv, title: Option<&str>) -> Vec<u8> {
    let mut writer = PdfWriter::new();
    let mut next_id = write_fonts(&mut writer, env.fonts);

    let mut page_ids: Vec<ObjId> = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        let ops = page_ops(page, env, index, pages.len());

        let content_id = ObjId(next_id);
        next_id += 1;
        writer.add_object(content_id, &Obj::flate_stream(vec![], ops));

        let page_id = ObjId(next_id);
        next_id += 1;
        writer.add_object(
            page_id,
            &Obj::dict(vec![
                ("Type", Obj::name("Page")),
                ("Parent", Obj::Ref(PAGES_TREE)),
                (
                    "MediaBox",
                    Obj::Array(vec![
                        Obj::Int(0),
                        Obj::Int(0),
                        Obj::Real(PAGE_WIDTH),
                        Obj::Real(PAGE_HEIGHT),
                    ]),
                ),
                ("Contents", Obj::Ref(content_id)),
                (
                    "Resources",
                    Obj::dict(vec![(
                        "Font",
                        Obj::dict(vec![
                            ("F1", Obj::Ref(FONT_REGULAR)),
                            ("F2", Obj::Ref(FONT_BOLD)),
                        ]),
                    )]),
                ),
            ]),
        );
        page_ids.push(page_id);
    }

    // No timestamps: output must be byte-identical across invocations.
    let info_id = ObjId(next_id);
    let mut info = vec![(
        "Producer",
        Obj::text(concat!("pagesmith ", env!("CARGO_PKG_VERSION"))),
    )];
    if let Some(title) = title {
        info.push(("Title", Obj::text(title)));
    }
    writer.add_object(info_id, &Obj::dict(info));

    writer.add_object(
        PAGES_TREE,
        &Obj::dict(vec![
            ("Type", Obj::name("Pages")),
            ("Kids", Obj::Array(page_ids.iter().map(|id| Obj::Ref(*id)).collect())),
            ("Count", Obj::Int(page_ids.len() as i64)),
        ]),
    );
    writer.add_object(
        CATALOG,
        &Obj::dict(vec![
            ("Type", Obj::name("Catalog")),
            ("Pages", Obj::Ref(PAGES_TREE)),
        ]),
    );

    writer.finish(CATALOG, Some(info_id))
}

// ────────────────────────────────────────────────────────────────────────────
// Font objects
// ────────────────────────────────────────────────────────────────────────────

/// Write the two font objects (and descriptors/programs for custom faces).
/// Returns the next free object number.
fn write_fonts(writer: &mut PdfWriter, fonts: &ResolvedFonts) -> u32 {
    let mut next_id = 5;
    for (font_id, face) in [(FONT_REGULAR, &fonts.regular), (FONT_BOLD, &fonts.bold)] {
        match face {
            FontFace::Builtin(builtin) => {
                writer.add_object(
                    font_id,
                    &Obj::dict(vec![
                        ("Type", Obj::name("Font")),
                        ("Subtype", Obj::name("Type1")),
                        ("BaseFont", Obj::name(builtin.base_name())),
                    ]),
                );
            }
            FontFace::Custom(font) => {
                let descriptor_id = ObjId(next_id);
                let file_id = ObjId(next_id + 1);
                next_id += 2;
                write_truetype(writer, font_id, descriptor_id, file_id, font);
            }
        }
    }
    next_id
}

/// Embed a custom face as a simple TrueType font: Widths for ASCII
/// 32..=126, a FontDescriptor, and the raw program as FontFile2.
fn write_truetype(
    writer: &mut PdfWriter,
    font_id: ObjId,
    descriptor_id: ObjId,
    file_id: ObjId,
    font: &LoadedFont,
) {
    let widths: Vec<Obj> = (32..=126u8)
        .map(|code| Obj::Int(font.char_width_milli(code as char) as i64))
        .collect();

    writer.add_object(
        font_id,
        &Obj::dict(vec![
            ("Type", Obj::name("Font")),
            ("Subtype", Obj::name("TrueType")),
            ("BaseFont", Obj::name(&font.postscript_name)),
            ("FirstChar", Obj::Int(32)),
            ("LastChar", Obj::Int(126)),
            ("Widths", Obj::Array(widths)),
            ("FontDescriptor", Obj::Ref(descriptor_id)),
            ("Encoding", Obj::name("WinAnsiEncoding")),
        ]),
    );

    let mut flags = 32_u32; // nonsymbolic
    if font.is_monospaced {
        flags |= 1;
    }
    if font.italic_angle != 0.0 {
        flags |= 64;
    }
    writer.add_object(
        descriptor_id,
        &Obj::dict(vec![
            ("Type", Obj::name("FontDescriptor")),
            ("FontName", Obj::name(&font.postscript_name)),
            ("Flags", Obj::Int(flags as i64)),
            (
                "FontBBox",
                Obj::Array(
                    font.bbox
                        .iter()
                        .map(|&v| Obj::Int(font.to_milli(v) as i64))
                        .collect(),
                ),
            ),
            ("ItalicAngle", Obj::Real(font.italic_angle)),
            ("Ascent", Obj::Int(font.to_milli(font.ascent) as i64)),
            ("Descent", Obj::Int(font.to_milli(font.descent) as i64)),
            ("CapHeight", Obj::Int(font.to_milli(font.cap_height) as i64)),
            ("StemV", Obj::Int(80)),
            ("FontFile2", Obj::Ref(file_id)),
        ]),
    );

    writer.add_object(
        file_id,
        &Obj::flate_stream(
            vec![("Length1", Obj::Int(font.data.len() as i64))],
            font.data.clone(),
        ),
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Content streams
// ────────────────────────────────────────────────────────────────────────────

/// Generate the content stream for one page.
fn page_ops(page: &Page, env: &LayoutEnv, page_index: usize, page_count: usize) -> Vec<u8> {
    let margin = env.geometry.margin();
    let mut ops = String::new();
    let mut y = PAGE_HEIGHT - margin;

    for (index, block) in page.blocks.iter().enumerate() {
        if index > 0 {
            y -= SECTION_GAP;
        }
        match block {
            Block::Header { header, .. } => {
                for line in env.header_lines(header) {
                    draw_line(&mut ops, env, &line, &mut y);
                }
            }
            Block::Chunk(chunk) => {
                if chunk.with_title {
                    let title = env.section_title_line(chunk.kind);
                    draw_line(&mut ops, env, &title, &mut y);
                }
                for (item_index, item) in chunk.items.iter().enumerate() {
                    if item_index > 0 {
                        y -= ITEM_GAP;
                    }
                    for line in env.item_lines(item) {
                        draw_line(&mut ops, env, &line, &mut y);
                    }
                }
            }
        }
    }

    if page_count > 1 {
        draw_footer(&mut ops, env, page_index, page_count);
    }

    ops.into_bytes()
}

/// Draw one laid-out line at the current cursor and advance it.
fn draw_line(ops: &mut String, env: &LayoutEnv, line: &LaidLine, y: &mut f32) {
    let margin = env.geometry.margin();
    let cw = env.geometry.content_width();

    let first_size = line
        .spans
        .first()
        .map(|s| s.size.unwrap_or(env.style(s.style).size))
        .unwrap_or(0.0);
    let baseline = *y - first_size;

    let total_width: f32 = line.spans.iter().map(|s| env.span_width(s)).sum();
    let mut x = if line.centered {
        margin + ((cw - total_width) / 2.0).max(0.0)
    } else {
        margin + line.indent
    };

    for span in &line.spans {
        draw_span(ops, env, span, x, baseline);
        x += env.span_width(span);
    }
    if let Some(right) = &line.right {
        let rx = margin + cw - env.span_width(right);
        draw_span(ops, env, right, rx, baseline);
    }
    if line.rule {
        let rule_y = baseline - 3.0;
        ops.push_str(&format!(
            "0.5 w {} {} m {} {} l S\n",
            fmt_num(margin),
            fmt_num(rule_y),
            fmt_num(margin + cw),
            fmt_num(rule_y),
        ));
    }

    *y -= line.advance;
}

fn draw_span(ops: &mut String, env: &LayoutEnv, span: &Span, x: f32, baseline: f32) {
    if span.text.is_empty() {
        return;
    }
    let style = env.style(span.style);
    let size = span.size.unwrap_or(style.size);
    let font = match style.slot {
        FontSlot::Regular => "F1",
        FontSlot::Bold => "F2",
    };
    ops.push_str(&format!(
        "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
        font,
        fmt_num(size),
        fmt_num(x),
        fmt_num(baseline),
        escape_text(&span.text),
    ));
}

/// Centered page-number footer, drawn only on multi-page documents.
fn draw_footer(ops: &mut String, env: &LayoutEnv, page_index: usize, page_count: usize) {
    let meta = env.style(StyleId::Meta);
    let text = format!("Page {} of {}", page_index + 1, page_count);
    let width = env
        .fonts
        .face(meta.slot)
        .text_width(&text, meta.size);
    let x = (PAGE_WIDTH - width) / 2.0;
    let y = env.geometry.margin() / 2.0;
    ops.push_str(&format!(
        "BT /F1 {} Tf {} {} Td ({}) Tj ET\n",
        fmt_num(meta.size),
        fmt_num(x),
        fmt_num(y),
        escape_text(&text),
    ));
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
