//! Greedy flow pagination.
//!
//! The model flattens into blocks — one header block, then per-section
//! chunks. A chunk is a contiguous run of a section's items that fits a
//! fresh page; an individual item is never split across blocks. Blocks pack
//! onto pages of fixed content height; an oversized single block is placed
//! anyway on a fresh page, so pagination can never loop forever.

pub mod two_page;

use crate::geometry::{ITEM_GAP, SECTION_GAP};
use crate::measure::LayoutEnv;
use crate::model::{Header, Item, LayoutModel, SectionKind};

/// A contiguous run of one section's items placed as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub kind: SectionKind,
    /// First chunk of a section carries the heading.
    pub with_title: bool,
    pub items: Vec<Item>,
    pub height: f32,
}

/// The atomic unit pagination places. Never split.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Header { header: Header, height: f32 },
    Chunk(Chunk),
}

impl Block {
    pub fn height(&self) -> f32 {
        match self {
            Block::Header { height, .. } => *height,
            Block::Chunk(chunk) => chunk.height,
        }
    }
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub blocks: Vec<Block>,
    pub used_height: f32,
}

/// Flatten the model into blocks: header first, then section chunks in
/// model order.
pub fn build_blocks(model: &LayoutModel, env: &LayoutEnv) -> Vec<Block> {
    let mut blocks = Vec::new();
    let header_height = env.measure_header(&model.header);
    if header_height > 0.0 {
        blocks.push(Block::Header {
            header: model.header.clone(),
            height: header_height,
        });
    }
    for section in &model.sections {
        for chunk in chunk_section(section.kind, &section.items, env) {
            blocks.push(Block::Chunk(chunk));
        }
    }
    blocks
}

/// Split a section into chunks that each fit a fresh page. A single item
/// taller than a page becomes its own chunk and is placed oversized.
pub fn chunk_section(kind: SectionKind, items: &[Item], env: &LayoutEnv) -> Vec<Chunk> {
    let budget = env.geometry.content_height();
    let title_height = env.title_height();

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current: Vec<Item> = Vec::new();
    let mut current_height = 0.0_f32;

    for item in items {
        let item_height = env.measure_item(item);
        let first_chunk = chunks.is_empty();
        let chunk_overhead = if first_chunk { title_height } else { 0.0 };
        let gap = if current.is_empty() { 0.0 } else { ITEM_GAP };

        if !current.is_empty() && chunk_overhead + current_height + gap + item_height > budget {
            chunks.push(make_chunk(kind, chunks.is_empty(), std::mem::take(&mut current), current_height, env));
            current_height = 0.0;
        }
        let gap = if current.is_empty() { 0.0 } else { ITEM_GAP };
        current_height += gap + item_height;
        current.push(item.clone());
    }
    if !current.is_empty() {
        chunks.push(make_chunk(kind, chunks.is_empty(), current, current_height, env));
    }
    chunks
}

/// Build a single chunk from a run of items without page-budget splitting.
/// Used by the strict two-page allocator, which does its own budgeting.
pub(crate) fn make_chunk_for_items(
    kind: SectionKind,
    with_title: bool,
    items: &[Item],
    env: &LayoutEnv,
) -> Chunk {
    let items_height = env.measure_items(items);
    make_chunk(kind, with_title, items.to_vec(), items_height, env)
}

fn make_chunk(
    kind: SectionKind,
    with_title: bool,
    items: Vec<Item>,
    items_height: f32,
    env: &LayoutEnv,
) -> Chunk {
    let height = if with_title {
        env.title_height() + items_height
    } else {
        items_height
    };
    Chunk {
        kind,
        with_title,
        items,
        height,
    }
}

/// Pack blocks greedily onto pages of fixed content height.
pub fn paginate(model: &LayoutModel, env: &LayoutEnv) -> Vec<Page> {
    let budget = env.geometry.content_height();
    let blocks = build_blocks(model, env);

    let mut pages: Vec<Page> = Vec::new();
    let mut page = Page::default();

    for block in blocks {
        let gap = if page.blocks.is_empty() { 0.0 } else { SECTION_GAP };
        if !page.blocks.is_empty() && page.used_height + gap + block.height() > budget {
            pages.push(std::mem::take(&mut page));
        }
        let gap = if page.blocks.is_empty() { 0.0 } else { SECTION_GAP };
        page.used_height += gap + block.height();
        page.blocks.push(block);
    }
    if !page.blocks.is_empty() {
        pages.push(page);
    }
    if pages.is_empty() {
        // A completely empty model still renders one blank page.
        pages.push(Page::default());
    }
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
