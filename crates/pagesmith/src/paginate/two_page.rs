//! Strict two-page allocation.
//!
//! Not a generic bin-pack: a fixed policy. Page 1 gets the header, the
//! summary, and up to the two most-recent roles while height remains (the
//! first role is placed even when space is tight). Page 2 gets the
//! remaining roles, then projects, skills, education and certifications in
//! that fixed order. Overflow on either page — or an empty page 2 — makes
//! the allocation infeasible and the caller falls back to greedy flow,
//! demoting the mode.

use tracing::debug;

use crate::geometry::{ITEM_GAP, SECTION_GAP};
use crate::measure::LayoutEnv;
use crate::model::{Item, LayoutModel, SectionKind};
use crate::paginate::{make_chunk_for_items, Block, Page};

/// Attempt the strict allocation. `None` means infeasible.
pub fn paginate_two_pages(model: &LayoutModel, env: &LayoutEnv) -> Option<[Page; 2]> {
    let budget = env.geometry.content_height();

    let mut page_one = Page::default();
    let header_height = env.measure_header(&model.header);
    if header_height > 0.0 {
        push_block(
            &mut page_one,
            Block::Header {
                header: model.header.clone(),
                height: header_height,
            },
        );
    }

    if let Some(summary) = model.section(SectionKind::Summary) {
        let chunk = make_chunk_for_items(SectionKind::Summary, true, &summary.items, env);
        push_block(&mut page_one, Block::Chunk(chunk));
    }

    // Up to the two most-recent roles on page one. The first role is placed
    // unconditionally; the second only if it genuinely fits.
    let roles: &[Item] = model
        .section(SectionKind::Experience)
        .map(|s| s.items.as_slice())
        .unwrap_or(&[]);
    let mut placed_roles = 0_usize;
    if !roles.is_empty() {
        let first = make_chunk_for_items(SectionKind::Experience, true, &roles[..1], env);
        push_block(&mut page_one, Block::Chunk(first));
        placed_roles = 1;

        if roles.len() > 1 {
            let second_height = ITEM_GAP + env.measure_item(&roles[1]);
            if page_one.used_height + second_height <= budget {
                // Re-chunk the first two roles together so the heading and
                // both items sit in one block.
                pop_block(&mut page_one);
                let both = make_chunk_for_items(SectionKind::Experience, true, &roles[..2], env);
                push_block(&mut page_one, Block::Chunk(both));
                placed_roles = 2;
            }
        }
    }

    if page_one.used_height > budget {
        debug!(used = page_one.used_height, budget, "two-page: page 1 overflows");
        return None;
    }

    // Page 2: remaining roles, then the later sections in fixed order.
    let mut page_two = Page::default();
    if roles.len() > placed_roles {
        let rest = make_chunk_for_items(
            SectionKind::Experience,
            placed_roles == 0,
            &roles[placed_roles..],
            env,
        );
        push_block(&mut page_two, Block::Chunk(rest));
    }
    for kind in [
        SectionKind::Projects,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Certifications,
    ] {
        if let Some(section) = model.section(kind) {
            let chunk = make_chunk_for_items(kind, true, &section.items, env);
            push_block(&mut page_two, Block::Chunk(chunk));
        }
    }

    if page_two.blocks.is_empty() {
        debug!("two-page: nothing for page 2; infeasible");
        return None;
    }
    if page_two.used_height > budget {
        debug!(used = page_two.used_height, budget, "two-page: page 2 overflows");
        return None;
    }

    Some([page_one, page_two])
}

fn push_block(page: &mut Page, block: Block) {
    let gap = if page.blocks.is_empty() { 0.0 } else { SECTION_GAP };
    page.used_height += gap + block.height();
    page.blocks.push(block);
}

fn pop_block(page: &mut Page) {
    if let Some(block) = page.blocks.pop() {
        let gap = if page.blocks.is_empty() { 0.0 } else { SECTION_GAP };
        page.used_height -= gap + block.height();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
