//! Named text styles.
//!
//! One immutable style per semantic role. Every later stage — compressor,
//! paginators, assessor, renderer — reads the same table, so a size tweak
//! here changes measurement and drawing together and they can never drift.

use serde::{Deserialize, Serialize};

/// Which resolved face a style draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontSlot {
    Regular,
    Bold,
}

/// Semantic style roles. Closed set; exhaustive matches everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleId {
    /// Candidate name in the header. Never shortened.
    Name,
    /// Headline under the name. May shrink to a floor, then truncate.
    Headline,
    /// Section headings (SUMMARY, EXPERIENCE, ...).
    Heading,
    /// Body paragraphs and skill lists.
    Body,
    /// Contact lines, dates, locations, footer.
    Meta,
    /// Role + company line.
    RoleTitle,
    /// Project title line.
    ProjectTitle,
    /// Achievement bullets.
    Bullet,
}

/// A resolved text style: face slot, size in points, baseline advance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub slot: FontSlot,
    pub size: f32,
    pub leading: f32,
}

/// Minimum size the headline may shrink to before width truncation kicks in.
pub const MIN_HEADLINE_SIZE: f32 = 9.0;

/// The fixed style table. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTable {
    name: Style,
    headline: Style,
    heading: Style,
    body: Style,
    meta: Style,
    role_title: Style,
    project_title: Style,
    bullet: Style,
}

impl StyleTable {
    /// The standard resume style set.
    pub fn standard() -> Self {
        StyleTable {
            name: Style {
                slot: FontSlot::Bold,
                size: 20.0,
                leading: 24.0,
            },
            headline: Style {
                slot: FontSlot::Regular,
                size: 11.5,
                leading: 15.0,
            },
            heading: Style {
                slot: FontSlot::Bold,
                size: 12.0,
                leading: 16.0,
            },
            body: Style {
                slot: FontSlot::Regular,
                size: 10.0,
                leading: 13.5,
            },
            meta: Style {
                slot: FontSlot::Regular,
                size: 9.0,
                leading: 12.0,
            },
            role_title: Style {
                slot: FontSlot::Bold,
                size: 10.5,
                leading: 13.5,
            },
            project_title: Style {
                slot: FontSlot::Bold,
                size: 10.5,
                leading: 13.5,
            },
            bullet: Style {
                slot: FontSlot::Regular,
                size: 10.0,
                leading: 13.0,
            },
        }
    }

    pub fn get(&self, id: StyleId) -> &Style {
        match id {
            StyleId::Name => &self.name,
            StyleId::Headline => &self.headline,
            StyleId::Heading => &self.heading,
            StyleId::Body => &self.body,
            StyleId::Meta => &self.meta,
            StyleId::RoleTitle => &self.role_title,
            StyleId::ProjectTitle => &self.project_title,
            StyleId::Bullet => &self.bullet,
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
