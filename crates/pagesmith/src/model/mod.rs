//! The layout model: a section-typed view of one resume, built once per
//! render and copy-mutated by the compressor.
//!
//! Items are an explicit sum type with exhaustive matching in measurement
//! and rendering — no loose-shape inspection at call sites. The model has
//! no identity beyond a single render; nothing here is cached across calls.

pub mod builder;
pub mod input;
pub mod sanitize;

use serde::{Deserialize, Serialize};

pub use builder::build;
pub use input::{EducationRecord, ExperienceEntry, ProjectEntry, ResumeDocument, SkillGroup};

// ────────────────────────────────────────────────────────────────────────────
// Mode
// ────────────────────────────────────────────────────────────────────────────

/// Pagination mode. Governs which contract table applies and which
/// paginator runs. `MultiPage` is terminal: height budgets are not enforced
/// and content is never discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    OnePage,
    TwoPage,
    MultiPage,
}

impl Mode {
    /// Map a requested page count to a mode: 1 and 2 are strict, anything
    /// else is unconstrained.
    pub fn from_page_count(count: i32) -> Mode {
        match count {
            1 => Mode::OnePage,
            2 => Mode::TwoPage,
            _ => Mode::MultiPage,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Mode::OnePage => "one-page",
            Mode::TwoPage => "two-page",
            Mode::MultiPage => "multi-page",
        };
        f.write_str(label)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections and items
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of section kinds, in canonical document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionKind {
    Summary,
    Experience,
    Projects,
    Skills,
    Education,
    Certifications,
}

impl SectionKind {
    /// Rendered section title.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Summary => "SUMMARY",
            SectionKind::Experience => "EXPERIENCE",
            SectionKind::Projects => "PROJECTS",
            SectionKind::Skills => "SKILLS",
            SectionKind::Education => "EDUCATION",
            SectionKind::Certifications => "CERTIFICATIONS",
        }
    }
}

/// One achievement sentence, possibly the result of merging several.
///
/// `source_count` tracks how many original sentences the bullet carries;
/// merges sum it, and the compressor never deletes a bullet, so the total
/// across the model is invariant under compression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub text: String,
    pub source_count: u32,
}

impl Bullet {
    pub fn new(text: impl Into<String>) -> Self {
        Bullet {
            text: text.into(),
            source_count: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub role: String,
    pub company: String,
    pub dates: String,
    pub location: Option<String>,
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub line1: String,
    pub line2: Option<String>,
}

/// Tagged union of everything a section can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Paragraph { text: String },
    SkillLine { categories: Vec<SkillCategory> },
    Role(Role),
    Project(Project),
    Education(EducationEntry),
    FlatBullets { bullets: Vec<Bullet> },
}

/// Header fields. The name is never shortened; the headline may shrink to a
/// size floor; contacts are packed into at most two lines of three items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub headline: Option<String>,
    /// Strict priority order: email, phone, location, then links.
    pub contacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutModel {
    pub header: Header,
    pub sections: Vec<Section>,
}

impl LayoutModel {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.kind == kind)
    }

    /// Number of role entries across the model.
    pub fn role_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|i| matches!(i, Item::Role(_)))
            .count()
    }

    /// Number of project entries across the model.
    pub fn project_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|i| matches!(i, Item::Project(_)))
            .count()
    }

    /// Total count of original achievement sentences carried by all bullets.
    /// Invariant under compression: merging sums `source_count`, and bullets
    /// are never deleted.
    pub fn total_sources(&self) -> u32 {
        let mut total = 0;
        for section in &self.sections {
            for item in &section.items {
                match item {
                    Item::Role(role) => {
                        total += role.bullets.iter().map(|b| b.source_count).sum::<u32>()
                    }
                    Item::Project(project) => {
                        total += project.bullets.iter().map(|b| b.source_count).sum::<u32>()
                    }
                    Item::FlatBullets { bullets } => {
                        total += bullets.iter().map(|b| b.source_count).sum::<u32>()
                    }
                    Item::Paragraph { .. } | Item::SkillLine { .. } | Item::Education(_) => {}
                }
            }
        }
        total
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
