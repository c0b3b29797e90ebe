//! Per-mode contract tables.
//!
//! A contract is a hard numeric limit a section must satisfy in a given
//! mode. One-page and two-page carry structurally identical tables with
//! different values; multi-page enforces nothing.

use serde::{Deserialize, Serialize};

use crate::model::Mode;

/// The full contract set for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeContracts {
    /// Summary word band `[min, max]`. Text already under `min` is left
    /// alone — compression never pads.
    pub summary_words: (usize, usize),
    pub summary_max_lines: usize,
    pub summary_max_height: f32,
    /// Bullet word band `[min, max]` for every bullet kind.
    pub bullet_words: (usize, usize),
    pub max_bullets_per_role: usize,
    /// Merging floor for the fit-driven compression step.
    pub min_bullets_per_role: usize,
    pub max_projects: usize,
    pub max_bullets_per_project: usize,
    pub max_skill_categories: usize,
    pub max_skills_per_category: usize,
    pub max_skill_line_chars: usize,
    pub max_education_entries: usize,
    pub max_role_height: f32,
    pub max_section_height: f32,
}

pub const ONE_PAGE: ModeContracts = ModeContracts {
    summary_words: (40, 55),
    summary_max_lines: 4,
    summary_max_height: 60.0,
    bullet_words: (8, 24),
    max_bullets_per_role: 3,
    min_bullets_per_role: 2,
    max_projects: 2,
    max_bullets_per_project: 2,
    max_skill_categories: 4,
    max_skills_per_category: 8,
    max_skill_line_chars: 95,
    max_education_entries: 2,
    max_role_height: 130.0,
    max_section_height: 320.0,
};

pub const TWO_PAGE: ModeContracts = ModeContracts {
    summary_words: (60, 80),
    summary_max_lines: 6,
    summary_max_height: 90.0,
    bullet_words: (8, 30),
    max_bullets_per_role: 5,
    min_bullets_per_role: 3,
    max_projects: 4,
    max_bullets_per_project: 3,
    max_skill_categories: 6,
    max_skills_per_category: 10,
    max_skill_line_chars: 110,
    max_education_entries: 3,
    max_role_height: 200.0,
    max_section_height: 520.0,
};

impl ModeContracts {
    /// Contract table for a mode; `None` for multi-page (unenforced).
    pub fn for_mode(mode: Mode) -> Option<&'static ModeContracts> {
        match mode {
            Mode::OnePage => Some(&ONE_PAGE),
            Mode::TwoPage => Some(&TWO_PAGE),
            Mode::MultiPage => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
