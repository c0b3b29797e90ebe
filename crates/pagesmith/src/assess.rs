//! Assessment: "would this document violate the contracts?"
//!
//! Replays exactly the pipeline a real render runs — build, compress,
//! paginate — through the same functions, without drawing anything. The
//! answer can therefore never disagree with what rendering would do.
//! Findings are structured codes with measured values, never exceptions.

use serde::{Deserialize, Serialize};

use crate::compress::compress_for_mode;
use crate::compress::text_ops::word_count;
use crate::contracts::ModeContracts;
use crate::measure::LayoutEnv;
use crate::model::{build, Item, LayoutModel, Mode, ResumeDocument, SectionKind};
use crate::paginate::{paginate, two_page::paginate_two_pages, Page};
use crate::style::StyleId;

/// The closed set of assessment finding codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    PageOverflow,
    ModeOverflow,
    SummaryContract,
    ExperienceContract,
    ProjectsContract,
    SkillsContract,
    EducationContract,
}

/// One structured finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub message: String,
}

/// Result of one assessment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub ok: bool,
    pub requested_mode: Mode,
    pub mode_used: Mode,
    pub pages: usize,
    pub issues: Vec<Issue>,
}

/// Run the assessment pipeline for a requested mode.
pub(crate) fn assess_model(doc: &ResumeDocument, requested: Mode, env: &LayoutEnv) -> Assessment {
    let model = build(doc);
    let (compressed, mode_used) = compress_for_mode(&model, requested, env);
    let pages = final_pages(&compressed, mode_used, env);

    let mut issues: Vec<Issue> = Vec::new();

    if mode_used != requested {
        issues.push(Issue {
            code: IssueCode::ModeOverflow,
            message: format!(
                "requested {requested} but content requires {mode_used} ({} pages)",
                pages.len()
            ),
        });
    }

    for (index, page) in pages.iter().enumerate() {
        let budget = env.geometry.content_height();
        if page.used_height > budget {
            issues.push(Issue {
                code: IssueCode::PageOverflow,
                message: format!(
                    "page {} uses {:.1}pt of a {:.1}pt budget",
                    index + 1,
                    page.used_height,
                    budget
                ),
            });
        }
    }

    // Contract findings measure the final model against the *requested*
    // mode's table; in multi-page mode there is nothing to check.
    if let Some(contracts) = ModeContracts::for_mode(requested) {
        check_contracts(&compressed, contracts, env, &mut issues);
    }

    Assessment {
        ok: issues.is_empty(),
        requested_mode: requested,
        mode_used,
        pages: pages.len(),
        issues,
    }
}

/// Paginate the final model the same way rendering does.
pub(crate) fn final_pages(model: &LayoutModel, mode_used: Mode, env: &LayoutEnv) -> Vec<Page> {
    match mode_used {
        Mode::TwoPage => match paginate_two_pages(model, env) {
            Some([first, second]) => vec![first, second],
            // compress_for_mode only reports TwoPage when the allocation
            // succeeded; recomputing is deterministic, so this arm exists
            // for robustness, not correctness.
            None => paginate(model, env),
        },
        Mode::OnePage | Mode::MultiPage => paginate(model, env),
    }
}

fn check_contracts(
    model: &LayoutModel,
    contracts: &ModeContracts,
    env: &LayoutEnv,
    issues: &mut Vec<Issue>,
) {
    check_summary(model, contracts, env, issues);
    check_experience(model, contracts, env, issues);
    check_projects(model, contracts, issues);
    check_skills(model, contracts, issues);
    check_education(model, contracts, issues);
    check_section_heights(model, contracts, env, issues);
}

/// Every section also carries a total height budget in the strict modes.
fn check_section_heights(
    model: &LayoutModel,
    contracts: &ModeContracts,
    env: &LayoutEnv,
    issues: &mut Vec<Issue>,
) {
    for section in &model.sections {
        let code = match section.kind {
            SectionKind::Summary => IssueCode::SummaryContract,
            SectionKind::Experience => IssueCode::ExperienceContract,
            SectionKind::Projects => IssueCode::ProjectsContract,
            SectionKind::Skills => IssueCode::SkillsContract,
            SectionKind::Education => IssueCode::EducationContract,
            // No contract governs the certifications list.
            SectionKind::Certifications => continue,
        };
        let height = env.title_height() + env.measure_items(&section.items);
        if height > contracts.max_section_height {
            issues.push(Issue {
                code,
                message: format!(
                    "section {} is {height:.1}pt tall; the budget is {:.1}pt",
                    section.kind.title(),
                    contracts.max_section_height
                ),
            });
        }
    }
}

fn check_summary(
    model: &LayoutModel,
    contracts: &ModeContracts,
    env: &LayoutEnv,
    issues: &mut Vec<Issue>,
) {
    let Some(section) = model.section(SectionKind::Summary) else {
        return;
    };
    let body = env.style(StyleId::Body);
    let cw = env.geometry.content_width();
    for item in &section.items {
        if let Item::Paragraph { text } = item {
            let words = word_count(text);
            if words > contracts.summary_words.1 {
                issues.push(Issue {
                    code: IssueCode::SummaryContract,
                    message: format!(
                        "summary has {words} words; the limit is {}",
                        contracts.summary_words.1
                    ),
                });
            }
            let lines = env.wrap_text(body, text, cw).len();
            if lines > contracts.summary_max_lines {
                issues.push(Issue {
                    code: IssueCode::SummaryContract,
                    message: format!(
                        "summary wraps to {lines} lines; the limit is {}",
                        contracts.summary_max_lines
                    ),
                });
            }
            let height = lines as f32 * body.leading;
            if height > contracts.summary_max_height {
                issues.push(Issue {
                    code: IssueCode::SummaryContract,
                    message: format!(
                        "summary is {height:.1}pt tall; the budget is {:.1}pt",
                        contracts.summary_max_height
                    ),
                });
            }
        }
    }
}

fn check_experience(
    model: &LayoutModel,
    contracts: &ModeContracts,
    env: &LayoutEnv,
    issues: &mut Vec<Issue>,
) {
    let Some(section) = model.section(SectionKind::Experience) else {
        return;
    };
    for item in &section.items {
        let Item::Role(role) = item else { continue };
        if role.bullets.len() > contracts.max_bullets_per_role {
            issues.push(Issue {
                code: IssueCode::ExperienceContract,
                message: format!(
                    "role '{}' has {} bullets; the limit is {}",
                    role.role,
                    role.bullets.len(),
                    contracts.max_bullets_per_role
                ),
            });
        }
        for bullet in &role.bullets {
            let words = word_count(&bullet.text);
            if words > contracts.bullet_words.1 {
                issues.push(Issue {
                    code: IssueCode::ExperienceContract,
                    message: format!(
                        "bullet in role '{}' has {words} words; the limit is {}",
                        role.role, contracts.bullet_words.1
                    ),
                });
            }
        }
        let height = env.measure_item(item);
        if height > contracts.max_role_height {
            issues.push(Issue {
                code: IssueCode::ExperienceContract,
                message: format!(
                    "role '{}' is {height:.1}pt tall; the budget is {:.1}pt",
                    role.role, contracts.max_role_height
                ),
            });
        }
    }
}

fn check_projects(model: &LayoutModel, contracts: &ModeContracts, issues: &mut Vec<Issue>) {
    let Some(section) = model.section(SectionKind::Projects) else {
        return;
    };
    let count = section.items.len();
    if count > contracts.max_projects {
        issues.push(Issue {
            code: IssueCode::ProjectsContract,
            message: format!(
                "{count} projects exceed the limit of {}",
                contracts.max_projects
            ),
        });
    }
    for item in &section.items {
        if let Item::Project(project) = item {
            if project.bullets.len() > contracts.max_bullets_per_project {
                issues.push(Issue {
                    code: IssueCode::ProjectsContract,
                    message: format!(
                        "project '{}' has {} bullets; the limit is {}",
                        project.title,
                        project.bullets.len(),
                        contracts.max_bullets_per_project
                    ),
                });
            }
        }
    }
}

fn check_skills(model: &LayoutModel, contracts: &ModeContracts, issues: &mut Vec<Issue>) {
    let Some(section) = model.section(SectionKind::Skills) else {
        return;
    };
    for item in &section.items {
        let Item::SkillLine { categories } = item else {
            continue;
        };
        if categories.len() > contracts.max_skill_categories {
            issues.push(Issue {
                code: IssueCode::SkillsContract,
                message: format!(
                    "{} skill categories exceed the limit of {}",
                    categories.len(),
                    contracts.max_skill_categories
                ),
            });
        }
        for category in categories {
            if category.skills.len() > contracts.max_skills_per_category {
                issues.push(Issue {
                    code: IssueCode::SkillsContract,
                    message: format!(
                        "category '{}' lists {} skills; the limit is {}",
                        category.name,
                        category.skills.len(),
                        contracts.max_skills_per_category
                    ),
                });
            }
        }
    }
}

fn check_education(model: &LayoutModel, contracts: &ModeContracts, issues: &mut Vec<Issue>) {
    let Some(section) = model.section(SectionKind::Education) else {
        return;
    };
    let count = section.items.len();
    if count > contracts.max_education_entries {
        issues.push(Issue {
            code: IssueCode::EducationContract,
            message: format!(
                "{count} education entries exceed the limit of {}",
                contracts.max_education_entries
            ),
        });
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
