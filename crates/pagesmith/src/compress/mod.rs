//! Contract enforcer / adaptive compressor.
//!
//! Restores the mode's contracts after every mutation and then, if the
//! model still fails the mode's fit test, applies an ordered list of
//! fit-driven compression steps, re-testing after each. Nothing here ever
//! fails: when the steps are exhausted the request degrades to multi-page
//! and the pristine model is returned, so no entry is ever lost.
//!
//! Every rewrite is deterministic and idempotent, every loop carries an
//! explicit bound, and the model is copy-mutated — the caller's model is
//! untouched and serves as the rollback point for degradation.

pub mod text_ops;

use tracing::{debug, warn};

use crate::contracts::ModeContracts;
use crate::measure::LayoutEnv;
use crate::model::{Bullet, Item, LayoutModel, Mode, SectionKind};
use crate::paginate::{paginate, two_page::paginate_two_pages};
use crate::style::StyleId;
use text_ops::{
    clamp_words, compact_comma_lists, replace_phrases, strip_fillers, strip_parentheticals,
    word_count,
};

/// Hard bound on any merge loop. Merging always shrinks the list so the
/// loops terminate anyway; the bound guards pathological inputs.
const MAX_MERGE_STEPS: usize = 64;

/// Compress `model` for the requested mode.
///
/// Returns the compressed model and the mode actually achieved. The only
/// way the mode changes is graceful degradation to [`Mode::MultiPage`], in
/// which case the pristine model is returned so every section, role and
/// project of the original document survives.
pub fn compress_for_mode(model: &LayoutModel, mode: Mode, env: &LayoutEnv) -> (LayoutModel, Mode) {
    let contracts = match ModeContracts::for_mode(mode) {
        Some(contracts) => contracts,
        None => return (model.clone(), Mode::MultiPage),
    };

    let mut working = model.clone();
    enforce_contracts(&mut working, contracts);

    if fits(&working, mode, env) {
        return (working, mode);
    }

    type Step = for<'e> fn(&mut LayoutModel, &ModeContracts, &LayoutEnv<'e>);
    let steps: [(&str, Step); 4] = [
        ("merge-bullets-toward-min", step_merge_toward_min),
        ("compress-bullet-text", step_compress_bullet_text),
        ("clamp-skills", step_clamp_skills),
        ("tighten-summary", step_tighten_summary),
    ];

    for (name, step) in steps {
        step(&mut working, contracts, env);
        if fits(&working, mode, env) {
            debug!(step = name, %mode, "fit achieved");
            return (working, mode);
        }
    }

    warn!(%mode, "compression exhausted; degrading to multi-page");
    (model.clone(), Mode::MultiPage)
}

/// The mode's fit test, shared by compression, assessment and rendering.
pub fn fits(model: &LayoutModel, mode: Mode, env: &LayoutEnv) -> bool {
    match mode {
        Mode::OnePage => paginate(model, env).len() == 1,
        Mode::TwoPage => paginate_two_pages(model, env).is_some(),
        Mode::MultiPage => true,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Unconditional contract restoration
// ────────────────────────────────────────────────────────────────────────────

/// Restore every contract the mode defines. Structural caps merge content
/// pairwise — nothing is deleted; text bands rewrite deterministically.
fn enforce_contracts(model: &mut LayoutModel, contracts: &ModeContracts) {
    if let Some(section) = model.section_mut(SectionKind::Experience) {
        for item in &mut section.items {
            if let Item::Role(role) = item {
                merge_bullets_to(&mut role.bullets, contracts.max_bullets_per_role);
            }
        }
    }

    if let Some(section) = model.section_mut(SectionKind::Projects) {
        fold_projects_to(&mut section.items, contracts.max_projects);
        for item in &mut section.items {
            if let Item::Project(project) = item {
                merge_bullets_to(&mut project.bullets, contracts.max_bullets_per_project);
            }
        }
    }

    let band = contracts.bullet_words;
    for_each_bullet_mut(model, |bullet| {
        bullet.text = shrink_to_band(&bullet.text, band);
    });

    enforce_summary_words(model, contracts);
    clamp_skill_caps(model, contracts);
    collapse_education_if_over(model, contracts);
}

/// Merge trailing bullets pairwise into their predecessor until the cap is
/// met. `source_count` sums across merges; no sentence is dropped.
fn merge_bullets_to(bullets: &mut Vec<Bullet>, cap: usize) {
    let cap = cap.max(1);
    let mut steps = 0;
    while bullets.len() > cap && steps < MAX_MERGE_STEPS {
        if let Some(overflow) = bullets.pop() {
            if let Some(last) = bullets.last_mut() {
                last.text = merge_sentences(&last.text, &overflow.text);
                last.source_count += overflow.source_count;
            }
        }
        steps += 1;
    }
}

fn merge_sentences(first: &str, second: &str) -> String {
    let first = first.trim_end_matches(['.', ';']).trim_end();
    format!("{first}; {}", second.trim())
}

/// Fold overflow projects into the previous project, prefixing each folded
/// bullet with its project title so nothing loses attribution.
fn fold_projects_to(items: &mut Vec<Item>, cap: usize) {
    let cap = cap.max(1);
    let mut steps = 0;
    while items.len() > cap && steps < MAX_MERGE_STEPS {
        let overflow = items.pop();
        if let (Some(Item::Project(prev)), Some(Item::Project(folded))) =
            (items.last_mut(), overflow)
        {
            if folded.bullets.is_empty() {
                // Title-only project: carry the title itself. It was never
                // counted as a sentence, so the carrier counts zero sources.
                prev.bullets.push(Bullet {
                    text: folded.title,
                    source_count: 0,
                });
            } else {
                for bullet in folded.bullets {
                    prev.bullets.push(Bullet {
                        text: format!("{}: {}", folded.title, bullet.text),
                        source_count: bullet.source_count,
                    });
                }
            }
        }
        steps += 1;
    }
}

/// Shrink one bullet into its word band: phrase table first, then filler
/// strip, then parenthetical strip, hard clamp last. Text already inside
/// the band is untouched, which is what makes this idempotent.
fn shrink_to_band(text: &str, band: (usize, usize)) -> String {
    let max = band.1;
    if word_count(text) <= max {
        return text.to_string();
    }
    let mut out = replace_phrases(text);
    if word_count(&out) > max {
        out = strip_fillers(&out);
    }
    if word_count(&out) > max {
        out = strip_parentheticals(&out);
    }
    if word_count(&out) > max {
        out = clamp_words(&out, max);
    }
    out
}

fn for_each_bullet_mut(model: &mut LayoutModel, f: impl Fn(&mut Bullet)) {
    for section in &mut model.sections {
        for item in &mut section.items {
            match item {
                Item::Role(role) => role.bullets.iter_mut().for_each(&f),
                Item::Project(project) => project.bullets.iter_mut().for_each(&f),
                Item::FlatBullets { bullets } => bullets.iter_mut().for_each(&f),
                Item::Paragraph { .. } | Item::SkillLine { .. } | Item::Education(_) => {}
            }
        }
    }
}

/// Clamp the summary into its word band via the ordered pipeline:
/// adjectives → comma lists → verbose phrases → hard clamp.
fn enforce_summary_words(model: &mut LayoutModel, contracts: &ModeContracts) {
    let max = contracts.summary_words.1;
    if let Some(section) = model.section_mut(SectionKind::Summary) {
        for item in &mut section.items {
            if let Item::Paragraph { text } = item {
                if word_count(text) <= max {
                    continue;
                }
                let mut out = strip_fillers(text);
                if word_count(&out) > max {
                    out = compact_comma_lists(&out);
                }
                if word_count(&out) > max {
                    out = replace_phrases(&out);
                }
                if word_count(&out) > max {
                    out = clamp_words(&out, max);
                }
                *text = out;
            }
        }
    }
}

/// Skill caps: overflow categories merge into the last kept category;
/// per-category overflow is cut at the cap, then the line is trimmed to
/// its character budget (always keeping at least one skill).
fn clamp_skill_caps(model: &mut LayoutModel, contracts: &ModeContracts) {
    if let Some(section) = model.section_mut(SectionKind::Skills) {
        for item in &mut section.items {
            if let Item::SkillLine { categories } = item {
                let cap = contracts.max_skill_categories.max(1);
                let mut steps = 0;
                while categories.len() > cap && steps < MAX_MERGE_STEPS {
                    if let Some(overflow) = categories.pop() {
                        if let Some(last) = categories.last_mut() {
                            for skill in overflow.skills {
                                if !last
                                    .skills
                                    .iter()
                                    .any(|s| s.eq_ignore_ascii_case(&skill))
                                {
                                    last.skills.push(skill);
                                }
                            }
                        }
                    }
                    steps += 1;
                }

                for category in categories.iter_mut() {
                    category.skills.truncate(contracts.max_skills_per_category);
                    while category.skills.len() > 1
                        && skill_line_chars(&category.name, &category.skills)
                            > contracts.max_skill_line_chars
                    {
                        category.skills.pop();
                    }
                }
            }
        }
    }
}

fn skill_line_chars(name: &str, skills: &[String]) -> usize {
    let list_len: usize =
        skills.iter().map(|s| s.chars().count()).sum::<usize>() + 2 * skills.len().saturating_sub(1);
    name.chars().count() + 2 + list_len
}

/// When over the entry cap, every education entry collapses to single-line
/// form. Entries are never dropped; a count still over the cap surfaces as
/// an assessment issue instead.
fn collapse_education_if_over(model: &mut LayoutModel, contracts: &ModeContracts) {
    if let Some(section) = model.section_mut(SectionKind::Education) {
        if section.items.len() <= contracts.max_education_entries {
            return;
        }
        for item in &mut section.items {
            if let Item::Education(entry) = item {
                if let Some(line2) = entry.line2.take() {
                    entry.line1 = format!("{}, {}", entry.line1, line2);
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fit-driven steps
// ────────────────────────────────────────────────────────────────────────────

fn step_merge_toward_min(model: &mut LayoutModel, contracts: &ModeContracts, _env: &LayoutEnv) {
    if let Some(section) = model.section_mut(SectionKind::Experience) {
        for item in &mut section.items {
            if let Item::Role(role) = item {
                merge_bullets_to(&mut role.bullets, contracts.min_bullets_per_role);
            }
        }
    }
    // Bullets got longer by merging; restore the word band.
    let band = contracts.bullet_words;
    for_each_bullet_mut(model, |bullet| {
        bullet.text = shrink_to_band(&bullet.text, band);
    });
}

fn step_compress_bullet_text(model: &mut LayoutModel, contracts: &ModeContracts, _env: &LayoutEnv) {
    let band = contracts.bullet_words;
    for_each_bullet_mut(model, |bullet| {
        bullet.text = shrink_to_band(&bullet.text, band);
    });
}

fn step_clamp_skills(model: &mut LayoutModel, contracts: &ModeContracts, _env: &LayoutEnv) {
    clamp_skill_caps(model, contracts);
}

/// Height-driven summary tightening: once the word band is met, the
/// summary may still exceed its line/height budget on a narrow content
/// box. Walk the word count down toward the band minimum in small steps.
fn step_tighten_summary(model: &mut LayoutModel, contracts: &ModeContracts, env: &LayoutEnv) {
    let body = *env.style(StyleId::Body);
    let cw = env.geometry.content_width();
    let (min_words, _) = contracts.summary_words;

    if let Some(section) = model.section_mut(SectionKind::Summary) {
        for item in &mut section.items {
            if let Item::Paragraph { text } = item {
                let within = |t: &str, env: &LayoutEnv| -> bool {
                    let lines = env.wrap_text(&body, t, cw);
                    lines.len() <= contracts.summary_max_lines
                        && lines.len() as f32 * body.leading <= contracts.summary_max_height
                };
                if within(text, env) {
                    continue;
                }
                let mut target = word_count(text);
                // Explicit bound: at most 16 shrink steps of 5 words each.
                for _ in 0..16 {
                    if within(text, env) || target <= min_words {
                        break;
                    }
                    target = target.saturating_sub(5).max(min_words);
                    *text = clamp_words(text, target);
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{ONE_PAGE, TWO_PAGE};
    use crate::fonts::ResolvedFonts;
    use crate::geometry::PageGeometry;
    use crate::model::{build, ExperienceEntry, ProjectEntry, ResumeDocument, SkillGroup};
    use crate::style::StyleTable;

    struct Fixture {
        geometry: PageGeometry,
        styles: StyleTable,
        fonts: ResolvedFonts,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                geometry: PageGeometry::new(),
                styles: StyleTable::standard(),
                fonts: ResolvedFonts::builtin(),
            }
        }

        fn env(&self) -> LayoutEnv<'_> {
            LayoutEnv {
                geometry: &self.geometry,
                styles: &self.styles,
                fonts: &self.fonts,
            }
        }
    }

    fn long_bullet(i: usize) -> String {
        format!(
            "Successfully led workstream {i} that was responsible for a wide variety of \
             improvements across the platform in order to deliver measurable business \
             outcomes for numerous stakeholders over multiple quarters"
        )
    }

    /// A representative over-stuffed document: a ~30-word summary, one
    /// role with six ~25-word bullets, five projects.
    fn make_scenario_doc() -> ResumeDocument {
        ResumeDocument {
            name: "Ada Lovelace".into(),
            email: Some("ada@example.com".into()),
            summary: Some(
                "Engineer working on compilers, distributed storage, and developer tooling \
                 with a focus on correctness, performance, and the craft of writing software \
                 that other engineers can maintain."
                    .into(),
            ),
            experience: vec![ExperienceEntry {
                company: "Analytical Engines".into(),
                role: "Principal Engineer".into(),
                dates: "2019 - Present".into(),
                location: None,
                achievements: (0..6).map(long_bullet).collect(),
            }],
            projects: (0..5)
                .map(|i| ProjectEntry {
                    name: format!("Project {i}"),
                    description: Some(format!(
                        "Tool number {i} that parses production logs and surfaces regressions"
                    )),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn make_huge_doc() -> ResumeDocument {
        ResumeDocument {
            name: "Ada Lovelace".into(),
            email: Some("ada@example.com".into()),
            summary: Some("A long career summarized briefly for the record.".into()),
            experience: (0..10)
                .map(|i| ExperienceEntry {
                    company: format!("Company {i}"),
                    role: "Engineer".into(),
                    dates: format!("20{i:02}"),
                    location: None,
                    achievements: (0..6).map(long_bullet).collect(),
                })
                .collect(),
            projects: (0..6)
                .map(|i| ProjectEntry {
                    name: format!("Project {i}"),
                    description: Some(long_bullet(i)),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    // ── merge_bullets_to ────────────────────────────────────────────────────

    #[test]
    fn test_merge_preserves_source_count() {
        let mut bullets: Vec<Bullet> =
            (0..6).map(|i| Bullet::new(format!("Sentence {i}."))).collect();
        merge_bullets_to(&mut bullets, 3);
        assert_eq!(bullets.len(), 3);
        let total: u32 = bullets.iter().map(|b| b.source_count).sum();
        assert_eq!(total, 6, "merging must not lose sentences");
        assert!(bullets[2].text.contains(';'), "merged bullets join with ;");
    }

    #[test]
    fn test_merge_below_cap_is_noop() {
        let mut bullets = vec![Bullet::new("One."), Bullet::new("Two.")];
        let before = bullets.clone();
        merge_bullets_to(&mut bullets, 3);
        assert_eq!(bullets, before);
    }

    // ── fold_projects_to ────────────────────────────────────────────────────

    #[test]
    fn test_fold_projects_keeps_attribution() {
        let mut items: Vec<Item> = (0..4)
            .map(|i| {
                Item::Project(crate::model::Project {
                    title: format!("Proj{i}"),
                    bullets: vec![Bullet::new(format!("did thing {i}"))],
                })
            })
            .collect();
        fold_projects_to(&mut items, 2);
        assert_eq!(items.len(), 2);
        match &items[1] {
            Item::Project(project) => {
                assert_eq!(project.bullets.len(), 3);
                assert!(project.bullets[1].text.starts_with("Proj"));
                let total: u32 = project.bullets.iter().map(|b| b.source_count).sum();
                assert_eq!(total, 3);
            }
            other => panic!("expected Project, got {other:?}"),
        }
    }

    // ── shrink_to_band ──────────────────────────────────────────────────────

    #[test]
    fn test_shrink_leaves_short_text_alone() {
        assert_eq!(shrink_to_band("Shipped it.", (8, 24)), "Shipped it.");
    }

    #[test]
    fn test_shrink_reaches_band_max() {
        let out = shrink_to_band(&long_bullet(1), (8, 24));
        assert!(word_count(&out) <= 24, "got {} words: {out}", word_count(&out));
        assert!(!out.is_empty());
    }

    #[test]
    fn test_shrink_is_idempotent() {
        let once = shrink_to_band(&long_bullet(2), (8, 24));
        assert_eq!(shrink_to_band(&once, (8, 24)), once);
    }

    // ── compress_for_mode ───────────────────────────────────────────────────

    #[test]
    fn test_multi_page_request_is_untouched() {
        let fx = Fixture::new();
        let env = fx.env();
        let model = build(&make_huge_doc());
        let (compressed, mode) = compress_for_mode(&model, Mode::MultiPage, &env);
        assert_eq!(mode, Mode::MultiPage);
        assert_eq!(compressed, model, "multi-page applies no clamps");
    }

    #[test]
    fn test_one_page_scenario_fits_with_contract_caps() {
        let fx = Fixture::new();
        let env = fx.env();
        let model = build(&make_scenario_doc());
        let (compressed, mode) = compress_for_mode(&model, Mode::OnePage, &env);
        assert_eq!(mode, Mode::OnePage, "the scenario doc must fit one page");

        let section = compressed.section(SectionKind::Experience).unwrap();
        match &section.items[0] {
            Item::Role(role) => {
                assert!(role.bullets.len() <= ONE_PAGE.max_bullets_per_role);
                for bullet in &role.bullets {
                    assert!(word_count(&bullet.text) <= ONE_PAGE.bullet_words.1);
                }
            }
            other => panic!("expected Role, got {other:?}"),
        }
        assert!(compressed.project_count() <= ONE_PAGE.max_projects);
    }

    #[test]
    fn test_two_page_keeps_strictly_more_than_one_page() {
        let fx = Fixture::new();
        let env = fx.env();
        let model = build(&make_scenario_doc());
        let (one, one_mode) = compress_for_mode(&model, Mode::OnePage, &env);
        let (two, two_mode) = compress_for_mode(&model, Mode::TwoPage, &env);
        assert_eq!(one_mode, Mode::OnePage);
        assert_eq!(two_mode, Mode::TwoPage);

        let bullets_of = |m: &LayoutModel| -> usize {
            m.section(SectionKind::Experience)
                .map(|s| {
                    s.items
                        .iter()
                        .map(|i| match i {
                            Item::Role(r) => r.bullets.len(),
                            _ => 0,
                        })
                        .sum()
                })
                .unwrap_or(0)
        };
        assert!(bullets_of(&two) > bullets_of(&one));
        assert!(two.project_count() > one.project_count());
    }

    #[test]
    fn test_information_preserved_under_compression() {
        let fx = Fixture::new();
        let env = fx.env();
        let model = build(&make_scenario_doc());
        let before = model.total_sources();
        for mode in [Mode::OnePage, Mode::TwoPage] {
            let (compressed, _) = compress_for_mode(&model, mode, &env);
            assert_eq!(
                compressed.total_sources(),
                before,
                "compression must only merge or reword, never delete"
            );
        }
    }

    #[test]
    fn test_degrade_returns_pristine_model() {
        let fx = Fixture::new();
        let env = fx.env();
        let model = build(&make_huge_doc());
        let (out, mode) = compress_for_mode(&model, Mode::OnePage, &env);
        assert_eq!(mode, Mode::MultiPage, "a huge doc cannot fit one page");
        assert_eq!(out, model, "degradation rolls back to the pristine model");
        assert_eq!(out.role_count(), 10);
        assert_eq!(out.project_count(), 6);
    }

    #[test]
    fn test_compressor_is_idempotent() {
        let fx = Fixture::new();
        let env = fx.env();
        let model = build(&make_scenario_doc());
        for mode in [Mode::OnePage, Mode::TwoPage] {
            let (once, mode_once) = compress_for_mode(&model, mode, &env);
            let (twice, mode_twice) = compress_for_mode(&once, mode, &env);
            assert_eq!(mode_once, mode_twice);
            assert_eq!(once, twice, "re-compressing compressed output must be a no-op");
        }
    }

    #[test]
    fn test_summary_clamped_to_band() {
        let fx = Fixture::new();
        let env = fx.env();
        let words: Vec<String> = (0..90).map(|i| format!("word{i}")).collect();
        let doc = ResumeDocument {
            name: "Ada".into(),
            summary: Some(words.join(" ")),
            experience: vec![ExperienceEntry {
                company: "Acme".into(),
                role: "Engineer".into(),
                dates: "2020".into(),
                location: None,
                achievements: vec!["Did the work that mattered most".into()],
            }],
            ..Default::default()
        };
        let model = build(&doc);
        let (compressed, mode) = compress_for_mode(&model, Mode::OnePage, &env);
        assert_eq!(mode, Mode::OnePage);
        let section = compressed.section(SectionKind::Summary).unwrap();
        match &section.items[0] {
            Item::Paragraph { text } => {
                assert!(word_count(text) <= ONE_PAGE.summary_words.1);
                assert!(text.ends_with('.'));
            }
            other => panic!("expected Paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_skill_caps_applied() {
        let fx = Fixture::new();
        let env = fx.env();
        let doc = ResumeDocument {
            name: "Ada".into(),
            skills: (0..7)
                .map(|i| SkillGroup {
                    category: format!("Category{i}"),
                    items: (0..14).map(|j| format!("Skill{i}x{j}")).collect(),
                })
                .collect(),
            experience: vec![ExperienceEntry {
                company: "Acme".into(),
                role: "Engineer".into(),
                dates: "2020".into(),
                location: None,
                achievements: vec!["Did the work".into()],
            }],
            ..Default::default()
        };
        let model = build(&doc);
        let (compressed, _) = compress_for_mode(&model, Mode::OnePage, &env);
        let section = compressed.section(SectionKind::Skills).unwrap();
        match &section.items[0] {
            Item::SkillLine { categories } => {
                assert!(categories.len() <= ONE_PAGE.max_skill_categories);
                for category in categories {
                    assert!(category.skills.len() <= ONE_PAGE.max_skills_per_category);
                    assert!(!category.skills.is_empty());
                }
            }
            other => panic!("expected SkillLine, got {other:?}"),
        }
    }

    #[test]
    fn test_two_page_contracts_looser_than_one_page() {
        assert!(TWO_PAGE.max_bullets_per_role > ONE_PAGE.max_bullets_per_role);
    }
}
