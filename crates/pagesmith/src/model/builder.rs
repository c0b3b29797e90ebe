//! Model builder: maps the input document into the section-typed layout
//! model. Pure function of its input; never fails — missing fields become
//! empty or omitted sections. All sanitization happens here, once.

use crate::model::sanitize::{sanitize_bullet, sanitize_text};
use crate::model::{
    Bullet, EducationEntry, Header, Item, LayoutModel, Project, ResumeDocument, Role, Section,
    SectionKind, SkillCategory,
};

/// Contact items are packed into at most 2 lines of at most 3 items.
const MAX_CONTACT_ITEMS: usize = 6;

/// Build the layout model for one render.
pub fn build(doc: &ResumeDocument) -> LayoutModel {
    LayoutModel {
        header: build_header(doc),
        sections: build_sections(doc),
    }
}

fn build_header(doc: &ResumeDocument) -> Header {
    // Strict priority order: email, phone, location, then links.
    let mut contacts: Vec<String> = Vec::new();
    for field in [&doc.email, &doc.phone, &doc.location] {
        if let Some(value) = field {
            let clean = sanitize_text(value);
            if !clean.is_empty() {
                contacts.push(clean);
            }
        }
    }
    for link in &doc.links {
        let clean = sanitize_text(link);
        if !clean.is_empty() {
            contacts.push(clean);
        }
    }
    contacts.truncate(MAX_CONTACT_ITEMS);

    Header {
        name: sanitize_text(&doc.name),
        headline: doc
            .headline
            .as_deref()
            .map(sanitize_text)
            .filter(|h| !h.is_empty()),
        contacts,
    }
}

fn build_sections(doc: &ResumeDocument) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(summary) = doc.summary.as_deref() {
        let text = sanitize_text(summary);
        if !text.is_empty() {
            sections.push(Section {
                kind: SectionKind::Summary,
                items: vec![Item::Paragraph { text }],
            });
        }
    }

    let roles: Vec<Item> = doc
        .experience
        .iter()
        .filter_map(build_role)
        .map(Item::Role)
        .collect();
    if !roles.is_empty() {
        sections.push(Section {
            kind: SectionKind::Experience,
            items: roles,
        });
    }

    let projects: Vec<Item> = doc
        .projects
        .iter()
        .filter_map(build_project)
        .map(Item::Project)
        .collect();
    if !projects.is_empty() {
        sections.push(Section {
            kind: SectionKind::Projects,
            items: projects,
        });
    }

    let categories = build_skill_categories(doc);
    if !categories.is_empty() {
        sections.push(Section {
            kind: SectionKind::Skills,
            items: vec![Item::SkillLine { categories }],
        });
    }

    let education: Vec<Item> = doc
        .education
        .iter()
        .filter_map(build_education)
        .map(Item::Education)
        .collect();
    if !education.is_empty() {
        sections.push(Section {
            kind: SectionKind::Education,
            items: education,
        });
    }

    let certs: Vec<Bullet> = doc
        .certifications
        .iter()
        .map(|c| sanitize_bullet(c))
        .filter(|c| !c.is_empty())
        .map(Bullet::new)
        .collect();
    if !certs.is_empty() {
        sections.push(Section {
            kind: SectionKind::Certifications,
            items: vec![Item::FlatBullets { bullets: certs }],
        });
    }

    sections
}

fn build_role(entry: &crate::model::ExperienceEntry) -> Option<Role> {
    let role = sanitize_text(&entry.role);
    let company = sanitize_text(&entry.company);
    if role.is_empty() && company.is_empty() {
        return None;
    }
    Some(Role {
        role,
        company,
        dates: sanitize_text(&entry.dates),
        location: entry
            .location
            .as_deref()
            .map(sanitize_text)
            .filter(|l| !l.is_empty()),
        bullets: build_bullets(&entry.achievements),
    })
}

fn build_project(entry: &crate::model::ProjectEntry) -> Option<Project> {
    let title = sanitize_text(&entry.name);
    if title.is_empty() {
        return None;
    }
    // Description and impact are folded in as ordinary bullets so one
    // compression path covers all project content.
    let mut texts: Vec<&str> = Vec::new();
    if let Some(description) = entry.description.as_deref() {
        texts.push(description);
    }
    texts.extend(entry.bullets.iter().map(String::as_str));
    if let Some(impact) = entry.impact.as_deref() {
        texts.push(impact);
    }
    Some(Project {
        title,
        bullets: build_bullets_from(&texts),
    })
}

fn build_education(record: &crate::model::EducationRecord) -> Option<EducationEntry> {
    let institution = sanitize_text(&record.institution);
    let degree = sanitize_text(&record.degree);
    if institution.is_empty() && degree.is_empty() {
        return None;
    }
    let line1 = match (degree.is_empty(), institution.is_empty()) {
        (false, false) => format!("{degree}, {institution}"),
        (false, true) => degree,
        (true, false) => institution,
        (true, true) => unreachable!(),
    };
    let mut meta: Vec<String> = Vec::new();
    if let Some(dates) = record.dates.as_deref() {
        let clean = sanitize_text(dates);
        if !clean.is_empty() {
            meta.push(clean);
        }
    }
    if let Some(details) = record.details.as_deref() {
        let clean = sanitize_text(details);
        if !clean.is_empty() {
            meta.push(clean);
        }
    }
    Some(EducationEntry {
        line1,
        line2: if meta.is_empty() {
            None
        } else {
            Some(meta.join(" | "))
        },
    })
}

fn build_skill_categories(doc: &ResumeDocument) -> Vec<SkillCategory> {
    doc.skills
        .iter()
        .filter_map(|group| {
            let name = sanitize_text(&group.category);
            let skills = dedup_skills(&group.items);
            if name.is_empty() || skills.is_empty() {
                None
            } else {
                Some(SkillCategory { name, skills })
            }
        })
        .collect()
}

/// De-duplicate case-insensitively, preserving first-seen casing and order.
fn dedup_skills(raw: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut skills: Vec<String> = Vec::new();
    for skill in raw {
        let clean = sanitize_text(skill);
        if clean.is_empty() {
            continue;
        }
        let key = clean.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        skills.push(clean);
    }
    skills
}

fn build_bullets(raw: &[String]) -> Vec<Bullet> {
    let texts: Vec<&str> = raw.iter().map(String::as_str).collect();
    build_bullets_from(&texts)
}

fn build_bullets_from(raw: &[&str]) -> Vec<Bullet> {
    raw.iter()
        .map(|t| sanitize_bullet(t))
        .filter(|t| !t.is_empty())
        .map(Bullet::new)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EducationRecord, ExperienceEntry, ProjectEntry, SkillGroup};

    fn make_doc() -> ResumeDocument {
        ResumeDocument {
            name: "Ada Lovelace".to_string(),
            headline: Some("Staff Engineer".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
            location: Some("London".to_string()),
            links: vec![
                "github.com/ada".to_string(),
                "ada.dev".to_string(),
                "linkedin.com/in/ada".to_string(),
                "mastodon.social/@ada".to_string(),
            ],
            summary: Some("Engineer with a decade of systems work.".to_string()),
            skills: vec![SkillGroup {
                category: "Languages".to_string(),
                items: vec![
                    "Rust".to_string(),
                    "rust".to_string(),
                    "Python".to_string(),
                    "RUST".to_string(),
                ],
            }],
            experience: vec![ExperienceEntry {
                company: "Analytical Engines".to_string(),
                role: "Principal Engineer".to_string(),
                dates: "2019 - Present".to_string(),
                location: Some("Remote".to_string()),
                achievements: vec![
                    "• Shipped the compiler 🚀".to_string(),
                    "".to_string(),
                    "Cut build times by 40%".to_string(),
                ],
            }],
            projects: vec![ProjectEntry {
                name: "Difference Engine".to_string(),
                description: Some("Mechanical calculator".to_string()),
                bullets: vec!["Designed the carry mechanism".to_string()],
                impact: Some("Adopted by the Royal Society".to_string()),
            }],
            education: vec![EducationRecord {
                institution: "University of London".to_string(),
                degree: "BSc Mathematics".to_string(),
                dates: Some("1832".to_string()),
                details: None,
            }],
            certifications: vec!["AWS Solutions Architect".to_string()],
        }
    }

    #[test]
    fn test_empty_document_builds_empty_model() {
        let model = build(&ResumeDocument::default());
        assert!(model.sections.is_empty());
        assert!(model.header.name.is_empty());
        assert!(model.header.contacts.is_empty());
    }

    #[test]
    fn test_contact_priority_and_cap() {
        let model = build(&make_doc());
        let contacts = &model.header.contacts;
        assert_eq!(contacts.len(), 6, "contact items are capped at 6");
        assert_eq!(contacts[0], "ada@example.com");
        assert_eq!(contacts[1], "+1 555 0100");
        assert_eq!(contacts[2], "London");
        assert_eq!(contacts[3], "github.com/ada");
    }

    #[test]
    fn test_skills_deduped_first_casing_wins() {
        let model = build(&make_doc());
        let section = model.section(SectionKind::Skills).expect("skills built");
        match &section.items[0] {
            Item::SkillLine { categories } => {
                assert_eq!(categories[0].skills, vec!["Rust", "Python"]);
            }
            other => panic!("expected SkillLine, got {other:?}"),
        }
    }

    #[test]
    fn test_bullets_sanitized_and_empty_dropped() {
        let model = build(&make_doc());
        let section = model.section(SectionKind::Experience).unwrap();
        match &section.items[0] {
            Item::Role(role) => {
                assert_eq!(role.bullets.len(), 2, "empty achievement is dropped");
                assert_eq!(role.bullets[0].text, "Shipped the compiler");
                assert_eq!(role.bullets[0].source_count, 1);
            }
            other => panic!("expected Role, got {other:?}"),
        }
    }

    #[test]
    fn test_project_folds_description_and_impact() {
        let model = build(&make_doc());
        let section = model.section(SectionKind::Projects).unwrap();
        match &section.items[0] {
            Item::Project(project) => {
                assert_eq!(project.title, "Difference Engine");
                assert_eq!(project.bullets.len(), 3);
                assert_eq!(project.bullets[0].text, "Mechanical calculator");
                assert_eq!(project.bullets[2].text, "Adopted by the Royal Society");
            }
            other => panic!("expected Project, got {other:?}"),
        }
    }

    #[test]
    fn test_education_lines() {
        let model = build(&make_doc());
        let section = model.section(SectionKind::Education).unwrap();
        match &section.items[0] {
            Item::Education(entry) => {
                assert_eq!(entry.line1, "BSc Mathematics, University of London");
                assert_eq!(entry.line2.as_deref(), Some("1832"));
            }
            other => panic!("expected Education, got {other:?}"),
        }
    }

    #[test]
    fn test_sections_in_canonical_order() {
        let model = build(&make_doc());
        let kinds: Vec<SectionKind> = model.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Projects,
                SectionKind::Skills,
                SectionKind::Education,
                SectionKind::Certifications,
            ]
        );
    }

    #[test]
    fn test_build_is_pure() {
        let doc = make_doc();
        assert_eq!(build(&doc), build(&doc));
    }
}
