//! Input document shape.
//!
//! Every field is optional or defaulted so arbitrary resume JSON
//! deserializes without failing; the builder treats missing data as empty
//! sections. Education accepts either a single record or a list.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocument {
    pub name: String,
    pub headline: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub links: Vec<String>,
    pub summary: Option<String>,
    pub skills: Vec<SkillGroup>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "one_or_many")]
    pub education: Vec<EducationRecord>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub dates: String,
    pub location: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: Option<String>,
    pub bullets: Vec<String>,
    pub impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationRecord {
    pub institution: String,
    pub degree: String,
    pub dates: Option<String>,
    pub details: Option<String>,
}

/// Accept `education` as either one object or an array of objects.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<EducationRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(EducationRecord),
        Many(Vec<EducationRecord>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(record) => vec![record],
        OneOrMany::Many(records) => records,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
