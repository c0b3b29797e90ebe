//! The engine facade: configuration, font resolution, and the two public
//! operations — render and assess — wired through one shared pipeline.
//!
//! Rendering never fails on document content. The single fallible moment is
//! construction, where the margin floor guard runs. The only I/O suspension
//! point is the custom-font fetch, served through the process-wide cache.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assess::{assess_model, final_pages, Assessment};
use crate::compress::compress_for_mode;
use crate::errors::EngineError;
use crate::fonts::{resolve_fonts, FontCache, FontSource, FsFontSource, ResolvedFonts};
use crate::geometry::{PageGeometry, DEFAULT_MARGIN};
use crate::measure::LayoutEnv;
use crate::model::{build, Mode, ResumeDocument};
use crate::render::render_pdf;
use crate::style::StyleTable;

/// A `(regular, bold)` pair of custom TTF resource paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontCandidate {
    pub regular: String,
    pub bold: String,
}

/// Engine configuration. The margin is guarded at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub margin: f32,
    /// Ordered custom font candidates; empty means builtin faces.
    pub font_candidates: Vec<FontCandidate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            margin: DEFAULT_MARGIN,
            font_candidates: Vec::new(),
        }
    }
}

/// Per-request render options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// 1 = one-page, 2 = two-page, anything else = unconstrained.
    pub requested_page_count: i32,
    /// Presentation-only; becomes the PDF title. Never affects layout.
    pub filename: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            requested_page_count: 1,
            filename: None,
        }
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub bytes: Bytes,
    pub page_count: usize,
    /// May legitimately differ from the request (graceful degradation);
    /// callers must treat a mismatch as a normal outcome, not an error.
    pub mode_used: Mode,
    pub filename: Option<String>,
}

/// The layout engine. Cheap to clone state is constructed once; concurrent
/// renders share the font cache and nothing else.
pub struct Engine {
    geometry: PageGeometry,
    styles: StyleTable,
    candidates: Vec<FontCandidate>,
    cache: Arc<FontCache>,
    source: Arc<dyn FontSource>,
}

impl Engine {
    /// Build an engine with the filesystem font source.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_font_source(config, Arc::new(FsFontSource), Arc::new(FontCache::new()))
    }

    /// Build an engine with an injected font source and cache — the seam
    /// tests use to substitute a fake resolver, and callers use to share
    /// one cache across engines.
    pub fn with_font_source(
        config: EngineConfig,
        source: Arc<dyn FontSource>,
        cache: Arc<FontCache>,
    ) -> Result<Self, EngineError> {
        let geometry = PageGeometry::with_margin(config.margin)?;
        Ok(Engine {
            geometry,
            styles: StyleTable::standard(),
            candidates: config.font_candidates,
            cache,
            source,
        })
    }

    async fn resolved_fonts(&self) -> ResolvedFonts {
        resolve_fonts(self.cache.as_ref(), self.source.as_ref(), &self.candidates).await
    }

    /// Render a document. Infallible on content: the compressor always
    /// converges to some valid model (at worst multi-page) before
    /// pagination and drawing run.
    pub async fn render(&self, doc: &ResumeDocument, options: &RenderOptions) -> RenderOutput {
        let fonts = self.resolved_fonts().await;
        let env = LayoutEnv {
            geometry: &self.geometry,
            styles: &self.styles,
            fonts: &fonts,
        };

        let requested = Mode::from_page_count(options.requested_page_count);
        let model = build(doc);
        let (compressed, mode_used) = compress_for_mode(&model, requested, &env);
        let pages = final_pages(&compressed, mode_used, &env);
        debug!(%requested, %mode_used, pages = pages.len(), "render pipeline complete");

        let bytes = render_pdf(&pages, &env, options.filename.as_deref());
        RenderOutput {
            bytes: Bytes::from(bytes),
            page_count: pages.len(),
            mode_used,
            filename: options.filename.clone(),
        }
    }

    /// Assess a document without rendering. Runs the identical pipeline,
    /// so its verdict always matches what `render` would do.
    pub async fn assess(&self, doc: &ResumeDocument, options: &RenderOptions) -> Assessment {
        let fonts = self.resolved_fonts().await;
        let env = LayoutEnv {
            geometry: &self.geometry,
            styles: &self.styles,
            fonts: &fonts,
        };
        let requested = Mode::from_page_count(options.requested_page_count);
        assess_model(doc, requested, &env)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::geometry::MIN_MARGIN;
    use crate::model::{ExperienceEntry, ProjectEntry, SectionKind};

    fn make_engine() -> Engine {
        Engine::new(EngineConfig::default()).expect("default config is valid")
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
            experience: (0..10)
                .map(|i| ExperienceEntry {
                    company: format!("Company {i}"),
                    role: "Engineer".into(),
                    dates: format!("20{i:02}"),
                    location: None,
                    achievements: (0..6).map(long_bullet).collect(),
                })
                .collect(),
            projects: (0..5)
                .map(|i| ProjectEntry {
                    name: format!("Project {i}"),
                    description: Some(long_bullet(i)),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_margin_guard_at_construction() {
        for margin in [0.0_f32, 10.0, MIN_MARGIN - 0.1] {
            let err = Engine::new(EngineConfig {
                margin,
                font_candidates: vec![],
            });
            assert!(
                matches!(err, Err(EngineError::MarginBelowFloor { .. })),
                "margin {margin} must be rejected at construction"
            );
        }
    }

    #[tokio::test]
    async fn test_scenario_one_page_request() {
        let engine = make_engine();
        let options = RenderOptions {
            requested_page_count: 1,
            filename: Some("ada.pdf".into()),
        };
        let out = engine.render(&make_scenario_doc(), &options).await;
        assert_eq!(out.mode_used, Mode::OnePage);
        assert_eq!(out.page_count, 1);
        assert_eq!(out.filename.as_deref(), Some("ada.pdf"));
        assert!(out.bytes.starts_with(b"%PDF-1.7\n"));
    }

    #[tokio::test]
    async fn test_scenario_two_page_request() {
        let engine = make_engine();
        let options = RenderOptions {
            requested_page_count: 2,
            filename: None,
        };
        let out = engine.render(&make_scenario_doc(), &options).await;
        assert_eq!(out.mode_used, Mode::TwoPage);
        assert_eq!(out.page_count, 2);
    }

    #[tokio::test]
    async fn test_render_is_byte_identical_across_calls() {
        let engine = make_engine();
        let doc = make_scenario_doc();
        let options = RenderOptions::default();
        let first = engine.render(&doc, &options).await;
        let second = engine.render(&doc, &options).await;
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.page_count, second.page_count);
        assert_eq!(first.mode_used, second.mode_used);
    }

    #[tokio::test]
    async fn test_degrade_keeps_every_entry() {
        let engine = make_engine();
        let doc = make_huge_doc();
        let out = engine
            .render(
                &doc,
                &RenderOptions {
                    requested_page_count: 1,
                    filename: None,
                },
            )
            .await;
        assert_eq!(out.mode_used, Mode::MultiPage, "huge doc must degrade");
        assert!(out.page_count > 1);

        // The assessor sees the same pipeline: the degraded model retains
        // every role and project of the original document.
        let assessment = engine
            .assess(
                &doc,
                &RenderOptions {
                    requested_page_count: 1,
                    filename: None,
                },
            )
            .await;
        assert_eq!(assessment.mode_used, Mode::MultiPage);
        let model = crate::model::build(&doc);
        assert_eq!(model.role_count(), 10);
        assert_eq!(model.project_count(), 5);
    }

    #[tokio::test]
    async fn test_multi_page_request_keeps_all_projects() {
        let engine = make_engine();
        let doc = make_scenario_doc();
        let out = engine
            .render(
                &doc,
                &RenderOptions {
                    requested_page_count: 0,
                    filename: None,
                },
            )
            .await;
        assert_eq!(out.mode_used, Mode::MultiPage);
        // Unconstrained mode applies no clamps: the built model keeps all
        // five projects and all six bullets.
        let model = crate::model::build(&doc);
        assert_eq!(model.project_count(), 5);
        let section = model.section(SectionKind::Experience).unwrap();
        match &section.items[0] {
            crate::model::Item::Role(role) => assert_eq!(role.bullets.len(), 6),
            other => panic!("expected Role, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_assess_matches_render_mode() {
        let engine = make_engine();
        let doc = make_scenario_doc();
        for count in [1, 2, 0] {
            let options = RenderOptions {
                requested_page_count: count,
                filename: None,
            };
            let rendered = engine.render(&doc, &options).await;
            let assessed = engine.assess(&doc, &options).await;
            assert_eq!(
                rendered.mode_used, assessed.mode_used,
                "assessment must mirror rendering for page count {count}"
            );
            assert_eq!(rendered.page_count, assessed.pages);
        }
    }

    #[tokio::test]
    async fn test_missing_custom_fonts_fall_back() {
        let engine = Engine::new(EngineConfig {
            margin: DEFAULT_MARGIN,
            font_candidates: vec![FontCandidate {
                regular: "/no/such/Font-Regular.ttf".into(),
                bold: "/no/such/Font-Bold.ttf".into(),
            }],
        })
        .expect("config is valid");
        let out = engine
            .render(&make_scenario_doc(), &RenderOptions::default())
            .await;
        // Fallback is silent and the render still succeeds on Helvetica.
        let text = String::from_utf8_lossy(&out.bytes);
        assert!(text.contains("/BaseFont /Helvetica"));
    }
}
