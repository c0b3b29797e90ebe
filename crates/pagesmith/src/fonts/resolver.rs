//! Font resolution: ordered custom candidates, guaranteed builtin fallback.
//!
//! A candidate is a `(regular, bold)` pair of TTF resource paths. The first
//! pair whose two faces both load wins; any failure falls through to the
//! next candidate and finally to the builtin Helvetica pair. Resolution is
//! deterministic for a given availability and is never fatal to a render.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::engine::FontCandidate;
use crate::fonts::cache::FontCache;
use crate::fonts::metrics::{FontFace, ResolvedFonts};

/// Source of raw font bytes. Injectable so tests can substitute a fake
/// resolver instead of touching the filesystem.
#[async_trait]
pub trait FontSource: Send + Sync {
    async fn load(&self, path: &str) -> anyhow::Result<Vec<u8>>;
}

/// Filesystem-backed source; the production default.
pub struct FsFontSource;

#[async_trait]
impl FontSource for FsFontSource {
    async fn load(&self, path: &str) -> anyhow::Result<Vec<u8>> {
        let bytes = tokio::fs::read(Path::new(path)).await?;
        Ok(bytes)
    }
}

/// Resolve the face pair for a render.
///
/// Tries `candidates` in order through the shared cache; falls back to the
/// builtin pair when none resolves completely.
pub async fn resolve_fonts(
    cache: &FontCache,
    source: &dyn FontSource,
    candidates: &[FontCandidate],
) -> ResolvedFonts {
    for candidate in candidates {
        let regular = cache.get_or_load(source, &candidate.regular).await;
        let bold = cache.get_or_load(source, &candidate.bold).await;
        match (regular, bold) {
            (Some(regular), Some(bold)) => {
                debug!(
                    regular = %candidate.regular,
                    bold = %candidate.bold,
                    "custom font candidate resolved"
                );
                return ResolvedFonts {
                    regular: FontFace::Custom(regular),
                    bold: FontFace::Custom(bold),
                };
            }
            _ => {
                warn!(
                    regular = %candidate.regular,
                    bold = %candidate.bold,
                    "font candidate incomplete; trying next"
                );
            }
        }
    }
    ResolvedFonts::builtin()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
