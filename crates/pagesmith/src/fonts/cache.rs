//! Process-wide font cache.
//!
//! Keyed by resource path. Concurrent renders share one cache; the per-key
//! `OnceCell` de-duplicates in-flight fetches so a burst of renders (live
//! preview re-rendering on every edit) loads each face exactly once. Failed
//! loads are cached as misses — a missing font file stays missing for the
//! process lifetime and repeated renders do not hit the filesystem again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::fonts::metrics::LoadedFont;
use crate::fonts::resolver::FontSource;

type Slot = Arc<OnceCell<Option<Arc<LoadedFont>>>>;

/// Shared cache of parsed font faces.
#[derive(Default)]
pub struct FontCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the parsed face for `path`, fetching through `source` at most once
    /// per process. Returns `None` when the resource is missing or does not
    /// parse — the caller falls back to the builtin faces.
    pub async fn get_or_load(&self, source: &dyn FontSource, path: &str) -> Option<Arc<LoadedFont>> {
        let slot = {
            let mut slots = self.slots.lock().expect("font cache mutex poisoned");
            slots.entry(path.to_string()).or_default().clone()
        };

        slot.get_or_init(|| async {
            match source.load(path).await {
                Ok(bytes) => match LoadedFont::parse(bytes) {
                    Ok(font) => {
                        debug!(path, ps_name = %font.postscript_name, "font loaded");
                        Some(Arc::new(font))
                    }
                    Err(err) => {
                        warn!(path, %err, "font failed to parse; caching as miss");
                        None
                    }
                },
                Err(err) => {
                    warn!(path, %err, "font fetch failed; caching as miss");
                    None
                }
            }
        })
        .await
        .clone()
    }

    /// Number of cached entries (hits and misses). Test hook.
    pub fn len(&self) -> usize {
        self.slots.lock().expect("font cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
