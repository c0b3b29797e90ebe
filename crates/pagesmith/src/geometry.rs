//! Fixed page geometry and vertical spacing constants.
//!
//! The whole engine lays out on US letter (612 × 792 pt). The margin is the
//! only configurable value and carries a hard floor: a margin below the
//! floor is a programming error caught at engine construction, never a
//! runtime layout condition.

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Page width in points (US letter, 8.5").
pub const PAGE_WIDTH: f32 = 612.0;
/// Page height in points (US letter, 11").
pub const PAGE_HEIGHT: f32 = 792.0;
/// Hard floor for the page margin (0.5").
pub const MIN_MARGIN: f32 = 36.0;
/// Default page margin (2/3").
pub const DEFAULT_MARGIN: f32 = 48.0;

/// Vertical gap between blocks on a page (header → section, section → section).
pub const SECTION_GAP: f32 = 14.0;
/// Gap between a section heading (and its rule) and the first item.
pub const HEADING_GAP: f32 = 5.0;
/// Gap between consecutive items inside a chunk.
pub const ITEM_GAP: f32 = 6.0;
/// Extra advance after each bullet's last wrapped line.
pub const BULLET_GAP: f32 = 2.0;
/// Hanging indent for bullet continuation lines.
pub const BULLET_INDENT: f32 = 10.0;

/// Resolved page geometry. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    margin: f32,
}

impl PageGeometry {
    /// Geometry with the default margin. Cannot violate the floor.
    pub fn new() -> Self {
        PageGeometry {
            margin: DEFAULT_MARGIN,
        }
    }

    /// Geometry with an explicit margin.
    ///
    /// Fails fast for any margin below [`MIN_MARGIN`] — the guard exists so
    /// a misconfigured build surfaces immediately instead of producing
    /// clipped output.
    pub fn with_margin(margin: f32) -> Result<Self, EngineError> {
        if margin < MIN_MARGIN {
            return Err(EngineError::MarginBelowFloor {
                margin,
                floor: MIN_MARGIN,
            });
        }
        Ok(PageGeometry { margin })
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Usable text width between the side margins.
    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH - 2.0 * self.margin
    }

    /// Usable text height between the top and bottom margins.
    pub fn content_height(&self) -> f32 {
        PAGE_HEIGHT - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry_content_box() {
        let geo = PageGeometry::new();
        assert_eq!(geo.margin(), DEFAULT_MARGIN);
        assert!((geo.content_width() - 516.0).abs() < 1e-4);
        assert!((geo.content_height() - 696.0).abs() < 1e-4);
    }

    #[test]
    fn test_margin_at_floor_is_accepted() {
        let geo = PageGeometry::with_margin(MIN_MARGIN).expect("floor margin must be valid");
        assert_eq!(geo.margin(), MIN_MARGIN);
    }

    #[test]
    fn test_margin_below_floor_always_guarded() {
        // Every value below the floor must trip the configuration guard.
        for margin in [35.9_f32, 30.0, 12.5, 1.0, 0.0, -4.0] {
            let err = PageGeometry::with_margin(margin);
            assert!(
                matches!(err, Err(EngineError::MarginBelowFloor { .. })),
                "margin {margin} should be rejected"
            );
        }
    }

    #[test]
    fn test_wide_margin_shrinks_content_box() {
        let geo = PageGeometry::with_margin(72.0).unwrap();
        assert!((geo.content_width() - 468.0).abs() < 1e-4);
        assert!((geo.content_height() - 648.0).abs() < 1e-4);
    }
}
