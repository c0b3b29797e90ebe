//! Pagesmith — deterministic resume layout and pagination engine.
//!
//! Converts a structured resume document into a fixed-page-size PDF byte
//! stream under hard per-section contracts (word counts, line counts, point
//! heights), adapting content to a caller-requested page count (one page,
//! two pages, or unconstrained) without discarding information.
//!
//! # Pipeline
//! 1. Font/style resolution (custom TTF candidates with builtin fallback)
//! 2. Model building + one-shot text sanitization
//! 3. Contract enforcement / adaptive compression (merge, never delete)
//! 4. Measurement (greedy wrap, exact heights)
//! 5. Pagination (greedy flow, or the strict two-page allocator)
//! 6. Rendering (straight drawing pass; all decisions happen upstream)
//!
//! For a fixed `(document, options, font availability)` tuple the output
//! bytes are identical across invocations — determinism is a contract, not
//! an optimization.

pub mod assess;
pub mod compress;
pub mod contracts;
pub mod engine;
pub mod errors;
pub mod fonts;
pub mod geometry;
pub mod measure;
pub mod model;
pub mod paginate;
pub mod render;
pub mod style;

// Re-export the public API consumed by callers.
pub use assess::{Assessment, Issue, IssueCode};
pub use engine::{Engine, EngineConfig, FontCandidate, RenderOptions, RenderOutput};
pub use errors::EngineError;
pub use fonts::{FontCache, FontSource, FsFontSource};
pub use geometry::PageGeometry;
pub use model::{Mode, ResumeDocument};
