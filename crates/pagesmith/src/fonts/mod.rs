// Font resolution: optional custom TTF candidates with a guaranteed builtin
// fallback, plus the process-wide cache that de-duplicates in-flight loads.

pub mod cache;
pub mod metrics;
pub mod resolver;

pub use cache::FontCache;
pub use metrics::{BuiltinFace, FontFace, LoadedFont, ResolvedFonts};
pub use resolver::{resolve_fonts, FontSource, FsFontSource};
