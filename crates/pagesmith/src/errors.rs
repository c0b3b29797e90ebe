use thiserror::Error;

/// Engine-level error type.
///
/// Rendering itself never fails on document content: font problems fall back
/// to the builtin faces, contract violations are resolved by the compressor
/// or surfaced as structured assessment issues, and infeasible strict
/// pagination degrades the mode. The only hard failure is a build-time
/// misconfiguration, caught when the engine is constructed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configured page margin is below the hard floor. This is a
    /// configuration bug, not a document-dependent condition.
    #[error("page margin {margin}pt is below the {floor}pt minimum")]
    MarginBelowFloor { margin: f32, floor: f32 },
}
