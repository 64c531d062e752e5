//! Error types for the collaborator seams.
//!
//! Engine-internal fallibility is expressed as absence (`Option`): a value
//! that fails to parse simply isn't set, and layout falls back to a default.
//! `Result` appears only where an external collaborator (font backend,
//! border rasterizer) can fail, and the engine degrades on `Err` instead of
//! aborting the pass.

use thiserror::Error;

/// A failure reported by an external collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The requested font face could not be provided.
    #[error("missing font face '{0}'")]
    MissingFont(String),

    /// The rasterizer could not produce a bitmap.
    #[error("rasterization failed: {0}")]
    Raster(String),
}
