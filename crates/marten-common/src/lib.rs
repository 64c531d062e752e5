//! Common utilities for the marten layout engine.
//!
//! This crate provides shared infrastructure used by every engine component:
//! - **Warning System** - colored, deduplicated terminal output for
//!   unsupported values
//! - **Units** - CSS length resolution to pixels
//! - **Colors** - the minimal color parsing the engine itself needs
//! - **Bitmaps** - the pixel buffer value stored in the resource shelf
//! - **Errors** - the collaborator-seam error type

pub mod bitmap;
pub mod color;
pub mod error;
pub mod units;
pub mod warning;

pub use bitmap::Bitmap;
pub use color::Rgba;
pub use error::BackendError;
