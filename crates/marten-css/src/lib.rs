//! Style cascade and box layout for the marten engine.
//!
//! The crate is organized around one pass: [`layout::LayoutEngine::layout`]
//! runs the tree transformer pipeline, resolves the cascade for every live
//! element, computes the recursive box pass with its phase plugins, and
//! sweeps the resource shelf once. Everything the renderer needs afterwards
//! lives in the [`state::StateTable`] and the [`shelf::Shelf`].

pub mod backend;
pub mod cascade;
pub mod layout;
pub mod rules;
pub mod selector;
pub mod shelf;
pub mod state;
pub mod transform;

pub use backend::{ApproximateFont, BorderRasterizer, FontBackend, SolidRasterizer, TextRun};
pub use layout::{LayoutEngine, Viewport};
pub use state::{RenderState, StateTable};
