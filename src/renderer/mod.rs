//! WebGPU rendering module
//!
//! Each frame the active game's snapshot is turned into a flat triangle list
//! in playfield pixels, then letterboxed into clip space and drawn in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use pipeline::{RenderError, RenderState};
pub use scene::build;
pub use vertex::Vertex;
pub use viewport::Viewport;
