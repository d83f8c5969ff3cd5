//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU into one flat-colored triangle list
//! per frame in viewport pixels, then drawn in one pass; the vertex shader
//! maps pixels to clip space.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderInitError, RenderState};
pub use scene::Scene;
pub use vertex::Vertex;
