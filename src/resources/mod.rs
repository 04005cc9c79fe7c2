//! Resource management
//!
//! CPU-side meshes and materials, uploaded once by the renderer.

mod material;
mod mesh;

pub use material::*;
pub use mesh::*;
