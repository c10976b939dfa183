//! wgpu rendering for the grass field viewer.

pub mod camera;
pub mod error;
pub mod grass;
pub mod ground;
pub mod mesh;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;

pub use camera::*;
pub use error::*;
pub use grass::*;
pub use ground::*;
pub use mesh::*;
pub use pipeline::*;
pub use renderer::*;
pub use texture::*;
pub use vertex::*;
