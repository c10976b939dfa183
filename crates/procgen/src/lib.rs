//! Procedural generation for the grass field and its fallback textures.

pub mod blade;
pub mod error;
pub mod field;
pub mod textures;

pub use blade::*;
pub use error::*;
pub use field::*;
pub use textures::*;
