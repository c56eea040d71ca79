//! This module contains the thin wrappers around the windowing and GL APIs:
//! application setup, geometry, shaders, textures and the draw call.

pub mod app;
pub mod clock;
pub mod diagnostics;
pub mod draw;
pub mod geometry;
pub mod shader;
pub mod texture;

pub use app::*;
pub use clock::*;
pub use diagnostics::*;
pub use draw::*;
pub use geometry::*;
pub use shader::*;
pub use texture::*;
