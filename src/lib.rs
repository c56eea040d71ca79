//! A small real-time viewer: one window, one GL context, a handful of
//! resources loaded from disk and a frame loop that spins a lit mesh.
//!
//! GPU resources ([`abs::Geometry`], [`abs::Texture`], [`abs::ShaderProgram`])
//! release themselves on drop and can also be freed early with `free()`.

pub mod abs;
pub mod bindings;
pub mod config;
pub mod error;
pub mod light;
pub mod logging;
pub mod mesh;
pub mod obj;

pub use error::Error;
