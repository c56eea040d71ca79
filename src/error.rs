use crate::{
    abs::{ContextError, GeometryError, ShaderError, TextureError},
    config::ConfigError,
};

/// Everything that can stop the viewer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
}
