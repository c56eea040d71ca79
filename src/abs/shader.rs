//! OpenGL Shaders
//!
//! This module defines [`ShaderProgram`] for compiling and linking a vertex +
//! fragment pair, and the [`Uniform`] trait for writing values into a
//! program's uniform slots. Slots are addressed by their explicit
//! `layout(location = N)` index, see [`UniformSlot`].

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::{Mat4, Vec3};
use glow::HasContext;

use super::Texture;

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("GL object creation failed: {0}")]
    Gl(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Link => "link",
        })
    }
}

/// A compile or link failure reported by the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageDiagnostic {
    pub stage: ShaderStage,
    pub log: String,
}

/// Reads a shader source file line by line, terminating every line with `\n`.
pub fn read_source(path: &Path) -> Result<String, ShaderError> {
    let io_err = |source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut source = String::new();
    for line in reader.lines() {
        source.push_str(&line.map_err(io_err)?);
        source.push('\n');
    }
    Ok(source)
}

/// An integer uniform location agreed between GLSL and host code.
pub trait UniformSlot: Copy {
    fn location(self) -> u32;
}

impl UniformSlot for u32 {
    fn location(self) -> u32 {
        self
    }
}

/// Represents a value that can be written into a uniform slot.
///
/// The owning program is already bound when this is called.
pub trait Uniform {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::NativeUniformLocation);
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::NativeUniformLocation) {
        unsafe {
            gl.uniform_1_f32(Some(location), *self);
        }
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::NativeUniformLocation) {
        unsafe {
            gl.uniform_1_i32(Some(location), *self);
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::NativeUniformLocation) {
        unsafe {
            gl.uniform_3_f32(Some(location), self.x, self.y, self.z);
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::NativeUniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

/// A texture bound to a texture unit; the slot receives the unit index.
#[derive(Clone, Copy)]
pub struct TextureUnit<'a> {
    pub texture: &'a Texture,
    pub unit: u32,
}

impl Uniform for TextureUnit<'_> {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::NativeUniformLocation) {
        self.texture.bind(self.unit);
        (self.unit as i32).set_uniform(gl, location);
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::NativeUniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents an OpenGL shader program built from a vertex and a fragment stage.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: Option<glow::Program>,
    diagnostics: Vec<StageDiagnostic>,
}

impl ShaderProgram {
    /// Compiles both stages and links them.
    ///
    /// Compile and link failures are logged and kept in
    /// [`ShaderProgram::diagnostics`], but the program object is still
    /// returned. Only failing to create GL objects is an error.
    pub fn new(gl: &Arc<glow::Context>, vert_source: &str, frag_source: &str) -> Result<Self, ShaderError> {
        unsafe {
            let program = gl.create_program().map_err(ShaderError::Gl)?;
            let mut diagnostics = Vec::new();
            let mut shaders = Vec::with_capacity(2);

            for (stage, shader_type, source) in [
                (ShaderStage::Vertex, glow::VERTEX_SHADER, vert_source),
                (ShaderStage::Fragment, glow::FRAGMENT_SHADER, frag_source),
            ] {
                let shader = match gl.create_shader(shader_type) {
                    Ok(shader) => shader,
                    Err(e) => {
                        for shader in shaders {
                            gl.delete_shader(shader);
                        }
                        gl.delete_program(program);
                        return Err(ShaderError::Gl(e));
                    }
                };
                gl.shader_source(shader, source);
                gl.compile_shader(shader);

                if !gl.get_shader_compile_status(shader) {
                    let log = gl.get_shader_info_log(shader);
                    log::error!("{stage} shader failed to compile:\n{}", log.trim_end());
                    diagnostics.push(StageDiagnostic { stage, log });
                }

                gl.attach_shader(program, shader);
                shaders.push(shader);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                log::error!("Shader program failed to link:\n{}", log.trim_end());
                diagnostics.push(StageDiagnostic {
                    stage: ShaderStage::Link,
                    log,
                });
            }

            // only the linked program has to outlive this call
            for shader in shaders {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: Some(program),
                diagnostics,
            })
        }
    }

    /// Reads both source files and builds the program from them.
    pub fn load(gl: &Arc<glow::Context>, vert_path: &Path, frag_path: &Path) -> Result<Self, ShaderError> {
        let vert_source = read_source(vert_path)?;
        let frag_source = read_source(frag_path)?;
        let program = Self::new(gl, &vert_source, &frag_source)?;
        if program.is_valid() {
            log::info!("Built shader program from {:?} + {:?}", vert_path, frag_path);
        } else {
            log::warn!(
                "Shader program from {:?} + {:?} has {} error(s) and may render incorrectly",
                vert_path,
                frag_path,
                program.diagnostics.len()
            );
        }
        Ok(program)
    }

    /// Binds the shader program for use. A freed program unbinds instead.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(self.id);
        }
    }

    /// Writes `value` into the uniform at `slot`. Binds the program first.
    pub fn set_uniform<T: Uniform>(&self, slot: impl UniformSlot, value: T) {
        if self.id.is_none() {
            log::warn!("Ignoring uniform write to a freed shader program");
            return;
        }
        self.use_program();
        value.set_uniform(&self.gl, &glow::NativeUniformLocation(slot.location()));
    }

    /// Releases the GPU program and zeroes the handle. Freeing twice is a no-op.
    pub fn free(&mut self) {
        if let Some(id) = self.id.take() {
            unsafe {
                self.gl.delete_program(id);
            }
        }
        self.diagnostics.clear();
    }

    pub fn handle(&self) -> Option<glow::Program> {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.id.is_some()
    }

    /// Compile and link failures collected while building the program.
    pub fn diagnostics(&self) -> &[StageDiagnostic] {
        &self.diagnostics
    }

    /// Whether every stage compiled and the program linked.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.free();
    }
}
