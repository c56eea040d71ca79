//! Geometry management module.
//!
//! This module defines the [`Vertex`] layout shared by every mesh and the
//! [`Geometry`] struct that owns the GPU buffers for one mesh.

use std::{mem::offset_of, path::Path, sync::Arc};

use glam::{Vec2, Vec3, Vec4};
use glow::HasContext;

use crate::{mesh::MeshData, obj::ObjError};

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error(transparent)]
    Obj(#[from] ObjError),
    #[error("GL object creation failed: {0}")]
    Gl(String),
}

/// Per-vertex data. The layout is fixed: every geometry uses it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub normal: [f32; 4],
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Builds a vertex; position gets `w = 1` and the normal `w = 0`.
    pub fn new(position: Vec3, color: Vec4, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.extend(1.0).to_array(),
            color: color.to_array(),
            uv: uv.to_array(),
            normal: normal.extend(0.0).to_array(),
        }
    }

    /// Sets up the attribute pointers for the currently bound VAO.
    ///
    /// | location | attribute | components |
    /// |---|---|---|
    /// | 0 | position | 4 |
    /// | 1 | color | 4 |
    /// | 2 | uv | 2 |
    /// | 3 | normal | 4 |
    fn vertex_attribs(gl: &glow::Context) {
        let stride = Self::STRIDE as i32;
        let attribs = [
            (0, 4, offset_of!(Vertex, position)),
            (1, 4, offset_of!(Vertex, color)),
            (2, 2, offset_of!(Vertex, uv)),
            (3, 4, offset_of!(Vertex, normal)),
        ];
        unsafe {
            for (location, size, offset) in attribs {
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(location, size, glow::FLOAT, false, stride, offset as i32);
            }
        }
    }
}

/// Represents a mesh stored on the GPU side.
///
/// The handles become `None` once the geometry is freed, either through
/// [`Geometry::free`] or when it is dropped.
pub struct Geometry {
    gl: Arc<glow::Context>,
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ibo: Option<glow::Buffer>,
    index_count: usize,
}

impl Geometry {
    /// Uploads the given vertex and index data.
    ///
    /// If a GL object can't be created, the ones made before it are released.
    pub fn new(
        gl: &Arc<glow::Context>,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self, GeometryError> {
        let mut geometry = Self {
            gl: Arc::clone(gl),
            vao: None,
            vbo: None,
            ibo: None,
            index_count: 0,
        };

        unsafe {
            let vbo = gl.create_buffer().map_err(GeometryError::Gl)?;
            geometry.vbo = Some(vbo);
            let ibo = gl.create_buffer().map_err(GeometryError::Gl)?;
            geometry.ibo = Some(ibo);
            let vao = gl.create_vertex_array().map_err(GeometryError::Gl)?;
            geometry.vao = Some(vao);

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    std::mem::size_of_val(vertices),
                ),
                glow::STATIC_DRAW,
            );
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    indices.as_ptr() as *const u8,
                    std::mem::size_of_val(indices),
                ),
                glow::STATIC_DRAW,
            );

            Vertex::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        }

        log::debug!(
            "Uploaded geometry: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        geometry.index_count = indices.len();
        Ok(geometry)
    }

    /// Uploads mesh data that was already parsed on the CPU.
    pub fn from_mesh(gl: &Arc<glow::Context>, mesh: &MeshData) -> Result<Self, GeometryError> {
        Self::new(gl, &mesh.vertices, &mesh.indices)
    }

    /// Parses a triangulated Wavefront OBJ file and uploads it.
    pub fn load(gl: &Arc<glow::Context>, path: &Path) -> Result<Self, GeometryError> {
        let mesh = MeshData::from_obj_file(path)?;
        log::info!(
            "Loaded {:?}: {} triangles",
            path,
            mesh.indices.len() / 3
        );
        Self::from_mesh(gl, &mesh)
    }

    /// Releases the GPU buffers and zeroes every handle. Freeing twice is a no-op.
    pub fn free(&mut self) {
        unsafe {
            if let Some(vbo) = self.vbo.take() {
                self.gl.delete_buffer(vbo);
            }
            if let Some(ibo) = self.ibo.take() {
                self.gl.delete_buffer(ibo);
            }
            if let Some(vao) = self.vao.take() {
                self.gl.delete_vertex_array(vao);
            }
        }
        self.index_count = 0;
    }

    /// Returns the amount of indices used in the geometry.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn vertex_array(&self) -> Option<glow::VertexArray> {
        self.vao
    }

    pub fn vertex_buffer(&self) -> Option<glow::Buffer> {
        self.vbo
    }

    pub fn index_buffer(&self) -> Option<glow::Buffer> {
        self.ibo
    }

    /// Whether the geometry still owns its buffers.
    pub fn is_live(&self) -> bool {
        self.vao.is_some()
    }

    pub(super) fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

impl Drop for Geometry {
    fn drop(&mut self) {
        self.free();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_attribute_table() {
        assert_eq!(offset_of!(Vertex, position), 0);
        assert_eq!(offset_of!(Vertex, color), 16);
        assert_eq!(offset_of!(Vertex, uv), 32);
        assert_eq!(offset_of!(Vertex, normal), 40);
        assert_eq!(Vertex::STRIDE, 56);
    }

    #[test]
    fn new_vertex_sets_homogeneous_w() {
        let v = Vertex::new(Vec3::new(1.0, 2.0, 3.0), Vec4::ONE, Vec2::new(0.5, 1.0), Vec3::Z);
        assert_eq!(v.position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(v.normal, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(v.uv, [0.5, 1.0]);
    }

    // Same state `new` leaves behind when the vertex array can't be created.
    #[cfg(feature = "gl-tests")]
    #[test]
    fn dropping_a_partly_built_geometry_releases_its_buffers() {
        use crate::{
            abs::{App, LogSink},
            config::{RenderConfig, WindowConfig},
        };

        let window = WindowConfig {
            hidden: true,
            vsync: false,
            ..Default::default()
        };
        let app = App::new(&window, &RenderConfig::default(), LogSink).expect("GL context");
        let gl = &app.gl;

        let (vbo, ibo) = unsafe { (gl.create_buffer().unwrap(), gl.create_buffer().unwrap()) };
        unsafe {
            // a name only becomes a buffer object once it has been bound
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(ibo));
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        drop(Geometry {
            gl: Arc::clone(gl),
            vao: None,
            vbo: Some(vbo),
            ibo: Some(ibo),
            index_count: 0,
        });

        unsafe {
            assert!(!gl.is_buffer(vbo));
            assert!(!gl.is_buffer(ibo));
        }
        app.term();
    }
}
