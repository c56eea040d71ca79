//! CPU-side mesh data and the hand-authored shapes the viewer ships with.

use glam::{Vec2, Vec3, Vec4};

use crate::abs::Vertex;

/// Vertices and triangle-list indices, ready for [`Geometry::from_mesh`](crate::abs::Geometry::from_mesh).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// A triangle in the XY plane with red, green and blue corners.
    pub fn triangle() -> Self {
        let normal = Vec3::NEG_Z;
        Self {
            vertices: vec![
                // bottom-left
                Vertex::new(Vec3::new(-0.5, -0.5, 0.0), Vec4::new(0.0, 0.0, 1.0, 1.0), Vec2::new(0.0, 0.0), normal),
                // bottom-right
                Vertex::new(Vec3::new(0.5, -0.5, 0.0), Vec4::new(0.0, 1.0, 0.0, 1.0), Vec2::new(1.0, 0.0), normal),
                // top-center
                Vertex::new(Vec3::new(0.0, 0.5, 0.0), Vec4::new(1.0, 0.0, 0.0, 1.0), Vec2::new(0.5, 1.0), normal),
            ],
            indices: vec![2, 0, 1],
        }
    }

    /// A white full-screen quad in normalized device coordinates.
    pub fn quad() -> Self {
        let normal = Vec3::NEG_Z;
        let white = Vec4::ONE;
        Self {
            vertices: vec![
                Vertex::new(Vec3::new(-1.0, -1.0, 0.0), white, Vec2::new(0.0, 0.0), normal),
                Vertex::new(Vec3::new(1.0, -1.0, 0.0), white, Vec2::new(1.0, 0.0), normal),
                Vertex::new(Vec3::new(-1.0, 1.0, 0.0), white, Vec2::new(0.0, 1.0), normal),
                Vertex::new(Vec3::new(1.0, 1.0, 0.0), white, Vec2::new(1.0, 1.0), normal),
            ],
            indices: vec![3, 2, 0, 0, 1, 3],
        }
    }
}
