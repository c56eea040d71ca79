//! The single draw call every frame goes through.

use glow::HasContext;

use super::{Geometry, ShaderProgram};

/// Issues one indexed triangle-list draw of `geometry` with `program`.
///
/// Freed resources are skipped with a warning.
pub fn draw(program: &ShaderProgram, geometry: &Geometry) {
    let Some(vao) = geometry.vertex_array().filter(|_| program.is_live()) else {
        log::warn!("Skipping draw call with a freed shader program or geometry");
        return;
    };

    program.use_program();
    let gl = geometry.gl();
    unsafe {
        gl.bind_vertex_array(Some(vao));
        gl.draw_elements(
            glow::TRIANGLES,
            geometry.index_count() as i32,
            glow::UNSIGNED_INT,
            0,
        );
        gl.bind_vertex_array(None);
    }
}
