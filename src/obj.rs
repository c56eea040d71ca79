//! Wavefront OBJ import.
//!
//! Only triangle meshes are accepted. Every face corner becomes its own vertex,
//! so a file with N faces always yields 3N vertices indexed `0..3N`.

use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

use glam::{Vec2, Vec3, Vec4};

use crate::{abs::Vertex, mesh::MeshData};

#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("failed to load OBJ {path:?}: {source}")]
    Load {
        path: PathBuf,
        source: tobj::LoadError,
    },
    #[error("failed to parse OBJ: {0}")]
    Parse(#[from] tobj::LoadError),
    #[error("face {face} of model '{model}' has {arity} vertices, only triangles are supported")]
    NonTriangularFace {
        model: String,
        face: usize,
        arity: u32,
    },
    #[error("model '{model}' has {attribute} on only some faces ({found} of {expected} values)")]
    PartialAttribute {
        model: String,
        attribute: &'static str,
        found: usize,
        expected: usize,
    },
    #[error("OBJ contains no faces")]
    Empty,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: false,
        ..Default::default()
    }
}

impl MeshData {
    /// Reads and converts the OBJ file at `path`. Materials are ignored.
    pub fn from_obj_file(path: &Path) -> Result<Self, ObjError> {
        let (models, _materials) =
            tobj::load_obj(path, &load_options()).map_err(|source| ObjError::Load {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_models(&models)
    }

    /// Parses OBJ text from `reader`. `mtllib` statements are ignored.
    pub fn from_obj_reader<R: BufRead>(reader: &mut R) -> Result<Self, ObjError> {
        let (models, _materials) =
            tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))?;
        Self::from_models(&models)
    }

    /// Flattens the models, in file order, into one triangle list.
    ///
    /// Vertex colours are imported when the file has them (`v x y z r g b`),
    /// otherwise vertices are white. Missing UVs and normals read as zero.
    pub fn from_models(models: &[tobj::Model]) -> Result<Self, ObjError> {
        let mut vertices = Vec::new();

        for model in models {
            let mesh = &model.mesh;

            // face_arities stays empty when every face is a triangle
            if let Some((face, &arity)) = mesh
                .face_arities
                .iter()
                .enumerate()
                .find(|(_, arity)| **arity != 3)
            {
                return Err(ObjError::NonTriangularFace {
                    model: model.name.clone(),
                    face,
                    arity,
                });
            }

            // tobj only emits attributes for corners that reference them, so a
            // partial array can't be matched back to its vertices
            let vertex_count = mesh.positions.len() / 3;
            for (attribute, values, width) in [
                ("texture coordinates", &mesh.texcoords, 2),
                ("normals", &mesh.normals, 3),
                ("vertex colours", &mesh.vertex_color, 3),
            ] {
                if !values.is_empty() && values.len() != vertex_count * width {
                    return Err(ObjError::PartialAttribute {
                        model: model.name.clone(),
                        attribute,
                        found: values.len() / width,
                        expected: vertex_count,
                    });
                }
            }

            vertices.reserve(mesh.indices.len());
            for &index in &mesh.indices {
                let i = index as usize;
                let position = Vec3::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                );
                let color = match mesh.vertex_color.get(3 * i..3 * i + 3) {
                    Some(rgb) => Vec4::new(rgb[0], rgb[1], rgb[2], 1.0),
                    None => Vec4::ONE,
                };
                let uv = match mesh.texcoords.get(2 * i..2 * i + 2) {
                    Some(uv) => Vec2::new(uv[0], uv[1]),
                    None => Vec2::ZERO,
                };
                let normal = match mesh.normals.get(3 * i..3 * i + 3) {
                    Some(n) => Vec3::new(n[0], n[1], n[2]),
                    None => Vec3::ZERO,
                };
                vertices.push(Vertex::new(position, color, uv, normal));
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::Empty);
        }

        let indices = (0..vertices.len() as u32).collect();
        Ok(Self { vertices, indices })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Write};

    use super::*;

    fn parse(text: &str) -> Result<MeshData, ObjError> {
        MeshData::from_obj_reader(&mut BufReader::new(text.as_bytes()))
    }

    const SQUARE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn every_corner_becomes_a_vertex() {
        let mesh = parse(SQUARE).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, (0..6).collect::<Vec<u32>>());
        // shared corners are duplicated rather than reused
        assert_eq!(mesh.vertices[0], mesh.vertices[3]);
        assert_eq!(mesh.vertices[2], mesh.vertices[4]);
    }

    #[test]
    fn attributes_are_copied_in_order() {
        let mesh = parse(SQUARE).unwrap();
        let v = &mesh.vertices[1];
        assert_eq!(v.position, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(v.uv, [1.0, 0.0]);
        assert_eq!(v.normal, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(v.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn quads_are_rejected() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 2 3 4
";
        match parse(text) {
            Err(ObjError::NonTriangularFace { face, arity, .. }) => {
                assert_eq!(face, 1);
                assert_eq!(arity, 4);
            }
            other => panic!("expected NonTriangularFace, got {other:?}"),
        }
    }

    #[test]
    fn missing_uvs_and_normals_read_as_zero() {
        let mesh = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        for v in &mesh.vertices {
            assert_eq!(v.uv, [0.0, 0.0]);
            assert_eq!(v.normal, [0.0; 4]);
        }
    }

    #[test]
    fn vertex_colors_are_imported() {
        let mesh = parse("v 0 0 0 1 0 0\nv 1 0 0 0 1 0\nv 0 1 0 0 0 1\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[1].color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[2].color, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn objects_are_concatenated() {
        let text = "\
o first
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
o second
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
f 6 5 4
";
        let mesh = parse(text).unwrap();
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.indices, (0..9).collect::<Vec<u32>>());
        assert_eq!(mesh.vertices[3].position, [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn faces_mixing_uvs_and_none_are_rejected() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vt 0.25 0.75
vt 0.5 0.5
vt 0.9 0.9
f 1 2 3
f 2/1 4/2 3/3
";
        match parse(text) {
            Err(ObjError::PartialAttribute {
                attribute,
                found,
                expected,
                ..
            }) => {
                assert_eq!(attribute, "texture coordinates");
                assert_eq!(found, 3);
                assert_eq!(expected, 6);
            }
            other => panic!("expected PartialAttribute, got {other:?}"),
        }
    }

    #[test]
    fn faces_mixing_normals_and_none_are_rejected() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
f 3 2 1
";
        assert!(matches!(
            parse(text),
            Err(ObjError::PartialAttribute {
                attribute: "normals",
                ..
            })
        ));
    }

    #[test]
    fn uvs_on_every_face_stay_aligned() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
vt 0.25 0.75
vt 0.5 0.5
vt 0.9 0.9
f 1/3 2/2 3/1
f 2/1 4/2 3/3
";
        let mesh = parse(text).unwrap();
        let uvs: Vec<[f32; 2]> = mesh.vertices.iter().map(|v| v.uv).collect();
        assert_eq!(
            uvs,
            vec![
                [0.9, 0.9],
                [0.5, 0.5],
                [0.25, 0.75],
                [0.25, 0.75],
                [0.5, 0.5],
                [0.9, 0.9],
            ]
        );
    }

    #[test]
    fn file_without_faces_is_empty() {
        assert!(matches!(parse("v 0 0 0\n"), Err(ObjError::Empty)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
        file.write_all(SQUARE.as_bytes()).unwrap();
        let mesh = MeshData::from_obj_file(file.path()).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.obj");
        match MeshData::from_obj_file(&path) {
            Err(ObjError::Load { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Load error, got {other:?}"),
        }
    }

    #[test]
    fn bundled_meshes_load() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("res/cube.obj");
        let mesh = MeshData::from_obj_file(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices.len(), 36);

        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("res/tri.obj");
        let mesh = MeshData::from_obj_file(&path).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }
}
