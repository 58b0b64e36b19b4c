//! OBJ/MTL import into a flat, non-indexed triangle list.
//!
//! The object description must reference a material library (`mtllib`); the
//! reference is always resolved to the explicitly supplied material file, so
//! an object and its material travel as a pair regardless of the name inside
//! the OBJ.

use crate::mesh::{MeshBuffers, MeshBuilder, MeshError};
use glam::Vec3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Color used for faces without a resolvable material.
const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Errors from mesh import.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("MTL parse error: {0}")]
    Material(tobj::LoadError),
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),
    #[error("object contains no triangles")]
    Empty,
    #[error("mesh '{model}' has {attribute} for only some vertices ({len} floats, expected {expected})")]
    PartialAttribute {
        model: String,
        attribute: &'static str,
        len: usize,
        expected: usize,
    },
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Load an object/material file pair from disk.
pub fn load_mesh(
    object: impl AsRef<Path>,
    material: impl AsRef<Path>,
) -> Result<MeshBuffers, LoadError> {
    let object = object.as_ref();
    let material = material.as_ref().to_path_buf();
    info!(
        "loading mesh {} with materials {}",
        object.display(),
        material.display()
    );

    let mut reader = BufReader::new(File::open(object)?);
    let (models, materials) =
        tobj::load_obj_buf(&mut reader, &load_options(), |_| tobj::load_mtl(&material))?;
    let materials = materials.map_err(LoadError::Material)?;
    build_mesh(&models, &materials)
}

/// Parse an object/material pair from in-memory readers.
pub fn parse_mesh<O: BufRead, M: BufRead>(
    object: &mut O,
    material: &mut M,
) -> Result<MeshBuffers, LoadError> {
    let library = tobj::load_mtl_buf(material).map_err(LoadError::Material)?;
    let (models, materials) =
        tobj::load_obj_buf(object, &load_options(), |_| Ok(library.clone()))?;
    let materials = materials.map_err(LoadError::Material)?;
    build_mesh(&models, &materials)
}

fn build_mesh(
    models: &[tobj::Model],
    materials: &[tobj::Material],
) -> Result<MeshBuffers, LoadError> {
    let mut builder = MeshBuilder::new();

    for model in models {
        let mesh = &model.mesh;
        let vertex_count = mesh.positions.len() / 3;
        let has_texcoords =
            attribute_present(&model.name, "texcoords", &mesh.texcoords, 2, vertex_count)?;
        let has_normals =
            attribute_present(&model.name, "normals", &mesh.normals, 3, vertex_count)?;
        if !has_normals {
            warn!("mesh '{}' has no normals, using flat face normals", model.name);
        }

        let color = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .and_then(|m| m.diffuse)
            .unwrap_or_else(|| {
                warn!("mesh '{}' has no diffuse material, using white", model.name);
                DEFAULT_COLOR
            });

        for triangle in mesh.indices.chunks_exact(3) {
            let corners = triangle_corners(triangle, &mesh.positions);
            let face_normal = (corners[1] - corners[0])
                .cross(corners[2] - corners[0])
                .normalize_or_zero();

            for (corner, &index) in corners.iter().zip(triangle) {
                let i = index as usize;
                let texcoord = if has_texcoords {
                    [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
                } else {
                    [0.0, 0.0]
                };
                let normal = if has_normals {
                    Vec3::from_slice(&mesh.normals[i * 3..i * 3 + 3])
                } else {
                    face_normal
                };
                builder.push(*corner, texcoord, normal, color);
            }
        }
    }

    if builder.vertex_count() == 0 {
        return Err(LoadError::Empty);
    }
    let mesh = builder.build()?;
    info!(
        "mesh loaded: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Whether an optional per-vertex stream is present. With single indexing,
/// faces that omit the stream leave it shorter than the position stream, and
/// the remaining entries can no longer be matched to their vertices.
fn attribute_present(
    model: &str,
    attribute: &'static str,
    data: &[f32],
    width: usize,
    vertex_count: usize,
) -> Result<bool, LoadError> {
    if data.is_empty() {
        return Ok(false);
    }
    let expected = vertex_count * width;
    if data.len() != expected {
        return Err(LoadError::PartialAttribute {
            model: model.to_owned(),
            attribute,
            len: data.len(),
            expected,
        });
    }
    Ok(true)
}

fn triangle_corners(triangle: &[u32], positions: &[f32]) -> [Vec3; 3] {
    [0, 1, 2].map(|k| {
        let i = triangle[k] as usize * 3;
        Vec3::from_slice(&positions[i..i + 3])
    })
}
