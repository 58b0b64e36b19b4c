use glam::Vec3;

/// Floats per vertex for each attribute stream.
pub const POSITION_WIDTH: usize = 3;
pub const TEXCOORD_WIDTH: usize = 2;
pub const NORMAL_WIDTH: usize = 3;
pub const COLOR_WIDTH: usize = 3;

/// Errors from mesh buffer validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("{name} holds {len} floats, not a multiple of {width}")]
    RaggedAttribute {
        name: &'static str,
        len: usize,
        width: usize,
    },
    #[error(
        "vertex counts differ: positions={positions} texcoords={texcoords} normals={normals} colors={colors}"
    )]
    VertexCountMismatch {
        positions: usize,
        texcoords: usize,
        normals: usize,
        colors: usize,
    },
    #[error("{vertices} vertices do not form a triangle list")]
    NotTriangleList { vertices: usize },
}

/// Four parallel vertex attribute streams for one non-indexed triangle list.
///
/// Only constructible through [`MeshBuffers::new`] or [`MeshBuilder::build`],
/// both of which enforce the equal-vertex-count invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    positions: Vec<f32>,
    texcoords: Vec<f32>,
    normals: Vec<f32>,
    colors: Vec<f32>,
}

impl MeshBuffers {
    /// Validate and wrap the four attribute streams.
    pub fn new(
        positions: Vec<f32>,
        texcoords: Vec<f32>,
        normals: Vec<f32>,
        colors: Vec<f32>,
    ) -> Result<Self, MeshError> {
        let positions_count = vertex_count("positions", &positions, POSITION_WIDTH)?;
        let texcoords_count = vertex_count("texcoords", &texcoords, TEXCOORD_WIDTH)?;
        let normals_count = vertex_count("normals", &normals, NORMAL_WIDTH)?;
        let colors_count = vertex_count("colors", &colors, COLOR_WIDTH)?;

        if positions_count != texcoords_count
            || positions_count != normals_count
            || positions_count != colors_count
        {
            return Err(MeshError::VertexCountMismatch {
                positions: positions_count,
                texcoords: texcoords_count,
                normals: normals_count,
                colors: colors_count,
            });
        }
        if positions_count % 3 != 0 {
            return Err(MeshError::NotTriangleList {
                vertices: positions_count,
            });
        }

        Ok(Self {
            positions,
            texcoords,
            normals,
            colors,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_WIDTH
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn texcoords(&self) -> &[f32] {
        &self.texcoords
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Axis-aligned bounds of the positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self
            .positions
            .chunks_exact(POSITION_WIDTH)
            .map(Vec3::from_slice);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

fn vertex_count(name: &'static str, data: &[f32], width: usize) -> Result<usize, MeshError> {
    if data.len() % width != 0 {
        return Err(MeshError::RaggedAttribute {
            name,
            len: data.len(),
            width,
        });
    }
    Ok(data.len() / width)
}

/// Incremental builder that appends whole vertices, so streams cannot drift.
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    positions: Vec<f32>,
    texcoords: Vec<f32>,
    normals: Vec<f32>,
    colors: Vec<f32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Vec3, texcoord: [f32; 2], normal: Vec3, color: [f32; 3]) {
        self.positions.extend_from_slice(&position.to_array());
        self.texcoords.extend_from_slice(&texcoord);
        self.normals.extend_from_slice(&normal.to_array());
        self.colors.extend_from_slice(&color);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_WIDTH
    }

    pub fn build(self) -> Result<MeshBuffers, MeshError> {
        MeshBuffers::new(self.positions, self.texcoords, self.normals, self.colors)
    }
}
