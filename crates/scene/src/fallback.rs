//! Built-in retro monitor model used when no OBJ/MTL pair is configured.
//!
//! The model follows the same conventions as the authored asset: the screen
//! faces object +X, its vertices are marked with [`SCREEN_COLOR`], and its
//! texture coordinates span the screen UV window the fragment shader expects
//! (U runs bottom to top, V runs right to left as seen by the viewer).

use crate::mesh::{MeshBuffers, MeshBuilder, MeshError};
use glam::Vec3;

/// Vertex color the fragment shader treats as "this is the CRT".
pub const SCREEN_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
/// Lower corner of the screen region in texture space.
pub const SCREEN_UV_MIN: [f32; 2] = [0.402778, 0.5225];
/// Upper corner of the screen region in texture space.
pub const SCREEN_UV_MAX: [f32; 2] = [0.597222, 0.7275];

const CASE_COLOR: [f32; 3] = [0.62, 0.58, 0.48];
const STAND_COLOR: [f32; 3] = [0.45, 0.42, 0.36];
const DESK_COLOR: [f32; 3] = [0.28, 0.2, 0.14];

const CASE_CENTER: Vec3 = Vec3::new(-0.05, 0.2, 0.0);
const CASE_HALF: Vec3 = Vec3::new(0.4, 0.45, 0.55);
const STAND_CENTER: Vec3 = Vec3::new(-0.05, -0.32, 0.0);
const STAND_HALF: Vec3 = Vec3::new(0.3, 0.07, 0.4);
const DESK_CENTER: Vec3 = Vec3::new(0.0, -0.41, 0.0);
const DESK_HALF: Vec3 = Vec3::new(0.45, 0.02, 0.9);

// Sits just proud of the case front (x = 0.35) to avoid z-fighting.
const SCREEN_CENTER: Vec3 = Vec3::new(0.352, 0.25, 0.0);
const SCREEN_HALF_WIDTH: f32 = 0.42;
const SCREEN_HALF_HEIGHT: f32 = 0.32;

// (outward normal, u, v) with u x v = normal, so corners listed
// (-u-v, +u-v, +u+v, -u+v) wind counter-clockwise seen from outside.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Build the fallback monitor: case, stand, desk slab and screen quad.
pub fn retro_monitor() -> Result<MeshBuffers, MeshError> {
    let mut builder = MeshBuilder::new();

    push_box(&mut builder, CASE_CENTER, CASE_HALF, CASE_COLOR, true);
    push_box(&mut builder, STAND_CENTER, STAND_HALF, STAND_COLOR, false);
    push_box(&mut builder, DESK_CENTER, DESK_HALF, DESK_COLOR, false);

    let (u, v) = (Vec3::NEG_Z * SCREEN_HALF_WIDTH, Vec3::Y * SCREEN_HALF_HEIGHT);
    let corners = [
        SCREEN_CENTER - u - v,
        SCREEN_CENTER + u - v,
        SCREEN_CENTER + u + v,
        SCREEN_CENTER - u + v,
    ];
    push_quad(
        &mut builder,
        corners,
        corners.map(screen_uv),
        Vec3::X,
        SCREEN_COLOR,
    );

    builder.build()
}

/// Texture coordinate of a point on the screen plane.
fn screen_uv(p: Vec3) -> [f32; 2] {
    let center = [
        (SCREEN_UV_MIN[0] + SCREEN_UV_MAX[0]) * 0.5,
        (SCREEN_UV_MIN[1] + SCREEN_UV_MAX[1]) * 0.5,
    ];
    let half = [
        (SCREEN_UV_MAX[0] - SCREEN_UV_MIN[0]) * 0.5,
        (SCREEN_UV_MAX[1] - SCREEN_UV_MIN[1]) * 0.5,
    ];
    let up = (p.y - SCREEN_CENTER.y) / SCREEN_HALF_HEIGHT;
    let left = (p.z - SCREEN_CENTER.z) / SCREEN_HALF_WIDTH;
    [center[0] + up * half[0], center[1] + left * half[1]]
}

fn push_box(builder: &mut MeshBuilder, center: Vec3, half: Vec3, color: [f32; 3], bezel: bool) {
    for (normal, u, v) in FACES {
        let face_center = center + normal * half.dot(normal.abs());
        let u = u * half.dot(u.abs());
        let v = v * half.dot(v.abs());
        let corners = [
            face_center - u - v,
            face_center + u - v,
            face_center + u + v,
            face_center - u + v,
        ];
        // The front face shares the screen's UV mapping so the glow pass
        // can light the bezel around the tube.
        let uvs = if bezel && normal == Vec3::X {
            corners.map(screen_uv)
        } else {
            [[0.0, 0.0]; 4]
        };
        push_quad(builder, corners, uvs, normal, color);
    }
}

fn push_quad(
    builder: &mut MeshBuilder,
    corners: [Vec3; 4],
    uvs: [[f32; 2]; 4],
    normal: Vec3,
    color: [f32; 3],
) {
    for i in [0, 1, 2, 0, 2, 3] {
        builder.push(corners[i], uvs[i], normal, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices(mesh: &MeshBuffers) -> Vec<(Vec3, [f32; 2], Vec3, [f32; 3])> {
        (0..mesh.vertex_count())
            .map(|i| {
                (
                    Vec3::from_slice(&mesh.positions()[i * 3..]),
                    [mesh.texcoords()[i * 2], mesh.texcoords()[i * 2 + 1]],
                    Vec3::from_slice(&mesh.normals()[i * 3..]),
                    [
                        mesh.colors()[i * 3],
                        mesh.colors()[i * 3 + 1],
                        mesh.colors()[i * 3 + 2],
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn monitor_is_a_valid_triangle_list() {
        let mesh = retro_monitor().unwrap();
        // 3 boxes * 6 faces + 1 screen quad, 2 triangles each.
        assert_eq!(mesh.triangle_count(), (3 * 6 + 1) * 2);
    }

    #[test]
    fn triangles_wind_outward() {
        let verts = vertices(&retro_monitor().unwrap());
        for tri in verts.chunks_exact(3) {
            let face = (tri[1].0 - tri[0].0).cross(tri[2].0 - tri[0].0);
            assert!(face.dot(tri[0].2) > 0.0);
        }
    }

    #[test]
    fn screen_vertices_cover_uv_window() {
        let verts = vertices(&retro_monitor().unwrap());
        let screen: Vec<_> = verts.iter().filter(|v| v.3 == SCREEN_COLOR).collect();
        assert_eq!(screen.len(), 6);
        for (_, uv, _, _) in &screen {
            assert!(uv[0] >= SCREEN_UV_MIN[0] - 1e-5 && uv[0] <= SCREEN_UV_MAX[0] + 1e-5);
            assert!(uv[1] >= SCREEN_UV_MIN[1] - 1e-5 && uv[1] <= SCREEN_UV_MAX[1] + 1e-5);
        }
    }

    #[test]
    fn screen_top_left_maps_to_uv_max() {
        // Viewer's top-left is object (+y, +z) because the object is yawed -90 degrees.
        let top_left = SCREEN_CENTER + Vec3::new(0.0, SCREEN_HALF_HEIGHT, SCREEN_HALF_WIDTH);
        let uv = screen_uv(top_left);
        assert!((uv[0] - SCREEN_UV_MAX[0]).abs() < 1e-5);
        assert!((uv[1] - SCREEN_UV_MAX[1]).abs() < 1e-5);
    }

    #[test]
    fn only_the_screen_uses_the_marker_color() {
        let verts = vertices(&retro_monitor().unwrap());
        for (_, _, _, color) in verts.iter().filter(|v| v.3 != SCREEN_COLOR) {
            assert!(!(color[0] > 0.9 && color[1] < 0.1));
        }
    }
}
