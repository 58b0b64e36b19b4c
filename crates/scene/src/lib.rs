//! Scene data: the single renderable object and everything fixed about it.
//!
//! The scene is one mesh (a retro computer) placed at a fixed pose and lit by
//! one static directional light. Mesh data is uploaded once and the CPU copy
//! is dropped by the caller.
//!
//! # Invariants
//! - All four vertex attribute arrays describe the same vertex count.
//! - The vertex count is a multiple of 3 (non-indexed triangle list).
//! - Placement and light rig never change after setup, so a shadow map built
//!   from them stays valid for the whole session.

pub mod config;
pub mod fallback;
pub mod loader;
pub mod mesh;
pub mod placement;

pub use config::{ConfigError, MeshSource, SceneConfig, WindowConfig};
pub use loader::{LoadError, load_mesh, parse_mesh};
pub use mesh::{MeshBuffers, MeshBuilder, MeshError};
pub use placement::{LightRig, Placement};

pub fn crate_info() -> &'static str {
    "retroscene-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
