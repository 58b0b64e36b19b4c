//! wgpu backend for the retro computer scene.
//!
//! Setup builds everything once: four vertex buffers, the scene pipeline, a
//! static shadow map and the mipmapped text texture. Afterwards the
//! [`ScenePresenter`] only uploads text and uniforms and issues one draw.
//!
//! # Invariants
//! - The shadow map is rendered exactly once; light and caster never move.
//! - Setup failures are fatal and reported as [`SetupError`]; there is no
//!   fallback rendering path.
//! - Vertex buffer slot `n` feeds shader location `n`.

mod context;
mod error;
mod pipeline;
mod presenter;
mod setup;
mod shaders;
mod shadow;
mod text_texture;

pub use context::GpuContext;
pub use error::SetupError;
pub use presenter::{CLEAR_COLOR, ScenePresenter};
pub use setup::{SceneResources, load_scene_mesh};
pub use shaders::{ATTRIBUTE_NAMES, SCENE_SHADER, SHADOW_SHADER, TEXTURE_NAMES, UNIFORM_NAMES};
pub use shadow::ShadowMap;
pub use text_texture::TextTexture;

pub fn crate_info() -> &'static str {
    "retroscene-render-wgpu v0.1.0"
}
