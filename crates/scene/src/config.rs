//! YAML scene configuration.
//!
//! Every field has a default, so an empty document (or no file at all) yields
//! a scene that renders the built-in monitor with the default banner.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Errors from reading a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "retroscene".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Wavefront OBJ describing the computer model.
    pub object: Option<PathBuf>,
    /// Material library paired with `object`.
    pub material: Option<PathBuf>,
    /// TTF/OTF used for the CRT text. System monospace fonts are tried when unset.
    pub font: Option<PathBuf>,
    pub boot_sound: Option<PathBuf>,
    pub ambient_sound: Option<PathBuf>,
    pub window: WindowConfig,
    pub shadow_map_size: u32,
    pub text_canvas_size: u32,
    /// Lines shown above the terminal prompt.
    pub banner: Vec<String>,
    /// Start in the animated retro mode rather than the static terminal view.
    pub start_retro: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            object: None,
            material: None,
            font: None,
            boot_sound: None,
            ambient_sound: None,
            window: WindowConfig::default(),
            shadow_map_size: 2048,
            text_canvas_size: 1024,
            banner: vec![
                "RETRO-80 BASIC v2.1".into(),
                "64K RAM SYSTEM  38911 BYTES FREE".into(),
                String::new(),
                "READY.".into(),
            ],
            start_retro: true,
        }
    }
}

/// Where the scene mesh comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshSource {
    Files { object: PathBuf, material: PathBuf },
    Builtin,
}

impl SceneConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        info!("scene config loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// An object without its material (or vice versa) falls back to the
    /// built-in model.
    pub fn mesh_source(&self) -> MeshSource {
        match (&self.object, &self.material) {
            (Some(object), Some(material)) => MeshSource::Files {
                object: object.clone(),
                material: material.clone(),
            },
            _ => MeshSource::Builtin,
        }
    }
}
