use retroscene_scene::{LoadError, MeshError};

/// Fatal setup failures. None of these has a fallback rendering path.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("no graphics context: {0}")]
    NoGraphicsContext(String),
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("render pipeline creation failed: {log}")]
    ProgramLink { log: String },
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),
    #[error("mesh has no vertices")]
    EmptyMesh,
    #[error("mesh import failed: {0}")]
    Load(LoadError),
}

impl From<LoadError> for SetupError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Mesh(mesh) => SetupError::Mesh(mesh),
            other => SetupError::Load(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_errors_inside_load_errors_are_unwrapped() {
        let err: SetupError = LoadError::Mesh(MeshError::NotTriangleList { vertices: 4 }).into();
        assert!(matches!(
            err,
            SetupError::Mesh(MeshError::NotTriangleList { vertices: 4 })
        ));
        let err: SetupError = LoadError::Empty.into();
        assert!(matches!(err, SetupError::Load(LoadError::Empty)));
    }

    #[test]
    fn messages_name_the_stage() {
        let err = SetupError::ShaderCompile {
            stage: "scene",
            log: "bad token".into(),
        };
        assert_eq!(err.to_string(), "scene shader failed to compile: bad token");
    }
}
