use std::path::PathBuf;

use nimble_core::SceneError;
use nimble_ecs::EcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failures of user scripts.  These are logged, never propagated out of a
/// tick.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("no script registered for `{0}`")]
    NotFound(String),
    #[error("script `{path}` failed to load: {reason}")]
    Load { path: String, reason: String },
    #[error("{0}")]
    Runtime(String),
}

impl ScriptError {
    pub fn runtime(message: impl Into<String>) -> Self {
        ScriptError::Runtime(message.into())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot copy the scene for play mode: {0}")]
    Copy(#[from] SceneError),
    #[error(transparent)]
    Ecs(#[from] EcsError),
}
