use thiserror::Error;

use crate::entity::Entity;

/// Error type returned by processors.  Any error converts into it with `?`.
pub type BoxError = Box<dyn std::error::Error>;

#[derive(Debug, Error)]
pub enum EcsError {
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),
    #[error("component key `{key}` stores `{stored}`, not `{requested}`")]
    KeyTypeMismatch {
        key: String,
        stored: &'static str,
        requested: &'static str,
    },
}
