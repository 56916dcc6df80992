use thiserror::Error;

/// Errors raised by scene-level operations that can legitimately fail.
///
/// Index lookups that fall out of range are not errors; they return `None`.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no component at index {0}")]
    NoSuchComponent(usize),
    #[error("component has no slot {0}")]
    NoSuchSlot(usize),
    #[error("slot `{label}` expects a {expected} value")]
    SlotType {
        label: &'static str,
        expected: &'static str,
    },
    #[error("failed to encode scene: {0}")]
    Encode(#[from] ron::Error),
    #[error("failed to decode scene: {0}")]
    Decode(#[from] ron::error::SpannedError),
    #[error("scene document is inconsistent: {0}")]
    Document(String),
}
