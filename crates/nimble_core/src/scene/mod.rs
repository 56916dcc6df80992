//! Editor scene: camera, models with observers, and the ordered object set.

pub mod camera;
pub mod component;
pub mod model;
pub mod objects;
pub mod serialize;

pub use camera::{CameraPreset, OrbitCamera, Spherical};
pub use component::{ComponentSpec, Slot, SlotKind, SlotValue, CUSTOM_KEY_PREFIX};
pub use model::{Model, ModelObserver, ObserverHandle, SharedModelObserver};
pub use objects::{Clipboard, Scene, SceneObserver, SharedSceneObserver};
pub use serialize::{load_scene, save_scene, ModelDocument, SceneDocument};
