use nimble_core::{InputState, Scene, Time};

use crate::components::OverlayCanvas;
use crate::physics::PhysicsBackend;

/// Everything play-mode processors share besides the registry.
///
/// Passed to every processor as its resource bundle, so fields are public
/// and borrowed independently.
pub struct Stage {
    /// The play copy of the editor scene.
    pub scene: Scene,
    pub physics: Box<dyn PhysicsBackend>,
    pub input: InputState,
    pub overlay: OverlayCanvas,
    pub time: Time,
}

impl Stage {
    pub fn new(scene: Scene, physics: Box<dyn PhysicsBackend>, overlay: OverlayCanvas) -> Self {
        Self {
            scene,
            physics,
            input: InputState::new(),
            overlay,
            time: Time::default(),
        }
    }
}
