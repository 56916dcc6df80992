//! Live ECS components used in play mode.
//!
//! | Component           | Registry key                 | Built from                   |
//! |---------------------|------------------------------|------------------------------|
//! | [`PhysicsComponent`]| type key                     | `ComponentSpec::Physics`     |
//! | [`CustomComponent`] | `custom_<script>` (string)   | `ComponentSpec::Custom`      |
//! | [`CameraComponent`] | type key                     | the editor camera            |
//! | [`OverlayComponent`]| type key                     | added by the host or scripts |
//!
//! Components never own their model.  They live on the model's entity and
//! the model is found again through `Scene::model_by_entity`.

use nimble_core::{Color, ComponentSpec, OrbitCamera, CUSTOM_KEY_PREFIX};
use nimble_ecs::{Component, ComponentKey, Entity, Registry};

use crate::physics::BodyHandle;

// ─── Physics ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsComponent {
    pub mass: f32,
    pub friction: f32,
    pub is_static: bool,
    /// Simulation body, once the physics processor has created it.
    pub body: Option<BodyHandle>,
    pub model: Entity,
}

impl Component for PhysicsComponent {}

impl PhysicsComponent {
    pub fn new(model: Entity, mass: f32, friction: f32, is_static: bool) -> Self {
        Self {
            mass,
            friction,
            is_static,
            body: None,
            model,
        }
    }
}

// ─── Custom scripts ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CustomComponent {
    pub id: u64,
    pub script: Option<String>,
    pub model: Entity,
}

impl Component for CustomComponent {}

impl CustomComponent {
    /// Registry key shared by every component running `script`.
    pub fn key_for(script: Option<&str>) -> ComponentKey {
        ComponentKey::named(format!("{CUSTOM_KEY_PREFIX}{}", script.unwrap_or_default()))
    }

    pub fn key(&self) -> ComponentKey {
        Self::key_for(self.script.as_deref())
    }
}

/// Script path encoded in a custom-component key, `None` for other keys.
/// An empty path (no script chosen) yields `Some("")`.
pub fn script_of_key(key: &ComponentKey) -> Option<&str> {
    match key {
        ComponentKey::Named(name) => name.strip_prefix(CUSTOM_KEY_PREFIX),
        ComponentKey::Type(..) => None,
    }
}

/// Attach the live counterpart of `spec` to `entity`.
pub fn attach_spec(
    registry: &mut Registry,
    entity: Entity,
    spec: &ComponentSpec,
) -> Result<(), nimble_ecs::EcsError> {
    match spec {
        ComponentSpec::Physics {
            mass,
            friction,
            is_static,
        } => registry.add_component(
            entity,
            PhysicsComponent::new(entity, *mass, *friction, *is_static),
        ),
        ComponentSpec::Custom { id, script } => registry.add_component_as(
            entity,
            CustomComponent::key_for(script.as_deref()),
            CustomComponent {
                id: *id,
                script: script.clone(),
                model: entity,
            },
        ),
    }
}

// ─── Camera ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CameraComponent {
    pub camera: OrbitCamera,
}

impl Component for CameraComponent {}

/// Camera lookup on the registry.
pub trait ActiveCamera {
    /// The first camera component, `None` when there is none.
    fn active_camera(&self) -> Option<&OrbitCamera>;
    fn active_camera_mut(&mut self) -> Option<&mut OrbitCamera>;
}

impl ActiveCamera for Registry {
    fn active_camera(&self) -> Option<&OrbitCamera> {
        self.get_component::<CameraComponent>()
            .next()
            .map(|(_, c)| &c.camera)
    }

    fn active_camera_mut(&mut self) -> Option<&mut OrbitCamera> {
        self.get_component_mut::<CameraComponent>()
            .next()
            .map(|(_, c)| &mut c.camera)
    }
}

// ─── Overlays ──────────────────────────────────────────────────────────────

/// One 2D draw command on the overlay canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    Text {
        text: String,
        position: (f32, f32),
        font_size: f32,
        color: Color,
    },
}

/// Transparent layer composited over the 3D view.  Cleared every tick and
/// redrawn by the overlay processor; the host uploads `items` to the GPU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayCanvas {
    pub width: u32,
    pub height: u32,
    pub items: Vec<OverlayItem>,
}

impl OverlayCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn draw_text(&mut self, text: &str, position: (f32, f32), font_size: f32, color: Color) {
        self.items.push(OverlayItem::Text {
            text: text.to_string(),
            position,
            font_size,
            color,
        });
    }
}

pub trait Overlay {
    fn draw(&self, canvas: &mut OverlayCanvas);
}

pub struct OverlayComponent(pub Box<dyn Overlay>);

impl Component for OverlayComponent {}

impl OverlayComponent {
    pub fn new(overlay: impl Overlay + 'static) -> Self {
        Self(Box::new(overlay))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub font_size: f32,
    /// Top-left corner in canvas pixels.
    pub position: (f32, f32),
    pub color: Color,
}

impl TextOverlay {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 32.0,
            position: (0.0, 0.0),
            color: Color::WHITE,
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = (x, y);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Overlay for TextOverlay {
    fn draw(&self, canvas: &mut OverlayCanvas) {
        canvas.draw_text(&self.text, self.position, self.font_size, self.color);
    }
}
