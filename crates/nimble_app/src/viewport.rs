//! Editor viewport: turns window input into camera motion, selection and
//! gizmo drags.
//!
//! The viewport owns the orbit camera and the transform tools.  The scene is
//! passed to every call, so the same viewport can be pointed at the editor
//! scene or at a scene just loaded from disk.
//!
//! | Input                        | Effect                                        |
//! |------------------------------|-----------------------------------------------|
//! | left press on a handle       | start an axis drag                            |
//! | left press elsewhere         | select the object under the cursor, or clear  |
//! | move with left held          | drag the active object along the held axes    |
//! | move with right held         | orbit; with Shift, pan                        |
//! | right click (no drag)        | open the context menu                         |
//! | wheel                        | zoom, rescaling the handles                   |
//! | `1` / `2` / `3`              | look from +X / +Y / +Z                        |
//! | `T`                          | free translation of the active object         |
//! | `Delete`                     | delete the active object                      |

use std::rc::Rc;

use glam::Vec3;
use nimble_core::ray_cast::get_ray;
use nimble_core::{
    AxisSet, CameraPreset, CylinderParams, Geometry, InputEvent, InputState, KeyCode, Material,
    Model, MouseButton, ObserverHandle, OrbitCamera, Renderer, Scene, TransformTools,
};

use crate::config::EditorConfig;

/// Wheel units per notch.
const WHEEL_NOTCH: f32 = 120.0;
/// Zooming out stops once the camera is this far from its target.
const MAX_ZOOM_OUT_RADIUS: f32 = 100.0;
/// Pointer travel, in pixels, that turns a click into a drag.
const DRAG_THRESHOLD: f32 = 0.1;

/// What the viewport did with an event, for the UI shell to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportResponse {
    Ignored,
    /// Selection changed to the given index, or was cleared.
    Selected(Option<usize>),
    DragStarted(AxisSet),
    /// The active object moved by this much.
    Dragged(Vec3),
    DragFinished,
    CameraMoved,
    Resized,
    ContextMenu(ContextMenu),
    /// The active object was deleted.
    Deleted(String),
}

/// Where a context menu was requested and what it applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextMenu {
    /// Empty space: offers to add primitives.
    General { x: f32, y: f32 },
    /// Over an object: offers object actions.
    Object { index: usize, name: String, x: f32, y: f32 },
}

impl ContextMenu {
    pub fn title(&self) -> String {
        match self {
            ContextMenu::General { .. } => "General actions".to_string(),
            ContextMenu::Object { name, .. } => format!("\"{name}\" actions"),
        }
    }

    pub fn actions(&self) -> &'static [MenuAction] {
        match self {
            ContextMenu::General { .. } => &[
                MenuAction::AddCube,
                MenuAction::AddSphere,
                MenuAction::AddCylinder,
            ],
            ContextMenu::Object { .. } => &[MenuAction::Delete],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddCube,
    AddSphere,
    AddCylinder,
    Delete,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::AddCube => "Add Cube",
            MenuAction::AddSphere => "Add Sphere",
            MenuAction::AddCylinder => "Add Cylinder",
            MenuAction::Delete => "Delete",
        }
    }
}

/// A new primitive with the default look.
pub fn primitive(action: MenuAction) -> Option<Model> {
    let (name, geometry) = match action {
        MenuAction::AddCube => ("Cube", Geometry::cube(Vec3::ONE)),
        MenuAction::AddSphere => ("Sphere", Geometry::sphere(0.5, 32, 16)),
        MenuAction::AddCylinder => ("Cylinder", Geometry::cylinder(CylinderParams::default())),
        MenuAction::Delete => return None,
    };
    Some(Model::new(name, Rc::new(geometry), Material::default()))
}

pub struct Viewport {
    camera: OrbitCamera,
    tools: TransformTools,
    input: InputState,
    /// Handle scale per unit of camera radius.
    zoom_to_gizmo: f32,
    /// Whether the pointer moved with a button held since the last press.
    did_drag: bool,
    observer: Option<ObserverHandle>,
}

impl Viewport {
    pub fn new(config: &EditorConfig) -> Self {
        let camera = config.camera();
        let mut tools = TransformTools::new();
        tools.set_scale(config.gizmo.scale);
        Self {
            zoom_to_gizmo: config.gizmo.scale / camera.initial_radius(),
            camera,
            tools,
            input: InputState::new(),
            did_drag: false,
            observer: None,
        }
    }

    /// Make the handles follow `scene`'s active object.
    pub fn attach(&mut self, scene: &mut Scene) {
        self.detach(scene);
        self.observer = Some(scene.register_active_obj_observer(self.tools.observer()));
        self.sync_selection(scene);
    }

    pub fn detach(&mut self, scene: &mut Scene) {
        if let Some(handle) = self.observer.take() {
            scene.unregister_active_obj_observer(handle);
        }
        self.tools.clear();
    }

    /// Show the handles on the active object, or hide them when nothing is
    /// selected.  Call after changing the selection from outside the viewport.
    pub fn sync_selection(&mut self, scene: &Scene) {
        match scene.active() {
            Some(model) => self.tools.set_active(model.position(), &self.camera),
            None => self.tools.clear(),
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn tools(&self) -> &TransformTools {
        &self.tools
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    // ── Event routing ──────────────────────────────────────────────────────

    pub fn handle_event(&mut self, scene: &mut Scene, event: &InputEvent) -> ViewportResponse {
        self.input.apply(event);
        match *event {
            InputEvent::MousePress { button, x, y } => self.mouse_pressed(scene, button, x, y),
            InputEvent::MouseMove { x, y } => self.mouse_moved(scene, x, y),
            InputEvent::MouseRelease { button, x, y } => self.mouse_released(scene, button, x, y),
            InputEvent::Scroll { delta } => self.scrolled(delta),
            InputEvent::KeyPress { key, .. } => self.key_pressed(scene, key),
            InputEvent::KeyRelease { .. } => ViewportResponse::Ignored,
            InputEvent::Resize { width, height } => {
                self.camera.resize(width, height);
                ViewportResponse::Resized
            }
        }
    }

    fn mouse_pressed(&mut self, scene: &mut Scene, button: MouseButton, x: f32, y: f32) -> ViewportResponse {
        self.did_drag = false;
        if button != MouseButton::Left {
            return ViewportResponse::Ignored;
        }

        let ray = get_ray(x, y, &self.camera);
        if scene.has_selection() {
            if let Some(axis) = self.tools.hit_test(&ray) {
                let axes = AxisSet::only(axis);
                self.tools.start_drag(axes, &self.camera);
                return ViewportResponse::DragStarted(axes);
            }
        }

        match scene.cast_ray(&ray) {
            Some((name, index)) => {
                log::debug!("picked `{name}`");
                scene.set_active(Some(index));
                self.sync_selection(scene);
                ViewportResponse::Selected(Some(index))
            }
            None => {
                scene.set_active(None);
                self.tools.clear();
                ViewportResponse::Selected(None)
            }
        }
    }

    fn mouse_moved(&mut self, scene: &mut Scene, x: f32, y: f32) -> ViewportResponse {
        let (dx, dy) = self.input.consume_mouse_delta();
        let left = self.input.is_button_down(MouseButton::Left);
        let right = self.input.is_button_down(MouseButton::Right);
        if (left || right) && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
            self.did_drag = true;
        }

        if left {
            let Some(model) = scene.active_mut() else {
                return ViewportResponse::Ignored;
            };
            match self.tools.did_drag(&self.camera, model, x, y, dx, dy) {
                Some(delta) => ViewportResponse::Dragged(delta),
                None => ViewportResponse::Ignored,
            }
        } else if right {
            if self.input.shift_held() {
                self.camera.pan(dx, dy);
            } else {
                self.camera.rotate(dx, dy);
            }
            ViewportResponse::CameraMoved
        } else {
            ViewportResponse::Ignored
        }
    }

    fn mouse_released(&mut self, scene: &mut Scene, button: MouseButton, x: f32, y: f32) -> ViewportResponse {
        let dragged = std::mem::take(&mut self.did_drag);
        let was_dragging = self.tools.is_dragging();
        self.tools.stop_drag();

        if button == MouseButton::Right && !dragged {
            let ray = get_ray(x, y, &self.camera);
            let menu = match scene.cast_ray(&ray) {
                Some((name, index)) => ContextMenu::Object { index, name, x, y },
                None => ContextMenu::General { x, y },
            };
            return ViewportResponse::ContextMenu(menu);
        }
        if was_dragging {
            ViewportResponse::DragFinished
        } else {
            ViewportResponse::Ignored
        }
    }

    fn scrolled(&mut self, delta: f32) -> ViewportResponse {
        let notches = delta / WHEEL_NOTCH;
        if notches == 0.0 {
            return ViewportResponse::Ignored;
        }
        if notches < 0.0 && self.camera.radius() >= MAX_ZOOM_OUT_RADIUS {
            return ViewportResponse::Ignored;
        }
        self.camera.zoom(notches * self.camera.radius() / 10.0);
        self.tools.set_scale(self.camera.radius() * self.zoom_to_gizmo);
        ViewportResponse::CameraMoved
    }

    fn key_pressed(&mut self, scene: &mut Scene, key: KeyCode) -> ViewportResponse {
        let preset = match key {
            KeyCode::Digit1 => Some(CameraPreset::Right),
            KeyCode::Digit2 => Some(CameraPreset::Top),
            KeyCode::Digit3 => Some(CameraPreset::Front),
            _ => None,
        };
        if let Some(preset) = preset {
            self.camera.look_from(preset);
            return ViewportResponse::CameraMoved;
        }

        match key {
            KeyCode::T if scene.has_selection() => {
                self.tools.start_translate(&self.camera);
                ViewportResponse::DragStarted(AxisSet::ALL)
            }
            KeyCode::Delete => match scene.active_index() {
                Some(index) => self.delete(scene, index),
                None => ViewportResponse::Ignored,
            },
            _ => ViewportResponse::Ignored,
        }
    }

    fn delete(&mut self, scene: &mut Scene, index: usize) -> ViewportResponse {
        let Some(model) = scene.delete_obj(index) else {
            return ViewportResponse::Ignored;
        };
        self.sync_selection(scene);
        ViewportResponse::Deleted(model.name().to_string())
    }

    /// Run a context menu entry.  Adding returns the new object's index;
    /// deleting returns `None`.
    pub fn apply_menu_action(&mut self, scene: &mut Scene, menu: &ContextMenu, action: MenuAction) -> Option<usize> {
        match (action, menu) {
            (MenuAction::Delete, ContextMenu::Object { index, .. }) => {
                scene.delete_obj(*index)?;
                self.sync_selection(scene);
                None
            }
            (MenuAction::Delete, ContextMenu::General { .. }) => None,
            (add, _) => {
                let model = primitive(add)?;
                Some(scene.add_obj(model))
            }
        }
    }

    // ── Drawing ────────────────────────────────────────────────────────────

    /// Draw the scene, then the handles on top of the active object.
    pub fn render(&mut self, scene: &mut Scene, renderer: &mut dyn Renderer) {
        scene.render(renderer, &self.camera);
        if scene.has_selection() {
            self.tools.render(renderer, &self.camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use nimble_core::scene::camera::PHI_MIN;
    use nimble_core::{Axis, DragState, Modifiers, RecordingRenderer};

    use super::*;

    fn setup() -> (Viewport, Scene) {
        let config = EditorConfig::default().with_size(800, 600);
        let mut viewport = Viewport::new(&config);
        let mut scene = Scene::new();
        scene.add_obj(primitive(MenuAction::AddCube).unwrap());
        viewport.attach(&mut scene);
        (viewport, scene)
    }

    /// Pixel where `point` appears on screen.
    fn pixel(camera: &OrbitCamera, point: Vec3) -> (f32, f32) {
        let ndc = camera.view_proj().project_point3(point);
        let (w, h) = camera.size();
        ((ndc.x + 1.0) / 2.0 * w, (1.0 - ndc.y) / 2.0 * h)
    }

    fn press(v: &mut Viewport, s: &mut Scene, button: MouseButton, (x, y): (f32, f32)) -> ViewportResponse {
        v.handle_event(s, &InputEvent::MousePress { button, x, y })
    }

    fn release(v: &mut Viewport, s: &mut Scene, button: MouseButton, (x, y): (f32, f32)) -> ViewportResponse {
        v.handle_event(s, &InputEvent::MouseRelease { button, x, y })
    }

    fn key(v: &mut Viewport, s: &mut Scene, key: KeyCode) -> ViewportResponse {
        v.handle_event(
            s,
            &InputEvent::KeyPress {
                key,
                modifiers: Modifiers::NONE,
            },
        )
    }

    #[test]
    fn click_selects_and_empty_click_clears() {
        let (mut v, mut scene) = setup();
        let centre = pixel(v.camera(), Vec3::ZERO);

        assert_eq!(press(&mut v, &mut scene, MouseButton::Left, centre), ViewportResponse::Selected(Some(0)));
        assert_eq!(scene.active_index(), Some(0));
        assert!(v.tools().is_visible());

        assert_eq!(press(&mut v, &mut scene, MouseButton::Left, (1.0, 1.0)), ViewportResponse::Selected(None));
        assert_eq!(scene.active_index(), None);
        assert!(!v.tools().is_visible());
    }

    #[test]
    fn press_on_handle_starts_axis_drag() {
        let (mut v, mut scene) = setup();
        scene.set_active(Some(0));
        v.sync_selection(&scene);

        let handle = pixel(v.camera(), Vec3::new(0.3, 0.0, 0.0));
        assert_eq!(
            press(&mut v, &mut scene, MouseButton::Left, handle),
            ViewportResponse::DragStarted(AxisSet::only(Axis::X))
        );

        let response = v.handle_event(
            &mut scene,
            &InputEvent::MouseMove {
                x: handle.0 + 25.0,
                y: handle.1,
            },
        );
        let ViewportResponse::Dragged(delta) = response else {
            panic!("expected a drag, got {response:?}");
        };
        let moved = scene.active().unwrap().position();
        assert!(delta.x > 0.0);
        assert_eq!((moved.y, moved.z), (0.0, 0.0));
        // The handles followed through the active-object observer.
        assert_eq!(v.tools().position(), moved);

        assert_eq!(release(&mut v, &mut scene, MouseButton::Left, handle), ViewportResponse::DragFinished);
        assert_eq!(v.tools().state(), DragState::Idle);
    }

    #[test]
    fn right_drag_orbits_and_shift_pans() {
        let (mut v, mut scene) = setup();
        let before = v.camera().position();
        press(&mut v, &mut scene, MouseButton::Right, (100.0, 100.0));
        let moved = v.handle_event(&mut scene, &InputEvent::MouseMove { x: 140.0, y: 100.0 });
        assert_eq!(moved, ViewportResponse::CameraMoved);
        assert_ne!(v.camera().position(), before);
        // A drag never opens the menu.
        assert_eq!(release(&mut v, &mut scene, MouseButton::Right, (140.0, 100.0)), ViewportResponse::Ignored);

        let (radius, orbited) = (v.camera().radius(), v.camera().position());
        key(&mut v, &mut scene, KeyCode::ShiftLeft);
        press(&mut v, &mut scene, MouseButton::Right, (100.0, 100.0));
        v.handle_event(&mut scene, &InputEvent::MouseMove { x: 100.0, y: 160.0 });
        assert_ne!(v.camera().position(), orbited);
        assert!((v.camera().radius() - radius).abs() < 1e-5);
    }

    #[test]
    fn right_click_opens_context_menu() {
        let (mut v, mut scene) = setup();
        let centre = pixel(v.camera(), Vec3::ZERO);
        press(&mut v, &mut scene, MouseButton::Right, centre);
        let ViewportResponse::ContextMenu(menu) = release(&mut v, &mut scene, MouseButton::Right, centre) else {
            panic!("expected a context menu");
        };
        assert_eq!(menu.title(), "\"Cube\" actions");
        assert_eq!(menu.actions(), [MenuAction::Delete]);

        press(&mut v, &mut scene, MouseButton::Right, (1.0, 1.0));
        let ViewportResponse::ContextMenu(general) = release(&mut v, &mut scene, MouseButton::Right, (1.0, 1.0)) else {
            panic!("expected a context menu");
        };
        assert_eq!(general.actions().len(), 3);
        assert_eq!(v.apply_menu_action(&mut scene, &general, MenuAction::AddCube), Some(1));
        assert_eq!(scene.names(), ["Cube", "Cube2"]);
        assert_eq!(v.apply_menu_action(&mut scene, &menu, MenuAction::Delete), None);
        assert_eq!(scene.names(), ["Cube2"]);
    }

    #[test]
    fn scroll_zooms_within_limit() {
        let (mut v, mut scene) = setup();
        assert_eq!(v.handle_event(&mut scene, &InputEvent::Scroll { delta: 120.0 }), ViewportResponse::CameraMoved);
        assert!((v.camera().radius() - 2.7).abs() < 1e-5);
        assert!((v.tools().scale() - 2.7 * 0.6 / 3.0).abs() < 1e-5);

        let config = EditorConfig::default();
        let mut far = Viewport::new(&EditorConfig {
            camera: crate::config::CameraConfig {
                radius: 150.0,
                ..config.camera.clone()
            },
            ..config
        });
        assert_eq!(far.handle_event(&mut scene, &InputEvent::Scroll { delta: -120.0 }), ViewportResponse::Ignored);
        assert_eq!(far.camera().radius(), 150.0);
        far.handle_event(&mut scene, &InputEvent::Scroll { delta: 120.0 });
        assert!((far.camera().radius() - 135.0).abs() < 1e-3);
        assert!((far.tools().scale() - 0.54).abs() < 1e-5);
    }

    #[test]
    fn keys_drive_presets_translate_and_delete() {
        let (mut v, mut scene) = setup();
        key(&mut v, &mut scene, KeyCode::Digit1);
        let s = v.camera().spherical();
        assert_eq!((s.phi, s.theta), (FRAC_PI_2, FRAC_PI_2));
        key(&mut v, &mut scene, KeyCode::Digit2);
        assert_eq!(v.camera().spherical().phi, PHI_MIN);

        // Nothing selected: T and Delete do nothing.
        assert_eq!(key(&mut v, &mut scene, KeyCode::T), ViewportResponse::Ignored);
        assert_eq!(key(&mut v, &mut scene, KeyCode::Delete), ViewportResponse::Ignored);

        scene.set_active(Some(0));
        v.sync_selection(&scene);
        assert_eq!(key(&mut v, &mut scene, KeyCode::T), ViewportResponse::DragStarted(AxisSet::ALL));
        assert_eq!(key(&mut v, &mut scene, KeyCode::Delete), ViewportResponse::Deleted("Cube".into()));
        assert!(scene.is_empty());
        assert!(!v.tools().is_visible());
    }

    #[test]
    fn render_draws_handles_only_with_selection() {
        let (mut v, mut scene) = setup();
        let mut renderer = RecordingRenderer::new();
        v.render(&mut scene, &mut renderer);
        assert_eq!(renderer.model_draws(), 1);

        scene.set_active(Some(0));
        v.sync_selection(&scene);
        renderer.clear();
        v.render(&mut scene, &mut renderer);
        assert_eq!(renderer.model_draws(), 7);
    }

    #[test]
    fn delete_key_releases_geometry_on_next_render() {
        let (mut v, mut scene) = setup();
        let mut renderer = RecordingRenderer::new();
        v.render(&mut scene, &mut renderer);
        let handle = scene.get(0).and_then(Model::render_handle).unwrap();

        scene.set_active(Some(0));
        v.sync_selection(&scene);
        assert!(matches!(key(&mut v, &mut scene, KeyCode::Delete), ViewportResponse::Deleted(name) if name == "Cube"));
        assert!(scene.is_empty());

        renderer.clear();
        v.render(&mut scene, &mut renderer);
        assert_eq!(renderer.commands, vec![nimble_core::render::RenderCommand::Release(handle)]);
    }
}
