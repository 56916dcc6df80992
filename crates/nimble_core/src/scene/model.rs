//! `Model`: a named, transformable, renderable scene object.
//!
//! Position, rotation and scale are the source of truth; the model matrix
//! and the world bounding box are derived from them.  Every setter
//! recomputes both derived values *before* notifying observers, so an
//! observer always reads fresh state inside its callback.
//!
//! ```rust,ignore
//! let mut cube = Model::new("Cube", Rc::new(Geometry::cube(Vec3::ONE)), Material::default())
//!     .with_position(Vec3::new(0.0, 0.5, 0.0));
//! let handle = cube.register_observer(inspector.clone());
//! cube.translate(Vec3::X);   // inspector.translation_changed(&cube)
//! cube.unregister_observer(handle);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Mat4, Vec3};
use nimble_ecs::Entity;

use crate::error::SceneError;
use crate::geometry::{BoundingBox, Geometry};
use crate::material::Material;
use crate::render::{DrawModel, RenderHandle, Renderer};
use crate::scene::camera::OrbitCamera;
use crate::scene::component::{ComponentSpec, SlotValue};
use crate::transform::Transform;

// ─── Observers ─────────────────────────────────────────────────────────────

/// Change notifications for one model.  Every method defaults to a no-op.
pub trait ModelObserver {
    fn translation_changed(&mut self, _model: &Model) {}
    fn rotation_changed(&mut self, _model: &Model) {}
    fn scale_changed(&mut self, _model: &Model) {}
    fn component_added(&mut self, _model: &Model, _index: usize) {}
    fn component_removed(&mut self, _model: &Model, _index: usize) {}
}

pub type SharedModelObserver = Rc<RefCell<dyn ModelObserver>>;

static OBSERVER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Registration token returned when an observer is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

impl ObserverHandle {
    /// A handle distinct from every other handle in the process.
    pub fn next() -> Self {
        Self(OBSERVER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Copy)]
enum Change {
    Translation,
    Rotation,
    Scale,
}

// ─── Model ─────────────────────────────────────────────────────────────────

pub struct Model {
    name: String,
    transform: Transform,
    matrix: Mat4,
    geometry: Rc<Geometry>,
    material: Material,
    bounding_box_world: BoundingBox,
    /// Inactive models are skipped by the physics simulation.
    pub active: bool,
    components: Vec<ComponentSpec>,
    observers: Vec<(ObserverHandle, SharedModelObserver)>,
    entity: Option<Entity>,
    render_handle: Option<RenderHandle>,
}

impl Model {
    pub fn new(name: impl Into<String>, geometry: Rc<Geometry>, material: Material) -> Self {
        let transform = Transform::IDENTITY;
        let matrix = transform.matrix();
        Self {
            name: name.into(),
            bounding_box_world: geometry.world_bounding_box(&matrix),
            transform,
            matrix,
            geometry,
            material,
            active: true,
            components: Vec::new(),
            observers: Vec::new(),
            entity: None,
            render_handle: None,
        }
    }

    // ── Builder helpers ────────────────────────────────────────────────────
    // Used before the model is shared, so they do not notify.

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self.recompute();
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self.recompute();
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self.recompute();
        self
    }

    pub fn with_component(mut self, component: ComponentSpec) -> Self {
        self.components.push(component);
        self
    }

    /// Copy of this model without observers, entity or render handle.
    pub fn duplicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            transform: self.transform,
            matrix: self.matrix,
            geometry: Rc::clone(&self.geometry),
            material: self.material.clone(),
            bounding_box_world: self.bounding_box_world,
            active: self.active,
            components: self.components.clone(),
            observers: Vec::new(),
            entity: None,
            render_handle: None,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Only the scene renames models, so that names stay unique.
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.transform.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn bounding_box_world(&self) -> &BoundingBox {
        &self.bounding_box_world
    }

    pub fn geometry(&self) -> &Rc<Geometry> {
        &self.geometry
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    pub fn set_entity(&mut self, entity: Option<Entity>) {
        self.entity = entity;
    }

    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.render_handle
    }

    /// Forget the render handle, returning it so the caller can release it.
    pub fn take_render_handle(&mut self) -> Option<RenderHandle> {
        self.render_handle.take()
    }

    // ── Transform ──────────────────────────────────────────────────────────

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.recompute();
        self.notify(Change::Translation);
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.rotation = rotation;
        self.recompute();
        self.notify(Change::Rotation);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.recompute();
        self.notify(Change::Scale);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.transform.position + delta);
    }

    pub fn rotate(&mut self, delta: Vec3) {
        self.set_rotation(self.transform.rotation + delta);
    }

    /// Set all three vectors with a single recompute, then fire the
    /// translation, rotation and scale callbacks in that order.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.recompute();
        self.notify(Change::Translation);
        self.notify(Change::Rotation);
        self.notify(Change::Scale);
    }

    fn recompute(&mut self) {
        self.matrix = self.transform.matrix();
        self.bounding_box_world = self.geometry.world_bounding_box(&self.matrix);
    }

    fn notify(&self, change: Change) {
        for (_, observer) in &self.observers {
            let mut observer = observer.borrow_mut();
            match change {
                Change::Translation => observer.translation_changed(self),
                Change::Rotation => observer.rotation_changed(self),
                Change::Scale => observer.scale_changed(self),
            }
        }
    }

    // ── Components ─────────────────────────────────────────────────────────

    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    /// Append a component descriptor and return its index.
    pub fn add_component(&mut self, component: ComponentSpec) -> usize {
        self.components.push(component);
        let index = self.components.len() - 1;
        for (_, observer) in &self.observers {
            observer.borrow_mut().component_added(self, index);
        }
        index
    }

    /// Remove the descriptor at `index`.  Out of range is a no-op.
    pub fn remove_component(&mut self, index: usize) -> Option<ComponentSpec> {
        if index >= self.components.len() {
            return None;
        }
        let removed = self.components.remove(index);
        for (_, observer) in &self.observers {
            observer.borrow_mut().component_removed(self, index);
        }
        Some(removed)
    }

    pub fn set_component_slot(
        &mut self,
        component: usize,
        slot: usize,
        value: SlotValue,
    ) -> Result<(), SceneError> {
        self.components
            .get_mut(component)
            .ok_or(SceneError::NoSuchComponent(component))?
            .set_slot(slot, value)
    }

    // ── Observer registration ──────────────────────────────────────────────

    pub fn register_observer(&mut self, observer: SharedModelObserver) -> ObserverHandle {
        let handle = ObserverHandle::next();
        self.observers.push((handle, observer));
        handle
    }

    pub fn unregister_observer(&mut self, handle: ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| *h != handle);
        before != self.observers.len()
    }

    /// Replace the whole observer set.
    pub fn set_all_observers(&mut self, observers: &[(ObserverHandle, SharedModelObserver)]) {
        self.observers = observers.to_vec();
    }

    pub fn remove_all_observers(&mut self) {
        self.observers.clear();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    /// Draw with the current matrix and camera.  Only the render handle is
    /// updated.
    pub fn render(&mut self, renderer: &mut dyn Renderer, camera: &OrbitCamera) {
        let view = camera.view();
        let proj = camera.proj();
        let handle = renderer.draw_model(&DrawModel {
            handle: self.render_handle,
            geometry: &self.geometry,
            material: &self.material,
            model: self.matrix,
            view,
            proj,
        });
        self.render_handle = Some(handle);

        if self.material.draw_bounding_box {
            renderer.draw_bounding_box(
                &self.bounding_box_world.corners(),
                proj * view,
                self.material.color,
            );
        }
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("geometry", &self.geometry.kind().type_name())
            .field("components", &self.components)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingRenderer, RenderCommand};

    fn cube() -> Model {
        Model::new("Cube", Rc::new(Geometry::cube(Vec3::ONE)), Material::default())
    }

    #[derive(Default)]
    struct Spy {
        events: Vec<String>,
        /// World box seen during the last translation callback.
        seen_box: Option<BoundingBox>,
    }

    impl ModelObserver for Spy {
        fn translation_changed(&mut self, model: &Model) {
            self.events.push(format!("translation {}", model.position()));
            self.seen_box = Some(*model.bounding_box_world());
        }
        fn rotation_changed(&mut self, _: &Model) {
            self.events.push("rotation".into());
        }
        fn scale_changed(&mut self, _: &Model) {
            self.events.push("scale".into());
        }
        fn component_added(&mut self, _: &Model, index: usize) {
            self.events.push(format!("added {index}"));
        }
        fn component_removed(&mut self, _: &Model, index: usize) {
            self.events.push(format!("removed {index}"));
        }
    }

    #[test]
    fn set_position_is_idempotent() {
        let mut model = cube().with_rotation(Vec3::new(0.3, 0.2, 0.1));
        let p = Vec3::new(1.25, -3.5, 0.75);
        model.set_position(p);
        let (m1, b1) = (model.matrix(), *model.bounding_box_world());
        model.set_position(p);
        assert_eq!(model.matrix(), m1);
        assert_eq!(*model.bounding_box_world(), b1);
    }

    #[test]
    fn derived_state_tracks_setters() {
        let mut model = cube();
        model.set_scale(Vec3::splat(2.0));
        model.translate(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(model.bounding_box_world().min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(model.bounding_box_world().max, Vec3::new(1.0, 2.0, 1.0));
        model.rotate(Vec3::new(0.0, 0.5, 0.0));
        model.rotate(Vec3::new(0.0, 0.5, 0.0));
        assert!((model.rotation().y - 1.0).abs() < 1e-6);
        assert_eq!(model.matrix(), model.transform().matrix());
    }

    #[test]
    fn observers_see_fresh_state() {
        let spy = Rc::new(RefCell::new(Spy::default()));
        let mut model = cube();
        model.register_observer(spy.clone());
        model.set_position(Vec3::new(5.0, 0.0, 0.0));
        let seen = spy.borrow().seen_box.unwrap();
        assert_eq!(seen.min.x, 4.5);
    }

    #[test]
    fn callbacks_and_unregistering() {
        let spy = Rc::new(RefCell::new(Spy::default()));
        let mut model = cube();
        let handle = model.register_observer(spy.clone());

        model.set_rotation(Vec3::X);
        model.set_scale(Vec3::ONE);
        let index = model.add_component(ComponentSpec::physics());
        model.remove_component(index);
        assert_eq!(model.remove_component(3), None);
        model.set_transform(Transform::IDENTITY);

        assert_eq!(
            spy.borrow().events,
            vec![
                "rotation",
                "scale",
                "added 0",
                "removed 0",
                "translation [0, 0, 0]",
                "rotation",
                "scale"
            ]
        );

        assert!(model.unregister_observer(handle));
        assert!(!model.unregister_observer(handle));
        model.translate(Vec3::X);
        assert_eq!(spy.borrow().events.len(), 7);
    }

    #[test]
    fn duplicate_drops_observers_and_handles() {
        let spy: SharedModelObserver = Rc::new(RefCell::new(Spy::default()));
        let mut model = cube().with_component(ComponentSpec::physics());
        model.register_observer(spy);
        model.set_entity(Some(Entity::from_raw(4)));
        let copy = model.duplicate();
        assert_eq!(copy.observer_count(), 0);
        assert_eq!(copy.entity(), None);
        assert_eq!(copy.components(), model.components());
        assert!(Rc::ptr_eq(copy.geometry(), model.geometry()));
    }

    #[test]
    fn slots_are_editable_through_the_model() {
        let mut model = cube().with_component(ComponentSpec::physics());
        model
            .set_component_slot(0, 1, SlotValue::Float(0.9))
            .unwrap();
        assert!(matches!(
            model.set_component_slot(2, 0, SlotValue::Float(0.0)),
            Err(SceneError::NoSuchComponent(2))
        ));
        assert_eq!(model.components()[0].slot_values()[1], SlotValue::Float(0.9));
    }

    #[test]
    fn render_reuses_handle_and_outlines_box() {
        let camera = OrbitCamera::new(640.0, 480.0);
        let mut renderer = RecordingRenderer::new();
        let mut model = cube();
        model.material_mut().draw_bounding_box = true;

        model.render(&mut renderer, &camera);
        let position = model.position();
        model.render(&mut renderer, &camera);

        assert_eq!(renderer.uploads(), 1);
        assert_eq!(renderer.model_draws(), 2);
        assert!(matches!(renderer.commands[1], RenderCommand::BoundingBox { .. }));
        assert_eq!(model.position(), position);
        assert!(model.take_render_handle().is_some());
    }
}
