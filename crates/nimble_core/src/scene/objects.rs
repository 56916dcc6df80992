//! `Scene`: the ordered, uniquely-named set of models plus the selection.
//!
//! # Invariants
//!
//! * `objects_list` and the keys of `objects` are the same set of names;
//! * names are unique (`Cube`, `Cube2`, `Cube3`, …);
//! * `active`, when set, is a valid index into `objects_list`;
//! * only the active model carries the active-object observer set.
//!
//! All mutation goes through `Scene` methods so these hold and observers
//! hear about every change.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;
use nimble_ecs::Entity;

use crate::color::Color;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::ray_cast::{self, Ray};
use crate::render::{RenderHandle, Renderer};
use crate::scene::camera::OrbitCamera;
use crate::scene::component::ComponentSpec;
use crate::scene::model::{Model, ObserverHandle, SharedModelObserver};
use crate::scene::serialize::ModelDocument;

/// Scene-level notifications.  Every method defaults to a no-op.
pub trait SceneObserver {
    fn select_changed(&mut self, _index: Option<usize>, _model: Option<&Model>) {}
    fn obj_added(&mut self, _index: usize, _model: &Model) {}
    fn obj_deleted(&mut self, _index: usize) {}
    fn obj_renamed(&mut self, _index: usize, _model: &Model) {}
}

pub type SharedSceneObserver = Rc<RefCell<dyn SceneObserver>>;

/// A copied model, ready to be pasted into any scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Clipboard(pub(crate) ModelDocument);

#[derive(Default)]
pub struct Scene {
    objects: HashMap<String, Model>,
    objects_list: Vec<String>,
    active: Option<usize>,
    observers: Vec<(ObserverHandle, SharedSceneObserver)>,
    active_obj_observers: Vec<(ObserverHandle, SharedModelObserver)>,
    /// Geometry of removed models, released on the next `render`.
    released: Vec<RenderHandle>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ground plane and a unit cube resting on it.
    pub fn default_scene() -> Self {
        let mut scene = Self::new();
        scene.add_obj(
            Model::new(
                "Ground",
                Rc::new(Geometry::plane()),
                Material::default().with_color(Color::DARK_GRAY),
            )
            .with_scale(Vec3::new(10.0, 1.0, 10.0))
            .with_component(ComponentSpec::static_body()),
        );
        scene.add_obj(
            Model::new("Cube", Rc::new(Geometry::cube(Vec3::ONE)), Material::default())
                .with_position(Vec3::new(0.0, 0.5, 0.0)),
        );
        scene
    }

    // ── Lookup ─────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.objects_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects_list.is_empty()
    }

    /// Object names in order.
    pub fn names(&self) -> &[String] {
        &self.objects_list
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.objects_list.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.objects_list.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn get(&self, index: usize) -> Option<&Model> {
        self.objects.get(self.objects_list.get(index)?)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Model> {
        self.objects.get_mut(self.objects_list.get(index)?)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Model> {
        self.objects.get(name)
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut Model> {
        self.objects.get_mut(name)
    }

    /// Models in order.
    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.objects_list.iter().filter_map(|n| self.objects.get(n))
    }

    /// Models in no particular order.
    pub fn models_mut(&mut self) -> impl Iterator<Item = &mut Model> {
        self.objects.values_mut()
    }

    pub fn model_by_entity(&self, entity: Entity) -> Option<&Model> {
        self.objects.values().find(|m| m.entity() == Some(entity))
    }

    pub fn model_by_entity_mut(&mut self, entity: Entity) -> Option<&mut Model> {
        self.objects.values_mut().find(|m| m.entity() == Some(entity))
    }

    // ── Selection ──────────────────────────────────────────────────────────

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn has_selection(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Model> {
        self.get(self.active?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Model> {
        self.get_mut(self.active?)
    }

    /// Select `index` (`None` clears the selection; out-of-range indices do
    /// too).  When the selected object changes, the active-object observers
    /// move from the old object to the new one and scene observers hear
    /// `select_changed`.
    pub fn set_active(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| i < self.objects_list.len());
        if index == self.active {
            return;
        }

        if let Some(old) = self.active.and_then(|i| self.objects_list.get(i)) {
            if let Some(model) = self.objects.get_mut(old) {
                model.remove_all_observers();
            }
        }

        self.active = index;
        if let Some(name) = index.and_then(|i| self.objects_list.get(i)) {
            if let Some(model) = self.objects.get_mut(name) {
                model.set_all_observers(&self.active_obj_observers);
            }
        }

        log::debug!("selection changed to {:?}", self.active);
        let active = self.active();
        for (_, observer) in &self.observers {
            observer.borrow_mut().select_changed(index, active);
        }
    }

    // ── Mutation ───────────────────────────────────────────────────────────

    /// First free name: `base`, then `base2`, `base3`, …
    pub fn unique_name(&self, base: &str) -> String {
        if !self.objects.contains_key(base) {
            return base.to_string();
        }
        (2..)
            .map(|i| format!("{base}{i}"))
            .find(|name| !self.objects.contains_key(name))
            .unwrap_or_else(|| base.to_string())
    }

    /// Append `model`, renaming it if its name is taken.  Returns its index.
    pub fn add_obj(&mut self, mut model: Model) -> usize {
        let name = self.unique_name(model.name());
        if name != model.name() {
            log::debug!("`{}` already exists, adding as `{name}`", model.name());
            model.set_name(name.clone());
        }
        let index = self.objects_list.len();
        self.objects_list.push(name.clone());
        self.objects.insert(name.clone(), model);

        if let Some(model) = self.objects.get(&name) {
            for (_, observer) in &self.observers {
                observer.borrow_mut().obj_added(index, model);
            }
        }
        index
    }

    /// Remove the object at `index` and hand it back so the caller can
    /// release its render handle.  Out of range is a no-op.
    pub fn delete_obj(&mut self, index: usize) -> Option<Model> {
        if index >= self.objects_list.len() {
            return None;
        }
        let name = self.objects_list.remove(index);
        let mut model = self.objects.remove(&name)?;
        self.released.extend(model.take_render_handle());

        match self.active {
            Some(active) if active == index => {
                model.remove_all_observers();
                self.active = None;
                for (_, observer) in &self.observers {
                    observer.borrow_mut().select_changed(None, None);
                }
            }
            Some(active) if index < active => self.active = Some(active - 1),
            _ => {}
        }

        for (_, observer) in &self.observers {
            observer.borrow_mut().obj_deleted(index);
        }
        Some(model)
    }

    /// Rename the object at `index`.  A taken name gets the same numeric
    /// suffix `add_obj` would give it.  Returns the final name.
    pub fn rename_obj(&mut self, index: usize, new_name: &str) -> Option<String> {
        let old = self.objects_list.get(index)?.clone();
        if old == new_name {
            return Some(old);
        }
        // The object's own name does not count as taken.
        let mut model = self.objects.remove(&old)?;
        let name = self.unique_name(new_name);
        if name == old {
            self.objects.insert(old.clone(), model);
            return Some(old);
        }
        model.set_name(name.clone());
        self.objects.insert(name.clone(), model);
        self.objects_list[index] = name.clone();

        if let Some(model) = self.objects.get(&name) {
            for (_, observer) in &self.observers {
                observer.borrow_mut().obj_renamed(index, model);
            }
        }
        Some(name)
    }

    /// Swap in the contents of `other`, keeping this scene's observers.
    pub fn replace(&mut self, other: Scene) {
        if let Some(model) = self.active_mut() {
            model.remove_all_observers();
        }
        for index in (0..self.objects_list.len()).rev() {
            for (_, observer) in &self.observers {
                observer.borrow_mut().obj_deleted(index);
            }
        }

        self.released.extend(
            self.objects
                .values_mut()
                .filter_map(Model::take_render_handle),
        );
        self.objects = other.objects;
        self.objects_list = other.objects_list;
        self.active = other.active.filter(|&i| i < self.objects_list.len());

        for (index, name) in self.objects_list.iter().enumerate() {
            if let Some(model) = self.objects.get(name) {
                for (_, observer) in &self.observers {
                    observer.borrow_mut().obj_added(index, model);
                }
            }
        }
        if let Some(name) = self.active.and_then(|i| self.objects_list.get(i)) {
            if let Some(model) = self.objects.get_mut(name) {
                model.set_all_observers(&self.active_obj_observers);
            }
        }
        let active = self.active();
        for (_, observer) in &self.observers {
            observer.borrow_mut().select_changed(self.active, active);
        }
    }

    // ── Clipboard ──────────────────────────────────────────────────────────

    pub fn copy_active(&self) -> Option<Clipboard> {
        self.active().map(|m| Clipboard(ModelDocument::from_model(m)))
    }

    /// Add a copy of the clipboard model.  Returns its index.
    pub fn paste(&mut self, clipboard: &Clipboard) -> usize {
        self.add_obj(clipboard.0.to_model())
    }

    // ── Picking ────────────────────────────────────────────────────────────

    /// Name and index of the nearest object whose world box `ray` hits.
    /// Ties go to the object added first.
    pub fn cast_ray(&self, ray: &Ray) -> Option<(String, usize)> {
        let boxes = self
            .objects_list
            .iter()
            .filter_map(|n| self.objects.get(n))
            .map(|m| m.bounding_box_world());
        let (index, _) = ray_cast::nearest_hit(ray, boxes)?;
        Some((self.objects_list[index].clone(), index))
    }

    // ── Observers ──────────────────────────────────────────────────────────

    pub fn register_observer(&mut self, observer: SharedSceneObserver) -> ObserverHandle {
        let handle = ObserverHandle::next();
        self.observers.push((handle, observer));
        handle
    }

    pub fn unregister_observer(&mut self, handle: ObserverHandle) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(h, _)| *h != handle);
        before != self.observers.len()
    }

    /// Add an observer that follows whichever object is active.
    pub fn register_active_obj_observer(&mut self, observer: SharedModelObserver) -> ObserverHandle {
        let handle = ObserverHandle::next();
        self.active_obj_observers.push((handle, observer));
        self.reattach_active_observers();
        handle
    }

    pub fn unregister_active_obj_observer(&mut self, handle: ObserverHandle) -> bool {
        let before = self.active_obj_observers.len();
        self.active_obj_observers.retain(|(h, _)| *h != handle);
        self.reattach_active_observers();
        before != self.active_obj_observers.len()
    }

    fn reattach_active_observers(&mut self) {
        if let Some(name) = self.active.and_then(|i| self.objects_list.get(i)) {
            if let Some(model) = self.objects.get_mut(name) {
                model.set_all_observers(&self.active_obj_observers);
            }
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    /// Release the geometry of removed models, then draw every model.
    pub fn render(&mut self, renderer: &mut dyn Renderer, camera: &OrbitCamera) {
        for handle in self.released.drain(..) {
            renderer.release_geometry(handle);
        }
        for name in &self.objects_list {
            if let Some(model) = self.objects.get_mut(name) {
                model.render(renderer, camera);
            }
        }
    }
}
