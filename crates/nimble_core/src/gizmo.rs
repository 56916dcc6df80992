//! Translation gizmo.
//!
//! Three arrows (red X, green Y, blue Z) sit on the active model.  Pressing
//! on an arrow starts a drag along that axis; the mouse movement is
//! projected onto a plane through the model facing the camera and the
//! difference is applied along the dragged axes only.
//!
//! | State                 | Entered by            | Left by        |
//! |-----------------------|-----------------------|----------------|
//! | `Idle`                | creation, `stop_drag` | `start_drag`   |
//! | `Dragging(AxisSet)`   | `start_drag`          | `stop_drag`    |
//!
//! The arrows follow edits made elsewhere through a [`ModelObserver`];
//! register [`TransformTools::observer`] in the scene's active-object set.

use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::Vec3;

use crate::color::Color;
use crate::geometry::{BoundingBox, CylinderParams, Geometry};
use crate::material::Material;
use crate::ray_cast::{self, Plane, Ray};
use crate::render::Renderer;
use crate::scene::{Model, ModelObserver, OrbitCamera, SharedModelObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Hit-test order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Axis::X => Color::RED,
            Axis::Y => Color::GREEN,
            Axis::Z => Color::BLUE,
        }
    }

    /// Euler rotation turning the +Y arrow mesh onto this axis.
    fn arrow_rotation(self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(0.0, 0.0, -FRAC_PI_2),
            Axis::Y => Vec3::ZERO,
            Axis::Z => Vec3::new(FRAC_PI_2, 0.0, 0.0),
        }
    }
}

/// Non-empty subset of {X, Y, Z}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSet {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisSet {
    pub const ALL: Self = Self {
        x: true,
        y: true,
        z: true,
    };

    pub fn only(axis: Axis) -> Self {
        let mut set = Self::default();
        set.insert(axis);
        set
    }

    pub fn insert(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.x = true,
            Axis::Y => self.y = true,
            Axis::Z => self.z = true,
        }
    }

    pub fn contains(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.x || self.y || self.z)
    }

    /// Zero the components of `v` outside the set.
    pub fn mask(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            if self.x { v.x } else { 0.0 },
            if self.y { v.y } else { 0.0 },
            if self.z { v.z } else { 0.0 },
        )
    }
}

impl From<Axis> for AxisSet {
    fn from(axis: Axis) -> Self {
        Self::only(axis)
    }
}

// ─── Arrows ────────────────────────────────────────────────────────────────

struct Arrow {
    axis: Axis,
    line: Model,
    head: Model,
}

impl Arrow {
    fn new(axis: Axis, line: Rc<Geometry>, head: Rc<Geometry>) -> Self {
        let material = Material::constant_color(axis.color());
        let rotation = axis.arrow_rotation();
        Self {
            axis,
            line: Model::new(format!("{axis:?} line"), line, material.clone())
                .with_rotation(rotation),
            head: Model::new(format!("{axis:?} head"), head, material).with_rotation(rotation),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::join(self.line.bounding_box_world(), self.head.bounding_box_world())
    }

    fn set_position(&mut self, position: Vec3) {
        self.line.set_position(position);
        self.head.set_position(position);
    }

    fn set_scale(&mut self, scale: f32) {
        self.line.set_scale(Vec3::splat(scale));
        self.head.set_scale(Vec3::splat(scale));
    }
}

/// The three arrow handles.
pub struct ArrowSet {
    arrows: [Arrow; 3],
    position: Vec3,
    scale: f32,
}

impl ArrowSet {
    pub fn new() -> Self {
        let line = Rc::new(Geometry::cylinder(
            CylinderParams::default()
                .with_height(0.5)
                .with_radius(0.015)
                .with_height_offset(0.25),
        ));
        let head = Rc::new(Geometry::cylinder(
            CylinderParams::default()
                .with_height(0.175)
                .with_radii(0.0, 0.04)
                .with_height_offset(0.5875),
        ));
        Self {
            arrows: Axis::ALL.map(|axis| Arrow::new(axis, Rc::clone(&line), Rc::clone(&head))),
            position: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        for arrow in &mut self.arrows {
            arrow.set_position(position);
        }
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        for arrow in &mut self.arrows {
            arrow.set_scale(scale);
        }
    }

    /// World box of one arrow (line and head joined).
    pub fn bounding_box(&self, axis: Axis) -> BoundingBox {
        self.arrows[axis.index()].bounding_box()
    }

    /// First arrow hit by `ray`, in X, Y, Z order.
    pub fn hit_test(&self, ray: &Ray) -> Option<Axis> {
        self.arrows
            .iter()
            .find(|arrow| ray_cast::does_intersect(&arrow.bounding_box(), ray))
            .map(|arrow| arrow.axis)
    }

    pub fn render(&mut self, renderer: &mut dyn Renderer, camera: &OrbitCamera) {
        for arrow in &mut self.arrows {
            arrow.line.render(renderer, camera);
            arrow.head.render(renderer, camera);
        }
    }
}

impl Default for ArrowSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelObserver for ArrowSet {
    fn translation_changed(&mut self, model: &Model) {
        self.set_position(model.position());
    }
}

// ─── Tools ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(AxisSet),
}

pub struct TransformTools {
    arrows: Rc<RefCell<ArrowSet>>,
    state: DragState,
    plane: Plane,
    visible: bool,
}

impl TransformTools {
    pub fn new() -> Self {
        Self {
            arrows: Rc::new(RefCell::new(ArrowSet::new())),
            state: DragState::Idle,
            plane: Plane {
                normal: Vec3::Y,
                point: Vec3::ZERO,
            },
            visible: false,
        }
    }

    /// Observer that keeps the arrows on the active model.
    pub fn observer(&self) -> SharedModelObserver {
        self.arrows.clone()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Vec3 {
        self.arrows.borrow().position()
    }

    pub fn scale(&self) -> f32 {
        self.arrows.borrow().scale()
    }

    /// Show the arrows at `position` and capture the drag plane.
    pub fn set_active(&mut self, position: Vec3, camera: &OrbitCamera) {
        self.arrows.borrow_mut().set_position(position);
        self.capture_plane(camera);
        self.visible = true;
    }

    /// Hide the arrows and drop any drag in progress.
    pub fn clear(&mut self) {
        self.visible = false;
        self.state = DragState::Idle;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.arrows.borrow_mut().set_scale(scale);
    }

    fn capture_plane(&mut self, camera: &OrbitCamera) {
        let anchor = self.position();
        self.plane = Plane {
            normal: camera.position() - anchor,
            point: anchor,
        };
    }

    /// Arrow under `ray`, if the arrows are shown.
    pub fn hit_test(&self, ray: &Ray) -> Option<Axis> {
        if !self.visible {
            return None;
        }
        self.arrows.borrow().hit_test(ray)
    }

    pub fn start_drag(&mut self, axes: AxisSet, camera: &OrbitCamera) {
        if axes.is_empty() {
            return;
        }
        self.capture_plane(camera);
        self.state = DragState::Dragging(axes);
        log::debug!("gizmo drag started on {axes:?}");
    }

    /// Free translation on all three axes.
    pub fn start_translate(&mut self, camera: &OrbitCamera) {
        self.start_drag(AxisSet::ALL, camera);
    }

    /// Move `model` by the mouse motion from `(x - dx, y - dy)` to `(x, y)`,
    /// restricted to the dragged axes.  Returns the applied translation;
    /// `None` when idle or when the motion cannot be projected.
    pub fn did_drag(
        &mut self,
        camera: &OrbitCamera,
        model: &mut Model,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    ) -> Option<Vec3> {
        let DragState::Dragging(axes) = self.state else {
            return None;
        };
        let previous = ray_cast::get_ray(x - dx, y - dy, camera);
        let current = ray_cast::get_ray(x, y, camera);
        let from = ray_cast::ray_plane_intersection(&previous, &self.plane)?;
        let to = ray_cast::ray_plane_intersection(&current, &self.plane)?;

        let delta = axes.mask(to - from);
        if !delta.is_finite() {
            return None;
        }

        // Only the dragged components are written so the others stay
        // bit-identical.
        let mut target = model.position();
        for axis in Axis::ALL {
            if axes.contains(axis) {
                target[axis.index()] += delta[axis.index()];
            }
        }
        self.arrows.borrow_mut().set_position(target);
        model.set_position(target);
        Some(delta)
    }

    pub fn stop_drag(&mut self) {
        if self.is_dragging() {
            log::debug!("gizmo drag finished at {}", self.position());
        }
        self.state = DragState::Idle;
    }

    pub fn render(&mut self, renderer: &mut dyn Renderer, camera: &OrbitCamera) {
        if self.visible {
            self.arrows.borrow_mut().render(renderer, camera);
        }
    }
}

impl Default for TransformTools {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::render::RecordingRenderer;
    use crate::scene::Scene;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(800.0, 600.0)
    }

    fn crate_model(position: Vec3) -> Model {
        Model::new("Crate", Rc::new(Geometry::cube(Vec3::ONE)), Material::default())
            .with_position(position)
    }

    #[test]
    fn arrows_point_along_their_axes() {
        let arrows = ArrowSet::new();
        for axis in Axis::ALL {
            let b = arrows.bounding_box(axis);
            let tip = b.max.max(-b.min);
            assert!((tip[axis.index()] - 0.675).abs() < 1e-4, "{axis:?}: {b:?}");
            for other in Axis::ALL.into_iter().filter(|a| *a != axis) {
                assert!(tip[other.index()] < 0.05);
            }
        }
    }

    #[test]
    fn hit_test_prefers_x_then_y_then_z() {
        let arrows = ArrowSet::new();
        // Through the shared base: every arrow is hit.
        let base = Ray::new(Vec3::new(0.01, 0.01, 10.0), Vec3::NEG_Z);
        assert_eq!(arrows.hit_test(&base), Some(Axis::X));

        let up = Ray::new(Vec3::new(0.01, 0.3, 10.0), Vec3::NEG_Z);
        assert_eq!(arrows.hit_test(&up), Some(Axis::Y));

        let forward = Ray::new(Vec3::new(10.0, 0.01, 0.3), Vec3::NEG_X);
        assert_eq!(arrows.hit_test(&forward), Some(Axis::Z));

        let miss = Ray::new(Vec3::new(5.0, 5.0, 10.0), Vec3::NEG_Z);
        assert_eq!(arrows.hit_test(&miss), None);
    }

    #[test]
    fn hidden_tools_ignore_hits() {
        let mut tools = TransformTools::new();
        let ray = Ray::new(Vec3::new(0.01, 0.01, 10.0), Vec3::NEG_Z);
        assert_eq!(tools.hit_test(&ray), None);
        tools.set_active(Vec3::ZERO, &camera());
        assert_eq!(tools.hit_test(&ray), Some(Axis::X));
        tools.clear();
        assert_eq!(tools.hit_test(&ray), None);
    }

    #[test]
    fn y_drag_leaves_x_and_z_untouched() {
        let camera = camera();
        let start = Vec3::new(0.3, 0.5, -0.2);
        let mut model = crate_model(start);
        let mut tools = TransformTools::new();
        tools.set_active(model.position(), &camera);
        tools.start_drag(AxisSet::only(Axis::Y), &camera);

        let delta = tools
            .did_drag(&camera, &mut model, 400.0, 250.0, 0.0, -30.0)
            .unwrap();
        assert_eq!(delta.x, 0.0);
        assert_eq!(delta.z, 0.0);
        assert!(delta.y > 0.0);

        let end = model.position();
        assert_eq!(end.x.to_bits(), start.x.to_bits());
        assert_eq!(end.z.to_bits(), start.z.to_bits());
        assert_eq!(end.y, start.y + delta.y);
        assert_eq!(tools.position(), end);
    }

    #[test]
    fn drag_requires_dragging_state() {
        let camera = camera();
        let mut model = crate_model(Vec3::ZERO);
        let mut tools = TransformTools::new();
        tools.set_active(Vec3::ZERO, &camera);
        assert_eq!(tools.did_drag(&camera, &mut model, 400.0, 300.0, 10.0, 0.0), None);

        tools.start_translate(&camera);
        assert_eq!(tools.state(), DragState::Dragging(AxisSet::ALL));
        assert!(tools.did_drag(&camera, &mut model, 400.0, 300.0, 10.0, 0.0).is_some());
        tools.stop_drag();
        assert_eq!(tools.state(), DragState::Idle);

        tools.start_drag(AxisSet::default(), &camera);
        assert_eq!(tools.state(), DragState::Idle);
    }

    #[test]
    fn degenerate_plane_is_no_movement() {
        let camera = camera();
        let mut model = crate_model(Vec3::ZERO);
        let mut tools = TransformTools::new();
        // Anchor at the eye: the plane normal vanishes.
        tools.set_active(camera.position(), &camera);
        tools.start_translate(&camera);
        assert_eq!(tools.did_drag(&camera, &mut model, 400.0, 300.0, 5.0, 5.0), None);
        assert_eq!(model.position(), Vec3::ZERO);
    }

    #[test]
    fn arrows_follow_active_model() {
        let camera = camera();
        let mut scene = Scene::new();
        let mut tools = TransformTools::new();
        scene.register_active_obj_observer(tools.observer());
        scene.add_obj(crate_model(Vec3::ZERO));
        scene.set_active(Some(0));
        tools.set_active(scene.active().unwrap().position(), &camera);

        scene.active_mut().unwrap().set_position(Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(tools.position(), Vec3::new(2.0, 0.0, 1.0));

        tools.start_drag(Axis::X.into(), &camera);
        let model = scene.active_mut().unwrap();
        let delta = tools.did_drag(&camera, model, 420.0, 300.0, 20.0, 0.0).unwrap();
        assert_eq!(tools.position(), Vec3::new(2.0 + delta.x, 0.0, 1.0));
    }

    #[test]
    fn scale_and_render() {
        let camera = camera();
        let mut tools = TransformTools::new();
        tools.set_scale(2.0);
        let b = tools.arrows.borrow().bounding_box(Axis::Y);
        assert!((b.max.y - 1.35).abs() < 1e-4);

        let mut renderer = RecordingRenderer::new();
        tools.render(&mut renderer, &camera);
        assert_eq!(renderer.model_draws(), 0);
        tools.set_active(Vec3::ZERO, &camera);
        tools.render(&mut renderer, &camera);
        tools.render(&mut renderer, &camera);
        assert_eq!(renderer.model_draws(), 12);
        assert_eq!(renderer.uploads(), 6);
    }
}
