//! # nimble_core
//!
//! Editor-side scene runtime.  Everything here is renderer-agnostic: GPU
//! work goes through the [`render::Renderer`] trait.
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`geometry`]  | Primitive meshes, `BoundingBox`, collision shapes       |
//! | [`transform`] | Position / euler rotation / scale and its matrix        |
//! | [`scene`]     | `OrbitCamera`, `Model`, `Scene`, persistence            |
//! | [`ray_cast`]  | Screen rays, slab test, ray-plane intersection          |
//! | [`gizmo`]     | Translation arrows and drag state machine               |
//! | [`input`]     | Input events and held-button state                      |
//! | [`time`]      | Tick snapshots and fixed-step accumulation              |
//! | [`render`]    | `Renderer` trait and a recording implementation         |
//!
//! ```rust,ignore
//! use nimble_core::prelude::*;
//!
//! let mut scene = Scene::default_scene();
//! let camera = OrbitCamera::new(1280.0, 720.0);
//! let ray = get_ray(640.0, 360.0, &camera);
//! if let Some((name, index)) = scene.cast_ray(&ray) {
//!     scene.set_active(Some(index));
//!     log::info!("picked {name}");
//! }
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod gizmo;
pub mod input;
pub mod material;
pub mod ray_cast;
pub mod render;
pub mod scene;
pub mod time;
pub mod transform;

pub use color::Color;
pub use error::SceneError;
pub use geometry::{BoundingBox, CollisionShape, CylinderParams, Geometry, GeometryKind, Mesh};
pub use gizmo::{Axis, AxisSet, DragState, TransformTools};
pub use input::{InputEvent, InputState, KeyCode, Modifiers, MouseButton};
pub use material::Material;
pub use ray_cast::{get_ray, Plane, Ray};
pub use render::{RecordingRenderer, RenderHandle, Renderer};
pub use scene::{
    CameraPreset, Clipboard, ComponentSpec, Model, ModelObserver, ObserverHandle, OrbitCamera,
    Scene, SceneObserver, SlotValue, CUSTOM_KEY_PREFIX,
};
pub use time::{FixedStep, Time, TimeClock};
pub use transform::Transform;

pub mod prelude {
    pub use crate::{
        get_ray, Axis, AxisSet, BoundingBox, CameraPreset, Color, ComponentSpec, Geometry,
        InputEvent, KeyCode, Material, Model, ModelObserver, MouseButton, OrbitCamera, Ray,
        Renderer, Scene, SceneObserver, Time, Transform, TransformTools,
    };
}
