//! The renderer seen from the scene runtime.
//!
//! GPU work lives outside this crate.  Models and the gizmo describe what
//! to draw through [`Renderer`]; the host implements it.  The returned
//! [`RenderHandle`] identifies uploaded geometry so it can be released when
//! the model is deleted.
//!
//! [`RecordingRenderer`] implements the trait by appending every call to a
//! list, for tests and headless runs.

use glam::{Mat4, Vec3};

use crate::color::Color;
use crate::geometry::Geometry;
use crate::material::Material;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Everything needed to draw one model.
#[derive(Debug, Clone, Copy)]
pub struct DrawModel<'a> {
    /// Handle from a previous draw of the same model, if any.
    pub handle: Option<RenderHandle>,
    pub geometry: &'a Geometry,
    pub material: &'a Material,
    pub model: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
}

pub trait Renderer {
    /// Draw a model, uploading its geometry first when `handle` is `None`.
    /// Returns the handle to pass on the next draw.
    fn draw_model(&mut self, draw: &DrawModel<'_>) -> RenderHandle;

    /// Outline of a world-space box (corners in
    /// [`BoundingBox::corners`](crate::geometry::BoundingBox::corners) order).
    fn draw_bounding_box(&mut self, corners: &[Vec3; 8], view_proj: Mat4, color: Color);

    fn release_geometry(&mut self, handle: RenderHandle);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Model {
        handle: RenderHandle,
        shader: String,
        color: Color,
        wireframe: bool,
        model: Mat4,
    },
    BoundingBox {
        corners: [Vec3; 8],
    },
    Release(RenderHandle),
}

/// Renderer that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<RenderCommand>,
    next_handle: u64,
    uploads: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometry uploads (draws without a handle).
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn model_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Model { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn draw_model(&mut self, draw: &DrawModel<'_>) -> RenderHandle {
        let handle = match draw.handle {
            Some(h) => h,
            None => {
                self.uploads += 1;
                self.next_handle += 1;
                RenderHandle(self.next_handle)
            }
        };
        self.commands.push(RenderCommand::Model {
            handle,
            shader: draw.material.shader.clone(),
            color: draw.material.color,
            wireframe: draw.material.wireframe,
            model: draw.model,
        });
        handle
    }

    fn draw_bounding_box(&mut self, corners: &[Vec3; 8], _view_proj: Mat4, _color: Color) {
        self.commands.push(RenderCommand::BoundingBox { corners: *corners });
    }

    fn release_geometry(&mut self, handle: RenderHandle) {
        self.commands.push(RenderCommand::Release(handle));
    }
}
