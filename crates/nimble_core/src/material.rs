use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Shader name plus the flags the renderer needs to draw a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shader: String,
    pub color: Color,
    /// Draw the mesh edges on top of the surface.
    pub wireframe: bool,
    /// Draw the world bounding box as an outline.
    pub draw_bounding_box: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Self::VIEWPORT_SHADER)
    }
}

impl Material {
    /// Lit shader used for ordinary scene objects.
    pub const VIEWPORT_SHADER: &'static str = "viewport";
    /// Unlit single-colour shader (gizmo handles, outlines).
    pub const CONSTANT_COLOR_SHADER: &'static str = "constant_color";

    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            color: Color::WHITE,
            wireframe: false,
            draw_bounding_box: false,
        }
    }

    pub fn constant_color(color: Color) -> Self {
        Self::new(Self::CONSTANT_COLOR_SHADER).with_color(color)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_wireframe(mut self, on: bool) -> Self {
        self.wireframe = on;
        self
    }

    pub fn with_bounding_box(mut self, on: bool) -> Self {
        self.draw_bounding_box = on;
        self
    }
}
