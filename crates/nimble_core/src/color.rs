//! RGBA colour used by materials and overlays.
//!
//! Four `f32` channels in 0.0 – 1.0.  Gizmo handles use the axis colours
//! [`Color::RED`], [`Color::GREEN`] and [`Color::BLUE`].
//!
//! ```rust,ignore
//! use nimble_core::Color;
//!
//! let ground = Color::from_hex(0x4D4D4DFF);
//! let [r, g, b, a] = ground.to_array();
//! ```

use serde::{Deserialize, Serialize};

/// Linear-space RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    // ── Constructors ────────────────────────────────────────────────────────

    /// Opaque colour from red, green, blue components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour from all four components.
    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Construct from a packed `0xRRGGBBAA` hexadecimal value.
    ///
    /// ```rust,ignore
    /// let coral = Color::from_hex(0xFF6B6BFF);
    /// ```
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8)  & 0xFF) as f32 / 255.0;
        let a = ((hex)        & 0xFF) as f32 / 255.0;
        Self { r, g, b, a }
    }

    // ── Conversions ─────────────────────────────────────────────────────────

    /// Returns `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns `[r, g, b]` (alpha discarded).
    #[inline]
    pub fn to_rgb_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    // ── Modifiers ───────────────────────────────────────────────────────────

    /// Return a new colour with the alpha channel replaced.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    // ── Palette ─────────────────────────────────────────────────────────────

    pub const WHITE:       Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK:       Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const RED:         Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN:       Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE:        Self = Self::rgb(0.0, 0.0, 1.0);

    pub const YELLOW:      Self = Self::rgb(1.0, 1.0, 0.0);
    pub const GRAY:        Self = Self::rgb(0.5, 0.5, 0.5);
    pub const DARK_GRAY:   Self = Self::rgb(0.3, 0.3, 0.3);
}

impl From<[f32; 4]> for Color {
    fn from(a: [f32; 4]) -> Self {
        Self::rgba(a[0], a[1], a[2], a[3])
    }
}

impl From<[f32; 3]> for Color {
    fn from(a: [f32; 3]) -> Self {
        Self::rgb(a[0], a[1], a[2])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let c = Color::from_hex(0xFF8000FF);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.502).abs() < 0.01);
        assert!((c.b - 0.0).abs() < 0.01);
        assert!((c.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn alpha_replacement_keeps_rgb() {
        let c = Color::RED.with_alpha(0.25);
        assert_eq!(c.to_rgb_array(), [1.0, 0.0, 0.0]);
        assert_eq!(c.a, 0.25);
    }
}
