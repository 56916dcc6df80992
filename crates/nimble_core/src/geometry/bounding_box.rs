//! Axis-aligned bounding boxes.
//!
//! A `BoundingBox` is axis-aligned in whichever space it is expressed in.
//! Local boxes come from [`Geometry`](super::Geometry); world boxes are
//! produced by [`BoundingBox::apply_world_transform`].  Zero-extent boxes
//! (`min == max`) are legal everywhere.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::ZERO
    }
}

impl BoundingBox {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Corner order used by [`corners`](Self::corners).  Walking these
    /// indices as a line strip traces every edge of the box.
    pub const OUTLINE_INDICES: [u32; 16] = [0, 1, 2, 3, 0, 7, 6, 1, 6, 5, 2, 5, 4, 3, 4, 7];

    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box spanning `-half..half`.
    #[inline]
    pub fn centered(half: Vec3) -> Self {
        Self {
            min: -half,
            max: half,
        }
    }

    /// Tightest box around `points`.  No points gives [`BoundingBox::ZERO`].
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::ZERO;
        };
        points.fold(Self::new(first, first), |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        })
    }

    /// Component-wise min of the mins and max of the maxes.
    pub fn join(a: &Self, b: &Self) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// The 8 corners, in the order [`OUTLINE_INDICES`](Self::OUTLINE_INDICES)
    /// expects.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }

    /// Transform all 8 corners by `matrix` (with the homogeneous divide) and
    /// return the axis-aligned box around the result.
    pub fn apply_world_transform(&self, matrix: &Mat4) -> Self {
        Self::from_points(self.corners().into_iter().map(|c| {
            let p = *matrix * Vec4::new(c.x, c.y, c.z, 1.0);
            p.truncate() / p.w
        }))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// `true` if the boxes overlap or touch.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(min: [f32; 3], max: [f32; 3]) -> BoundingBox {
        BoundingBox::new(Vec3::from(min), Vec3::from(max))
    }

    #[test]
    fn join_is_commutative_and_associative() {
        let a = b([-1.0, 0.0, 2.0], [0.0, 1.0, 3.0]);
        let c = b([4.0, -5.0, 0.5], [4.5, -4.0, 0.75]);
        let d = b([-2.0, 2.0, -2.0], [-1.5, 2.5, 9.0]);

        assert_eq!(BoundingBox::join(&a, &c), BoundingBox::join(&c, &a));
        assert_eq!(
            BoundingBox::join(&BoundingBox::join(&a, &c), &d),
            BoundingBox::join(&a, &BoundingBox::join(&c, &d))
        );
        assert_eq!(
            BoundingBox::join(&a, &c),
            b([-1.0, -5.0, 0.5], [4.5, 1.0, 3.0])
        );
    }

    #[test]
    fn world_transform_translates_and_scales() {
        let local = BoundingBox::centered(Vec3::splat(0.5));
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let world = local.apply_world_transform(&m);
        assert!(world.min.abs_diff_eq(Vec3::new(0.0, 1.0, 2.0), 1e-6));
        assert!(world.max.abs_diff_eq(Vec3::new(2.0, 3.0, 4.0), 1e-6));
    }

    #[test]
    fn world_transform_of_rotated_box_grows() {
        let local = BoundingBox::centered(Vec3::splat(0.5));
        let m = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4);
        let world = local.apply_world_transform(&m);
        let h = 0.5 * std::f32::consts::SQRT_2;
        assert!(world.max.abs_diff_eq(Vec3::new(h, 0.5, h), 1e-5));
    }

    #[test]
    fn degenerate_boxes_are_fine() {
        let flat = b([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
        let world = flat.apply_world_transform(&Mat4::from_scale(Vec3::splat(3.0)));
        assert_eq!(world.min, world.max);
        assert_eq!(BoundingBox::from_points(std::iter::empty()), BoundingBox::ZERO);
    }

    #[test]
    fn overlap_and_containment() {
        let a = b([0.0; 3], [1.0; 3]);
        assert!(a.intersects(&b([1.0; 3], [2.0; 3])));
        assert!(!a.intersects(&b([1.1, 0.0, 0.0], [2.0; 3])));
        assert!(a.contains_point(Vec3::splat(0.5)));
        assert!(!a.contains_point(Vec3::new(0.5, 1.5, 0.5)));
    }
}
