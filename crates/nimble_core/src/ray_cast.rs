//! Screen → world rays and their intersections with boxes and planes.
//!
//! ## Slab method
//!
//! [`ray_intersect`] narrows a `[t_min, t_max]` interval axis by axis using
//! the precomputed reciprocal direction and sign bits of the [`Ray`].  A
//! zero direction component gives an infinite reciprocal, which the
//! comparisons treat as "parallel to this slab".
//!
//! ## Picking
//!
//! [`nearest_hit`] walks boxes in order and keeps the smallest `t_min` with
//! a strict `<`, so on a tie the earliest box wins.

use glam::{Vec3, Vec4};

use crate::geometry::BoundingBox;
use crate::scene::OrbitCamera;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
    /// `1` where the reciprocal direction is negative.
    pub sign: [usize; 3],
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let inv_direction = direction.recip();
        Self {
            origin,
            direction,
            inv_direction,
            sign: [
                (inv_direction.x < 0.0) as usize,
                (inv_direction.y < 0.0) as usize,
                (inv_direction.z < 0.0) as usize,
            ],
        }
    }

    /// Point at parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Infinite plane through `point` with normal `normal` (not necessarily unit
/// length).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

/// World-space direction through pixel `(x, y)` of the camera's viewport,
/// not normalised.
pub fn unproject(x: f32, y: f32, camera: &OrbitCamera) -> Vec3 {
    let (width, height) = camera.size();
    let ndc_x = 2.0 * x / width - 1.0;
    let ndc_y = 1.0 - 2.0 * y / height;

    let eye = camera.proj().inverse() * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
    let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);
    (camera.view().inverse() * eye).truncate()
}

/// Ray from the camera through pixel `(x, y)`.
pub fn get_ray(x: f32, y: f32, camera: &OrbitCamera) -> Ray {
    Ray::new(camera.position(), unproject(x, y, camera).normalize())
}

/// Slab intersection.  Returns `(t_min, t_max)` along the ray, or `None`
/// when the ray misses the box.
pub fn ray_intersect(bounds: &BoundingBox, ray: &Ray) -> Option<(f32, f32)> {
    let b = [bounds.min, bounds.max];
    let (o, inv, s) = (ray.origin, ray.inv_direction, ray.sign);

    let mut t_min = (b[s[0]].x - o.x) * inv.x;
    let mut t_max = (b[1 - s[0]].x - o.x) * inv.x;

    let ty_min = (b[s[1]].y - o.y) * inv.y;
    let ty_max = (b[1 - s[1]].y - o.y) * inv.y;
    if t_min > ty_max || ty_min > t_max {
        return None;
    }
    if ty_min > t_min {
        t_min = ty_min;
    }
    if ty_max < t_max {
        t_max = ty_max;
    }

    let tz_min = (b[s[2]].z - o.z) * inv.z;
    let tz_max = (b[1 - s[2]].z - o.z) * inv.z;
    if t_min > tz_max || tz_min > t_max {
        return None;
    }
    if tz_min > t_min {
        t_min = tz_min;
    }
    if tz_max < t_max {
        t_max = tz_max;
    }

    Some((t_min, t_max))
}

pub fn does_intersect(bounds: &BoundingBox, ray: &Ray) -> bool {
    ray_intersect(bounds, ray).is_some()
}

/// Index and `t_min` of the nearest box hit by `ray`.  Boxes lying entirely
/// behind the ray origin are ignored.
pub fn nearest_hit<'a>(
    ray: &Ray,
    boxes: impl IntoIterator<Item = &'a BoundingBox>,
) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, bounds) in boxes.into_iter().enumerate() {
        let Some((t_min, t_max)) = ray_intersect(bounds, ray) else {
            continue;
        };
        if t_max < 0.0 {
            continue;
        }
        if t_min < best.map_or(f32::INFINITY, |(_, t)| t) {
            best = Some((i, t_min));
        }
    }
    best
}

/// Where `ray` meets `plane`: `t = (p0 − l0)·n / (l·n)`.  `None` when the
/// ray is parallel to the plane (non-finite result).
pub fn ray_plane_intersection(ray: &Ray, plane: &Plane) -> Option<Vec3> {
    let t = (plane.point - ray.origin).dot(plane.normal) / ray.direction.dot(plane.normal);
    let hit = ray.at(t);
    hit.is_finite().then_some(hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn slab_hit_along_z() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let (t_min, t_max) = ray_intersect(&unit_box(), &ray).unwrap();
        assert!((t_min - 4.0).abs() < 1e-6);
        assert!((t_max - 6.0).abs() < 1e-6);
    }

    #[test]
    fn slab_miss() {
        let ray = Ray::new(Vec3::splat(5.0), Vec3::X);
        assert_eq!(ray_intersect(&unit_box(), &ray), None);
        assert!(!does_intersect(&unit_box(), &ray));
    }

    #[test]
    fn sign_bits_follow_reciprocal() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, 2.0));
        assert_eq!(ray.sign, [1, 0, 0]);
        assert!(ray.inv_direction.y.is_infinite());
    }

    #[test]
    fn diagonal_ray_hits_corner_region() {
        let dir = Vec3::new(-1.0, -1.0, -1.0).normalize();
        let ray = Ray::new(Vec3::splat(3.0), dir);
        let (t_min, _) = ray_intersect(&unit_box(), &ray).unwrap();
        assert!(ray.at(t_min).abs_diff_eq(Vec3::ONE, 1e-5));
    }

    #[test]
    fn nearest_hit_prefers_closest_then_first() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let far = unit_box();
        let near = BoundingBox::new(Vec3::new(-1.0, -1.0, 2.0), Vec3::new(1.0, 1.0, 3.0));
        assert_eq!(nearest_hit(&ray, [&far, &near]).map(|h| h.0), Some(1));

        // Identical boxes: the first one wins.
        assert_eq!(nearest_hit(&ray, [&near, &near]).map(|h| h.0), Some(0));
        assert_eq!(nearest_hit(&ray, std::iter::empty()), None);
    }

    #[test]
    fn boxes_behind_origin_are_not_hits() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_intersect(&unit_box(), &ray).is_some());
        assert_eq!(nearest_hit(&ray, [&unit_box()]), None);
    }

    #[test]
    fn screen_centre_ray_points_at_target() {
        let camera = OrbitCamera::new(800.0, 600.0);
        let ray = get_ray(400.0, 300.0, &camera);
        let to_target = (camera.target - camera.position()).normalize();
        assert!(ray.direction.abs_diff_eq(to_target, 1e-4));
        assert_eq!(ray.origin, camera.position());
        assert!(does_intersect(&unit_box(), &ray));
    }

    #[test]
    fn screen_edges_map_to_frustum_edges() {
        let camera = OrbitCamera::new(800.0, 600.0);
        let top = get_ray(400.0, 0.0, &camera);
        let forward = (camera.target - camera.position()).normalize();
        // Half the vertical fov between the centre and the top edge.
        let angle = top.direction.angle_between(forward);
        assert!((angle - 30f32.to_radians()).abs() < 1e-3);
    }

    #[test]
    fn plane_intersection() {
        let plane = Plane {
            normal: Vec3::Y,
            point: Vec3::new(0.0, 2.0, 0.0),
        };
        let ray = Ray::new(Vec3::new(1.0, 5.0, 0.0), Vec3::NEG_Y);
        let hit = ray_plane_intersection(&ray, &plane).unwrap();
        assert!(hit.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));

        let parallel = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        assert_eq!(ray_plane_intersection(&parallel, &plane), None);
    }
}
