//! Immutable mesh data and its bounding volume.
//!
//! | Item              | Purpose                                             |
//! |-------------------|-----------------------------------------------------|
//! | [`Geometry`]      | Mesh + descriptor + analytic local bounding box     |
//! | [`GeometryKind`]  | Type tag and constructor parameters (persisted)     |
//! | [`BoundingBox`]   | AABB math: join, world transform                    |
//! | [`CollisionShape`]| What the physics backend builds a body from         |
//!
//! Geometry is shared between models through `Rc<Geometry>` and never
//! mutated after construction.
//!
//! ```rust,ignore
//! use nimble_core::geometry::{Geometry, CylinderParams};
//!
//! let cube = Geometry::cube(glam::Vec3::ONE);
//! let cone = Geometry::cylinder(CylinderParams::default().with_radii(0.0, 0.5));
//! ```

pub mod bounding_box;
mod primitives;

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

pub use bounding_box::BoundingBox;
pub use primitives::CylinderParams;

/// Raw vertex and index buffers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

/// Which primitive a [`Geometry`] was built from, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryKind {
    Cube { size: Vec3 },
    Sphere { radius: f32, sectors: u32, rings: u32 },
    Cylinder(CylinderParams),
    Plane,
    Custom { mesh: Mesh },
}

impl GeometryKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            GeometryKind::Cube { .. } => "Cube",
            GeometryKind::Sphere { .. } => "Sphere",
            GeometryKind::Cylinder(_) => "Cylinder",
            GeometryKind::Plane => "Plane",
            GeometryKind::Custom { .. } => "Custom",
        }
    }
}

/// Collision-shape descriptor handed to the physics backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    Box { half_extents: Vec3 },
    Mesh { vertices: Vec<Vec3>, indices: Vec<u32> },
}

impl CollisionShape {
    /// Local-space bounds of the shape.
    pub fn local_bounds(&self) -> BoundingBox {
        match self {
            CollisionShape::Box { half_extents } => BoundingBox::centered(*half_extents),
            CollisionShape::Mesh { vertices, .. } => {
                BoundingBox::from_points(vertices.iter().copied())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    kind: GeometryKind,
    mesh: Mesh,
    bounding_box: BoundingBox,
}

impl Geometry {
    // ── Constructors ───────────────────────────────────────────────────────

    pub fn cube(size: Vec3) -> Self {
        Self {
            kind: GeometryKind::Cube { size },
            mesh: primitives::cube(size),
            bounding_box: BoundingBox::centered(size / 2.0),
        }
    }

    pub fn sphere(radius: f32, sectors: u32, rings: u32) -> Self {
        Self {
            kind: GeometryKind::Sphere {
                radius,
                sectors,
                rings,
            },
            mesh: primitives::sphere(radius, sectors, rings),
            bounding_box: BoundingBox::centered(Vec3::splat(radius)),
        }
    }

    pub fn cylinder(params: CylinderParams) -> Self {
        let r = params.radius_top.max(params.radius_bottom);
        let half = params.height / 2.0;
        Self {
            kind: GeometryKind::Cylinder(params),
            mesh: primitives::cylinder(&params),
            bounding_box: BoundingBox::new(
                Vec3::new(-r, -half + params.height_offset, -r),
                Vec3::new(r, half + params.height_offset, r),
            ),
        }
    }

    /// Unit plane in XZ, facing +Y.
    pub fn plane() -> Self {
        Self {
            kind: GeometryKind::Plane,
            mesh: primitives::plane(),
            bounding_box: BoundingBox::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 0.0, 0.5)),
        }
    }

    /// Arbitrary mesh; the bounding box is scanned from its positions.
    pub fn from_mesh(mesh: Mesh) -> Self {
        Self {
            bounding_box: BoundingBox::from_points(mesh.positions.iter().copied()),
            kind: GeometryKind::Custom { mesh: mesh.clone() },
            mesh,
        }
    }

    /// Rebuild a geometry from its persisted descriptor.
    pub fn from_kind(kind: &GeometryKind) -> Self {
        match kind {
            GeometryKind::Cube { size } => Self::cube(*size),
            GeometryKind::Sphere {
                radius,
                sectors,
                rings,
            } => Self::sphere(*radius, *sectors, *rings),
            GeometryKind::Cylinder(params) => Self::cylinder(*params),
            GeometryKind::Plane => Self::plane(),
            GeometryKind::Custom { mesh } => Self::from_mesh(mesh.clone()),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn kind(&self) -> &GeometryKind {
        &self.kind
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Local-space bounding box.
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    // ── Derived ────────────────────────────────────────────────────────────

    /// World-space AABB under `model`.
    ///
    /// Spheres ignore the rotation part of `model`: their box is rotation
    /// invariant and rotating the corners would only inflate it.
    pub fn world_bounding_box(&self, model: &Mat4) -> BoundingBox {
        match self.kind {
            GeometryKind::Sphere { .. } => {
                let (scale, _, translation) = model.to_scale_rotation_translation();
                let stripped = Mat4::from_translation(translation) * Mat4::from_scale(scale);
                self.bounding_box.apply_world_transform(&stripped)
            }
            _ => self.bounding_box.apply_world_transform(model),
        }
    }

    /// Collision shape for a model with the given `scale`, or `None` when the
    /// geometry cannot take part in the simulation.
    pub fn collision_shape(&self, scale: Vec3) -> Option<CollisionShape> {
        match &self.kind {
            GeometryKind::Cube { size } => Some(CollisionShape::Box {
                half_extents: *size / 2.0 * scale,
            }),
            GeometryKind::Plane => Some(CollisionShape::Box {
                half_extents: Vec3::new(scale.x, 0.01, scale.z),
            }),
            GeometryKind::Sphere { .. } | GeometryKind::Cylinder(_) => Some(CollisionShape::Mesh {
                vertices: self.mesh.positions.iter().map(|v| *v * scale).collect(),
                indices: self.mesh.indices.clone(),
            }),
            GeometryKind::Custom { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_3;

    #[test]
    fn analytic_boxes() {
        let cube = Geometry::cube(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(cube.bounding_box().max, Vec3::new(1.0, 2.0, 3.0));

        let sphere = Geometry::sphere(0.75, 16, 8);
        assert_eq!(sphere.bounding_box().min, Vec3::splat(-0.75));

        let plane = Geometry::plane();
        assert_eq!(plane.bounding_box().min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(plane.mesh().indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn cylinder_box_uses_largest_radius_and_offset() {
        let geo = Geometry::cylinder(
            CylinderParams::default()
                .with_radii(0.2, 0.7)
                .with_height(2.0)
                .with_height_offset(1.0),
        );
        let b = geo.bounding_box();
        assert_eq!(b.min, Vec3::new(-0.7, 0.0, -0.7));
        assert_eq!(b.max, Vec3::new(0.7, 2.0, 0.7));
    }

    #[test]
    fn cylinder_skips_zero_radius_caps() {
        let radial = 8;
        let torso = (radial + 1) * 2;
        let cap = (radial + 1) * 2;

        let full = Geometry::cylinder(CylinderParams {
            radial_segments: radial,
            ..CylinderParams::default()
        });
        assert_eq!(full.mesh().positions.len() as u32, torso + 2 * cap);
        assert_eq!(full.mesh().indices.len() as u32, radial * 6 + 2 * radial * 3);

        let cone = Geometry::cylinder(CylinderParams {
            radial_segments: radial,
            radius_top: 0.0,
            ..CylinderParams::default()
        });
        assert_eq!(cone.mesh().positions.len() as u32, torso + cap);

        let spindle = Geometry::cylinder(CylinderParams {
            radial_segments: radial,
            radius_top: 0.0,
            radius_bottom: 0.0,
            ..CylinderParams::default()
        });
        assert_eq!(spindle.mesh().positions.len() as u32, torso);
    }

    #[test]
    fn sphere_world_box_ignores_rotation() {
        let geo = Geometry::sphere(0.5, 32, 16);
        let t = Vec3::new(1.0, -2.0, 3.0);
        let plain = Mat4::from_translation(t) * Mat4::from_scale(Vec3::splat(2.0));
        let rotated = Mat4::from_translation(t)
            * Mat4::from_euler(glam::EulerRot::XYZ, FRAC_PI_3, 0.4, -1.1)
            * Mat4::from_scale(Vec3::splat(2.0));
        let a = geo.world_bounding_box(&plain);
        let b = geo.world_bounding_box(&rotated);
        assert!(a.min.abs_diff_eq(b.min, 1e-5));
        assert!(a.max.abs_diff_eq(b.max, 1e-5));
        assert!(a.max.abs_diff_eq(t + Vec3::ONE, 1e-5));

        // A cube under the same rotation grows.
        let cube = Geometry::cube(Vec3::ONE);
        let grown = cube.world_bounding_box(&rotated);
        assert!(grown.size().x > 2.0 + 1e-3);
    }

    #[test]
    fn collision_shapes() {
        let scale = Vec3::new(2.0, 3.0, 4.0);
        assert_eq!(
            Geometry::cube(Vec3::ONE).collision_shape(scale),
            Some(CollisionShape::Box {
                half_extents: Vec3::new(1.0, 1.5, 2.0)
            })
        );
        assert_eq!(
            Geometry::plane().collision_shape(scale),
            Some(CollisionShape::Box {
                half_extents: Vec3::new(2.0, 0.01, 4.0)
            })
        );
        let sphere = Geometry::sphere(0.5, 8, 4).collision_shape(scale).unwrap();
        assert!(sphere
            .local_bounds()
            .max
            .abs_diff_eq(Vec3::new(1.0, 1.5, 2.0), 1e-5));
        assert!(Geometry::from_mesh(Mesh::default())
            .collision_shape(scale)
            .is_none());
    }

    #[test]
    fn custom_mesh_box_scans_positions() {
        let mesh = Mesh {
            positions: vec![Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 5.0, 0.5)],
            ..Mesh::default()
        };
        let geo = Geometry::from_mesh(mesh);
        assert_eq!(geo.bounding_box().min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(geo.bounding_box().max, Vec3::new(1.0, 5.0, 0.5));
        assert_eq!(Geometry::from_mesh(Mesh::default()).bounding_box(), &BoundingBox::ZERO);
    }

    #[test]
    fn descriptor_rebuilds_same_geometry() {
        let geo = Geometry::cylinder(CylinderParams::default().with_radius(0.015));
        let rebuilt = Geometry::from_kind(geo.kind());
        assert_eq!(geo, rebuilt);
    }
}
