//! Rigid-body simulation behind a narrow trait.
//!
//! Play mode only needs to create and remove bodies, step, read poses back,
//! push bodies around and ask whether two bodies touch.  [`SimplePhysics`]
//! covers that for headless runs and tests: linear motion under gravity
//! (semi-implicit Euler), resting contact on top of static bodies, and
//! AABB contact queries.  Bodies do not rotate.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use nimble_core::{BoundingBox, CollisionShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// What a body is created from.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub shape: CollisionShape,
    pub position: Vec3,
    pub rotation: Quat,
    pub mass: f32,
    pub friction: f32,
    pub is_static: bool,
}

pub trait PhysicsBackend {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Returns `false` for an unknown handle.
    fn remove_body(&mut self, body: BodyHandle) -> bool;

    fn step(&mut self, dt: f32);

    /// Position and orientation, `None` for an unknown handle.
    fn pose(&self, body: BodyHandle) -> Option<(Vec3, Quat)>;

    /// Force applied during the next step only.
    fn apply_force(&mut self, body: BodyHandle, force: Vec3);

    fn in_contact(&self, a: BodyHandle, b: BodyHandle) -> bool;

    fn body_count(&self) -> usize;
}

#[derive(Debug, Clone)]
struct Body {
    local_bounds: BoundingBox,
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    force: Vec3,
    inv_mass: f32,
    friction: f32,
    is_static: bool,
}

impl Body {
    fn world_bounds(&self) -> BoundingBox {
        self.local_bounds
            .apply_world_transform(&Mat4::from_rotation_translation(self.rotation, self.position))
    }
}

/// Distance within which two boxes count as touching.
const CONTACT_SLOP: f32 = 1e-3;

pub struct SimplePhysics {
    gravity: Vec3,
    bodies: HashMap<BodyHandle, Body>,
    next_handle: u32,
}

impl SimplePhysics {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            bodies: HashMap::new(),
            next_handle: 0,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    /// Push `body` up onto any static body it has sunk into from above.
    fn resolve_ground(body: &mut Body, statics: &[(BoundingBox, f32)], dt: f32) {
        for (ground, friction) in statics {
            let bounds = body.world_bounds();
            let overlaps_xz = bounds.min.x < ground.max.x
                && bounds.max.x > ground.min.x
                && bounds.min.z < ground.max.z
                && bounds.max.z > ground.min.z;
            let center_above = bounds.center().y >= ground.center().y;
            if !overlaps_xz || !center_above || bounds.min.y >= ground.max.y {
                continue;
            }
            body.position.y += ground.max.y - bounds.min.y;
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
            let damping = (1.0 - (body.friction + friction) * 0.5 * 10.0 * dt).max(0.0);
            body.velocity.x *= damping;
            body.velocity.z *= damping;
        }
    }
}

impl Default for SimplePhysics {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl PhysicsBackend for SimplePhysics {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        let is_static = desc.is_static || desc.mass <= 0.0;
        self.bodies.insert(
            handle,
            Body {
                local_bounds: desc.shape.local_bounds(),
                position: desc.position,
                rotation: desc.rotation,
                velocity: Vec3::ZERO,
                force: Vec3::ZERO,
                inv_mass: if is_static { 0.0 } else { 1.0 / desc.mass },
                friction: desc.friction,
                is_static,
            },
        );
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        self.bodies.remove(&body).is_some()
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let statics: Vec<(BoundingBox, f32)> = self
            .bodies
            .values()
            .filter(|b| b.is_static)
            .map(|b| (b.world_bounds(), b.friction))
            .collect();

        for body in self.bodies.values_mut().filter(|b| !b.is_static) {
            let acceleration = self.gravity + body.force * body.inv_mass;
            body.velocity += acceleration * dt;
            body.position += body.velocity * dt;
            body.force = Vec3::ZERO;
            Self::resolve_ground(body, &statics, dt);
        }
    }

    fn pose(&self, body: BodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies.get(&body).map(|b| (b.position, b.rotation))
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.force += force;
        }
    }

    fn in_contact(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (Some(a), Some(b)) = (self.bodies.get(&a), self.bodies.get(&b)) else {
            return false;
        };
        let (a, b) = (a.world_bounds(), b.world_bounds());
        let slop = Vec3::splat(CONTACT_SLOP);
        BoundingBox::new(a.min - slop, a.max + slop).intersects(&b)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(position: Vec3, is_static: bool) -> BodyDesc {
        BodyDesc {
            shape: CollisionShape::Box {
                half_extents: Vec3::splat(0.5),
            },
            position,
            rotation: Quat::IDENTITY,
            mass: 1.0,
            friction: 0.5,
            is_static,
        }
    }

    fn ground() -> BodyDesc {
        BodyDesc {
            shape: CollisionShape::Box {
                half_extents: Vec3::new(10.0, 0.01, 10.0),
            },
            ..cube(Vec3::ZERO, true)
        }
    }

    #[test]
    fn free_fall_is_semi_implicit_euler() {
        let mut physics = SimplePhysics::new(Vec3::new(0.0, -10.0, 0.0));
        let body = physics.add_body(cube(Vec3::new(0.0, 100.0, 0.0), false));
        physics.step(0.5);
        // v = -5, p = 100 - 2.5
        let (position, _) = physics.pose(body).unwrap();
        assert!((position.y - 97.5).abs() < 1e-5);
        physics.step(0.5);
        let (position, _) = physics.pose(body).unwrap();
        assert!((position.y - 92.5).abs() < 1e-5);
    }

    #[test]
    fn bodies_come_to_rest_on_static_ground() {
        let mut physics = SimplePhysics::default();
        let floor = physics.add_body(ground());
        let body = physics.add_body(cube(Vec3::new(0.0, 2.0, 0.0), false));
        for _ in 0..240 {
            physics.step(1.0 / 120.0);
        }
        let (position, _) = physics.pose(body).unwrap();
        assert!((position.y - 0.51).abs() < 1e-3, "{position}");
        assert!(physics.in_contact(body, floor));
        assert_eq!(physics.pose(floor).unwrap().0, Vec3::ZERO);
    }

    #[test]
    fn forces_last_one_step() {
        let mut physics = SimplePhysics::new(Vec3::ZERO);
        let body = physics.add_body(BodyDesc {
            mass: 2.0,
            ..cube(Vec3::ZERO, false)
        });
        physics.apply_force(body, Vec3::new(4.0, 0.0, 0.0));
        physics.step(1.0);
        assert_eq!(physics.velocity(body), Some(Vec3::new(2.0, 0.0, 0.0)));
        physics.step(1.0);
        assert_eq!(physics.velocity(body), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn removal_and_unknown_handles() {
        let mut physics = SimplePhysics::default();
        let a = physics.add_body(cube(Vec3::ZERO, false));
        let b = physics.add_body(cube(Vec3::new(5.0, 0.0, 0.0), false));
        assert!(!physics.in_contact(a, b));
        assert!(physics.remove_body(a));
        assert!(!physics.remove_body(a));
        assert_eq!(physics.pose(a), None);
        assert_eq!(physics.body_count(), 1);
    }
}
