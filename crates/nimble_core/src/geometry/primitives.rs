//! Procedural mesh generation for the built-in primitives.
//!
//! Every generator is deterministic.  Cylinders and spheres wind their
//! side triangles counter-clockwise when seen from outside.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::Mesh;

/// Parameters of a (possibly truncated, possibly partial) cylinder.
///
/// A zero `radius_top` gives a cone; the cap on that side is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderParams {
    pub radial_segments: u32,
    pub height_segments: u32,
    pub height: f32,
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub theta_start: f32,
    pub theta_length: f32,
    /// Shift along Y applied to every vertex.
    pub height_offset: f32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            radial_segments: 32,
            height_segments: 1,
            height: 1.0,
            radius_top: 0.5,
            radius_bottom: 0.5,
            theta_start: 0.0,
            theta_length: TAU,
            height_offset: 0.0,
        }
    }
}

impl CylinderParams {
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius_top = radius;
        self.radius_bottom = radius;
        self
    }

    pub fn with_radii(mut self, top: f32, bottom: f32) -> Self {
        self.radius_top = top;
        self.radius_bottom = bottom;
        self
    }

    pub fn with_height_offset(mut self, offset: f32) -> Self {
        self.height_offset = offset;
        self
    }
}

pub(super) fn cube(size: Vec3) -> Mesh {
    let h = size * 0.5;
    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = Mesh::default();
    for (n, u, v) in faces {
        let base = mesh.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            mesh.positions.push((n + u * su + v * sv) * h);
            mesh.normals.push(n);
            mesh.uvs.push(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

pub(super) fn sphere(radius: f32, sectors: u32, rings: u32) -> Mesh {
    let sectors = sectors.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::default();

    for r in 0..=rings {
        let v = r as f32 / rings as f32;
        let phi = v * PI;
        for s in 0..=sectors {
            let u = s as f32 / sectors as f32;
            let theta = u * TAU;
            let dir = Vec3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos());
            mesh.positions.push(dir * radius);
            mesh.normals.push(dir);
            mesh.uvs.push(Vec2::new(u, 1.0 - v));
        }
    }

    let row = sectors + 1;
    for r in 0..rings {
        for s in 0..sectors {
            let a = r * row + s;
            let b = a + row;
            mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

pub(super) fn cylinder(p: &CylinderParams) -> Mesh {
    let radial = p.radial_segments.max(1);
    let rows = p.height_segments.max(1);
    let half = p.height / 2.0;
    let slope = (p.radius_bottom - p.radius_top) / p.height;

    let mut mesh = Mesh::default();

    // ── Torso ──
    let mut index_rows: Vec<Vec<u32>> = Vec::with_capacity(rows as usize + 1);
    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (p.radius_bottom - p.radius_top) + p.radius_top;
        let mut row = Vec::with_capacity(radial as usize + 1);
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u * p.theta_length + p.theta_start;
            let (sin, cos) = theta.sin_cos();
            row.push(mesh.positions.len() as u32);
            mesh.positions.push(Vec3::new(
                radius * sin,
                -v * p.height + half + p.height_offset,
                radius * cos,
            ));
            mesh.normals
                .push(Vec3::new(sin, slope, cos).normalize_or_zero());
            mesh.uvs.push(Vec2::new(u, 1.0 - v));
        }
        index_rows.push(row);
    }

    for x in 0..radial as usize {
        for y in 0..rows as usize {
            let a = index_rows[y][x];
            let b = index_rows[y + 1][x];
            let c = index_rows[y + 1][x + 1];
            let d = index_rows[y][x + 1];
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    // ── Caps ──
    if p.radius_top != 0.0 {
        cylinder_cap(&mut mesh, p, radial, true);
    }
    if p.radius_bottom != 0.0 {
        cylinder_cap(&mut mesh, p, radial, false);
    }
    mesh
}

fn cylinder_cap(mesh: &mut Mesh, p: &CylinderParams, radial: u32, top: bool) {
    let radius = if top { p.radius_top } else { p.radius_bottom };
    let sign = if top { 1.0 } else { -1.0 };
    let y = sign * p.height / 2.0 + p.height_offset;
    let normal = Vec3::new(0.0, sign, 0.0);

    let centers = mesh.positions.len() as u32;
    for _ in 0..=radial {
        mesh.positions.push(Vec3::new(0.0, y, 0.0));
        mesh.normals.push(normal);
        mesh.uvs.push(Vec2::splat(0.5));
    }

    let rim = mesh.positions.len() as u32;
    for x in 0..=radial {
        let u = x as f32 / radial as f32;
        let theta = u * p.theta_length + p.theta_start;
        let (sin, cos) = theta.sin_cos();
        mesh.positions.push(Vec3::new(radius * sin, y, radius * cos));
        mesh.normals.push(normal);
        mesh.uvs
            .push(Vec2::new(cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5));
    }

    for x in 0..radial {
        let c = centers + x;
        let i = rim + x;
        if top {
            mesh.indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            mesh.indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

pub(super) fn plane() -> Mesh {
    Mesh {
        positions: vec![
            Vec3::new(-0.5, 0.0, -0.5),
            Vec3::new(-0.5, 0.0, 0.5),
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(0.5, 0.0, -0.5),
        ],
        normals: vec![Vec3::Y; 4],
        uvs: vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
