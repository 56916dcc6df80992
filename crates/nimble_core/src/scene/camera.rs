use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

/// Lower bound for the polar angle.  Keeps the camera off the +Y pole where
/// `look_at` would degenerate.
pub const PHI_MIN: f32 = 1e-9;
/// Radians of rotation per pixel of mouse movement.
pub const ROTATE_SENSITIVITY: f32 = 0.01;

/// Spherical coordinates: `radius`, polar angle `phi` (from +Y) and
/// azimuth `theta` (from +Z towards +X).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Inverse of [`to_cartesian`](Self::to_cartesian).  The zero vector maps
    /// to all-zero coordinates.
    pub fn from_cartesian(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
            theta: v.x.atan2(v.z),
        }
    }

    pub fn to_cartesian(&self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Axis-aligned viewpoints reachable from the number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    /// Look from +X.
    Right,
    /// Look straight down from +Y.
    Top,
    /// Look from +Z.
    Front,
}

/// Camera orbiting a target point.
///
/// The eye position is always `target + spherical.to_cartesian()`; only the
/// spherical state and the target are stored.
///
/// ```rust,ignore
/// let mut camera = OrbitCamera::new(800.0, 600.0).with_radius(5.0);
/// camera.rotate(dx, dy);
/// let vp = camera.proj() * camera.view();
/// ```
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub up: Vec3,
    spherical: Spherical,
    fov: f32,
    near: f32,
    far: f32,
    width: f32,
    height: f32,
    initial_target: Vec3,
    initial_spherical: Spherical,
}

impl OrbitCamera {
    pub const DEFAULT_RADIUS: f32 = 3.0;
    pub const DEFAULT_FOV: f32 = 60.0;
    pub const DEFAULT_NEAR: f32 = 0.01;
    pub const DEFAULT_FAR: f32 = 500.0;

    /// Camera for a `width` × `height` viewport, looking at the origin from
    /// `phi = 65°`, `theta = 45°`.
    pub fn new(width: f32, height: f32) -> Self {
        let spherical = Spherical::new(
            Self::DEFAULT_RADIUS,
            65f32.to_radians(),
            45f32.to_radians(),
        );
        Self {
            target: Vec3::ZERO,
            up: Vec3::Y,
            spherical,
            fov: Self::DEFAULT_FOV,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
            width,
            height,
            initial_target: Vec3::ZERO,
            initial_spherical: spherical,
        }
    }

    // ── Builder helpers ────────────────────────────────────────────────────

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.spherical.radius = radius;
        self.initial_spherical.radius = radius;
        self
    }

    /// Vertical field of view in degrees.
    pub fn with_fov(mut self, degrees: f32) -> Self {
        self.fov = degrees;
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self.initial_target = target;
        self
    }

    // ── State ──────────────────────────────────────────────────────────────

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// Replace the spherical state; `phi` is clamped like every rotation.
    pub fn set_spherical(&mut self, spherical: Spherical) {
        self.spherical = spherical;
        self.spherical.phi = self.spherical.phi.clamp(PHI_MIN, PI);
    }

    pub fn radius(&self) -> f32 {
        self.spherical.radius
    }

    /// Radius the camera was created with.
    pub fn initial_radius(&self) -> f32 {
        self.initial_spherical.radius
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Viewport resized: the next [`proj`](Self::proj) uses the new aspect.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    // ── Matrices ───────────────────────────────────────────────────────────

    pub fn position(&self) -> Vec3 {
        self.target + self.spherical.to_cartesian()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, self.up)
    }

    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect(), self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }

    // ── Motion ─────────────────────────────────────────────────────────────

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical.phi = (self.spherical.phi - angle).clamp(PHI_MIN, PI);
    }

    /// Orbit by a mouse movement of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotate_left(dx * ROTATE_SENSITIVITY);
        self.rotate_up(dy * ROTATE_SENSITIVITY);
    }

    /// Move towards the target by `amount` (negative moves away).
    pub fn zoom(&mut self, amount: f32) {
        self.spherical.radius -= amount;
    }

    /// Slide the target in the view plane by a mouse movement of `(dx, dy)`
    /// pixels.  The distance moved scales with the distance to the target so
    /// the scene tracks the cursor at any zoom level.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let distance = (self.position() - self.target).length() * (self.fov.to_radians() / 2.0).tan();
        let view = self.view();
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        self.target += right * -(2.0 * dx * distance / self.height);
        self.target += up * (2.0 * dy * distance / self.height);
    }

    /// Back to the target and spherical state the camera was built with.
    pub fn reset(&mut self) {
        self.target = self.initial_target;
        self.spherical = self.initial_spherical;
    }

    /// Snap to an axis view, keeping target and radius.
    pub fn look_from(&mut self, preset: CameraPreset) {
        let (phi, theta) = match preset {
            CameraPreset::Right => (FRAC_PI_2, FRAC_PI_2),
            CameraPreset::Top => (PHI_MIN, 0.0),
            CameraPreset::Front => (FRAC_PI_2, 0.0),
        };
        self.spherical.phi = phi;
        self.spherical.theta = theta;
    }
}
