//! Editor configuration, read from TOML.
//!
//! Every section and field is optional in the file; missing values take the
//! defaults below.
//!
//! ```toml
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [camera]
//! radius = 3.0
//! fov = 60.0
//!
//! [physics]
//! gravity = [0.0, -9.81, 0.0]
//! fixed_timestep = 0.008333
//!
//! [logging]
//! level = "debug"
//! panel_capacity = 500
//! ```

use std::path::Path;

use glam::Vec3;
use log::LevelFilter;
use nimble_core::OrbitCamera;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub radius: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: OrbitCamera::DEFAULT_RADIUS,
            fov: OrbitCamera::DEFAULT_FOV,
            near: OrbitCamera::DEFAULT_NEAR,
            far: OrbitCamera::DEFAULT_FAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoConfig {
    /// Handle size at the camera's initial radius.
    pub scale: f32,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self { scale: 0.6 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: [f32; 3],
    pub fixed_timestep: f32,
}

impl PhysicsConfig {
    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            fixed_timestep: 1.0 / 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Script and physics ticks per second.
    pub tick_rate: u32,
    /// Upper bound on ticks caught up in one frame.
    pub max_catch_up: u32,
}

impl PlayConfig {
    pub fn tick_length(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            max_catch_up: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Records kept by the in-app log panel.
    pub panel_capacity: usize,
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.level.parse().map_err(|_| ConfigError::Invalid {
            field: "logging.level",
            reason: format!("unknown level `{}`", self.level),
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            panel_capacity: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub gizmo: GizmoConfig,
    pub physics: PhysicsConfig,
    pub play: PlayConfig,
    pub logging: LoggingConfig,
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Like [`load`](Self::load), but a missing file gives the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid("viewport", "width and height must be non-zero");
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return invalid("camera.fov", "must be between 0 and 180 degrees");
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return invalid("camera.near", "must be positive and below camera.far");
        }
        if !(self.camera.radius > 0.0) {
            return invalid("camera.radius", "must be positive");
        }
        if !(self.physics.fixed_timestep > 0.0) {
            return invalid("physics.fixed_timestep", "must be positive");
        }
        if self.play.tick_rate == 0 {
            return invalid("play.tick_rate", "must be at least 1");
        }
        self.logging.level_filter()?;
        Ok(())
    }

    // ── Builder helpers ────────────────────────────────────────────────────

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.viewport.width = width;
        self.viewport.height = height;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.physics.gravity = gravity.to_array();
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: u32) -> Self {
        self.play.tick_rate = tick_rate;
        self
    }

    /// Camera described by the `[viewport]` and `[camera]` sections.
    pub fn camera(&self) -> OrbitCamera {
        OrbitCamera::new(self.viewport.width as f32, self.viewport.height as f32)
            .with_radius(self.camera.radius)
            .with_fov(self.camera.fov)
            .with_clip(self.camera.near, self.camera.far)
    }
}
