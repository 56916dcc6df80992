//! Script host contract.
//!
//! A script is a Rust value implementing [`Script`].  The host resolves the
//! path stored in a custom component through a [`ScriptLoader`];
//! [`ScriptRegistry`] is the in-process loader that maps paths to factory
//! functions.
//!
//! ```rust,ignore
//! struct Spin;
//!
//! impl Script for Spin {
//!     fn update(&mut self, ctx: &mut ScriptContext<'_>, model: &mut Model) -> Result<(), ScriptError> {
//!         model.rotate(Vec3::new(0.0, ctx.time.delta, 0.0));
//!         Ok(())
//!     }
//! }
//!
//! let mut scripts = ScriptRegistry::new();
//! scripts.register("spin.rs", || Spin);
//! ```
//!
//! One script instance serves every component that names the same path;
//! `update` is called once per component with that component's model.

use std::collections::HashMap;

use glam::Vec3;
use nimble_core::{InputState, KeyCode, Model, OrbitCamera, Time};
use nimble_ecs::{Entity, Registry};

use crate::components::{ActiveCamera, OverlayCanvas, PhysicsComponent};
use crate::error::ScriptError;
use crate::physics::PhysicsBackend;

/// What a script can reach during `init` and `update`.
pub struct ScriptContext<'a> {
    /// Entity of the model being updated (`None` during `init`).
    pub entity: Option<Entity>,
    pub registry: &'a mut Registry,
    pub physics: &'a mut dyn PhysicsBackend,
    pub input: &'a InputState,
    pub overlay: &'a mut OverlayCanvas,
    pub time: Time,
}

impl ScriptContext<'_> {
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.input.is_key_pressed(key)
    }

    pub fn camera(&self) -> Option<&OrbitCamera> {
        self.registry.active_camera()
    }

    /// Push the current model's physics body.  `false` when it has none.
    pub fn apply_force(&mut self, force: Vec3) -> bool {
        let Some(body) = self.entity.and_then(|e| self.body_of(e)) else {
            return false;
        };
        self.physics.apply_force(body, force);
        true
    }

    /// Whether the current model's body touches `other`'s.
    pub fn collides_with(&self, other: Entity) -> bool {
        match (self.entity.and_then(|e| self.body_of(e)), self.body_of(other)) {
            (Some(a), Some(b)) => self.physics.in_contact(a, b),
            _ => false,
        }
    }

    fn body_of(&self, entity: Entity) -> Option<crate::physics::BodyHandle> {
        self.registry
            .component_for_entity::<PhysicsComponent>(entity)?
            .body
    }
}

pub trait Script {
    /// Called once before the first update.
    fn init(&mut self, _ctx: &mut ScriptContext<'_>) -> Result<(), ScriptError> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>, model: &mut Model) -> Result<(), ScriptError>;
}

/// Stand-in for a script that is missing or has failed.  Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScript;

impl Script for NoScript {
    fn update(&mut self, _ctx: &mut ScriptContext<'_>, _model: &mut Model) -> Result<(), ScriptError> {
        Ok(())
    }
}

pub trait ScriptLoader {
    fn load(&self, path: &str) -> Result<Box<dyn Script>, ScriptError>;
}

type Factory = Box<dyn Fn() -> Box<dyn Script>>;

/// Scripts compiled into the host, by path.
#[derive(Default)]
pub struct ScriptRegistry {
    factories: HashMap<String, Factory>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S, F>(&mut self, path: impl Into<String>, factory: F) -> &mut Self
    where
        S: Script + 'static,
        F: Fn() -> S + 'static,
    {
        self.factories
            .insert(path.into(), Box::new(move || Box::new(factory())));
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.factories.contains_key(path)
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

impl ScriptLoader for ScriptRegistry {
    fn load(&self, path: &str) -> Result<Box<dyn Script>, ScriptError> {
        self.factories
            .get(path)
            .map(|factory| factory())
            .ok_or_else(|| ScriptError::NotFound(path.to_string()))
    }
}
