//! The play-mode processors.
//!
//! | Processor            | Priority | Per tick                                   |
//! |----------------------|----------|--------------------------------------------|
//! | [`PhysicsProcessor`] | 0        | sync bodies, step, write poses to models   |
//! | [`ScriptProcessor`]  | 10       | run every custom script on its models      |
//! | [`OverlayProcessor`] | 20       | draw overlay components onto the canvas    |
//!
//! Scripts run after the step so they see this tick's contacts.

use std::collections::HashSet;

use nimble_core::transform::quat_to_euler;
use nimble_core::Transform;
use nimble_ecs::{BoxError, ComponentKey, Entity, Processor, Registry};

use crate::components::{script_of_key, CustomComponent, OverlayComponent, PhysicsComponent};
use crate::physics::BodyDesc;
use crate::script::{NoScript, Script, ScriptContext, ScriptLoader};
use crate::stage::Stage;

pub const PHYSICS_PRIORITY: i32 = 0;
pub const SCRIPT_PRIORITY: i32 = 10;
pub const OVERLAY_PRIORITY: i32 = 20;

// ─── Physics ───────────────────────────────────────────────────────────────

pub struct PhysicsProcessor {
    /// Longest single simulation step; longer ticks are split.
    max_substep: f32,
    /// Entities whose geometry has no collision shape; warned about once.
    shapeless: HashSet<Entity>,
}

impl PhysicsProcessor {
    pub fn new(max_substep: f32) -> Self {
        Self {
            max_substep: max_substep.max(f32::EPSILON),
            shapeless: HashSet::new(),
        }
    }

    fn step(&self, stage: &mut Stage) {
        let delta = stage.time.delta;
        if delta <= 0.0 {
            return;
        }
        let substeps = (delta / self.max_substep).ceil().max(1.0) as u32;
        let dt = delta / substeps as f32;
        for _ in 0..substeps {
            stage.physics.step(dt);
        }
    }

    /// Create bodies for active models that lack one and drop bodies of
    /// inactive or vanished models.
    fn sync_bodies(&mut self, registry: &mut Registry, stage: &mut Stage) {
        let entities: Vec<Entity> = registry
            .get_component::<PhysicsComponent>()
            .map(|(e, _)| e)
            .collect();

        for entity in entities {
            let Some(component) = registry.component_for_entity_mut::<PhysicsComponent>(entity)
            else {
                continue;
            };
            let model = stage
                .scene
                .model_by_entity(component.model)
                .filter(|m| m.active);

            let Some(model) = model else {
                if let Some(body) = component.body.take() {
                    stage.physics.remove_body(body);
                    log::debug!("removed body of inactive entity {entity}");
                }
                continue;
            };
            if component.body.is_some() || self.shapeless.contains(&entity) {
                continue;
            }

            let Some(shape) = model.geometry().collision_shape(model.scale()) else {
                log::warn!("`{}` has no collision shape; physics ignored", model.name());
                self.shapeless.insert(entity);
                continue;
            };
            component.body = Some(stage.physics.add_body(BodyDesc {
                shape,
                position: model.position(),
                rotation: model.transform().quat(),
                mass: component.mass,
                friction: component.friction,
                is_static: component.is_static,
            }));
        }
    }
}

impl Processor<Stage> for PhysicsProcessor {
    fn name(&self) -> &str {
        "physics"
    }

    fn init(&mut self, registry: &mut Registry, stage: &mut Stage) -> Result<(), BoxError> {
        self.sync_bodies(registry, stage);
        log::info!("physics started with {} bodies", stage.physics.body_count());
        Ok(())
    }

    fn process(&mut self, registry: &mut Registry, stage: &mut Stage) -> Result<(), BoxError> {
        self.sync_bodies(registry, stage);
        self.step(stage);

        for (_, component) in registry.get_component::<PhysicsComponent>() {
            if component.is_static {
                continue;
            }
            let Some((position, rotation)) = component.body.and_then(|b| stage.physics.pose(b))
            else {
                continue;
            };
            if !position.is_finite() || !rotation.is_finite() {
                continue;
            }
            if let Some(model) = stage.scene.model_by_entity_mut(component.model) {
                model.set_transform(Transform::new(
                    position,
                    quat_to_euler(rotation),
                    model.scale(),
                ));
            }
        }
        Ok(())
    }
}

// ─── Scripts ───────────────────────────────────────────────────────────────

struct LoadedScript {
    key: ComponentKey,
    path: String,
    script: Box<dyn Script>,
}

/// Runs custom scripts.  One script instance per distinct script path; new
/// paths appearing mid-session are loaded on the next tick.
pub struct ScriptProcessor {
    loader: Box<dyn ScriptLoader>,
    scripts: Vec<LoadedScript>,
}

impl ScriptProcessor {
    pub fn new(loader: Box<dyn ScriptLoader>) -> Self {
        Self {
            loader,
            scripts: Vec::new(),
        }
    }

    /// Paths of the scripts loaded so far, in load order.
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|s| s.path.as_str())
    }

    fn load(&self, path: &str) -> Box<dyn Script> {
        if path.is_empty() {
            return Box::new(NoScript);
        }
        match self.loader.load(path) {
            Ok(script) => script,
            Err(err) => {
                log::error!("{err}");
                Box::new(NoScript)
            }
        }
    }

    fn discover(&mut self, registry: &mut Registry, stage: &mut Stage) {
        let mut fresh: Vec<(ComponentKey, String)> = registry
            .keys()
            .filter_map(|key| Some((key.clone(), script_of_key(key)?.to_string())))
            .filter(|(key, _)| !self.scripts.iter().any(|s| &s.key == key))
            .collect();
        fresh.sort_by(|a, b| a.1.cmp(&b.1));

        for (key, path) in fresh {
            let mut script = self.load(&path);
            let mut ctx = ScriptContext {
                entity: None,
                registry: &mut *registry,
                physics: &mut *stage.physics,
                input: &stage.input,
                overlay: &mut stage.overlay,
                time: stage.time,
            };
            if let Err(err) = script.init(&mut ctx) {
                log::error!("script `{path}` failed to initialise: {err}");
                script = Box::new(NoScript);
            }
            log::debug!("script `{path}` ready");
            self.scripts.push(LoadedScript { key, path, script });
        }
    }
}

impl Processor<Stage> for ScriptProcessor {
    fn name(&self) -> &str {
        "scripts"
    }

    fn init(&mut self, registry: &mut Registry, stage: &mut Stage) -> Result<(), BoxError> {
        self.discover(registry, stage);
        Ok(())
    }

    fn process(&mut self, registry: &mut Registry, stage: &mut Stage) -> Result<(), BoxError> {
        self.discover(registry, stage);

        for loaded in &mut self.scripts {
            let entities: Vec<Entity> = registry
                .get_component_by_key::<CustomComponent>(&loaded.key)
                .map(|(_, c)| c.model)
                .collect();

            for entity in entities {
                let Some(model) = stage.scene.model_by_entity_mut(entity) else {
                    continue;
                };
                if !model.active {
                    continue;
                }
                let mut ctx = ScriptContext {
                    entity: Some(entity),
                    registry: &mut *registry,
                    physics: &mut *stage.physics,
                    input: &stage.input,
                    overlay: &mut stage.overlay,
                    time: stage.time,
                };
                if let Err(err) = loaded.script.update(&mut ctx, model) {
                    log::error!(
                        "script `{}` failed on `{}`: {err}; disabled for this session",
                        loaded.path,
                        model.name()
                    );
                    loaded.script = Box::new(NoScript);
                    break;
                }
            }
        }
        Ok(())
    }
}

// ─── Overlay ───────────────────────────────────────────────────────────────

/// Draws every overlay component.  The session clears the canvas at the
/// start of each tick, so scripts may draw onto it as well.
#[derive(Debug, Default)]
pub struct OverlayProcessor;

impl Processor<Stage> for OverlayProcessor {
    fn name(&self) -> &str {
        "overlay"
    }

    fn process(&mut self, registry: &mut Registry, stage: &mut Stage) -> Result<(), BoxError> {
        for (_, overlay) in registry.get_component::<OverlayComponent>() {
            overlay.0.draw(&mut stage.overlay);
        }
        Ok(())
    }
}
