//! Play mode.
//!
//! A [`Session`] runs on a *copy* of the editor scene, made by encoding the
//! scene document and decoding it again, so nothing done in play mode leaks
//! back into the editor.  Starting a session:
//!
//! 1. copies the scene;
//! 2. gives every model an entity and turns its component descriptors into
//!    live components;
//! 3. adds a camera entity;
//! 4. schedules the physics, script and overlay processors.
//!
//! ```rust,ignore
//! let mut session = Session::start(&scene, &camera, Box::new(scripts), &config)?;
//! for _ in 0..120 {
//!     session.tick();
//! }
//! let played = session.stop();
//! ```

use glam::Vec3;
use nimble_core::scene::SceneDocument;
use nimble_core::{FixedStep, InputEvent, OrbitCamera, Scene, SceneError, Time};
use nimble_ecs::{Entity, Registry, TickReport, World};

use crate::components::{attach_spec, CameraComponent, Overlay, OverlayCanvas, OverlayComponent};
use crate::config::EditorConfig;
use crate::error::SessionError;
use crate::physics::{PhysicsBackend, SimplePhysics};
use crate::processors::{
    OverlayProcessor, PhysicsProcessor, ScriptProcessor, OVERLAY_PRIORITY, PHYSICS_PRIORITY,
    SCRIPT_PRIORITY,
};
use crate::script::ScriptLoader;
use crate::stage::Stage;

pub struct Session {
    world: World<Stage>,
    stage: Stage,
    steps: FixedStep,
    camera: Entity,
}

impl Session {
    /// Start play mode with the built-in physics backend.
    pub fn start(
        scene: &Scene,
        camera: &OrbitCamera,
        loader: Box<dyn ScriptLoader>,
        config: &EditorConfig,
    ) -> Result<Self, SessionError> {
        let physics = SimplePhysics::new(config.physics.gravity());
        Self::with_physics(scene, camera, loader, config, Box::new(physics))
    }

    pub fn with_physics(
        scene: &Scene,
        camera: &OrbitCamera,
        loader: Box<dyn ScriptLoader>,
        config: &EditorConfig,
        physics: Box<dyn PhysicsBackend>,
    ) -> Result<Self, SessionError> {
        let mut scene = copy_scene(scene)?;
        let mut world = World::new();

        for index in 0..scene.len() {
            let entity = world.create_entity();
            let Some(model) = scene.get_mut(index) else {
                continue;
            };
            model.set_entity(Some(entity));
            for spec in model.components() {
                attach_spec(&mut world, entity, spec)?;
            }
        }

        let camera_entity = world.create_entity();
        world.add_component(
            camera_entity,
            CameraComponent {
                camera: camera.clone(),
            },
        )?;

        world.add_processor(
            PhysicsProcessor::new(config.physics.fixed_timestep),
            PHYSICS_PRIORITY,
        );
        world.add_processor(ScriptProcessor::new(loader), SCRIPT_PRIORITY);
        world.add_processor(OverlayProcessor, OVERLAY_PRIORITY);

        let (width, height) = camera.size();
        let overlay = OverlayCanvas::new(width as u32, height as u32);
        log::info!(
            "play mode started: {} objects, {} entities",
            scene.len(),
            world.entity_count()
        );

        Ok(Self {
            world,
            stage: Stage::new(scene, physics, overlay),
            steps: FixedStep::new(config.play.tick_length())
                .with_max_steps(config.play.max_catch_up),
            camera: camera_entity,
        })
    }

    // ── Running ────────────────────────────────────────────────────────────

    /// One fixed-length tick.
    pub fn tick(&mut self) -> TickReport {
        self.stage.time = Time::fixed(self.steps.step(), self.world.tick_count());
        self.stage.overlay.clear();
        self.world.process(&mut self.stage)
    }

    /// Run as many ticks as `elapsed` wall-clock seconds call for.
    pub fn advance(&mut self, elapsed: f32) -> Vec<TickReport> {
        let due = self.steps.advance(elapsed);
        (0..due).map(|_| self.tick()).collect()
    }

    /// Run `ticks` ticks and return the number of processor failures.
    pub fn run_ticks(&mut self, ticks: u64) -> usize {
        (0..ticks).map(|_| self.tick().failures().count()).sum()
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        self.stage.input.apply(event);
        if let InputEvent::Resize { width, height } = *event {
            self.stage.overlay.resize(width as u32, height as u32);
            if let Some(camera) = self
                .world
                .component_for_entity_mut::<CameraComponent>(self.camera)
            {
                camera.camera.resize(width, height);
            }
        }
    }

    /// End play mode, handing back the played scene.
    pub fn stop(self) -> Scene {
        log::info!("play mode stopped after {} ticks", self.world.tick_count());
        self.stage.scene
    }

    // ── Access ─────────────────────────────────────────────────────────────

    pub fn tick_count(&self) -> u64 {
        self.world.tick_count()
    }

    pub fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.stage.scene
    }

    pub fn registry(&self) -> &Registry {
        &self.world
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.world
    }

    pub fn physics(&self) -> &dyn PhysicsBackend {
        self.stage.physics.as_ref()
    }

    pub fn overlay(&self) -> &OverlayCanvas {
        &self.stage.overlay
    }

    pub fn processor_names(&self) -> Vec<&str> {
        self.world.processor_names()
    }

    /// Add a free-standing overlay (HUD text and the like).
    pub fn add_overlay(&mut self, overlay: impl Overlay + 'static) -> Result<Entity, SessionError> {
        let entity = self.world.create_entity();
        self.world
            .add_component(entity, OverlayComponent::new(overlay))?;
        Ok(entity)
    }

    /// Position of the named model in the play scene.
    pub fn position_of(&self, name: &str) -> Option<Vec3> {
        self.stage.scene.get_by_name(name).map(|m| m.position())
    }
}

fn copy_scene(scene: &Scene) -> Result<Scene, SceneError> {
    let text = SceneDocument::from_scene(scene).to_ron()?;
    SceneDocument::from_ron(&text)?.to_scene()
}
