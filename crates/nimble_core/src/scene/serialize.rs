//! Scene persistence.
//!
//! A [`SceneDocument`] is the plain-data image of a [`Scene`]: objects in
//! order plus the active index.  It is encoded as pretty RON.
//!
//! ```rust,ignore
//! save_scene(&scene, "level.ron")?;
//! let scene = load_scene("level.ron")?;
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::geometry::{Geometry, GeometryKind};
use crate::material::Material;
use crate::scene::component::{reserve_custom_id, ComponentSpec};
use crate::scene::model::Model;
use crate::scene::objects::Scene;
use crate::transform::Transform;

/// Bumped when the document layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub name: String,
    pub transform: Transform,
    pub material: Material,
    pub geometry: GeometryKind,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
    #[serde(default = "enabled")]
    pub active: bool,
}

fn enabled() -> bool {
    true
}

impl ModelDocument {
    pub fn from_model(model: &Model) -> Self {
        Self {
            name: model.name().to_string(),
            transform: *model.transform(),
            material: model.material().clone(),
            geometry: model.geometry().kind().clone(),
            components: model.components().to_vec(),
            active: model.active,
        }
    }

    /// Build a fresh model.  Custom component ids found here are reserved so
    /// new components never collide with them.
    pub fn to_model(&self) -> Model {
        let mut model = Model::new(
            self.name.clone(),
            Rc::new(Geometry::from_kind(&self.geometry)),
            self.material.clone(),
        )
        .with_position(self.transform.position)
        .with_rotation(self.transform.rotation)
        .with_scale(self.transform.scale);
        for component in &self.components {
            if let ComponentSpec::Custom { id, .. } = component {
                reserve_custom_id(*id);
            }
            model = model.with_component(component.clone());
        }
        model.active = self.active;
        model
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: u32,
    pub objects: Vec<ModelDocument>,
    pub active: Option<usize>,
}

impl SceneDocument {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            version: FORMAT_VERSION,
            objects: scene.iter().map(ModelDocument::from_model).collect(),
            active: scene.active_index(),
        }
    }

    /// Rebuild the scene.  Names must be unique and the active index in
    /// range; anything else means the file was edited by hand.
    pub fn to_scene(&self) -> Result<Scene, SceneError> {
        if self.version > FORMAT_VERSION {
            return Err(SceneError::Document(format!(
                "version {} is newer than supported version {FORMAT_VERSION}",
                self.version
            )));
        }
        let mut seen = HashSet::new();
        for object in &self.objects {
            if !seen.insert(object.name.as_str()) {
                return Err(SceneError::Document(format!(
                    "duplicate object name `{}`",
                    object.name
                )));
            }
        }
        if let Some(active) = self.active.filter(|&i| i >= self.objects.len()) {
            return Err(SceneError::Document(format!(
                "active index {active} out of range for {} objects",
                self.objects.len()
            )));
        }

        let mut scene = Scene::new();
        for object in &self.objects {
            scene.add_obj(object.to_model());
        }
        scene.set_active(self.active);
        Ok(scene)
    }

    pub fn to_ron(&self) -> Result<String, SceneError> {
        let pretty = ron::ser::PrettyConfig::new().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(text)?)
    }
}

pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let text = SceneDocument::from_scene(scene).to_ron()?;
    std::fs::write(path, text).with_context(|| format!("writing scene to {}", path.display()))?;
    log::info!("saved {} objects to {}", scene.len(), path.display());
    Ok(())
}

pub fn load_scene(path: impl AsRef<Path>) -> anyhow::Result<Scene> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene from {}", path.display()))?;
    let scene = SceneDocument::from_ron(&text)
        .and_then(|doc| doc.to_scene())
        .with_context(|| format!("parsing scene {}", path.display()))?;
    log::info!("loaded {} objects from {}", scene.len(), path.display());
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::color::Color;
    use crate::geometry::CylinderParams;
    use crate::scene::component::SlotValue;

    fn sample() -> Scene {
        let mut scene = Scene::default_scene();
        let mut ball = Model::new(
            "Ball",
            Rc::new(Geometry::sphere(0.25, 16, 8)),
            Material::default().with_color(Color::RED).with_wireframe(true),
        )
        .with_position(Vec3::new(0.1, 2.3, -4.7))
        .with_rotation(Vec3::new(0.3, 1.1, -0.2))
        .with_scale(Vec3::splat(1.7))
        .with_component(ComponentSpec::physics())
        .with_component(ComponentSpec::custom(Some("bounce.rs")));
        ball.set_component_slot(0, 0, SlotValue::Float(2.5)).unwrap();
        scene.add_obj(ball);
        scene.add_obj(Model::new(
            "Cone",
            Rc::new(Geometry::cylinder(
                CylinderParams::default().with_radii(0.0, 0.4),
            )),
            Material::constant_color(Color::BLUE),
        ));
        scene.set_active(Some(2));
        scene
    }

    #[test]
    fn ron_round_trip_is_exact() {
        let scene = sample();
        let doc = SceneDocument::from_scene(&scene);
        let text = doc.to_ron().unwrap();
        let back = SceneDocument::from_ron(&text).unwrap();
        assert_eq!(back, doc);

        let restored = back.to_scene().unwrap();
        assert_eq!(restored.names(), scene.names());
        assert_eq!(restored.active_index(), Some(2));
        for (a, b) in scene.iter().zip(restored.iter()) {
            assert_eq!(a.transform(), b.transform());
            assert_eq!(a.matrix(), b.matrix());
            assert_eq!(a.components(), b.components());
            assert_eq!(a.material(), b.material());
            assert_eq!(a.geometry().kind(), b.geometry().kind());
        }
    }

    #[test]
    fn rejects_inconsistent_documents() {
        let mut doc = SceneDocument::from_scene(&sample());
        doc.active = Some(99);
        assert!(matches!(doc.to_scene(), Err(SceneError::Document(_))));

        let mut doc = SceneDocument::from_scene(&sample());
        doc.objects[1].name = "Ground".into();
        assert!(matches!(doc.to_scene(), Err(SceneError::Document(_))));

        assert!(matches!(
            SceneDocument::from_ron("SceneDocument(objects: oops)"),
            Err(SceneError::Decode(_))
        ));
    }

    #[test]
    fn loaded_custom_ids_are_reserved() {
        let doc = ModelDocument {
            name: "Scripted".into(),
            transform: Transform::IDENTITY,
            material: Material::default(),
            geometry: GeometryKind::Plane,
            components: vec![ComponentSpec::Custom {
                id: 50_000,
                script: None,
            }],
            active: true,
        };
        let _ = doc.to_model();
        match ComponentSpec::custom(None::<String>) {
            ComponentSpec::Custom { id, .. } => assert!(id > 50_000),
            _ => unreachable!(),
        }
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir().join(format!("nimble_scene_{}.ron", std::process::id()));
        save_scene(&sample(), &path).unwrap();
        let scene = load_scene(&path).unwrap();
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.active().map(Model::name), Some("Ball"));
        std::fs::remove_file(&path).ok();

        assert!(load_scene(&path).is_err());
    }
}
