//! Component descriptors carried by editor models.
//!
//! A [`ComponentSpec`] only holds the user-editable *slot values*.  Play
//! mode turns each descriptor into a live ECS component.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

static CUSTOM_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_custom_id() -> u64 {
    CUSTOM_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Make sure ids loaded from disk are never handed out again.
pub(crate) fn reserve_custom_id(id: u64) {
    CUSTOM_ID_COUNTER.fetch_max(id + 1, Ordering::Relaxed);
}

/// Registry key prefix shared by every custom-script component.
pub const CUSTOM_KEY_PREFIX: &str = "custom_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    File,
    Boolean,
    Float,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlotValue {
    Float(f32),
    Bool(bool),
    File(Option<String>),
}

/// One user-editable value, as shown by an inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub label: &'static str,
    pub kind: SlotKind,
    pub value: SlotValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentSpec {
    /// Rigid body.  Static bodies never move.
    Physics {
        mass: f32,
        friction: f32,
        is_static: bool,
    },
    /// Per-tick user script.
    Custom { id: u64, script: Option<String> },
}

impl ComponentSpec {
    pub fn physics() -> Self {
        ComponentSpec::Physics {
            mass: 1.0,
            friction: 0.5,
            is_static: false,
        }
    }

    pub fn static_body() -> Self {
        ComponentSpec::Physics {
            mass: 1.0,
            friction: 0.5,
            is_static: true,
        }
    }

    /// Custom component with a fresh id.
    pub fn custom(script: Option<impl Into<String>>) -> Self {
        ComponentSpec::Custom {
            id: next_custom_id(),
            script: script.map(Into::into),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentSpec::Physics { .. } => "Physics Component",
            ComponentSpec::Custom { .. } => "Custom Script",
        }
    }

    /// Registry key for custom components: every component running the same
    /// script shares one key.  `None` for built-in components.
    pub fn type_alias(&self) -> Option<String> {
        match self {
            ComponentSpec::Physics { .. } => None,
            ComponentSpec::Custom { script, .. } => Some(format!(
                "{CUSTOM_KEY_PREFIX}{}",
                script.as_deref().unwrap_or_default()
            )),
        }
    }

    pub fn slots(&self) -> Vec<Slot> {
        match self {
            ComponentSpec::Physics {
                mass,
                friction,
                is_static,
            } => vec![
                Slot {
                    label: "Mass",
                    kind: SlotKind::Float,
                    value: SlotValue::Float(*mass),
                },
                Slot {
                    label: "Friction",
                    kind: SlotKind::Float,
                    value: SlotValue::Float(*friction),
                },
                Slot {
                    label: "Is static",
                    kind: SlotKind::Boolean,
                    value: SlotValue::Bool(*is_static),
                },
            ],
            ComponentSpec::Custom { script, .. } => vec![Slot {
                label: "Script",
                kind: SlotKind::File,
                value: SlotValue::File(script.clone()),
            }],
        }
    }

    pub fn slot_values(&self) -> Vec<SlotValue> {
        self.slots().into_iter().map(|s| s.value).collect()
    }

    /// Write one slot.  The value must match the slot's kind.
    pub fn set_slot(&mut self, slot: usize, value: SlotValue) -> Result<(), SceneError> {
        match (self, slot, value) {
            (ComponentSpec::Physics { mass, .. }, 0, SlotValue::Float(v)) => *mass = v,
            (ComponentSpec::Physics { friction, .. }, 1, SlotValue::Float(v)) => *friction = v,
            (ComponentSpec::Physics { is_static, .. }, 2, SlotValue::Bool(v)) => *is_static = v,
            (ComponentSpec::Custom { script, .. }, 0, SlotValue::File(v)) => *script = v,
            (spec, slot, _) => {
                let Some(s) = spec.slots().into_iter().nth(slot) else {
                    return Err(SceneError::NoSuchSlot(slot));
                };
                let expected = match s.kind {
                    SlotKind::File => "file",
                    SlotKind::Boolean => "boolean",
                    SlotKind::Float => "float",
                };
                return Err(SceneError::SlotType {
                    label: s.label,
                    expected,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physics_defaults() {
        assert_eq!(
            ComponentSpec::physics().slot_values(),
            vec![
                SlotValue::Float(1.0),
                SlotValue::Float(0.5),
                SlotValue::Bool(false)
            ]
        );
        assert_eq!(ComponentSpec::physics().type_alias(), None);
    }

    #[test]
    fn custom_ids_are_unique_and_alias_by_script() {
        let a = ComponentSpec::custom(Some("player.rs"));
        let b = ComponentSpec::custom(Some("player.rs"));
        match (&a, &b) {
            (ComponentSpec::Custom { id: x, .. }, ComponentSpec::Custom { id: y, .. }) => {
                assert_ne!(x, y)
            }
            _ => unreachable!(),
        }
        assert_eq!(a.type_alias(), Some("custom_player.rs".to_string()));
        assert_eq!(a.type_alias(), b.type_alias());
        assert_eq!(
            ComponentSpec::custom(None::<String>).type_alias(),
            Some("custom_".to_string())
        );
    }

    #[test]
    fn slots_are_typed() {
        let mut spec = ComponentSpec::physics();
        spec.set_slot(0, SlotValue::Float(3.0)).unwrap();
        spec.set_slot(2, SlotValue::Bool(true)).unwrap();
        assert!(matches!(
            spec.set_slot(1, SlotValue::Bool(true)),
            Err(SceneError::SlotType { label: "Friction", .. })
        ));
        assert!(matches!(
            spec.set_slot(7, SlotValue::Float(1.0)),
            Err(SceneError::NoSuchSlot(7))
        ));
        assert_eq!(
            spec,
            ComponentSpec::Physics {
                mass: 3.0,
                friction: 0.5,
                is_static: true
            }
        );
    }

    #[test]
    fn reserved_ids_are_skipped() {
        reserve_custom_id(10_000);
        match ComponentSpec::custom(Some("x")) {
            ComponentSpec::Custom { id, .. } => assert!(id > 10_000),
            _ => unreachable!(),
        }
    }
}
