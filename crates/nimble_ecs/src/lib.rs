//! `nimble_ecs`: a small entity/component "world" with prioritised
//! processors.
//!
//! # Module layout
//!
//! | Module      | Responsibility                                          |
//! |-------------|---------------------------------------------------------|
//! | `entity`    | `Entity` ids and the monotonic allocator                |
//! | `component` | `Component` marker, `ComponentKey`, typed storage       |
//! | `registry`  | Entities + all component storages (what processors see) |
//! | `processor` | `Processor` trait and per-tick reports                  |
//! | `world`     | `World` = registry + processor schedule                 |
//!
//! # Quick start
//! ```rust,ignore
//! use nimble_ecs::{Component, World};
//!
//! struct Health(u32);
//! impl Component for Health {}
//!
//! let mut world: World<()> = World::new();
//! let e = world.create_entity();
//! world.add_component(e, Health(10))?;
//! for (entity, health) in world.get_component::<Health>() {
//!     println!("{entity}: {}", health.0);
//! }
//! ```

pub mod component;
pub mod entity;
pub mod error;
pub mod processor;
pub mod registry;
pub mod world;

pub use component::{Component, ComponentKey, Storage};
pub use entity::{Entity, EntityAllocator};
pub use error::{BoxError, EcsError};
pub use processor::{Processor, ProcessorRun, TickReport};
pub use registry::Registry;
pub use world::World;
