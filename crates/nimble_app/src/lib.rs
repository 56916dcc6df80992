//! Editor application layer: play mode, viewport input and the ambient
//! configuration/logging setup.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use nimble_app::{logging, EditorConfig, LogPanel, ScriptRegistry, Session, Viewport};
//! use nimble_core::Scene;
//!
//! let config = EditorConfig::load_or_default("nimble.toml")?;
//! let panel = LogPanel::new(config.logging.panel_capacity);
//! logging::init(&config.logging, panel.clone())?;
//!
//! let mut scene = Scene::default_scene();
//! let mut viewport = Viewport::new(&config);
//! viewport.attach(&mut scene);
//!
//! let mut session = Session::start(&scene, viewport.camera(), Box::new(ScriptRegistry::new()), &config)?;
//! session.run_ticks(60);
//! ```
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`config`]     | `EditorConfig` loaded from TOML                        |
//! | [`logging`]    | fern setup and the in-app `LogPanel`                   |
//! | [`viewport`]   | input routing to camera, selection and gizmo           |
//! | [`session`]    | play mode over a copy of the scene                     |
//! | [`processors`] | physics, script and overlay processors                 |
//! | [`components`] | live ECS components built from component descriptors   |
//! | [`script`]     | script trait, context and in-process loader            |
//! | [`physics`]    | physics backend trait and `SimplePhysics`              |

pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod physics;
pub mod processors;
pub mod script;
pub mod session;
pub mod stage;
pub mod viewport;

pub use components::{
    ActiveCamera, CameraComponent, CustomComponent, Overlay, OverlayCanvas, OverlayComponent,
    OverlayItem, PhysicsComponent, TextOverlay,
};
pub use config::EditorConfig;
pub use error::{ConfigError, ScriptError, SessionError};
pub use logging::{LogEntry, LogPanel};
pub use physics::{BodyDesc, BodyHandle, PhysicsBackend, SimplePhysics};
pub use processors::{OverlayProcessor, PhysicsProcessor, ScriptProcessor};
pub use script::{NoScript, Script, ScriptContext, ScriptLoader, ScriptRegistry};
pub use session::Session;
pub use stage::Stage;
pub use viewport::{ContextMenu, MenuAction, Viewport, ViewportResponse};
