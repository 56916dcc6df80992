//! Scripts compiled into the command-line editor.
//!
//! | Path        | Behaviour                                          |
//! |-------------|----------------------------------------------------|
//! | `spin.rs`   | turns the model about Y at one radian per second   |
//! | `hop.rs`    | pushes the model up whenever it rests on something |
//! | `hud.rs`    | writes the elapsed play time onto the overlay      |

use glam::Vec3;
use nimble_app::{Script, ScriptContext, ScriptError, ScriptRegistry};
use nimble_core::{Color, Model};

pub fn builtin() -> ScriptRegistry {
    let mut scripts = ScriptRegistry::new();
    scripts
        .register("spin.rs", || Spin { speed: 1.0 })
        .register("hop.rs", || Hop { force: 400.0 })
        .register("hud.rs", || Hud);
    scripts
}

struct Spin {
    speed: f32,
}

impl Script for Spin {
    fn update(&mut self, ctx: &mut ScriptContext<'_>, model: &mut Model) -> Result<(), ScriptError> {
        model.rotate(Vec3::new(0.0, self.speed * ctx.time.delta, 0.0));
        Ok(())
    }
}

struct Hop {
    force: f32,
}

impl Script for Hop {
    fn update(&mut self, ctx: &mut ScriptContext<'_>, model: &mut Model) -> Result<(), ScriptError> {
        let Some(me) = ctx.entity else {
            return Ok(());
        };
        let resting = ctx
            .registry
            .get_component::<nimble_app::PhysicsComponent>()
            .any(|(other, _)| other != me && ctx.collides_with(other));
        if resting && !ctx.apply_force(Vec3::Y * self.force) {
            return Err(ScriptError::runtime(format!(
                "`{}` has no physics body to push",
                model.name()
            )));
        }
        Ok(())
    }
}

struct Hud;

impl Script for Hud {
    fn update(&mut self, ctx: &mut ScriptContext<'_>, _model: &mut Model) -> Result<(), ScriptError> {
        let text = format!("t = {:.2}s", ctx.time.elapsed);
        ctx.overlay.draw_text(&text, (8.0, 8.0), 24.0, Color::WHITE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_paths() {
        assert_eq!(builtin().paths(), ["hop.rs", "hud.rs", "spin.rs"]);
    }
}
