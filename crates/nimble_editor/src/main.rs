//! `nimble`: headless front end for scene files.
//!
//! ```text
//! nimble new scene.ron
//! nimble inspect scene.ron
//! nimble run scene.ron --ticks 240 --out played.ron
//! ```

mod scripts;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nimble_app::{logging, EditorConfig, LogPanel, Session, TextOverlay};
use nimble_core::scene::{load_scene, save_scene};
use nimble_core::Scene;

#[derive(Debug, Parser)]
#[command(author, version, about = "nimble scene editor (headless)")]
struct Cli {
    /// Editor configuration; defaults apply when the file does not exist
    #[arg(long, global = true, default_value = "nimble.toml")]
    config: PathBuf,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the default scene (ground plane and a cube)
    New {
        path: PathBuf,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// List the objects of a scene file
    Inspect { path: PathBuf },
    /// Play a scene for a number of ticks
    Run {
        path: PathBuf,
        #[arg(long, default_value_t = 60)]
        ticks: u64,
        /// Save the played scene here
        #[arg(long)]
        out: Option<PathBuf>,
        /// Show a status line on the overlay
        #[arg(long)]
        hud: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EditorConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level.as_str());
        config.validate()?;
    }
    let panel = LogPanel::new(config.logging.panel_capacity);
    logging::init(&config.logging, panel)?;

    let report = execute(&cli.command, &config)?;
    print!("{report}");
    Ok(())
}

/// Run one command and return what it prints.
fn execute(command: &Command, config: &EditorConfig) -> Result<String> {
    match command {
        Command::New { path, force } => new_scene(path, *force),
        Command::Inspect { path } => Ok(describe(&load_scene(path)?)),
        Command::Run {
            path,
            ticks,
            out,
            hud,
        } => run(path, *ticks, out.as_deref(), *hud, config),
    }
}

fn new_scene(path: &Path, force: bool) -> Result<String> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    let scene = Scene::default_scene();
    save_scene(&scene, path)?;
    Ok(format!("wrote {} objects to {}\n", scene.len(), path.display()))
}

fn describe(scene: &Scene) -> String {
    let mut out = String::new();
    for (index, model) in scene.iter().enumerate() {
        let marker = if scene.active_index() == Some(index) { '*' } else { ' ' };
        let p = model.position();
        let _ = write!(
            out,
            "{marker}{index:>3}  {:<16} {:<9} ({:.3}, {:.3}, {:.3})",
            model.name(),
            model.geometry().kind().type_name(),
            p.x,
            p.y,
            p.z
        );
        if !model.active {
            out.push_str("  [inactive]");
        }
        for spec in model.components() {
            let _ = write!(out, "  +{}", spec.display_name());
            if let Some(alias) = spec.type_alias() {
                let _ = write!(out, " ({alias})");
            }
        }
        out.push('\n');
    }
    out
}

fn run(path: &Path, ticks: u64, out: Option<&Path>, hud: bool, config: &EditorConfig) -> Result<String> {
    let scene = load_scene(path)?;
    let mut session = Session::start(&scene, &config.camera(), Box::new(scripts::builtin()), config)
        .context("starting play mode")?;
    if hud {
        session.add_overlay(TextOverlay::new(format!("{} ({ticks} ticks)", path.display())))?;
    }

    let failures = session.run_ticks(ticks);
    if failures > 0 {
        log::warn!("{failures} processor failures during play");
    }
    let overlay_items = session.overlay().items.len();

    let played = session.stop();
    let mut report = describe(&played);
    let _ = writeln!(report, "{ticks} ticks, {overlay_items} overlay items");
    if let Some(out) = out {
        save_scene(&played, out)?;
        let _ = writeln!(report, "saved to {}", out.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn temp(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nimble_cli_{}_{name}", std::process::id()))
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
        let cli = Cli::try_parse_from(["nimble", "run", "a.ron", "--ticks", "5", "--hud"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("nimble.toml"));
        assert!(matches!(cli.command, Command::Run { ticks: 5, hud: true, out: None, .. }));
    }

    #[test]
    fn new_then_inspect() {
        let path = temp("new.ron");
        let config = EditorConfig::default();
        execute(&Command::New { path: path.clone(), force: true }, &config).unwrap();
        assert!(execute(&Command::New { path: path.clone(), force: false }, &config).is_err());

        let listing = execute(&Command::Inspect { path: path.clone() }, &config).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Ground") && lines[0].contains("Physics Component"));
        assert!(lines[1].contains("Cube"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn run_plays_and_saves() {
        let (input, output) = (temp("in.ron"), temp("out.ron"));
        let mut scene = Scene::default_scene();
        if let Some(cube) = scene.get_by_name_mut("Cube") {
            cube.set_position(glam::Vec3::new(0.0, 2.0, 0.0));
            cube.add_component(nimble_core::ComponentSpec::physics());
            cube.add_component(nimble_core::ComponentSpec::custom(Some("hud.rs")));
        }
        save_scene(&scene, &input).unwrap();

        let command = Command::Run {
            path: input.clone(),
            ticks: 90,
            out: Some(output.clone()),
            hud: true,
        };
        let report = execute(&command, &EditorConfig::default()).unwrap();
        assert!(report.contains("90 ticks, 2 overlay items"));

        let played = load_scene(&output).unwrap();
        let y = played.get_by_name("Cube").unwrap().position().y;
        assert!(y < 1.0, "{y}");
        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }
}
