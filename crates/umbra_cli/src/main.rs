//! Umbra command line renderer.
//!
//! Loads a JSON scene (or picks a built-in one), applies command line
//! overrides, renders it and writes the result as PNG or PPM.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use umbra_core::SceneDescription;
use umbra_renderer::{render, render_parallel, save_image, RenderConfig};

mod cli;
mod logger;
mod world;

use cli::Args;
use logger::init_logger;
use world::build_world;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let mut scene = match &args.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            info!("Using built-in scene {:?}", args.builtin);
            args.builtin.description(args.seed)
        }
    };
    args.apply_overrides(&mut scene.camera);

    if args.dump_scene {
        println!("{}", scene.to_json_string()?);
        return Ok(());
    }

    let start = Instant::now();
    let world = build_world(&scene)?;
    info!("Scene built in {:.2?}", start.elapsed());

    let config = RenderConfig {
        background: world.background,
        seed: args.seed,
        workers: args.workers,
    };

    let image = if args.serial {
        render(&world.camera, &world.objects, &config)?
    } else {
        render_parallel(&world.camera, &world.objects, &config)?
    };

    save_image(&image, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}
