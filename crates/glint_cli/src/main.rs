//! `glint` - render a scene description file to a PNG.

mod cli;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glint_core::SceneDescription;
use glint_renderer::{RenderConfig, Renderer, Scene};

use cli::Args;

/// Thread count when neither `-t` nor the config file sets one.
const DEFAULT_THREADS: usize = 4;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let json = match &args.config {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let config = render_config(&args, json.as_deref())?;

    let desc = glint_core::load_sdl(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    let config = with_scene_overrides(config, &desc);

    let scene = Scene::from_description(&desc);
    let start = Instant::now();
    let renderer = Renderer::new(&scene, config)?;
    let image = renderer.render()?;
    log::info!(
        "Total render time: {:.2?} ({} rays)",
        start.elapsed(),
        renderer.progress().rays()
    );

    image::save_buffer(
        &args.output,
        image.as_bytes(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}

/// Render configuration from the optional JSON config with command line
/// overrides applied.
fn render_config(args: &Args, json: Option<&str>) -> Result<RenderConfig> {
    let (mut config, config_threads) = match json {
        Some(json) => {
            let config = RenderConfig::from_json(json).context("Invalid render configuration")?;
            let value: serde_json::Value = serde_json::from_str(json)?;
            let has_threads = value.get("threads").is_some();
            (config, has_threads)
        }
        None => (RenderConfig::default(), false),
    };

    match args.threads {
        Some(threads) => config.threads = threads,
        None if !config_threads => config.threads = DEFAULT_THREADS,
        None => {}
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

/// Scene records take precedence over the render configuration.
fn with_scene_overrides(config: RenderConfig, desc: &SceneDescription) -> RenderConfig {
    match desc.max_depth {
        Some(max_depth) => {
            log::info!("Scene overrides max depth: {}", max_depth);
            RenderConfig { max_depth, ..config }
        }
        None => config,
    }
}
