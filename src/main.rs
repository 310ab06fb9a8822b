use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;

use metaballs::core::config::{
    log_config_report, ConfigLoadReport, MetaballsConfig, DEFAULT_CONFIG_LAYERS,
};
use metaballs::interaction::session::config_hot_reload::ConfigReloadSettings;
use metaballs::rendering::snapshot::render_snapshot;
use metaballs::MetaballsAppPlugin;

#[derive(Parser, Debug)]
#[command(about = "CPU-rasterized metaballs", version, author)]
struct Args {
    /// Config layer (RON or .toml). Repeatable; later layers override earlier ones.
    /// Defaults to assets/config/metaballs.ron + metaballs.local.ron.
    #[arg(long = "config")]
    config: Vec<PathBuf>,
    /// Render headless and write the final frame to this PNG instead of opening a window.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Frames to simulate before a snapshot.
    #[arg(long, default_value_t = 1)]
    frames: u32,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let layers: Vec<PathBuf> = if args.config.is_empty() {
        DEFAULT_CONFIG_LAYERS.iter().map(PathBuf::from).collect()
    } else {
        args.config.clone()
    };
    let (mut cfg, used, errors) = MetaballsConfig::load_layered(&layers);
    if let Some(w) = args.width {
        cfg.window.width = w as f32;
    }
    if let Some(h) = args.height {
        cfg.window.height = h as f32;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate().context("invalid metaballs configuration")?;

    if let Some(out) = &args.snapshot {
        for e in &errors {
            eprintln!("config issue: {e}");
        }
        let size = UVec2::new(
            cfg.window.width.max(0.0) as u32,
            cfg.window.height.max(0.0) as u32,
        );
        let session = render_snapshot(&cfg, size, args.frames, out)?;
        println!(
            "wrote {} ({}x{}, {} balls, {} frames, {:.1}% covered)",
            out.display(),
            size.x,
            size.y,
            session.balls().len(),
            args.frames,
            session.coverage() * 100.0
        );
        return Ok(());
    }

    let exit = App::new()
        .insert_resource(cfg.clone())
        .insert_resource(ConfigLoadReport { used, errors })
        .insert_resource(ConfigReloadSettings {
            paths: layers,
            ..default()
        })
        .insert_resource(ClearColor(Color::WHITE))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                name: Some(cfg.element_id.clone()),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, log_config_report)
        .add_plugins(MetaballsAppPlugin)
        .run();
    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("app exited with code {code}"),
    }
}
