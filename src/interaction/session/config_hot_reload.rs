use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::{MetaballsConfig, DEFAULT_CONFIG_LAYERS};
use crate::core::session::Session;
use crate::rendering::surface::SurfaceTarget;

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: DEFAULT_CONFIG_LAYERS.iter().map(PathBuf::from).collect(),
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl FromWorld for ConfigReloadState {
    fn from_world(world: &mut World) -> Self {
        let interval = world
            .get_resource::<ConfigReloadSettings>()
            .map_or(0.5, |s| s.interval_secs.max(0.05));
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(interval, TimerMode::Repeating),
        }
    }
}

/// Polls the config layers' modification times and applies changes to the live session.
/// Native only; on wasm there is no filesystem to watch and the plugin adds nothing.
pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    #[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, poll_and_reload_config);
        }
    }
}

/// True when any existing layer has a newer modification time than last seen.
fn layers_changed(state: &mut ConfigReloadState, paths: &[PathBuf]) -> bool {
    let mut dirty = false;
    for path in paths {
        let Ok(mod_time) = std::fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let seen = state
            .last_mod
            .entry(path.clone())
            .or_insert(SystemTime::UNIX_EPOCH);
        if mod_time > *seen {
            *seen = mod_time;
            dirty = true;
        }
    }
    dirty
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<MetaballsConfig>,
    mut windows: Query<&mut Window>,
    session: Option<ResMut<Session>>,
    target: Option<Res<SurfaceTarget>>,
) {
    if !state.timer.tick(time.delta()).just_finished() {
        return;
    }
    if !layers_changed(&mut state, &settings.paths) {
        return;
    }
    let (new_cfg, _used, errors) = MetaballsConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!("CONFIG HOT-RELOAD issue: {e}");
    }
    if *cfg_res == new_cfg {
        return;
    }
    if let Some(mut session) = session {
        if let Err(e) = session.reconfigure(&new_cfg) {
            warn!("CONFIG HOT-RELOAD rejected: {e}");
            return;
        }
    }
    let window = match target {
        Some(t) => windows.get_mut(t.window).ok(),
        None => None,
    };
    if let Some(mut window) = window {
        if window.width() != new_cfg.window.width || window.height() != new_cfg.window.height {
            window
                .resolution
                .set(new_cfg.window.width, new_cfg.window.height);
        }
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    info!("Config hot-reload applied");
    *cfg_res = new_cfg;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn plugin_registers_polling_on_native() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(MetaballsConfig::default())
            .insert_resource(ConfigReloadSettings {
                paths: vec![PathBuf::from("does/not/exist.ron")],
                interval_secs: 0.2,
            })
            .add_plugins(ConfigHotReloadPlugin);
        app.update();
        let state = app.world().resource::<ConfigReloadState>();
        assert_eq!(state.timer.duration().as_secs_f32(), 0.2);
        assert!(state.last_mod.is_empty());
        assert_eq!(*app.world().resource::<MetaballsConfig>(), MetaballsConfig::default());
    }

    #[test]
    fn missing_layers_never_dirty() {
        let mut state = ConfigReloadState {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        };
        let paths = vec![PathBuf::from("does/not/exist.ron")];
        assert!(!layers_changed(&mut state, &paths));
    }

    #[test]
    fn first_sight_is_dirty_then_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metaballs.ron");
        fs::write(&path, "(speed: 2.0)").unwrap();
        let mut state = ConfigReloadState {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        };
        let paths = vec![path];
        assert!(layers_changed(&mut state, &paths));
        assert!(!layers_changed(&mut state, &paths));
    }
}
