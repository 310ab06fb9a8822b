use bevy::prelude::*;
use ron::value::Value;
use serde::Deserialize;
use std::{fs, path::Path};

use super::error::ConfigError;
use crate::physics::integrator::CollisionPolicy;

/// Config layers read at startup and watched by the hot-reload plugin. Later files win.
pub const DEFAULT_CONFIG_LAYERS: [&str; 2] = [
    "assets/config/metaballs.ron",
    "assets/config/metaballs.local.ron",
];

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose", alias = "auto_close")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Metaballs".into(),
            auto_close: 0.0,
        }
    }
}

/// Boundary response toggle. `damped: false` selects the elastic sign-flip variant.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    pub damped: bool,
    pub damping: f32,
}
impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            damped: true,
            damping: 0.97,
        }
    }
}
impl CollisionConfig {
    pub fn policy(&self) -> CollisionPolicy {
        if self.damped {
            CollisionPolicy::Damped {
                damping: self.damping,
            }
        } else {
            CollisionPolicy::Elastic
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    /// Frames between periodic log lines. 0 = startup summary only.
    pub log_every_n_frames: u32,
}
impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_every_n_frames: 300,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct MetaballsConfig {
    pub window: WindowConfig,
    /// Name of the host window the effect attaches to.
    #[serde(alias = "elementId")]
    pub element_id: String,
    #[serde(alias = "numberOfBalls")]
    pub number_of_balls: usize,
    /// Initial per-axis velocity is drawn from `[-speed/2, speed/2]`.
    pub speed: f32,
    pub color: [u8; 4],
    #[serde(alias = "minRadius")]
    pub min_radius: f32,
    #[serde(alias = "maxRadius")]
    pub max_radius: f32,
    #[serde(alias = "mouseControl")]
    pub mouse_control: bool,
    pub collision: CollisionConfig,
    /// Fixed RNG seed for reproducible runs; entropy when unset.
    pub seed: Option<u64>,
    pub diagnostics: DiagnosticsConfig,
}
impl Default for MetaballsConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            element_id: "metaballs".into(),
            number_of_balls: 6,
            speed: 1.5,
            color: [0, 0, 0, 180],
            min_radius: 20.0,
            max_radius: 140.0,
            mouse_control: false,
            collision: Default::default(),
            seed: None,
            diagnostics: Default::default(),
        }
    }
}

/// Outcome of the startup layered load, logged once the app's logger exists.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigLoadReport {
    pub used: Vec<String>,
    pub errors: Vec<String>,
}

pub fn log_config_report(report: Res<ConfigLoadReport>) {
    if report.used.is_empty() {
        info!("no config layers found; using defaults");
    } else {
        info!("config layers: {}", report.used.join(", "));
    }
    for e in &report.errors {
        warn!("config issue: {e}");
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Parse one layer into a generic value tree so RON and TOML layers merge alike.
fn read_layer(path: &Path) -> Result<Value, ConfigError> {
    let txt = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = if is_toml(path) {
        toml::from_str::<Value>(&txt).map_err(|e| e.to_string())
    } else {
        ron::from_str::<Value>(&txt).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Deep merge: maps merge key by key, anything else is replaced by the overlay.
fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let existing = bm.iter_mut().find(|(ek, _)| **ek == k).map(|(_, ev)| ev);
                if let Some(ev) = existing {
                    merge_value(ev, v);
                } else {
                    bm.insert(k, v);
                }
            }
        }
        (b, o) => *b = o,
    }
}

impl MetaballsConfig {
    /// Load a single RON (or `.toml`) file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = if is_toml(path) {
            toml::from_str(&txt).map_err(|e| e.to_string())
        } else {
            ron::from_str(&txt).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Merge every readable layer in order and deserialize the result.
    /// Returns `(config, used_paths, errors)`; a layer that fails is reported and skipped.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path_ref = p.as_ref();
            match read_layer(path_ref) {
                Ok(val) => {
                    if let Some(cur) = &mut merged {
                        merge_value(cur, val);
                    } else {
                        merged = Some(val);
                    }
                    used.push(path_ref.display().to_string());
                }
                Err(e) => errors.push(e.to_string()),
            }
        }
        match merged {
            Some(val) => match val.into_rust::<MetaballsConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (MetaballsConfig::default(), used, errors)
                }
            },
            None => (MetaballsConfig::default(), used, errors),
        }
    }

    /// Hard errors reject the config; the `Ok` vector carries soft warnings.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        if self.number_of_balls == 0 {
            return Err(ConfigError::NoBalls);
        }
        let (min, max) = (self.min_radius, self.max_radius);
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || max <= 0.0 {
            return Err(ConfigError::NonPositiveRadius { min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedRadiusRange { min, max });
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if self.collision.damped && !(0.0..=1.0).contains(&self.collision.damping) {
            return Err(ConfigError::InvalidDamping(self.collision.damping));
        }

        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.width * self.window.height > 10_000_000.0 {
            w.push(format!(
                "very large window area: {}x{} (field cost grows with every pixel)",
                self.window.width, self.window.height
            ));
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.number_of_balls > 64 {
            w.push(format!(
                "number_of_balls {} very high; every pixel visits every ball each frame",
                self.number_of_balls
            ));
        }
        if (max - min).abs() < f32::EPSILON {
            w.push(format!("min_radius == max_radius ({min}) -> zero variation"));
        }
        if self.speed == 0.0 {
            w.push("speed is 0; balls will not move".into());
        }
        if self.color[3] == 0 {
            w.push("color alpha is 0; blobs are invisible and cannot be grabbed".into());
        }
        if self.element_id.is_empty() {
            w.push("element_id is empty; no window will match".into());
        }
        Ok(w)
    }
}
