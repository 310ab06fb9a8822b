use std::path::PathBuf;

use thiserror::Error;

/// Hard configuration failures. Soft concerns are reported as warning strings by
/// [`MetaballsConfig::validate`](super::MetaballsConfig::validate) instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("number_of_balls must be at least 1")]
    NoBalls,
    #[error("radius bounds must be finite and > 0 (min_radius={min}, max_radius={max})")]
    NonPositiveRadius { min: f32, max: f32 },
    #[error("min_radius ({min}) greater than max_radius ({max})")]
    InvertedRadiusRange { min: f32, max: f32 },
    #[error("speed must be finite and >= 0 (got {0})")]
    InvalidSpeed(f32),
    #[error("collision.damping must lie in 0..=1 (got {0})")]
    InvalidDamping(f32),
    #[error("read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}
