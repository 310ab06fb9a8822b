pub mod config;
pub mod error;

pub use config::{
    log_config_report, CollisionConfig, ConfigLoadReport, DiagnosticsConfig, MetaballsConfig,
    WindowConfig, DEFAULT_CONFIG_LAYERS,
};
pub use error::ConfigError;
