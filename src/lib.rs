pub mod app;
pub mod core;
pub mod debug;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::game::{MetaballsAppPlugin, MetaballsPlugin};
pub use crate::core::components::Ball;
pub use crate::core::config::{ConfigError, MetaballsConfig, WindowConfig};
pub use crate::core::session::{MetaballsHandle, Session};
pub use physics::integrator::CollisionPolicy;
pub use rendering::field::{field_value, rasterize, FIELD_THRESHOLD};
