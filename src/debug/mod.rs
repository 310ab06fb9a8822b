//! Frame diagnostics on the `metaballs::diag` log target.
//! Built only when compiled with `--features debug` (on by default).

#[cfg(feature = "debug")]
mod diagnostics;

#[cfg(feature = "debug")]
pub use diagnostics::{diag_line, FrameCounter, MetaballsDiagnosticsPlugin};

#[cfg(not(feature = "debug"))]
pub struct MetaballsDiagnosticsPlugin;
#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for MetaballsDiagnosticsPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}
