use bevy::prelude::*;

use crate::core::config::MetaballsConfig;
use crate::core::session::Session;
use crate::core::system::system_order::MetaballsSet;

/// Frames the session has run since attaching.
#[derive(Resource, Default, Debug)]
pub struct FrameCounter(pub u64);

pub struct MetaballsDiagnosticsPlugin;
impl Plugin for MetaballsDiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameCounter>()
            .add_systems(PostStartup, startup_summary)
            .add_systems(
                Update,
                periodic_diagnostics
                    .after(MetaballsSet::Integrate)
                    .run_if(resource_exists::<Session>),
            );
    }
}

/// One-line state summary used by the periodic log.
pub fn diag_line(frame: u64, fps: f32, session: &Session) -> String {
    format!(
        "frame={} fps={:.1} surface={}x{} balls={} coverage={:.1}% dragging={:?}",
        frame,
        fps,
        session.width(),
        session.height(),
        session.balls().len(),
        session.coverage() * 100.0,
        session.dragged_index()
    )
}

fn startup_summary(cfg: Res<MetaballsConfig>, session: Option<Res<Session>>) {
    if !cfg.diagnostics.enabled {
        return;
    }
    match session {
        Some(s) => info!(target: "metaballs::diag",
            "Startup: surface={}x{} balls={} radius={}..{} speed={} collision={:?} mouse_control={}",
            s.width(), s.height(), s.balls().len(),
            s.settings().min_radius, s.settings().max_radius, s.settings().speed,
            s.settings().collision, s.settings().mouse_control
        ),
        None => warn!(target: "metaballs::diag",
            "Startup: no session (window {:?} missing or config rejected)", cfg.element_id
        ),
    }
}

fn periodic_diagnostics(
    cfg: Res<MetaballsConfig>,
    time: Res<Time>,
    mut fc: ResMut<FrameCounter>,
    session: Res<Session>,
) {
    fc.0 += 1;
    let every = cfg.diagnostics.log_every_n_frames as u64;
    if !cfg.diagnostics.enabled || every == 0 || fc.0 % every != 0 {
        return;
    }
    let fps = 1.0 / time.delta_secs().max(1e-6);
    info!(target: "metaballs::diag", "{}", diag_line(fc.0, fps, &session));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::Ball;

    #[test]
    fn diag_line_reports_state() {
        let cfg = MetaballsConfig {
            seed: Some(1),
            ..Default::default()
        };
        let mut s = Session::with_balls(
            &cfg,
            UVec2::new(20, 10),
            vec![Ball::new(Vec2::new(10.0, 5.0), 40.0, Vec2::ZERO)],
        )
        .unwrap();
        s.rasterize();
        let line = diag_line(7, 60.0, &s);
        assert!(line.contains("frame=7"));
        assert!(line.contains("surface=20x10"));
        assert!(line.contains("balls=1"));
        assert!(line.contains("coverage=100.0%"));
    }
}
