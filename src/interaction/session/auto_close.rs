use crate::core::config::MetaballsConfig;
use crate::core::session::MetaballsHandle;
use bevy::prelude::*;

#[derive(Resource, Deref, DerefMut)]
pub struct AutoCloseTimer(Timer);

/// Disposes the effect and exits after `window.autoClose` seconds (0 = never).
pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_autoclose)
            .add_systems(Update, check_autoclose);
    }
}

fn setup_autoclose(mut commands: Commands, cfg: Res<MetaballsConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(seconds = secs, "AutoClose: will exit after {secs} seconds");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn check_autoclose(
    time: Res<Time>,
    mut timer: Option<ResMut<AutoCloseTimer>>,
    handle: Option<Res<MetaballsHandle>>,
    mut ev_exit: EventWriter<AppExit>,
) {
    let Some(t) = timer.as_mut() else {
        return;
    };
    if t.tick(time.delta()).just_finished() {
        info!("AutoClose: timer finished, disposing and requesting app exit");
        if let Some(handle) = handle {
            handle.dispose();
        }
        ev_exit.write(AppExit::Success);
    }
}
