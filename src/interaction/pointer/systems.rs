use bevy::prelude::*;
use bevy::window::SystemCursorIcon;
use bevy::winit::cursor::CursorIcon;

use super::{CursorAffordance, PointerController};
use crate::core::session::Session;
use crate::rendering::surface::SurfaceTarget;

pub fn mouse_control_enabled(session: Option<Res<Session>>) -> bool {
    session.is_some_and(|s| s.settings().mouse_control)
}

/// Press on the surface window, cursor moves over it, release anywhere.
pub fn pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window>,
    target: Res<SurfaceTarget>,
    mut session: ResMut<Session>,
    mut controller: ResMut<PointerController>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        let cursor = windows
            .get(target.window)
            .ok()
            .and_then(Window::cursor_position);
        if let Some(p) = cursor {
            controller.press(&mut session, p);
        }
    }
    for ev in cursor_moved.read().filter(|e| e.window == target.window) {
        controller.moved(&mut session, ev.position);
    }
    if buttons.just_released(MouseButton::Left) {
        controller.release(&mut session);
    }
}

pub fn sync_pointer_state(session: Res<Session>, mut controller: ResMut<PointerController>) {
    controller.sync(&session);
}

pub fn resolve_pending_hover(session: Res<Session>, mut controller: ResMut<PointerController>) {
    controller.resolve_hover(&session);
}

fn system_icon(affordance: CursorAffordance) -> SystemCursorIcon {
    match affordance {
        CursorAffordance::Default => SystemCursorIcon::Default,
        CursorAffordance::Grab => SystemCursorIcon::Grab,
        CursorAffordance::Grabbing => SystemCursorIcon::Grabbing,
    }
}

/// Push the affordance to the window cursor, only when it differs from what is shown.
/// The window starts with the default cursor.
pub fn apply_cursor_affordance(
    mut commands: Commands,
    controller: Res<PointerController>,
    target: Res<SurfaceTarget>,
    mut shown: Local<CursorAffordance>,
) {
    let current = controller.affordance();
    if *shown == current {
        return;
    }
    *shown = current;
    commands
        .entity(target.window)
        .insert(CursorIcon::from(system_icon(current)));
}
