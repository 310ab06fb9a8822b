// This file is part of Metaballs.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::config::MetaballsConfig;
use crate::core::session::MetaballsHandle;
use crate::core::system::system_order::MetaballsSet;
use crate::debug::MetaballsDiagnosticsPlugin;
use crate::interaction::pointer::systems::{
    apply_cursor_affordance, mouse_control_enabled, pointer_input, resolve_pending_hover,
    sync_pointer_state,
};
use crate::interaction::pointer::PointerController;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::integrate_session;
use crate::rendering::surface::{
    attach_surface, present_session, rasterize_session, resize_surface, session_running,
    teardown_disposed, SurfaceTarget,
};

/// The effect itself: attaches to the configured window at startup and runs the
/// interaction, rasterize, present, integrate sequence once per frame.
pub struct MetaballsPlugin;

impl Plugin for MetaballsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MetaballsConfig>()
            .init_resource::<PointerController>()
            .configure_sets(
                Update,
                (
                    MetaballsSet::Interaction,
                    MetaballsSet::Rasterize,
                    MetaballsSet::Present,
                    MetaballsSet::Integrate,
                )
                    .chain()
                    .run_if(session_running),
            )
            .add_systems(Startup, attach_surface)
            .add_systems(
                Update,
                (
                    resize_surface.run_if(resource_exists::<SurfaceTarget>),
                    pointer_input
                        .after(resize_surface)
                        .run_if(resource_exists::<SurfaceTarget>.and(mouse_control_enabled)),
                )
                    .in_set(MetaballsSet::Interaction),
            )
            .add_systems(Update, rasterize_session.in_set(MetaballsSet::Rasterize))
            .add_systems(
                Update,
                (
                    present_session,
                    sync_pointer_state,
                    resolve_pending_hover.run_if(mouse_control_enabled),
                    apply_cursor_affordance,
                )
                    .chain()
                    .in_set(MetaballsSet::Present)
                    .run_if(resource_exists::<SurfaceTarget>),
            )
            .add_systems(Update, integrate_session.in_set(MetaballsSet::Integrate))
            .add_systems(
                Last,
                teardown_disposed.run_if(resource_exists::<MetaballsHandle>),
            )
            .add_plugins(MetaballsDiagnosticsPlugin);
    }
}

/// Desktop app: the effect plus config hot reload and the auto-close timer.
pub struct MetaballsAppPlugin;

impl Plugin for MetaballsAppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((MetaballsPlugin, ConfigHotReloadPlugin, AutoClosePlugin));
    }
}
