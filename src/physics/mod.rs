pub mod integrator;

use bevy::prelude::*;

use crate::core::session::Session;

pub fn integrate_session(mut session: ResMut<Session>) {
    session.integrate();
}
