use bevy::prelude::*;

use crate::core::components::Ball;

/// Boundary response when a ball leaves `[0, extent]` on an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionPolicy {
    /// Clamp to the wall and reflect with `v = -v * damping`.
    Damped { damping: f32 },
    /// Flip the velocity sign only; the position may sit past the wall for a frame.
    Elastic,
}

impl Default for CollisionPolicy {
    fn default() -> Self {
        Self::Damped { damping: 0.97 }
    }
}

/// Resolve one axis. Returns `true` when the wall was hit.
#[inline]
fn bounce_axis(pos: &mut f32, vel: &mut f32, extent: f32, policy: CollisionPolicy) -> bool {
    if *pos >= 0.0 && *pos <= extent {
        return false;
    }
    match policy {
        CollisionPolicy::Damped { damping } => {
            *vel *= -damping;
            *pos = if *pos < 0.0 { 0.0 } else { extent };
        }
        CollisionPolicy::Elastic => *vel = -*vel,
    }
    true
}

/// One explicit Euler step (`pos += vel`, unit time step) for every ball except
/// `skip`, followed by boundary collision against `[0, bounds.x] x [0, bounds.y]`.
pub fn integrate(balls: &mut [Ball], bounds: Vec2, policy: CollisionPolicy, skip: Option<usize>) {
    for (i, ball) in balls.iter_mut().enumerate() {
        if skip == Some(i) {
            continue;
        }
        ball.pos += ball.vel;
        bounce_axis(&mut ball.pos.x, &mut ball.vel.x, bounds.x, policy);
        bounce_axis(&mut ball.pos.y, &mut ball.vel.y, bounds.y, policy);
    }
}
