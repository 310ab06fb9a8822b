//! Pointer drag controller.
//!
//! Press over a rendered blob grabs the nearest ball, moves pin it to the pointer,
//! release throws it back into free motion with a random velocity. Hit testing reads the
//! alpha channel of the last rasterized buffer; sampling outside the buffer counts as a
//! miss and is never reported.

pub mod systems;

use bevy::prelude::*;

use crate::core::session::Session;

/// Cursor shape hinting what a press would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorAffordance {
    #[default]
    Default,
    Grab,
    Grabbing,
}

#[derive(Resource, Debug, Default)]
pub struct PointerController {
    /// Pending hover check; at most one per frame, first position wins.
    pending_hover: Option<Vec2>,
    affordance: CursorAffordance,
}

/// Index of the ball whose center is nearest `p` (squared distance, ties keep the
/// lowest index).
pub fn nearest_ball(session: &Session, p: Vec2) -> Option<usize> {
    let mut nearest: Option<(usize, f32)> = None;
    for (i, ball) in session.balls().iter().enumerate() {
        let d2 = ball.pos.distance_squared(p);
        match nearest {
            Some((_, best)) if d2 >= best => {}
            _ => nearest = Some((i, d2)),
        }
    }
    nearest.map(|(i, _)| i)
}

impl PointerController {
    pub fn affordance(&self) -> CursorAffordance {
        self.affordance
    }

    pub fn has_pending_hover(&self) -> bool {
        self.pending_hover.is_some()
    }

    /// Primary button pressed at `p`. Returns the grabbed ball, if any.
    pub fn press(&mut self, session: &mut Session, p: Vec2) -> Option<usize> {
        let alpha = session.sample_alpha(p).unwrap_or(0);
        if alpha == 0 {
            return None;
        }
        let index = nearest_ball(session, p)?;
        session.begin_drag(index);
        self.affordance = CursorAffordance::Grabbing;
        debug!(index, x = p.x, y = p.y, "metaball grabbed");
        Some(index)
    }

    /// Pointer moved to `p`. Dragging pins the ball; otherwise a hover check is
    /// scheduled unless one is already pending.
    pub fn moved(&mut self, session: &mut Session, p: Vec2) {
        if session.is_dragging() {
            session.drag_to(p);
        } else if self.pending_hover.is_none() {
            self.pending_hover = Some(p);
        }
    }

    /// Primary button released. Returns the ball that was let go.
    pub fn release(&mut self, session: &mut Session) -> Option<usize> {
        let index = session.end_drag()?;
        self.affordance = CursorAffordance::Grab;
        debug!(index, "metaball released");
        Some(index)
    }

    /// Drop stale pointer state: everything when mouse control is off, a grabbing cursor
    /// once the session no longer holds a drag (reconfigure, respawn).
    pub fn sync(&mut self, session: &Session) {
        if !session.settings().mouse_control {
            self.pending_hover = None;
            self.affordance = CursorAffordance::Default;
        } else if self.affordance == CursorAffordance::Grabbing && !session.is_dragging() {
            self.affordance = CursorAffordance::Default;
        }
    }

    /// Resolve the pending hover check against the presented buffer.
    pub fn resolve_hover(&mut self, session: &Session) -> Option<CursorAffordance> {
        let p = self.pending_hover.take()?;
        if session.is_dragging() {
            return None;
        }
        self.affordance = match session.sample_alpha(p) {
            Some(alpha) if alpha > 0 => CursorAffordance::Grab,
            _ => CursorAffordance::Default,
        };
        Some(self.affordance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::Ball;
    use crate::core::config::MetaballsConfig;

    fn session_with(balls: Vec<Ball>) -> Session {
        let cfg = MetaballsConfig {
            seed: Some(3),
            mouse_control: true,
            ..Default::default()
        };
        let mut s = Session::with_balls(&cfg, UVec2::new(200, 200), balls).unwrap();
        s.rasterize();
        s
    }

    #[test]
    fn nearest_prefers_first_on_tie() {
        let s = session_with(vec![
            Ball::new(Vec2::new(90.0, 100.0), 30.0, Vec2::ZERO),
            Ball::new(Vec2::new(110.0, 100.0), 30.0, Vec2::ZERO),
        ]);
        assert_eq!(nearest_ball(&s, Vec2::new(100.0, 100.0)), Some(0));
        assert_eq!(nearest_ball(&s, Vec2::new(105.0, 100.0)), Some(1));
    }

    #[test]
    fn press_on_empty_space_does_nothing() {
        let mut s = session_with(vec![Ball::new(Vec2::new(50.0, 50.0), 20.0, Vec2::ONE)]);
        let mut pc = PointerController::default();
        assert_eq!(pc.press(&mut s, Vec2::new(190.0, 190.0)), None);
        assert_eq!(pc.press(&mut s, Vec2::new(-4.0, 500.0)), None);
        assert!(!s.is_dragging());
        assert_eq!(s.balls()[0].vel, Vec2::ONE);
    }

    #[test]
    fn press_grabs_and_zeroes_velocity() {
        let mut s = session_with(vec![
            Ball::new(Vec2::new(50.0, 50.0), 20.0, Vec2::ONE),
            Ball::new(Vec2::new(150.0, 150.0), 20.0, Vec2::ONE),
        ]);
        let mut pc = PointerController::default();
        assert_eq!(pc.press(&mut s, Vec2::new(148.0, 151.0)), Some(1));
        assert_eq!(s.dragged_index(), Some(1));
        assert_eq!(s.balls()[1].vel, Vec2::ZERO);
        assert_eq!(pc.affordance(), CursorAffordance::Grabbing);
    }

    #[test]
    fn hover_checks_throttled_to_one() {
        let mut s = session_with(vec![Ball::new(Vec2::new(50.0, 50.0), 20.0, Vec2::ZERO)]);
        let mut pc = PointerController::default();
        pc.moved(&mut s, Vec2::new(50.0, 50.0));
        pc.moved(&mut s, Vec2::new(190.0, 190.0));
        assert!(pc.has_pending_hover());
        assert_eq!(pc.resolve_hover(&s), Some(CursorAffordance::Grab));
        assert!(!pc.has_pending_hover());
        assert_eq!(pc.resolve_hover(&s), None);
        pc.moved(&mut s, Vec2::new(190.0, 190.0));
        assert_eq!(pc.resolve_hover(&s), Some(CursorAffordance::Default));
    }

    #[test]
    fn disabling_mouse_control_resets_cursor() {
        let mut s = session_with(vec![Ball::new(Vec2::new(50.0, 50.0), 20.0, Vec2::ZERO)]);
        let mut pc = PointerController::default();
        assert_eq!(pc.press(&mut s, Vec2::new(50.0, 50.0)), Some(0));
        pc.moved(&mut s, Vec2::new(60.0, 60.0));
        pc.sync(&s);
        assert_eq!(pc.affordance(), CursorAffordance::Grabbing);

        let off = MetaballsConfig {
            seed: Some(3),
            mouse_control: false,
            ..Default::default()
        };
        s.reconfigure(&off).unwrap();
        assert!(!s.is_dragging());
        pc.sync(&s);
        assert_eq!(pc.affordance(), CursorAffordance::Default);
        assert!(!pc.has_pending_hover());
    }

    #[test]
    fn drag_ended_by_respawn_drops_grabbing() {
        let mut s = session_with(vec![Ball::new(Vec2::new(50.0, 50.0), 20.0, Vec2::ZERO)]);
        let mut pc = PointerController::default();
        pc.press(&mut s, Vec2::new(50.0, 50.0));
        let more = MetaballsConfig {
            seed: Some(3),
            mouse_control: true,
            number_of_balls: 4,
            ..Default::default()
        };
        s.reconfigure(&more).unwrap();
        assert!(!s.is_dragging());
        pc.sync(&s);
        assert_eq!(pc.affordance(), CursorAffordance::Default);
    }
}
