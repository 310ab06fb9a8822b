//! The running effect instance.
//!
//! A [`Session`] exclusively owns the ball sequence, the RGBA pixel buffer and the drag
//! state. Host glue (the Bevy plugin, the headless snapshot path, tests) drives it one
//! frame at a time; nothing else keeps a copy of the balls or the buffer.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::core::components::{random_velocity, Ball};
use crate::core::config::{ConfigError, MetaballsConfig};
use crate::physics::integrator::{integrate, CollisionPolicy};
use crate::rendering::field::rasterize;

/// Cancellation handle for a running session. Cloneable, callable from any thread,
/// idempotent.
#[derive(Resource, Debug, Clone, Default)]
pub struct MetaballsHandle(Arc<AtomicBool>);

impl MetaballsHandle {
    /// Stop the effect. Returns `true` only for the call that actually disposed it.
    pub fn dispose(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn is_disposed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The subset of [`MetaballsConfig`] a session reads every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub number_of_balls: usize,
    pub speed: f32,
    pub color: [u8; 4],
    pub min_radius: f32,
    pub max_radius: f32,
    pub mouse_control: bool,
    pub collision: CollisionPolicy,
}

impl From<&MetaballsConfig> for SessionSettings {
    fn from(cfg: &MetaballsConfig) -> Self {
        Self {
            number_of_balls: cfg.number_of_balls,
            speed: cfg.speed,
            color: cfg.color,
            min_radius: cfg.min_radius,
            max_radius: cfg.max_radius,
            mouse_control: cfg.mouse_control,
            collision: cfg.collision.policy(),
        }
    }
}

#[derive(Resource, Debug)]
pub struct Session {
    settings: SessionSettings,
    size: UVec2,
    pixels: Vec<u8>,
    balls: Vec<Ball>,
    dragged: Option<usize>,
    rng: StdRng,
    handle: MetaballsHandle,
}

impl Session {
    /// Validate `cfg` and spawn `number_of_balls` random balls inside `size`.
    pub fn new(cfg: &MetaballsConfig, size: UVec2) -> Result<Self, ConfigError> {
        for w in cfg.validate()? {
            warn!("metaballs config: {w}");
        }
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut session = Self {
            settings: SessionSettings::from(cfg),
            size,
            pixels: vec![0; buffer_len(size)],
            balls: Vec::with_capacity(cfg.number_of_balls),
            dragged: None,
            rng,
            handle: MetaballsHandle::default(),
        };
        session.respawn_balls();
        Ok(session)
    }

    /// Session with an explicit ball set (deterministic scenarios, tests).
    pub fn with_balls(cfg: &MetaballsConfig, size: UVec2, balls: Vec<Ball>) -> Result<Self, ConfigError> {
        let mut session = Self::new(cfg, size)?;
        session.settings.number_of_balls = balls.len();
        session.balls = balls;
        Ok(session)
    }

    fn respawn_balls(&mut self) {
        let s = self.settings;
        self.dragged = None;
        self.balls.clear();
        for _ in 0..s.number_of_balls {
            let ball = Ball::random(&mut self.rng, self.size, s.min_radius, s.max_radius, s.speed);
            self.balls.push(ball);
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    /// RGBA, row-major, top-left origin.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn dragged_index(&self) -> Option<usize> {
        self.dragged
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn handle(&self) -> MetaballsHandle {
        self.handle.clone()
    }

    pub fn dispose(&self) -> bool {
        self.handle.dispose()
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_disposed()
    }

    /// Evaluate the field for every pixel into the session buffer.
    pub fn rasterize(&mut self) {
        rasterize(&self.balls, self.size, self.settings.color, &mut self.pixels);
    }

    /// Advance every ball except the dragged one by one frame.
    pub fn integrate(&mut self) {
        integrate(
            &mut self.balls,
            self.size.as_vec2(),
            self.settings.collision,
            self.dragged,
        );
    }

    /// One full frame without a host: rasterize, then integrate.
    /// Returns `false` (and does nothing) once disposed.
    pub fn tick(&mut self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.rasterize();
        self.integrate();
        true
    }

    /// Reallocate the buffer and re-randomize any coordinate outside the new bounds.
    pub fn resize(&mut self, size: UVec2) {
        self.size = size;
        self.pixels.clear();
        self.pixels.resize(buffer_len(size), 0);
        let extent = size.as_vec2();
        for ball in &mut self.balls {
            if ball.pos.x < 0.0 || ball.pos.x > extent.x {
                ball.pos.x = extent.x * self.rng.gen::<f32>();
            }
            if ball.pos.y < 0.0 || ball.pos.y > extent.y {
                ball.pos.y = extent.y * self.rng.gen::<f32>();
            }
        }
    }

    /// Alpha of the last rasterized buffer at `pos` (truncated to whole pixels).
    /// `None` when the coordinate lies outside the buffer.
    pub fn sample_alpha(&self, pos: Vec2) -> Option<u8> {
        if !(pos.x >= 0.0 && pos.y >= 0.0) {
            return None;
        }
        let (x, y) = (pos.x as u32, pos.y as u32);
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let idx = (y as usize * self.size.x as usize + x as usize) * 4 + 3;
        self.pixels.get(idx).copied()
    }

    /// Fraction of pixels currently inside a blob.
    pub fn coverage(&self) -> f32 {
        let total = self.pixels.len() / 4;
        if total == 0 {
            return 0.0;
        }
        let inside = self.pixels.chunks_exact(4).filter(|px| px[3] > 0).count();
        inside as f32 / total as f32
    }

    /// Apply a new configuration to the live session. Style, speed, collision policy
    /// and interactivity change in place; a new ball count or radius range rebuilds the
    /// ball set. An invalid config leaves the session untouched.
    pub fn reconfigure(&mut self, cfg: &MetaballsConfig) -> Result<(), ConfigError> {
        cfg.validate()?;
        let next = SessionSettings::from(cfg);
        let rebuild = next.number_of_balls != self.settings.number_of_balls
            || next.min_radius != self.settings.min_radius
            || next.max_radius != self.settings.max_radius;
        if !next.mouse_control {
            self.end_drag();
        }
        self.settings = next;
        if rebuild {
            info!(balls = next.number_of_balls, "rebuilding metaballs after config change");
            self.respawn_balls();
        }
        Ok(())
    }

    // Drag state transitions, driven by the pointer controller.

    pub(crate) fn begin_drag(&mut self, index: usize) {
        if let Some(ball) = self.balls.get_mut(index) {
            ball.vel = Vec2::ZERO;
            self.dragged = Some(index);
        }
    }

    pub(crate) fn drag_to(&mut self, pos: Vec2) {
        if let Some(ball) = self.dragged.and_then(|i| self.balls.get_mut(i)) {
            ball.pos = pos;
        }
    }

    /// Clear drag state and give the released ball a fresh random velocity.
    pub(crate) fn end_drag(&mut self) -> Option<usize> {
        let index = self.dragged.take()?;
        let vel = random_velocity(&mut self.rng, self.settings.speed);
        if let Some(ball) = self.balls.get_mut(index) {
            ball.vel = vel;
        }
        Some(index)
    }
}

fn buffer_len(size: UVec2) -> usize {
    size.x as usize * size.y as usize * 4
}
