use bevy::prelude::*;
use rand::Rng;

/// A single circular influence source.
///
/// Position and velocity are public; the radius is private so the cached squared radius
/// can never drift from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    /// Surface-space center, top-left origin.
    pub pos: Vec2,
    /// Surface units per frame.
    pub vel: Vec2,
    radius: f32,
    radius_sq: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius,
            radius_sq: radius * radius,
        }
    }

    /// Random ball inside `size`, radius in `[min_radius, max_radius]`,
    /// velocity in `[-speed/2, speed/2]` per axis.
    pub fn random(rng: &mut impl Rng, size: UVec2, min_radius: f32, max_radius: f32, speed: f32) -> Self {
        let radius = min_radius + rng.gen::<f32>() * (max_radius - min_radius);
        let pos = Vec2::new(rng.gen::<f32>() * size.x as f32, rng.gen::<f32>() * size.y as f32);
        Self::new(pos, radius, random_velocity(rng, speed))
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn radius_sq(&self) -> f32 {
        self.radius_sq
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.radius_sq = radius * radius;
    }
}

/// Independent uniform draw per axis in `[-speed/2, speed/2)`.
pub fn random_velocity(rng: &mut impl Rng, speed: f32) -> Vec2 {
    Vec2::new((rng.gen::<f32>() - 0.5) * speed, (rng.gen::<f32>() - 0.5) * speed)
}
