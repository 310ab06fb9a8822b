//! CPU field evaluation.
//!
//! Every pixel sums `r² / (d² + 1)` over all balls and is painted with the fill color
//! when the sum exceeds [`FIELD_THRESHOLD`], fully transparent otherwise. There is no
//! spatial acceleration; cost is `width * height * balls` per frame.

use bevy::prelude::*;

use crate::core::components::Ball;

/// Pixels whose field value is strictly greater than this are inside a blob.
pub const FIELD_THRESHOLD: f32 = 1.1;

/// Added to every squared distance so the peak under a ball center stays finite.
pub const FIELD_SOFTENING: f32 = 1.0;

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Contribution of a single ball at `p`.
#[inline]
pub fn ball_contribution(ball: &Ball, p: Vec2) -> f32 {
    let d = p - ball.pos;
    ball.radius_sq() / (d.x * d.x + d.y * d.y + FIELD_SOFTENING)
}

/// Summed field value at `p`.
#[inline]
pub fn field_value(balls: &[Ball], p: Vec2) -> f32 {
    balls.iter().map(|b| ball_contribution(b, p)).sum()
}

#[inline]
pub fn is_inside(value: f32) -> bool {
    value > FIELD_THRESHOLD
}

/// Distance from a lone ball's center at which the field crosses the threshold.
pub fn single_ball_iso_radius(radius: f32) -> f32 {
    (radius * radius / FIELD_THRESHOLD - FIELD_SOFTENING).max(0.0).sqrt()
}

/// Overwrite `buffer` (RGBA, row-major, `size.x * size.y * 4` bytes) with the
/// thresholded field of `balls`. A buffer of any other length is left untouched.
pub fn rasterize(balls: &[Ball], size: UVec2, color: [u8; 4], buffer: &mut [u8]) {
    let width = size.x as usize;
    let expected = width * size.y as usize * 4;
    if width == 0 || buffer.len() != expected {
        return;
    }
    let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(buffer);
    for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
        let py = y as f32;
        for (x, px) in row.iter_mut().enumerate() {
            let value = field_value(balls, Vec2::new(x as f32, py));
            *px = if is_inside(value) { color } else { TRANSPARENT };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: [u8; 4] = [0, 0, 0, 180];

    fn pixel(buf: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    #[test]
    fn single_ball_scenario() {
        let balls = [Ball::new(Vec2::new(100.0, 100.0), 50.0, Vec2::ZERO)];
        assert_eq!(field_value(&balls, Vec2::new(100.0, 100.0)), 2500.0);
        let far = field_value(&balls, Vec2::new(100.0, 200.0));
        assert!((far - 2500.0 / 10001.0).abs() < 1e-6);

        let size = UVec2::new(200, 200);
        let mut buf = vec![7u8; 200 * 200 * 4];
        rasterize(&balls, size, INK, &mut buf);
        assert_eq!(pixel(&buf, 200, 100, 100), INK);
        assert_eq!(pixel(&buf, 200, 100, 199), TRANSPARENT);
        assert_eq!(pixel(&buf, 200, 0, 0), TRANSPARENT);
    }

    #[test]
    fn no_balls_is_fully_transparent() {
        let mut buf = vec![255u8; 16 * 9 * 4];
        rasterize(&[], UVec2::new(16, 9), INK, &mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn empty_surface_is_a_noop() {
        let mut buf: Vec<u8> = Vec::new();
        rasterize(&[Ball::new(Vec2::ZERO, 10.0, Vec2::ZERO)], UVec2::new(0, 5), INK, &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn mismatched_buffer_is_left_untouched() {
        let balls = [Ball::new(Vec2::new(4.0, 4.0), 30.0, Vec2::ZERO)];
        let mut short = vec![9u8; 8 * 8 * 4 - 4];
        rasterize(&balls, UVec2::new(8, 8), INK, &mut short);
        assert!(short.iter().all(|&b| b == 9));

        let mut long = vec![9u8; 8 * 8 * 4 + 4];
        rasterize(&balls, UVec2::new(8, 8), INK, &mut long);
        assert!(long.iter().all(|&b| b == 9));
    }

    #[test]
    fn iso_radius_matches_threshold() {
        let r = 40.0;
        let d = single_ball_iso_radius(r);
        let ball = [Ball::new(Vec2::ZERO, r, Vec2::ZERO)];
        assert!(is_inside(field_value(&ball, Vec2::new(d - 0.01, 0.0))));
        assert!(!is_inside(field_value(&ball, Vec2::new(d + 0.01, 0.0))));
    }
}
