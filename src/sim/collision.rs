//! Collision detection and response
//!
//! All resolution is discrete: the ball moves a full step, then any overlap
//! is resolved by pushing it out along an inferred normal. Ball speed times
//! `SIM_DT` is small compared to brick and paddle sizes, so tunneling is not
//! a concern at the speeds this game uses.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Ball, BrickGrid, Paddle};
use crate::consts::{PADDLE_DEFLECT, SEPARATION};

/// Result of a ball-vs-box overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the boxes overlap
    pub hit: bool,
    /// Axis-aligned surface normal pointing out of the obstacle toward the ball
    pub normal: Vec2,
    /// Overlap along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Which walls the ball bounced off this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHits {
    pub side: bool,
    pub top: bool,
}

impl WallHits {
    pub fn count(&self) -> usize {
        self.side as usize + self.top as usize
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n. For the axis-aligned normals used
/// here this flips exactly one component.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Keep the ball inside the left, right and top edges.
///
/// The bottom edge is open: leaving through it is a life loss, see
/// [`ball_fell_out`].
pub fn resolve_walls(ball: &mut Ball, width: f32) -> WallHits {
    let mut hits = WallHits::default();

    if ball.rect.left() <= 0.0 {
        ball.rect.set_left(0.0);
        ball.vel.x = ball.vel.x.abs();
        hits.side = true;
    } else if ball.rect.right() >= width {
        ball.rect.set_right(width);
        ball.vel.x = -ball.vel.x.abs();
        hits.side = true;
    }

    if ball.rect.top() <= 0.0 {
        ball.rect.set_top(0.0);
        ball.vel.y = ball.vel.y.abs();
        hits.top = true;
    }

    hits
}

/// True once the ball's top edge is below the bottom of the playfield
#[inline]
pub fn ball_fell_out(ball: &Ball, height: f32) -> bool {
    ball.rect.top() > height
}

/// Velocity after a paddle hit at normalized offset `u` (0 = left edge,
/// 1 = right edge). Angle is measured from straight up; speed is preserved
/// and the result always points upward.
pub fn paddle_bounce_velocity(velocity: Vec2, u: f32) -> Vec2 {
    let angle = (u.clamp(0.0, 1.0) - 0.5) * PADDLE_DEFLECT;
    let speed = velocity.length();
    Vec2::new(speed * angle.sin(), -(speed * angle.cos()).abs())
}

/// Bounce the ball off the paddle if they overlap and the ball is falling.
///
/// The downward-only guard keeps a ball that is already leaving from being
/// caught a second time. Returns true on a bounce.
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if ball.vel.y <= 0.0 || !ball.rect.intersects(&paddle.rect) {
        return false;
    }

    let u = (ball.rect.center_x() - paddle.rect.left()) / paddle.rect.w;
    ball.vel = paddle_bounce_velocity(ball.vel, u);
    ball.rect.set_bottom(paddle.rect.top() - SEPARATION);
    true
}

/// Minimum-penetration overlap test between the ball and a brick.
///
/// Penetration is measured on all four sides; the smallest wins. Ties go to
/// the first side in the order left, right, top, bottom, where "left" means
/// the ball's left edge is inside the brick's right face (normal +x).
pub fn ball_brick_collision(ball: &Rect, brick: &Rect) -> CollisionResult {
    if !ball.intersects(brick) {
        return CollisionResult::miss();
    }

    let candidates = [
        (brick.right() - ball.left(), Vec2::X),
        (ball.right() - brick.left(), Vec2::NEG_X),
        (brick.bottom() - ball.top(), Vec2::Y),
        (ball.bottom() - brick.top(), Vec2::NEG_Y),
    ];

    let (mut penetration, mut normal) = candidates[0];
    for &(pen, n) in &candidates[1..] {
        // Strict comparison: the earlier side keeps ties
        if pen < penetration {
            penetration = pen;
            normal = n;
        }
    }

    CollisionResult {
        hit: true,
        normal,
        penetration,
    }
}

/// Reflect off a brick face and push the ball clear of it.
pub fn resolve_brick(ball: &mut Ball, brick: &Rect, result: &CollisionResult) {
    ball.vel = reflect_velocity(ball.vel, result.normal);

    if result.normal == Vec2::X {
        ball.rect.set_left(brick.right() + SEPARATION);
    } else if result.normal == Vec2::NEG_X {
        ball.rect.set_right(brick.left() - SEPARATION);
    } else if result.normal == Vec2::Y {
        ball.rect.set_top(brick.bottom() + SEPARATION);
    } else {
        ball.rect.set_bottom(brick.top() - SEPARATION);
    }
}

/// Resolve at most one brick hit.
///
/// Alive bricks are scanned in row-major order and the first one overlapping
/// the ball is the only one resolved this step, even if the ball overlaps
/// several. The brick is marked dead and its (row, col) returned.
pub fn resolve_bricks(ball: &mut Ball, bricks: &mut BrickGrid) -> Option<(usize, usize)> {
    let (row, col, rect, result) = bricks.iter_alive().find_map(|(row, col, rect)| {
        let result = ball_brick_collision(&ball.rect, &rect);
        result.hit.then_some((row, col, rect, result))
    })?;

    resolve_brick(ball, &rect, &result);
    bricks.kill(row, col);
    Some((row, col))
}
