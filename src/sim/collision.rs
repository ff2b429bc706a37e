//! Collision detection and response on the character grid
//!
//! All contact tests compare truncated cell coordinates. A ball travelling
//! more than one cell per tick can step over a paddle's front cell; that is
//! accepted rather than corrected with sub-steps.

use super::field::FieldGeometry;
use super::paddle::Paddle;
use super::state::{Ball, Side};

/// Reflect off the top/bottom walls.
///
/// Clamps the ball onto the first free row and flips `vel.y` (no energy
/// loss). Returns true on contact.
pub fn wall_bounce(ball: &mut Ball, field: &FieldGeometry) -> bool {
    let min_y = field.ball_min_y();
    let max_y = field.ball_max_y();
    if ball.pos.y <= min_y {
        ball.pos.y = min_y;
        ball.vel.y = -ball.vel.y;
        true
    } else if ball.pos.y >= max_y {
        ball.pos.y = max_y;
        ball.vel.y = -ball.vel.y;
        true
    } else {
        false
    }
}

/// Column directly in front of a paddle, on the field side
pub fn front_column(paddle: &Paddle, side: Side) -> i32 {
    paddle.lane - side.direction() as i32
}

/// Bounce off the paddle guarding `side`.
///
/// Hits when the ball sits in the paddle's front column, is moving toward
/// the paddle and its row is within the paddle's span. The response flips
/// `vel.x` and adds `deflection` per cell of offset from the paddle center.
pub fn paddle_hit(ball: &mut Ball, paddle: &Paddle, side: Side, deflection: f32) -> bool {
    if ball.cell_x() != front_column(paddle, side) || !ball.heading_toward(side) {
        return false;
    }
    let row = ball.cell_y();
    if !paddle.covers_row(row) {
        return false;
    }
    ball.vel.x = -ball.vel.x;
    let offset = (row - paddle.cell_y()) as f32;
    ball.vel.y += deflection * offset;
    true
}

/// The side that wins the point if the ball has reached a goal column
pub fn goal_crossed(ball: &Ball, field: &FieldGeometry) -> Option<Side> {
    let x = ball.cell_x();
    if x <= field.left {
        Some(Side::Right)
    } else if x >= field.right {
        Some(Side::Left)
    } else {
        None
    }
}
