//! Fixed timestep ball tick
//!
//! Advances the ball one step: integrate, walls, paddles, goals, serve.
//! Pausing and the win check belong to the caller.

use super::collision::{goal_crossed, paddle_hit, wall_bounce};
use super::state::{GameEvent, Side, World};
use crate::settings::Settings;

/// Advance the ball by one tick, returning what happened
pub fn tick(world: &mut World, settings: &Settings) -> Vec<GameEvent> {
    let mut events = Vec::new();
    world.time_ticks += 1;

    // Velocity is in cells per tick
    world.ball.pos += world.ball.vel;

    if wall_bounce(&mut world.ball, &world.field) {
        events.push(GameEvent::WallBounce);
    }

    for side in Side::BOTH {
        let paddle = world.paddles[side.index()];
        if paddle_hit(&mut world.ball, &paddle, side, settings.deflection) {
            if let Some((min, max)) = settings.serve.speed_band() {
                world.ball.vel = world.ball.vel.clamp_length(min, max);
            }
            events.push(GameEvent::PaddleHit(side));
        }
    }

    if let Some(scorer) = goal_crossed(&world.ball, &world.field) {
        world.score.award(scorer);
        log::debug!(
            "{:?} scores ({}-{})",
            scorer,
            world.score.left,
            world.score.right
        );
        // Serve toward the side that conceded
        world.serve(scorer.opposite(), &settings.serve);
        events.push(GameEvent::Scored(scorer));
    }

    events
}
