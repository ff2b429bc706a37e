//! CPU opponent
//!
//! Re-decides only every `reaction_delay` ticks and sometimes aims a little
//! off, so it can be beaten. Each CPU paddle owns its own policy instance.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::paddle::Intent;
use super::state::{Side, World};
use crate::settings::CpuSettings;

#[derive(Debug, Clone)]
pub struct CpuPolicy {
    side: Side,
    settings: CpuSettings,
    /// Ticks until the next decision
    countdown: u32,
    intent: Intent,
    rng: Pcg32,
}

impl CpuPolicy {
    pub fn new(side: Side, settings: CpuSettings, seed: u64) -> Self {
        Self {
            side,
            settings,
            countdown: 0,
            intent: Intent::Idle,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Intent for this tick. The previous decision persists between
    /// re-evaluations.
    pub fn decide(&mut self, world: &World) -> Intent {
        if self.countdown == 0 {
            self.intent = self.evaluate(world);
            self.countdown = self.settings.reaction_delay.max(1);
        }
        self.countdown -= 1;
        self.intent
    }

    fn evaluate(&mut self, world: &World) -> Intent {
        let paddle_y = world.paddle(self.side).y;
        let target = if world.ball.heading_toward(self.side) {
            let mut aim = world.ball.pos.y;
            if self.rng.random_bool(self.settings.error_probability) {
                let sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
                aim += sign * self.settings.error_margin;
            }
            aim
        } else {
            // Ball going away: drift back to the middle
            world.field.center_y()
        };
        Intent::toward(paddle_y, target, self.settings.dead_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::field::FieldGeometry;
    use crate::sim::state::{Ball, GameMode};
    use glam::Vec2;

    fn exact() -> CpuSettings {
        CpuSettings {
            reaction_delay: 3,
            error_margin: 3.0,
            error_probability: 0.0,
            dead_zone: 0.5,
        }
    }

    fn world() -> World {
        World::new(
            FieldGeometry::from_viewport(80, 24),
            GameMode::CpuVsCpu,
            &Settings::default(),
            3,
        )
    }

    #[test]
    fn test_tracks_incoming_ball() {
        let mut w = world();
        w.ball = Ball {
            pos: Vec2::new(30.0, 5.0),
            vel: Vec2::new(0.8, 0.0),
        };
        let mut cpu = CpuPolicy::new(Side::Right, exact(), 1);
        assert_eq!(cpu.decide(&w), Intent::Up);

        w.ball.pos.y = 20.0;
        let mut cpu = CpuPolicy::new(Side::Right, exact(), 1);
        assert_eq!(cpu.decide(&w), Intent::Down);
    }

    #[test]
    fn test_returns_to_center_when_ball_leaves() {
        let mut w = world();
        w.ball = Ball {
            pos: Vec2::new(30.0, 5.0),
            vel: Vec2::new(-0.8, 0.0),
        };
        w.paddle_mut(Side::Right).y = 18.0;
        let mut cpu = CpuPolicy::new(Side::Right, exact(), 1);
        assert_eq!(cpu.decide(&w), Intent::Up);

        // At the center already: stay
        w.paddle_mut(Side::Right).y = w.field.center_y();
        let mut cpu = CpuPolicy::new(Side::Right, exact(), 1);
        assert_eq!(cpu.decide(&w), Intent::Idle);
    }

    #[test]
    fn test_reaction_delay_holds_previous_intent() {
        let mut w = world();
        w.ball = Ball {
            pos: Vec2::new(30.0, 5.0),
            vel: Vec2::new(-0.8, 0.0),
        };
        let mut cpu = CpuPolicy::new(Side::Left, exact(), 1);
        assert_eq!(cpu.decide(&w), Intent::Up);

        // Ball jumps below; the CPU has not noticed yet
        w.ball.pos.y = 20.0;
        assert_eq!(cpu.decide(&w), Intent::Up);
        assert_eq!(cpu.decide(&w), Intent::Up);
        // Third tick after the decision re-evaluates
        assert_eq!(cpu.decide(&w), Intent::Down);
    }

    #[test]
    fn test_error_margin_shifts_target() {
        let mut w = world();
        let paddle_y = w.paddle(Side::Left).y;
        // Ball level with the paddle: only a misjudged aim moves it
        w.ball = Ball {
            pos: Vec2::new(30.0, paddle_y),
            vel: Vec2::new(-0.8, 0.0),
        };
        let always_wrong = CpuSettings {
            error_probability: 1.0,
            reaction_delay: 1,
            ..exact()
        };
        let mut cpu = CpuPolicy::new(Side::Left, always_wrong, 9);
        for _ in 0..20 {
            assert_ne!(cpu.decide(&w), Intent::Idle);
        }

        let mut cpu = CpuPolicy::new(Side::Left, exact(), 9);
        assert_eq!(cpu.decide(&w), Intent::Idle);
    }
}
