//! Paddle motion: discrete intents in, clamped positions out

use super::field::FieldGeometry;
use crate::settings::MotionModel;

/// A per-tick movement request for one paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    /// Toward the top wall (decreasing y)
    Up,
    #[default]
    Idle,
    /// Toward the bottom wall (increasing y)
    Down,
}

impl Intent {
    /// Signed direction along y
    pub fn axis(self) -> f32 {
        match self {
            Intent::Up => -1.0,
            Intent::Idle => 0.0,
            Intent::Down => 1.0,
        }
    }

    /// Intent that moves from `from` toward `to`, or `Idle` within `dead_zone`
    pub fn toward(from: f32, to: f32, dead_zone: f32) -> Self {
        let diff = to - from;
        if diff.abs() <= dead_zone {
            Intent::Idle
        } else if diff < 0.0 {
            Intent::Up
        } else {
            Intent::Down
        }
    }

    pub(crate) fn to_raw(self) -> i8 {
        match self {
            Intent::Up => -1,
            Intent::Idle => 0,
            Intent::Down => 1,
        }
    }

    pub(crate) fn from_raw(raw: i8) -> Self {
        match raw {
            r if r < 0 => Intent::Up,
            0 => Intent::Idle,
            _ => Intent::Down,
        }
    }
}

/// A paddle on its fixed lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    /// Column the paddle occupies
    pub lane: i32,
    /// Center row (fractional)
    pub y: f32,
    /// Vertical velocity (cells/s), momentum model only
    pub vy: f32,
    /// Cells from center to either end
    pub half_len: u32,
}

impl Paddle {
    pub fn new(lane: i32, y: f32, half_len: u32) -> Self {
        Self {
            lane,
            y,
            vy: 0.0,
            half_len,
        }
    }

    /// Center row as a cell index
    pub fn cell_y(&self) -> i32 {
        self.y as i32
    }

    /// Whether `row` is covered by the paddle (cell-level test)
    pub fn covers_row(&self, row: i32) -> bool {
        let center = self.cell_y();
        let half = self.half_len as i32;
        row >= center - half && row <= center + half
    }

    /// Apply one tick of `intent` under `model`, then clamp to the field.
    ///
    /// `dt` is the tick duration in seconds (momentum model units are per
    /// second; the direct step is per tick).
    pub fn apply(&mut self, intent: Intent, model: &MotionModel, field: &FieldGeometry, dt: f32) {
        match *model {
            MotionModel::DirectStep { step } => {
                self.y += intent.axis() * step;
                self.vy = 0.0;
            }
            MotionModel::Momentum {
                accel,
                friction,
                max_velocity,
            } => {
                if intent == Intent::Idle {
                    // Decay toward zero without crossing it
                    let decel = friction * dt;
                    if self.vy > 0.0 {
                        self.vy = (self.vy - decel).max(0.0);
                    } else if self.vy < 0.0 {
                        self.vy = (self.vy + decel).min(0.0);
                    }
                } else {
                    self.vy += intent.axis() * accel * dt;
                }
                self.vy = self.vy.clamp(-max_velocity, max_velocity);
                self.y += self.vy * dt;
            }
        }
        self.clamp_to(field);
    }

    /// Pull the paddle back inside the field, stopping it if it hit an end
    pub fn clamp_to(&mut self, field: &FieldGeometry) {
        let (min, max) = field.paddle_range(self.half_len);
        let clamped = self.y.clamp(min, max);
        if clamped != self.y {
            self.y = clamped;
            self.vy = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn field() -> FieldGeometry {
        FieldGeometry::from_viewport(80, 24)
    }

    fn momentum() -> MotionModel {
        MotionModel::Momentum {
            accel: 60.0,
            friction: 30.0,
            max_velocity: 10.0,
        }
    }

    #[test]
    fn test_direct_step_moves_and_clamps() {
        let f = field();
        let model = MotionModel::DirectStep { step: 1.0 };
        let mut p = Paddle::new(4, 12.0, 2);

        p.apply(Intent::Up, &model, &f, DT);
        assert_eq!(p.y, 11.0);
        p.apply(Intent::Down, &model, &f, DT);
        p.apply(Intent::Down, &model, &f, DT);
        assert_eq!(p.y, 13.0);

        for _ in 0..100 {
            p.apply(Intent::Down, &model, &f, DT);
        }
        assert_eq!(p.y, 19.0);
        for _ in 0..100 {
            p.apply(Intent::Up, &model, &f, DT);
        }
        assert_eq!(p.y, 5.0);
    }

    #[test]
    fn test_momentum_accelerates_then_caps() {
        let f = FieldGeometry::from_viewport(80, 200);
        let model = momentum();
        let mut p = Paddle::new(4, 100.0, 2);

        // 5 ticks: 5 * 60 * dt = 5.0, under the cap
        for _ in 0..5 {
            p.apply(Intent::Up, &model, &f, DT);
        }
        assert!((p.vy - -5.0).abs() < 1e-4);

        // Sustained intent stops growing at the cap
        for _ in 0..20 {
            p.apply(Intent::Up, &model, &f, DT);
        }
        assert!((p.vy - -10.0).abs() < 1e-4);
    }

    #[test]
    fn test_momentum_friction_stops_within_bound() {
        let f = FieldGeometry::from_viewport(80, 200);
        let model = momentum();
        let mut p = Paddle::new(4, 100.0, 2);
        for _ in 0..6 {
            p.apply(Intent::Down, &model, &f, DT);
        }
        let v = p.vy;
        assert!(v > 0.0);

        // friction 30 cells/s² removes 0.5 cells/s per tick
        // One extra tick of slack for float rounding
        let max_ticks = (v / (30.0 * DT)).ceil() as usize + 1;
        let mut ticks = 0;
        while p.vy != 0.0 {
            p.apply(Intent::Idle, &model, &f, DT);
            ticks += 1;
            assert!(p.vy >= 0.0, "friction must not overshoot zero");
            assert!(ticks <= max_ticks);
        }

        // Settled paddles stay put
        let y = p.y;
        p.apply(Intent::Idle, &model, &f, DT);
        assert_eq!(p.y, y);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn test_momentum_clamp_zeroes_velocity() {
        let f = field();
        let model = momentum();
        let mut p = Paddle::new(4, 5.2, 2);
        for _ in 0..10 {
            p.apply(Intent::Up, &model, &f, DT);
        }
        assert_eq!(p.y, 5.0);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn test_intent_toward() {
        assert_eq!(Intent::toward(10.0, 4.0, 0.5), Intent::Up);
        assert_eq!(Intent::toward(10.0, 14.0, 0.5), Intent::Down);
        assert_eq!(Intent::toward(10.0, 10.4, 0.5), Intent::Idle);
    }

    #[test]
    fn test_covers_row() {
        let p = Paddle::new(4, 12.7, 2);
        assert!(p.covers_row(10));
        assert!(p.covers_row(14));
        assert!(!p.covers_row(9));
        assert!(!p.covers_row(15));
    }

    fn intent_strategy() -> impl Strategy<Value = Intent> {
        prop_oneof![Just(Intent::Up), Just(Intent::Idle), Just(Intent::Down)]
    }

    proptest! {
        #[test]
        fn paddle_stays_in_bounds(
            intents in prop::collection::vec(intent_strategy(), 1..300),
            start in 0.0f32..40.0,
            momentum_model in any::<bool>(),
            half_len in 0u32..4,
        ) {
            let f = field();
            let model = if momentum_model {
                momentum()
            } else {
                MotionModel::DirectStep { step: 1.0 }
            };
            let mut p = Paddle::new(4, start, half_len);
            p.clamp_to(&f);
            let (min, max) = f.paddle_range(half_len);
            for intent in intents {
                p.apply(intent, &model, &f, DT);
                prop_assert!(p.y >= min && p.y <= max);
            }
        }
    }
}
