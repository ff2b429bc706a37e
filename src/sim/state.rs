//! World state and core simulation types
//!
//! One `World` per match. Every field here is shared by the simulation
//! workers and the render loop, so it only ever changes under the session
//! lock (see `sched`).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::field::FieldGeometry;
use super::paddle::Paddle;
use crate::consts::{BALL_SPEED_X, BALL_SPEED_Y};
use crate::settings::{ServePolicy, Settings};

/// One of the two paddles / goal sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of a horizontal velocity heading toward this side
    pub fn direction(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Who drives each paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    PlayerVsPlayer,
    /// Human on the left, CPU on the right
    PlayerVsCpu,
    CpuVsCpu,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [
        GameMode::PlayerVsPlayer,
        GameMode::PlayerVsCpu,
        GameMode::CpuVsCpu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::PlayerVsPlayer => "PLAYER VS PLAYER",
            GameMode::PlayerVsCpu => "PLAYER VS CPU",
            GameMode::CpuVsCpu => "CPU VS CPU",
        }
    }

    /// Whether the CPU policy drives `side` in this mode
    pub fn is_cpu(&self, side: Side) -> bool {
        match self {
            GameMode::PlayerVsPlayer => false,
            GameMode::PlayerVsCpu => side == Side::Right,
            GameMode::CpuVsCpu => true,
        }
    }

    /// Whether this mode asks a human for a name before the match
    pub fn wants_name_entry(&self) -> bool {
        *self == GameMode::PlayerVsCpu
    }

    /// Names used when nobody typed one
    pub fn default_names(&self) -> [String; 2] {
        let names = match self {
            GameMode::PlayerVsPlayer => ["Player 1", "Player 2"],
            GameMode::PlayerVsCpu => ["Player", "CPU"],
            GameMode::CpuVsCpu => ["CPU 1", "CPU 2"],
        };
        names.map(String::from)
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// Cells per tick
    pub vel: Vec2,
}

impl Ball {
    /// Column the ball occupies
    pub fn cell_x(&self) -> i32 {
        self.pos.x as i32
    }

    /// Row the ball occupies
    pub fn cell_y(&self) -> i32 {
        self.pos.y as i32
    }

    /// Whether the ball is travelling toward `side`
    pub fn heading_toward(&self, side: Side) -> bool {
        self.vel.x * side.direction() > 0.0
    }
}

/// Points per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn award(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }

    /// The side that has reached `win_score`, if any (higher score wins)
    pub fn winner(&self, win_score: u32) -> Option<Side> {
        if self.left.max(self.right) < win_score {
            return None;
        }
        Some(if self.left > self.right {
            Side::Left
        } else {
            Side::Right
        })
    }
}

/// Things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WallBounce,
    PaddleHit(Side),
    /// `Side` won the point
    Scored(Side),
}

/// Final result of a decided match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Side,
    pub winner_name: String,
    pub loser_name: String,
    pub winner_score: u32,
    pub loser_score: u32,
}

impl MatchOutcome {
    /// Build the outcome if `score` is decided at `win_score`
    pub fn decide(score: &Score, win_score: u32, names: &[String; 2]) -> Option<Self> {
        let winner = score.winner(win_score)?;
        let loser = winner.opposite();
        Some(Self {
            winner,
            winner_name: names[winner.index()].clone(),
            loser_name: names[loser.index()].clone(),
            winner_score: score.get(winner),
            loser_score: score.get(loser),
        })
    }
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct World {
    pub field: FieldGeometry,
    pub mode: GameMode,
    pub ball: Ball,
    /// Indexed by `Side::index`
    pub paddles: [Paddle; 2],
    pub score: Score,
    /// Ball ticks performed
    pub time_ticks: u64,
    rng: Pcg32,
}

impl World {
    /// Fresh world: paddles centered, score 0-0, ball served toward a random side
    pub fn new(field: FieldGeometry, mode: GameMode, settings: &Settings, seed: u64) -> Self {
        let (left_lane, right_lane) = field.paddle_lanes();
        let half = settings.paddle_half_len();
        let mid = field.center_y();
        let mut world = Self {
            field,
            mode,
            ball: Ball {
                pos: field.center(),
                vel: Vec2::ZERO,
            },
            paddles: [
                Paddle::new(left_lane, mid, half),
                Paddle::new(right_lane, mid, half),
            ],
            score: Score::default(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        for paddle in &mut world.paddles {
            paddle.clamp_to(&field);
        }
        let toward = if world.rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        world.serve(toward, &settings.serve);
        world
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        &mut self.paddles[side.index()]
    }

    /// Put the ball at the field center heading toward `toward`
    pub fn serve(&mut self, toward: Side, policy: &ServePolicy) {
        self.ball.pos = self.field.center();
        self.ball.vel = serve_velocity(&mut self.rng, toward, policy);
    }
}

/// Serve velocity toward `toward` under `policy`
pub fn serve_velocity<R: Rng>(rng: &mut R, toward: Side, policy: &ServePolicy) -> Vec2 {
    let vertical = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    match *policy {
        ServePolicy::Classic => Vec2::new(
            toward.direction() * BALL_SPEED_X,
            vertical * BALL_SPEED_Y,
        ),
        ServePolicy::Randomized {
            speed_min,
            speed_max,
            slope_min,
            slope_max,
        } => {
            let speed = rng.random_range(speed_min..=speed_max);
            let slope = rng.random_range(slope_min..=slope_max);
            Vec2::new(toward.direction(), vertical * slope).normalize() * speed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_is_centered() {
        let settings = Settings::default();
        let field = FieldGeometry::from_viewport(80, 24);
        let world = World::new(field, GameMode::PlayerVsCpu, &settings, 7);
        assert_eq!(world.ball.pos, field.center());
        assert_eq!(world.score, Score::default());
        assert_eq!(world.paddle(Side::Left).lane, 4);
        assert_eq!(world.paddle(Side::Right).lane, 75);
        assert_eq!(world.paddle(Side::Left).y, 12.0);
        assert!(world.ball.vel.x != 0.0);
    }

    #[test]
    fn test_classic_serve() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..20 {
            let v = serve_velocity(&mut rng, Side::Left, &ServePolicy::Classic);
            assert_eq!(v.x, -0.8);
            assert_eq!(v.y.abs(), 0.4);
        }
    }

    #[test]
    fn test_score_winner() {
        let mut score = Score::default();
        assert_eq!(score.winner(7), None);
        for _ in 0..7 {
            score.award(Side::Right);
        }
        score.award(Side::Left);
        assert_eq!(score.winner(7), Some(Side::Right));
        assert_eq!(score.winner(8), None);
    }

    #[test]
    fn test_outcome_names_follow_higher_score() {
        let score = Score { left: 7, right: 3 };
        let names = ["Ana".to_string(), "Bo".to_string()];
        let outcome = MatchOutcome::decide(&score, 7, &names).unwrap();
        assert_eq!(outcome.winner, Side::Left);
        assert_eq!(outcome.winner_name, "Ana");
        assert_eq!(outcome.loser_name, "Bo");
        assert_eq!((outcome.winner_score, outcome.loser_score), (7, 3));
    }

    #[test]
    fn test_mode_controllers() {
        assert!(!GameMode::PlayerVsPlayer.is_cpu(Side::Left));
        assert!(!GameMode::PlayerVsCpu.is_cpu(Side::Left));
        assert!(GameMode::PlayerVsCpu.is_cpu(Side::Right));
        assert!(GameMode::CpuVsCpu.is_cpu(Side::Left));
        assert!(GameMode::PlayerVsCpu.wants_name_entry());
        assert!(!GameMode::CpuVsCpu.wants_name_entry());
    }
}
