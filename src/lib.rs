//! Term Pong - two paddles, one ball, one terminal
//!
//! Core modules:
//! - `sim`: Simulation (field, physics, collisions, paddle motion, CPU policy)
//! - `sched`: Fixed-tick worker threads sharing one locked world
//! - `scene`: Menu / mode select / match / result state machine
//! - `platform`: Frontend contract (drawing + input) consumed by the scenes
//! - `renderer`: Character-cell frontend built on crossterm
//! - `leaderboard` + `persistence`: Match history and its flat-file store
//! - `settings`: Data-driven tuning loaded from JSON

pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod sched;
pub mod settings;
pub mod sim;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use settings::{MotionModel, ServePolicy, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation workers tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Render/input loop rate during a match (Hz)
    pub const FRAME_RATE: u32 = 60;

    /// Paddle length in cells (centered on the paddle position)
    pub const PADDLE_LEN: u32 = 5;
    /// Direct-step paddle speed (cells per tick)
    pub const PADDLE_STEP: f32 = 1.0;

    /// Momentum paddle acceleration (cells/s²)
    pub const PADDLE_ACCEL: f32 = 180.0;
    /// Momentum paddle friction deceleration (cells/s²)
    pub const PADDLE_FRICTION: f32 = 150.0;
    /// Momentum paddle speed cap (cells/s)
    pub const PADDLE_MAX_VELOCITY: f32 = 36.0;

    /// Classic serve velocity (cells per tick)
    pub const BALL_SPEED_X: f32 = 0.8;
    pub const BALL_SPEED_Y: f32 = 0.4;
    /// Randomized serve speed band (cells per tick)
    pub const BALL_MIN_SPEED: f32 = 0.7;
    pub const BALL_MAX_SPEED: f32 = 1.0;

    /// Vertical spin added per cell of offset from the paddle center
    pub const DEFLECTION: f32 = 0.15;

    /// First side to reach this wins
    pub const SCORE_TO_WIN: u32 = 7;

    /// CPU re-evaluates its intent once every this many ticks
    pub const CPU_REACTION_DELAY: u32 = 4;
    /// Cells the CPU may misjudge the ball by
    pub const CPU_ERROR_MARGIN: f32 = 3.0;
    /// Chance that a CPU decision uses the misjudged target
    pub const CPU_ERROR_PROBABILITY: f64 = 0.25;
    /// CPU stops chasing when this close to its target (cells)
    pub const CPU_DEAD_ZONE: f32 = 0.5;

    /// Player name limit (leaderboard field width)
    pub const NAME_MAX_LEN: usize = 24;
    /// Records read from the leaderboard file at most
    pub const MAX_LEADER_ENTRIES: usize = 200;
    /// Records shown on the leaderboard screen
    pub const LEADERBOARD_TOP_N: usize = 10;

    /// Smallest viewport the field is laid out for
    pub const MIN_VIEWPORT_W: u16 = 40;
    pub const MIN_VIEWPORT_H: u16 = 12;
}

/// Current wall-clock time as epoch seconds
pub fn now_epoch_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
