//! Simulation module
//!
//! All gameplay rules live here, free of threads and terminals:
//! - Field geometry from the viewport
//! - Ball integration, collisions, scoring and serves
//! - Paddle motion models and the CPU policy

pub mod collision;
pub mod cpu;
pub mod field;
pub mod paddle;
pub mod state;
pub mod tick;

pub use collision::{goal_crossed, paddle_hit, wall_bounce};
pub use cpu::CpuPolicy;
pub use field::FieldGeometry;
pub use paddle::{Intent, Paddle};
pub use state::{Ball, GameEvent, GameMode, MatchOutcome, Score, Side, World, serve_velocity};
pub use tick::tick;
