//! Game settings and tuning
//!
//! Persisted as pretty JSON next to the binary's working directory
//! (`term-pong.json`, or the path in `TERM_PONG_SETTINGS`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How a paddle turns an intent into motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionModel {
    /// Move a fixed number of cells per tick
    DirectStep { step: f32 },
    /// Accelerate while held, coast to a stop under friction
    Momentum {
        /// cells/s²
        accel: f32,
        /// cells/s²
        friction: f32,
        /// cells/s
        max_velocity: f32,
    },
}

impl Default for MotionModel {
    fn default() -> Self {
        MotionModel::Momentum {
            accel: PADDLE_ACCEL,
            friction: PADDLE_FRICTION,
            max_velocity: PADDLE_MAX_VELOCITY,
        }
    }
}

impl MotionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionModel::DirectStep { .. } => "Direct",
            MotionModel::Momentum { .. } => "Momentum",
        }
    }
}

/// How the ball is put back into play after a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServePolicy {
    /// Fixed ±(0.8, 0.4) cells per tick
    Classic,
    /// Speed drawn from a band, vertical slope drawn from a range.
    /// Paddle hits also keep the speed inside the band.
    Randomized {
        speed_min: f32,
        speed_max: f32,
        /// |vy / vx| before normalization
        slope_min: f32,
        slope_max: f32,
    },
}

impl Default for ServePolicy {
    fn default() -> Self {
        ServePolicy::Randomized {
            speed_min: BALL_MIN_SPEED,
            speed_max: BALL_MAX_SPEED,
            slope_min: 0.2,
            slope_max: 0.8,
        }
    }
}

impl ServePolicy {
    /// Speed band the ball is held to, if this policy has one
    pub fn speed_band(&self) -> Option<(f32, f32)> {
        match *self {
            ServePolicy::Classic => None,
            ServePolicy::Randomized {
                speed_min,
                speed_max,
                ..
            } => Some((speed_min, speed_max)),
        }
    }
}

/// CPU opponent tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSettings {
    /// Ticks between intent re-evaluations
    pub reaction_delay: u32,
    /// Cells the aim point may be off by
    pub error_margin: f32,
    /// Probability (0-1) that a decision aims off by `error_margin`
    pub error_probability: f64,
    /// No movement when this close to the target
    pub dead_zone: f32,
}

impl Default for CpuSettings {
    fn default() -> Self {
        Self {
            reaction_delay: CPU_REACTION_DELAY,
            error_margin: CPU_ERROR_MARGIN,
            error_probability: CPU_ERROR_PROBABILITY,
            dead_zone: CPU_DEAD_ZONE,
        }
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Simulation worker rate (Hz)
    pub tick_rate: u32,
    /// Render/input loop rate during a match (Hz)
    pub frame_rate: u32,

    // === Rules ===
    pub win_score: u32,

    // === Physics ===
    /// Paddle length in cells
    pub paddle_len: u32,
    /// Spin per cell of hit offset from paddle center
    pub deflection: f32,
    pub motion: MotionModel,
    pub serve: ServePolicy,

    // === Players ===
    pub cpu: CpuSettings,
    /// Ticks a human key press keeps driving the paddle
    pub intent_hold_ticks: u32,

    // === Storage ===
    pub leaderboard_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            frame_rate: FRAME_RATE,

            win_score: SCORE_TO_WIN,

            paddle_len: PADDLE_LEN,
            deflection: DEFLECTION,
            motion: MotionModel::default(),
            serve: ServePolicy::default(),

            cpu: CpuSettings::default(),
            intent_hold_ticks: 8,

            leaderboard_path: PathBuf::from("pong_scores.txt"),
        }
    }
}

impl Settings {
    /// Environment variable that overrides the settings file location
    pub const PATH_ENV: &'static str = "TERM_PONG_SETTINGS";
    /// Default settings file name
    const FILE_NAME: &'static str = "term-pong.json";

    /// Duration of one simulation tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }

    /// Tick duration in seconds, as used by the momentum model
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Duration of one render/input frame
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }

    /// Cells from the paddle center to either end
    pub fn paddle_half_len(&self) -> u32 {
        self.paddle_len / 2
    }

    /// Repair values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        self.tick_rate = self.tick_rate.clamp(1, 1000);
        self.frame_rate = self.frame_rate.clamp(1, 240);
        self.win_score = self.win_score.max(1);
        self.paddle_len = self.paddle_len.clamp(1, 7);
        self.cpu.error_probability = self.cpu.error_probability.clamp(0.0, 1.0);
        self.cpu.error_margin = self.cpu.error_margin.abs();
        self.cpu.dead_zone = self.cpu.dead_zone.abs();

        self.motion = match self.motion {
            MotionModel::DirectStep { step } => MotionModel::DirectStep { step: step.abs() },
            MotionModel::Momentum {
                accel,
                friction,
                max_velocity,
            } => MotionModel::Momentum {
                accel: accel.abs(),
                friction: friction.abs(),
                max_velocity: max_velocity.abs(),
            },
        };

        if let ServePolicy::Randomized {
            speed_min,
            speed_max,
            slope_min,
            slope_max,
        } = self.serve
        {
            let (speed_min, speed_max) = ordered(speed_min.abs(), speed_max.abs());
            let (slope_min, slope_max) = ordered(slope_min.abs(), slope_max.abs());
            self.serve = ServePolicy::Randomized {
                speed_min: speed_min.max(0.05),
                speed_max: speed_max.max(0.05),
                slope_min,
                slope_max,
            };
        }
        self
    }

    /// Settings file location (env override, else working directory)
    pub fn path() -> PathBuf {
        std::env::var_os(Self::PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::FILE_NAME))
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::info!("No settings at {} ({}), using defaults", path.display(), e),
        }
        Self::default()
    }

    /// Save settings to `path` as pretty JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}
