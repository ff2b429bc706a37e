//! Platform abstraction layer
//!
//! The scenes never touch the terminal directly. They talk to a `Frontend`,
//! which owns drawing (menus, field, banners), input decoding into intents
//! and selections, and the viewport size. `keys` holds the key bindings.

use std::io;

pub mod keys;

use crate::leaderboard::Leaderboard;
use crate::settings::Settings;
use crate::sim::{GameMode, Intent, MatchOutcome, Side, World};

/// Answer from a blocking screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    /// Confirmed a value
    Picked(T),
    /// Back / quit to the previous screen
    Back,
    /// Leave the program
    Exit,
}

/// What to do after the result banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    PlayAgain,
    Menu,
}

/// Decoded input during a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchInput {
    Move(Side, Intent),
    TogglePause,
    /// Back to the menu
    Quit,
    /// Leave the program
    Exit,
}

/// One match frame, built from a snapshot of the world
#[derive(Debug, Clone)]
pub struct MatchView<'a> {
    pub world: &'a World,
    pub names: &'a [String; 2],
    pub paused: bool,
    pub win_score: u32,
}

/// Drawing + input collaborator used by the scene state machine
pub trait Frontend {
    /// Current size in cells (width, height)
    fn viewport(&mut self) -> io::Result<(u16, u16)>;

    /// Highlight-and-confirm menu; `Picked` carries the item index
    fn choose(&mut self, title: &str, items: &[&str]) -> io::Result<Choice<usize>>;

    /// Free-text name prompt
    fn enter_name(&mut self, prompt: &str) -> io::Result<Choice<String>>;

    /// Objective and controls; returns once dismissed
    fn show_instructions(&mut self, settings: &Settings) -> io::Result<Choice<()>>;

    /// Ranked history; returns once dismissed
    fn show_leaderboard(&mut self, board: &Leaderboard, now: i64) -> io::Result<Choice<()>>;

    /// Draw one match frame
    fn draw_match(&mut self, view: &MatchView<'_>) -> io::Result<()>;

    /// Drain pending match input without blocking
    fn poll_match_input(&mut self, mode: GameMode) -> io::Result<Vec<MatchInput>>;

    /// Winner banner; blocks for play-again / menu
    fn show_result(&mut self, outcome: &MatchOutcome) -> io::Result<Choice<ResultAction>>;
}
