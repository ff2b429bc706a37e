//! Terminal rendering
//!
//! `canvas` lays screens out as character grids; `terminal` owns the
//! crossterm session and implements `Frontend` on top of it.

pub mod canvas;
pub mod terminal;

pub use terminal::TerminalFrontend;
