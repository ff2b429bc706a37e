//! crossterm frontend
//!
//! Raw mode + alternate screen for the lifetime of the value; dropping it
//! always restores the terminal.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use super::canvas::{self, Canvas};
use crate::consts::NAME_MAX_LEN;
use crate::leaderboard::Leaderboard;
use crate::platform::keys::{NavKey, match_input, nav_key};
use crate::platform::{Choice, Frontend, MatchInput, MatchView, ResultAction};
use crate::settings::Settings;
use crate::sim::{GameMode, MatchOutcome};

pub struct TerminalFrontend {
    out: Stdout,
    active: bool,
}

impl TerminalFrontend {
    /// Take over the terminal
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        log::debug!("Terminal in raw mode");
        Ok(Self { out, active: true })
    }

    /// Give the terminal back; idempotent
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, cursor::Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        log::debug!("Terminal restored");
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn blit(&mut self, canvas: &Canvas) -> io::Result<()> {
        for (y, row) in canvas.rows().enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16), Print(row))?;
        }
        self.out.flush()
    }

    /// Compose a full-screen canvas at the current size and show it
    fn show(&mut self, compose: impl FnOnce(u16, u16) -> Canvas) -> io::Result<()> {
        let (width, height) = self.size()?;
        let canvas = compose(width, height);
        self.blit(&canvas)
    }

    /// Block for the next key press. `None` after a resize, so the caller
    /// redraws.
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        loop {
            match event::read()? {
                Event::Key(key) => return Ok(Some(key)),
                Event::Resize(..) => {
                    queue!(self.out, Clear(ClearType::All))?;
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    /// Show a static screen until any key
    fn dismissable(&mut self, compose: impl Fn(u16, u16) -> Canvas) -> io::Result<Choice<()>> {
        loop {
            self.show(&compose)?;
            let Some(key) = self.next_key()? else {
                continue;
            };
            match nav_key(&key) {
                Some(NavKey::Exit) => return Ok(Choice::Exit),
                Some(_) => return Ok(Choice::Back),
                None => {}
            }
        }
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

impl Frontend for TerminalFrontend {
    fn viewport(&mut self) -> io::Result<(u16, u16)> {
        self.size()
    }

    fn choose(&mut self, title: &str, items: &[&str]) -> io::Result<Choice<usize>> {
        let mut selected = 0usize;
        loop {
            self.show(|w, h| canvas::menu(title, items, selected, w, h))?;
            let Some(key) = self.next_key()? else {
                continue;
            };
            match nav_key(&key) {
                Some(NavKey::Up) | Some(NavKey::Char('w' | 'k')) => {
                    selected = selected.checked_sub(1).unwrap_or(items.len().saturating_sub(1));
                }
                Some(NavKey::Down) | Some(NavKey::Char('s' | 'j')) => {
                    selected = if selected + 1 >= items.len() { 0 } else { selected + 1 };
                }
                Some(NavKey::Confirm) => return Ok(Choice::Picked(selected)),
                Some(NavKey::Char(c @ '1'..='9')) => {
                    let i = c as usize - '1' as usize;
                    if i < items.len() {
                        return Ok(Choice::Picked(i));
                    }
                }
                Some(NavKey::Back) | Some(NavKey::Char('q' | 'Q')) => return Ok(Choice::Back),
                Some(NavKey::Exit) => return Ok(Choice::Exit),
                _ => {}
            }
        }
    }

    fn enter_name(&mut self, prompt: &str) -> io::Result<Choice<String>> {
        let mut typed = String::new();
        execute!(self.out, Clear(ClearType::All))?;
        loop {
            self.show(|w, h| canvas::name_prompt(prompt, &typed, w, h))?;
            let Some(key) = self.next_key()? else {
                continue;
            };
            match nav_key(&key) {
                Some(NavKey::Confirm) => return Ok(Choice::Picked(typed)),
                Some(NavKey::Back) => return Ok(Choice::Back),
                Some(NavKey::Exit) => return Ok(Choice::Exit),
                Some(NavKey::Backspace) => {
                    typed.pop();
                }
                Some(NavKey::Char(c)) if typed.chars().count() < NAME_MAX_LEN => typed.push(c),
                _ => {}
            }
        }
    }

    fn show_instructions(&mut self, settings: &Settings) -> io::Result<Choice<()>> {
        self.dismissable(|w, h| canvas::instructions(settings, w, h))
    }

    fn show_leaderboard(&mut self, board: &Leaderboard, now: i64) -> io::Result<Choice<()>> {
        self.dismissable(|w, h| canvas::leaderboard(board, now, w, h))
    }

    fn draw_match(&mut self, view: &MatchView<'_>) -> io::Result<()> {
        self.show(|w, h| canvas::match_frame(view, w, h))
    }

    fn poll_match_input(&mut self, mode: GameMode) -> io::Result<Vec<MatchInput>> {
        let mut inputs = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => inputs.extend(match_input(&key, mode)),
                Event::Resize(..) => queue!(self.out, Clear(ClearType::All))?,
                _ => {}
            }
        }
        Ok(inputs)
    }

    fn show_result(&mut self, outcome: &MatchOutcome) -> io::Result<Choice<ResultAction>> {
        loop {
            self.show(|w, h| canvas::result(outcome, w, h))?;
            let Some(key) = self.next_key()? else {
                continue;
            };
            match nav_key(&key) {
                Some(NavKey::Confirm) | Some(NavKey::Char('r' | 'R')) => {
                    return Ok(Choice::Picked(ResultAction::PlayAgain));
                }
                Some(NavKey::Back) | Some(NavKey::Char('q' | 'Q' | 'm' | 'M')) => {
                    return Ok(Choice::Picked(ResultAction::Menu));
                }
                Some(NavKey::Exit) => return Ok(Choice::Exit),
                _ => {}
            }
        }
    }
}
