//! Scene state machine
//!
//! Menu → ModeSelect → (NameEntry) → Playing → Result → Playing | Menu,
//! with Instructions and Leaderboard hanging off the menu. Every transition
//! is a plain function of the current scene and the screen's answer; the
//! `App` driver only performs the I/O in between.

use std::io;
use std::thread;
use std::time::Instant;

use crate::leaderboard::{Leaderboard, LeaderboardEntry, sanitize_name};
use crate::now_epoch_secs;
use crate::persistence::LeaderboardStore;
use crate::platform::{Choice, Frontend, MatchInput, MatchView, ResultAction};
use crate::sched::{RunFlags, Session, run_workers};
use crate::settings::Settings;
use crate::sim::{FieldGeometry, GameMode, MatchOutcome, Side, World};

/// Main menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Play,
    Instructions,
    Leaderboard,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Play,
        MenuItem::Instructions,
        MenuItem::Leaderboard,
        MenuItem::Quit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItem::Play => "PLAY",
            MenuItem::Instructions => "INSTRUCTIONS",
            MenuItem::Leaderboard => "LEADERBOARD",
            MenuItem::Quit => "QUIT",
        }
    }
}

/// Who plays and under which names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSetup {
    pub mode: GameMode,
    pub names: [String; 2],
}

impl MatchSetup {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            names: mode.default_names(),
        }
    }
}

/// How the Playing sub-loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchExit {
    /// A side reached the win score; the result has been recorded
    Finished(MatchOutcome),
    ReturnToMenu,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scene {
    Menu,
    ModeSelect,
    /// Only for modes with a single human
    NameEntry(GameMode),
    Playing(MatchSetup),
    Result {
        setup: MatchSetup,
        outcome: MatchOutcome,
    },
    Leaderboard,
    Instructions,
    Exit,
}

impl Scene {
    pub fn after_menu(choice: Choice<usize>) -> Scene {
        match choice {
            Choice::Picked(i) => match MenuItem::ALL.get(i) {
                Some(MenuItem::Play) => Scene::ModeSelect,
                Some(MenuItem::Instructions) => Scene::Instructions,
                Some(MenuItem::Leaderboard) => Scene::Leaderboard,
                Some(MenuItem::Quit) => Scene::Exit,
                None => Scene::Menu,
            },
            // Quick quit from the menu
            Choice::Back | Choice::Exit => Scene::Exit,
        }
    }

    pub fn after_mode_select(choice: Choice<usize>) -> Scene {
        match choice {
            Choice::Picked(i) => match GameMode::ALL.get(i) {
                Some(&mode) if mode.wants_name_entry() => Scene::NameEntry(mode),
                Some(&mode) => Scene::Playing(MatchSetup::new(mode)),
                None => Scene::ModeSelect,
            },
            Choice::Back => Scene::Menu,
            Choice::Exit => Scene::Exit,
        }
    }

    pub fn after_name_entry(mode: GameMode, choice: Choice<String>) -> Scene {
        match choice {
            Choice::Picked(raw) => {
                let mut setup = MatchSetup::new(mode);
                setup.names[0] = sanitize_name(&raw, &setup.names[0]);
                Scene::Playing(setup)
            }
            Choice::Back => Scene::ModeSelect,
            Choice::Exit => Scene::Exit,
        }
    }

    pub fn after_match(setup: MatchSetup, exit: MatchExit) -> Scene {
        match exit {
            MatchExit::Finished(outcome) => Scene::Result { setup, outcome },
            MatchExit::ReturnToMenu => Scene::Menu,
            MatchExit::Exit => Scene::Exit,
        }
    }

    pub fn after_result(setup: MatchSetup, choice: Choice<ResultAction>) -> Scene {
        match choice {
            Choice::Picked(ResultAction::PlayAgain) => Scene::Playing(setup),
            Choice::Picked(ResultAction::Menu) | Choice::Back => Scene::Menu,
            Choice::Exit => Scene::Exit,
        }
    }

    /// Instructions and Leaderboard both return to the menu
    pub fn after_info_screen(choice: Choice<()>) -> Scene {
        match choice {
            Choice::Exit => Scene::Exit,
            _ => Scene::Menu,
        }
    }
}

/// The Playing sub-loop.
///
/// Starts the workers, then per frame: feeds input into intents / pause,
/// snapshots the world under the lock, draws it and checks for a winner.
/// When the loop ends the workers are stopped and joined; a decided match
/// appends exactly one leaderboard entry. A failed append is logged and
/// otherwise ignored.
pub fn play_match<F: Frontend>(
    frontend: &mut F,
    session: &Session<'_>,
    store: &LeaderboardStore,
) -> io::Result<MatchExit> {
    let settings = session.settings();
    let flags = session.flags();
    let frame = settings.frame_interval();
    let mode = session.lock().mode;
    let names = session.names();
    log::info!("Match start: {} vs {} ({:?})", names[0], names[1], mode);

    let exit = run_workers(session, || -> io::Result<MatchExit> {
        loop {
            let started = Instant::now();
            if flags.exit_requested() {
                return Ok(MatchExit::Exit);
            }

            for input in frontend.poll_match_input(mode)? {
                match input {
                    MatchInput::Move(side, intent) => {
                        if !mode.is_cpu(side) {
                            session.press(side, intent);
                        }
                    }
                    MatchInput::TogglePause => {
                        let paused = flags.toggle_pause();
                        for side in Side::BOTH {
                            session.intent(side).clear();
                        }
                        log::info!("{}", if paused { "Paused" } else { "Resumed" });
                    }
                    MatchInput::Quit => return Ok(MatchExit::ReturnToMenu),
                    MatchInput::Exit => {
                        flags.request_exit();
                        return Ok(MatchExit::Exit);
                    }
                }
            }

            let world = session.snapshot();
            let outcome = MatchOutcome::decide(&world.score, settings.win_score, names);
            frontend.draw_match(&MatchView {
                world: &world,
                names,
                paused: flags.is_paused(),
                win_score: settings.win_score,
            })?;
            if let Some(outcome) = outcome {
                return Ok(MatchExit::Finished(outcome));
            }

            if let Some(rest) = frame.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    })??;

    match &exit {
        MatchExit::Finished(outcome) => {
            log::info!(
                "Match over: {} beats {} {}-{}",
                outcome.winner_name,
                outcome.loser_name,
                outcome.winner_score,
                outcome.loser_score
            );
            let entry = LeaderboardEntry::from_outcome(outcome, now_epoch_secs());
            if let Err(e) = store.append(&entry) {
                log::warn!("Match result not recorded: {}", e);
            }
        }
        other => log::info!("Match abandoned: {:?}", other),
    }
    Ok(exit)
}

/// Owns the frontend, settings, leaderboard store and program flags, and
/// walks the scene graph until Exit
pub struct App<F: Frontend> {
    frontend: F,
    settings: Settings,
    store: LeaderboardStore,
    flags: RunFlags,
}

impl<F: Frontend> App<F> {
    pub fn new(frontend: F, settings: Settings) -> Self {
        let store = LeaderboardStore::new(settings.leaderboard_path.clone());
        Self {
            frontend,
            settings,
            store,
            flags: RunFlags::new(),
        }
    }

    pub fn flags(&self) -> &RunFlags {
        &self.flags
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn into_frontend(self) -> F {
        self.frontend
    }

    /// Run scenes from the menu until exit is requested
    pub fn run(&mut self) -> io::Result<()> {
        let mut scene = Scene::Menu;
        while scene != Scene::Exit {
            if self.flags.exit_requested() {
                break;
            }
            let next = self.step(scene)?;
            log::debug!("Scene -> {:?}", next);
            scene = next;
        }
        self.flags.request_exit();
        log::info!("Exiting");
        Ok(())
    }

    /// Show one scene and compute the next
    pub fn step(&mut self, scene: Scene) -> io::Result<Scene> {
        let next = match scene {
            Scene::Menu => {
                let items = MenuItem::ALL.map(|item| item.as_str());
                Scene::after_menu(self.frontend.choose("PONG", &items)?)
            }
            Scene::ModeSelect => {
                let items = GameMode::ALL.map(|mode| mode.as_str());
                Scene::after_mode_select(self.frontend.choose("SELECT A GAME MODE", &items)?)
            }
            Scene::NameEntry(mode) => {
                let choice = self.frontend.enter_name("Enter your name:")?;
                Scene::after_name_entry(mode, choice)
            }
            Scene::Playing(setup) => {
                let (width, height) = self.frontend.viewport()?;
                let field = FieldGeometry::from_viewport(width, height);
                let world = World::new(field, setup.mode, &self.settings, rand::random());
                let session = Session::new(world, setup.names.clone(), &self.flags, &self.settings);
                let exit = play_match(&mut self.frontend, &session, &self.store)?;
                Scene::after_match(setup, exit)
            }
            Scene::Result { setup, outcome } => {
                let choice = self.frontend.show_result(&outcome)?;
                Scene::after_result(setup, choice)
            }
            Scene::Leaderboard => {
                let board = Leaderboard::new(self.store.load());
                Scene::after_info_screen(self.frontend.show_leaderboard(&board, now_epoch_secs())?)
            }
            Scene::Instructions => {
                Scene::after_info_screen(self.frontend.show_instructions(&self.settings)?)
            }
            Scene::Exit => Scene::Exit,
        };
        if next == Scene::Exit {
            self.flags.request_exit();
        }
        Ok(next)
    }
}
