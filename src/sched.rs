//! Fixed-tick simulation workers
//!
//! A match runs three workers (ball, left paddle, right paddle) plus the
//! render/input loop on the calling thread. They share one `Session`:
//! - The `World` sits behind a single mutex; every read or write of ball,
//!   paddles or score happens with it held, and nobody sleeps or waits on
//!   input while holding it
//! - Run / pause / exit are atomic flags (release on store, acquire on load)
//! - Human intents are latched atomically and consumed by the paddle workers
//!
//! Workers are scoped threads borrowing the session, so the session cannot
//! outlive the match that spawned them.

use std::sync::atomic::{AtomicBool, AtomicI8, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::settings::Settings;
use crate::sim::{CpuPolicy, GameEvent, Intent, Side, World, tick};

/// Lifecycle flags shared by the workers and the orchestrator
#[derive(Debug, Default)]
pub struct RunFlags {
    run: AtomicBool,
    paused: AtomicBool,
    exit: AtomicBool,
}

impl RunFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workers keep looping while this is set
    pub fn is_running(&self) -> bool {
        self.run.load(Ordering::Acquire)
    }

    pub fn start(&self) {
        self.paused.store(false, Ordering::Release);
        self.run.store(true, Ordering::Release);
    }

    /// Ask workers to finish; observed at the top of their next tick
    pub fn stop(&self) {
        self.run.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Flip pause, returning the new state
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Release);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::Acquire)
    }
}

/// Latest human intent for one paddle.
///
/// A key press drives the paddle for `hold` ticks; each paddle tick consumes
/// one. With `hold == 1` every press moves the paddle exactly once.
#[derive(Debug, Default)]
pub struct IntentLatch {
    intent: AtomicI8,
    ticks_left: AtomicU32,
}

impl IntentLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, intent: Intent, hold: u32) {
        self.intent.store(intent.to_raw(), Ordering::Release);
        self.ticks_left.store(hold.max(1), Ordering::Release);
    }

    /// Intent for this tick (`Idle` once the hold has run out)
    pub fn take(&self) -> Intent {
        let consumed = self
            .ticks_left
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match consumed {
            Ok(_) => Intent::from_raw(self.intent.load(Ordering::Acquire)),
            Err(_) => Intent::Idle,
        }
    }

    pub fn clear(&self) {
        self.ticks_left.store(0, Ordering::Release);
    }
}

/// State owned by one match and borrowed by its workers
#[derive(Debug)]
pub struct Session<'a> {
    world: Mutex<World>,
    names: [String; 2],
    intents: [IntentLatch; 2],
    flags: &'a RunFlags,
    settings: &'a Settings,
}

impl<'a> Session<'a> {
    pub fn new(
        world: World,
        names: [String; 2],
        flags: &'a RunFlags,
        settings: &'a Settings,
    ) -> Self {
        Self {
            world: Mutex::new(world),
            names,
            intents: [IntentLatch::new(), IntentLatch::new()],
            flags,
            settings,
        }
    }

    /// Enter the critical section.
    ///
    /// A worker that panicked mid-tick leaves a clamped, usable world, so a
    /// poisoned lock is taken over rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, World> {
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the world taken under the lock
    pub fn snapshot(&self) -> World {
        self.lock().clone()
    }

    pub fn names(&self) -> &[String; 2] {
        &self.names
    }

    pub fn flags(&self) -> &RunFlags {
        self.flags
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    pub fn intent(&self, side: Side) -> &IntentLatch {
        &self.intents[side.index()]
    }

    /// Latch a human key press for `side`
    pub fn press(&self, side: Side, intent: Intent) {
        self.intent(side).press(intent, self.settings.intent_hold_ticks);
    }
}

/// Who decides a paddle's intent
#[derive(Debug)]
enum Driver {
    Human,
    Cpu(CpuPolicy),
}

/// One ball tick, skipped once the match is decided so the score never
/// passes the win threshold
fn ball_step(world: &mut World, settings: &Settings) {
    if world.score.winner(settings.win_score).is_some() {
        return;
    }
    for event in tick(world, settings) {
        match event {
            GameEvent::WallBounce => log::trace!("wall bounce at tick {}", world.time_ticks),
            GameEvent::PaddleHit(side) => {
                log::trace!("{:?} paddle return at tick {}", side, world.time_ticks)
            }
            // Logged by the tick with the new score
            GameEvent::Scored(_) => {}
        }
    }
}

fn paddle_step(world: &mut World, side: Side, driver: &mut Driver, session: &Session<'_>) {
    let intent = match driver {
        Driver::Human => session.intent(side).take(),
        Driver::Cpu(policy) => policy.decide(world),
    };
    let settings = session.settings();
    let field = world.field;
    world
        .paddle_mut(side)
        .apply(intent, &settings.motion, &field, settings.dt());
}

/// Fixed-rate loop: tick (unless paused), then sleep out the interval
fn worker_loop(flags: &RunFlags, interval: Duration, mut step: impl FnMut()) {
    while flags.is_running() {
        let started = Instant::now();
        if !flags.is_paused() {
            step();
        }
        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
}

fn ball_worker(session: &Session<'_>) {
    log::debug!("ball worker started");
    worker_loop(session.flags(), session.settings().tick_interval(), || {
        let mut world = session.lock();
        ball_step(&mut world, session.settings());
    });
    log::debug!("ball worker stopped");
}

fn paddle_worker(session: &Session<'_>, side: Side) {
    let mode = session.lock().mode;
    let mut driver = if mode.is_cpu(side) {
        Driver::Cpu(CpuPolicy::new(side, session.settings().cpu, rand::random()))
    } else {
        Driver::Human
    };
    log::debug!("{:?} paddle worker started ({:?})", side, driver);
    worker_loop(session.flags(), session.settings().tick_interval(), || {
        let mut world = session.lock();
        paddle_step(&mut world, side, &mut driver, session);
    });
    log::debug!("{:?} paddle worker stopped", side);
}

/// Clears the run flag when dropped, so workers stop even if the body panics
struct StopGuard<'a>(&'a RunFlags);

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Run `body` on the calling thread while the three workers tick.
///
/// Sets the run flag, spawns the workers, runs `body`, clears the run flag,
/// waits two tick intervals so every worker can see it outside the critical
/// section, then joins them.
pub fn run_workers<R>(session: &Session<'_>, body: impl FnOnce() -> R) -> std::io::Result<R> {
    let interval = session.settings().tick_interval();
    let flags = session.flags();
    flags.start();

    thread::scope(|scope| {
        let _guard = StopGuard(flags);

        let ball = thread::Builder::new()
            .name("ball".into())
            .spawn_scoped(scope, move || ball_worker(session))?;
        let left = thread::Builder::new()
            .name("paddle-left".into())
            .spawn_scoped(scope, move || paddle_worker(session, Side::Left))?;
        let right = thread::Builder::new()
            .name("paddle-right".into())
            .spawn_scoped(scope, move || paddle_worker(session, Side::Right))?;

        let out = body();

        flags.stop();
        thread::sleep(interval * 2);
        for (name, handle) in [("ball", ball), ("paddle-left", left), ("paddle-right", right)] {
            if handle.join().is_err() {
                log::error!("{} worker panicked", name);
            }
        }
        Ok(out)
    })
}
