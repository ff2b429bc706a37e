//! Term Pong entry point
//!
//! Sets up file logging, loads settings and hands the terminal to the scene
//! driver.

use std::fs::File;
use std::process::ExitCode;

use env_logger::{Env, Target};

use term_pong::Settings;
use term_pong::renderer::TerminalFrontend;
use term_pong::scene::App;

const LOG_FILE: &str = "term-pong.log";

/// The terminal is in raw alternate-screen mode, so logs go to a file
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn load_settings() -> Settings {
    let path = Settings::path();
    let settings = Settings::load_from(&path);
    if !path.exists() {
        if let Err(e) = settings.save_to(&path) {
            log::warn!("Could not write default settings to {}: {}", path.display(), e);
        }
    }
    settings
}

fn run(settings: Settings) -> std::io::Result<()> {
    let frontend = TerminalFrontend::new()?;
    let mut app = App::new(frontend, settings);
    let result = app.run();
    app.into_frontend().restore()?;
    result
}

fn main() -> ExitCode {
    init_logging();
    log::info!("Term Pong starting...");

    let settings = load_settings();
    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal error: {}", e);
            eprintln!("term-pong: {}", e);
            ExitCode::FAILURE
        }
    }
}
