//! Skyhop entry point
//!
//! Loads settings and sprites, then runs the game in the terminal.
//! Usage: `skyhop [settings.json]`

use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use skyhop::app::App;
use skyhop::settings::{SETTINGS_FILE, Settings};
use skyhop::sim::SpriteBank;
use skyhop::terminal::TerminalFrontend;

fn main() -> io::Result<()> {
    // The terminal is ours while playing; opt into more with RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings = Settings::load(&settings_path);
    let bank = Rc::new(SpriteBank::load(&settings.atlas_path));
    let fps = settings.fps;

    let mut app = App::new(settings, Rc::clone(&bank));
    let mut frontend = TerminalFrontend::new(bank, fps)?;
    let result = app.run(&mut frontend);
    // Restore the terminal before anything is printed
    drop(frontend);

    if let Err(e) = &result {
        log::error!("Game loop failed: {}", e);
    }
    result
}
