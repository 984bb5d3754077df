//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use std::io::{self, Stdout};
use std::panic;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::config::Settings;
use crate::error::TallyError;
use crate::services::RuleService;
use crate::storage::Storage;

use super::app::App;
use super::event::{Event, EventHandler};
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode().map_err(|e| TallyError::terminal("enable raw mode", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TallyError::terminal("enter alternate screen", e))?;

    let backend = CrosstermBackend::new(stdout);
    let terminal =
        Terminal::new(backend).map_err(|e| TallyError::terminal("create terminal", e))?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| TallyError::terminal("disable raw mode", e))?;
    execute!(io::stdout(), LeaveAlternateScreen)
        .map_err(|e| TallyError::terminal("leave alternate screen", e))?;
    Ok(())
}

/// Run the TUI application
pub fn run_tui(storage: &Storage, settings: &Settings) -> Result<()> {
    let engine = RuleService::new(storage).engine()?;
    let mut app = App::new(storage, settings, engine);

    let mut terminal = init_terminal()?;
    info!("tui started");

    let result = event_loop(&mut terminal, &mut app);

    restore_terminal()?;
    result
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let events = EventHandler::default();

    while !app.should_quit {
        terminal.draw(|frame| super::views::render(frame, app))?;

        match events.next()? {
            Event::Tick => app.expire_status(Instant::now()),
            // Redrawn on the next pass
            Event::Resize(_, _) => {}
            event => handle_event(app, event)?,
        }
    }

    Ok(())
}
