pub mod app;
pub mod input;
pub mod ui;

use anyhow::Result;
use ratatui::{backend::CrosstermBackend, prelude::*};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crate::{
    protocol::tty::{available_ports_sorted, PortEntry},
    tui::input::map_key,
};
use app::{App, Flow};

/// Name of the extra port offered in simulation mode.
pub const SIMULATED_PORT: &str = "SIM0";

// Upper bound on how long the loop blocks waiting for a key.
const MAX_INPUT_WAIT: Duration = Duration::from_millis(200);

/// Real ports plus one simulated entry, used by `--simulate`.
pub fn simulated_scanner() -> Vec<PortEntry> {
    let mut ports = available_ports_sorted();
    let mut sim = PortEntry::named(SIMULATED_PORT);
    sim.kind = "Simulated".to_string();
    ports.insert(0, sim);
    ports
}

pub fn start(app: App) -> Result<()> {
    log::info!("[TUI] ATV320 panel starting...");

    // Setup terminal
    let mut stdout = io::stdout();
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(&mut stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<&mut Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| crate::tui::ui::render_ui(f, &app))?;

        // Block for input no longer than the next timer deadline.
        let wait = app
            .panel
            .schedule()
            .time_until_next(Instant::now())
            .min(MAX_INPUT_WAIT);

        if crossterm::event::poll(wait)? {
            match crossterm::event::read() {
                Ok(crossterm::event::Event::Key(key)) => {
                    let action = map_key(key, app.panel.dialog().is_some());
                    if app.handle(action) == Flow::Quit {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => log::error!("[TUI] input read error: {err}"),
            }
        }

        app.tick(Instant::now());
    }

    app.panel.shutdown();
    terminal.clear()?;
    Ok(())
}
