pub(self) mod bottom;
pub(self) mod components;
pub(self) mod dialog;
pub(self) mod panels;
pub(self) mod title;

use ratatui::prelude::*;

use crate::{core::Tone, tui::app::App};

pub fn render_ui(f: &mut Frame, app: &App) {
    let area = f.area();
    let main_chunks = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .margin(0)
        .constraints([
            ratatui::layout::Constraint::Length(1), // Title
            ratatui::layout::Constraint::Min(0),
            ratatui::layout::Constraint::Length(1), // Bottom help
        ])
        .split(area);

    title::render_title(f, main_chunks[0], app);
    panels::render_panels(f, main_chunks[1], app);
    bottom::render_bottom(f, main_chunks[2], app);

    if let Some(dialog) = app.panel.dialog() {
        dialog::render_dialog(f, area, dialog);
    }
}

/// Terminal color for a status tone.
pub(crate) fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Good => Color::Green,
        Tone::Caution => Color::Rgb(255, 165, 0),
        Tone::Alert => Color::Red,
        Tone::Info => Color::Blue,
    }
}
