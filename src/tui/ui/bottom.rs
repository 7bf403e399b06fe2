use ratatui::{prelude::*, widgets::*};

use crate::tui::app::App;

pub fn bottom_hints(app: &App) -> Vec<&'static str> {
    if app.panel.dialog().is_some() {
        return vec!["Enter/Esc: dismiss", "Ctrl+C: quit"];
    }
    let mut hints = vec!["↑/↓: port", "P: rescan"];
    if app.panel.is_connected() {
        hints.push("C: reconnect");
        hints.push("D: disconnect");
    } else {
        hints.push("C: connect");
    }
    hints.extend([
        "0-9/⌫/Del: speed",
        "F: forward",
        "R: reverse",
        "S: stop",
        "X: reset",
        "Q: quit",
    ]);
    hints
}

pub fn render_bottom(f: &mut Frame, area: Rect, app: &App) {
    let help_block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(Color::Gray).fg(Color::White));

    let help = Paragraph::new(bottom_hints(app).join("   "))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(help_block);
    f.render_widget(help, area);
}
