use ratatui::{prelude::*, widgets::*};

use crate::tui::app::App;

pub fn render_title(f: &mut Frame, area: Rect, app: &App) {
    // Background bar
    let bg_block = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(Color::Gray));
    f.render_widget(bg_block, area);

    let title_text = match app.panel.port_name() {
        Some(port) => format!("{port} - ATV320 Controller"),
        None => "ATV320 Controller".to_string(),
    };

    let title_para = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(title_para, area);
}
