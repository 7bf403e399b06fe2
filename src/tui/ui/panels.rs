use ratatui::{prelude::*, widgets::*};

use super::{
    components::{render_kv_line, TextState},
    tone_color,
};
use crate::tui::app::App;

pub fn render_panels(f: &mut Frame, area: Rect, app: &App) {
    let chunks = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .margin(0)
        .constraints([
            ratatui::layout::Constraint::Percentage(40),
            ratatui::layout::Constraint::Percentage(60),
        ])
        .split(area);

    render_ports(f, chunks[0], app);
    render_drive(f, chunks[1], app);
}

fn render_ports(f: &mut Frame, area: Rect, app: &App) {
    let connected_port = app.panel.port_name();
    let items: Vec<ListItem> = app
        .ports
        .iter()
        .map(|p| {
            let name_style = if Some(p.port_name.as_str()) == connected_port {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(p.port_name.clone(), name_style),
                Span::raw("  "),
                Span::styled(p.describe(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let title = match &app.last_scan {
        Some(at) => format!(" Ports (scanned {}) ", at.format("%H:%M:%S")),
        None => " Ports ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);

    if items.is_empty() {
        let para = Paragraph::new(app.selection_label().to_string())
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::LightGreen)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_drive(f: &mut Frame, area: Rect, app: &App) {
    let status = app.panel.status();
    let setpoint = app.panel.setpoint();

    let lines = vec![
        render_kv_line(
            "Port",
            TextState::Normal,
            vec![Span::raw(app.selection_label().to_string())],
        ),
        render_kv_line(
            "Link",
            TextState::Normal,
            vec![Span::styled(
                app.link_label.clone(),
                Style::default().fg(Color::DarkGray),
            )],
        ),
        Line::from(""),
        render_kv_line(
            "Status",
            TextState::Normal,
            vec![Span::styled(
                status.text.clone(),
                Style::default()
                    .fg(tone_color(status.tone))
                    .add_modifier(Modifier::BOLD),
            )],
        ),
        render_kv_line(
            "Feedback",
            TextState::Normal,
            vec![Span::styled(
                app.panel.feedback_text(),
                Style::default().fg(Color::Blue),
            )],
        ),
        Line::from(""),
        render_kv_line(
            "Set Speed",
            TextState::Editing,
            vec![
                Span::styled(
                    setpoint.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled("_", Style::default().fg(Color::Yellow)),
                Span::raw(" RPM"),
            ],
        ),
    ];

    let block = Block::default()
        .title(" Drive ")
        .borders(Borders::ALL)
        .border_type(BorderType::Plain);
    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}
