use ratatui::{prelude::*, widgets::*};

use crate::core::Dialog;

/// Centered rectangle of at most `width` x `height` inside `area`.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_dialog(f: &mut Frame, area: Rect, dialog: &Dialog) {
    let rect = centered_rect(48, 7, area);
    f.render_widget(Clear, rect);

    let block = Block::default()
        .title(format!(" {} ", dialog.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(Color::White).bg(Color::Red));

    let text = vec![
        Line::from(""),
        Line::from(dialog.message.as_str()).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            "[ OK ]",
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ))
        .alignment(Alignment::Center),
    ];
    let para = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, rect);
}
