use ratatui::{prelude::*, style::Modifier, text::Line};
use unicode_width::UnicodeWidthStr;

// Layout constants
pub(crate) const LABEL_PADDING_EXTRA: usize = 2;
pub(crate) const TARGET_LABEL_WIDTH: usize = 12;
pub(crate) const INDICATOR_EDITING: &str = "> ";
pub(crate) const INDICATOR_NORMAL: &str = "  ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextState {
    Normal,
    Editing,
}

/// Render a three-column key/value line: indicator, bold label, value spans.
///
/// The label column is padded to a fixed display width (unicode-aware) so
/// values line up across rows.
pub fn render_kv_line(
    label: impl ToString,
    text_state: TextState,
    value_spans: Vec<Span<'static>>,
) -> Line<'static> {
    let label_str = label.to_string();

    let (indicator_text, indicator_style) = match text_state {
        TextState::Editing => (INDICATOR_EDITING, Style::default().fg(Color::Yellow)),
        TextState::Normal => (INDICATOR_NORMAL, Style::default()),
    };

    let label_width = label_str.width();
    let padding_needed = if label_width < TARGET_LABEL_WIDTH {
        TARGET_LABEL_WIDTH - label_width + LABEL_PADDING_EXTRA
    } else {
        LABEL_PADDING_EXTRA
    };

    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(indicator_text, indicator_style));
    spans.push(Span::styled(
        label_str,
        Style::default().add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(" ".repeat(padding_needed)));
    spans.extend(value_spans);

    Line::from(spans)
}
