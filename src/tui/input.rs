use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::protocol::atv320::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MovePrev,
    MoveNext,
    RescanPorts,
    Connect,
    Disconnect,
    Run(Direction),
    Stop,
    ResetFault,
    Digit(char),
    Backspace,
    ClearSetpoint,
    DismissDialog,
    None,
}

/// Map a key press to an action.
///
/// While a dialog is open only dismissal and Ctrl+C get through, so the
/// dialog blocks like a modal window would.
pub fn map_key(key: KeyEvent, dialog_open: bool) -> Action {
    // Only handle the initial key press event. Ignore Repeat and Release
    // events so a single physical key press maps to a single action.
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }

    if dialog_open {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Action::DismissDialog,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::MovePrev,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveNext,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::F(5) => Action::RescanPorts,
        KeyCode::Char('c') | KeyCode::Char('C') => Action::Connect,
        KeyCode::Char('d') | KeyCode::Char('D') => Action::Disconnect,
        KeyCode::Char('f') | KeyCode::Char('F') => Action::Run(Direction::Forward),
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Run(Direction::Reverse),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char(' ') => Action::Stop,
        KeyCode::Char('x') | KeyCode::Char('X') => Action::ResetFault,
        KeyCode::Char(c) if c.is_ascii_digit() => Action::Digit(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete | KeyCode::Esc => Action::ClearSetpoint,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn command_keys() {
        assert_eq!(
            map_key(press(KeyCode::Char('f')), false),
            Action::Run(Direction::Forward)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('R')), false),
            Action::Run(Direction::Reverse)
        );
        assert_eq!(map_key(press(KeyCode::Char(' ')), false), Action::Stop);
        assert_eq!(map_key(press(KeyCode::Char('x')), false), Action::ResetFault);
        assert_eq!(map_key(press(KeyCode::Char('7')), false), Action::Digit('7'));
    }

    #[test]
    fn dialog_swallows_commands() {
        assert_eq!(map_key(press(KeyCode::Char('f')), true), Action::None);
        assert_eq!(map_key(press(KeyCode::Enter), true), Action::DismissDialog);
        assert_eq!(
            map_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                true
            ),
            Action::Quit
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut key = press(KeyCode::Char('s'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key, false), Action::None);
    }
}
