//! Key bindings and press/release translation.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Action from a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    Restart,
    Quit,
    None,
}

impl Action {
    /// Actions the game itself consumes; the rest belong to the app shell.
    pub fn is_gameplay(self) -> bool {
        matches!(self, Self::MoveLeft | Self::MoveRight | Self::RotateLeft | Self::RotateRight)
    }
}

/// Discrete key edge queued for the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Action),
    Release(Action),
}

/// Map key event to action. Arrows or h/l move, z/x rotate.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        KeyCode::Char('z' | 'Z') => Action::RotateLeft,
        KeyCode::Char('x' | 'X') => Action::RotateRight,
        KeyCode::Char('r' | 'R') => Action::Restart,
        _ => Action::None,
    }
}

/// Edges to queue for a gameplay key. Auto-repeat is dropped so a held key
/// acts once. Without release reporting every press is its own release.
pub fn key_to_events(key: KeyEvent, reports_release: bool) -> Vec<InputEvent> {
    let action = key_to_action(key);
    if !action.is_gameplay() {
        return Vec::new();
    }
    match key.kind {
        KeyEventKind::Press if reports_release => vec![InputEvent::Press(action)],
        KeyEventKind::Press => vec![InputEvent::Press(action), InputEvent::Release(action)],
        KeyEventKind::Release => vec![InputEvent::Release(action)],
        KeyEventKind::Repeat => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn maps_bindings() {
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Left)), Action::MoveLeft);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('l'))), Action::MoveRight);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('z'))), Action::RotateLeft);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('x'))), Action::RotateRight);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Esc)), Action::Quit);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('w'))), Action::None);
        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_x), Action::None);
    }

    #[test]
    fn press_and_release_pass_through_when_reported() {
        let press = key(KeyCode::Right, KeyEventKind::Press);
        let release = key(KeyCode::Right, KeyEventKind::Release);
        assert_eq!(key_to_events(press, true), vec![InputEvent::Press(Action::MoveRight)]);
        assert_eq!(key_to_events(release, true), vec![InputEvent::Release(Action::MoveRight)]);
    }

    #[test]
    fn repeat_is_dropped() {
        let repeat = key(KeyCode::Char('x'), KeyEventKind::Repeat);
        assert!(key_to_events(repeat, true).is_empty());
    }

    #[test]
    fn press_synthesises_release_without_reporting() {
        let press = key(KeyCode::Left, KeyEventKind::Press);
        assert_eq!(
            key_to_events(press, false),
            vec![InputEvent::Press(Action::MoveLeft), InputEvent::Release(Action::MoveLeft)]
        );
    }

    #[test]
    fn shell_keys_are_not_queued() {
        assert!(key_to_events(key(KeyCode::Char('q'), KeyEventKind::Press), false).is_empty());
        assert!(key_to_events(key(KeyCode::Char('r'), KeyEventKind::Press), true).is_empty());
    }
}
