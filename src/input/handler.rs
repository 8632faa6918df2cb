use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Heading, Signal};

/// What a key press asks of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Game(Signal),
    Quit,
    None,
}

/// Maps terminal key events onto simulation signals
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_interrupt(&key) {
            return KeyAction::Quit;
        }

        if let Some(heading) = heading_for(key.code) {
            return KeyAction::Game(Signal::SetDirection(heading));
        }

        match key.code {
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Enter => KeyAction::Game(Signal::Start),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                ' ' => KeyAction::Game(Signal::Start),
                'p' => KeyAction::Game(Signal::TogglePause),
                'r' => KeyAction::Game(Signal::Reset),
                'q' => KeyAction::Quit,
                _ => KeyAction::None,
            },
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Arrow keys and WASD, case-insensitive
fn heading_for(code: KeyCode) -> Option<Heading> {
    let heading = match code {
        KeyCode::Up => Heading::Up,
        KeyCode::Down => Heading::Down,
        KeyCode::Left => Heading::Left,
        KeyCode::Right => Heading::Right,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Heading::Up,
            's' => Heading::Down,
            'a' => Heading::Left,
            'd' => Heading::Right,
            _ => return None,
        },
        _ => return None,
    };
    Some(heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_for(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_movement_keys() {
        let cases = [
            (KeyCode::Up, Heading::Up),
            (KeyCode::Down, Heading::Down),
            (KeyCode::Left, Heading::Left),
            (KeyCode::Right, Heading::Right),
            (KeyCode::Char('w'), Heading::Up),
            (KeyCode::Char('a'), Heading::Left),
            (KeyCode::Char('s'), Heading::Down),
            (KeyCode::Char('D'), Heading::Right),
        ];

        for (code, heading) in cases {
            assert_eq!(
                action_for(code, KeyModifiers::NONE),
                KeyAction::Game(Signal::SetDirection(heading)),
                "{code:?}"
            );
        }
    }

    #[test]
    fn test_shifted_letters_match_lowercase() {
        for c in ['w', 'a', 's', 'd', 'p', 'r', 'q'] {
            assert_eq!(
                action_for(KeyCode::Char(c.to_ascii_uppercase()), KeyModifiers::SHIFT),
                action_for(KeyCode::Char(c), KeyModifiers::NONE),
                "{c}"
            );
        }
    }

    #[test]
    fn test_lifecycle_keys() {
        let cases = [
            (KeyCode::Char(' '), Signal::Start),
            (KeyCode::Enter, Signal::Start),
            (KeyCode::Char('p'), Signal::TogglePause),
            (KeyCode::Char('r'), Signal::Reset),
        ];

        for (code, signal) in cases {
            assert_eq!(action_for(code, KeyModifiers::NONE), KeyAction::Game(signal));
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(action_for(KeyCode::Char('q'), KeyModifiers::NONE), KeyAction::Quit);
        assert_eq!(action_for(KeyCode::Esc, KeyModifiers::NONE), KeyAction::Quit);
        assert_eq!(action_for(KeyCode::Char('c'), KeyModifiers::CONTROL), KeyAction::Quit);
        // Plain 'c' is not bound
        assert_eq!(action_for(KeyCode::Char('c'), KeyModifiers::NONE), KeyAction::None);
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(action_for(KeyCode::Char('x'), KeyModifiers::NONE), KeyAction::None);
        assert_eq!(action_for(KeyCode::Tab, KeyModifiers::NONE), KeyAction::None);
        assert_eq!(heading_for(KeyCode::Char('p')), None);
    }
}
