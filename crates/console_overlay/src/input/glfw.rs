//! GLFW window event translation

use ::glfw::{Action, Key, WindowEvent};

use super::{ConsoleInputEvent, ConsoleKey};

/// Translate a GLFW window event into a console input event
///
/// Enter fires on press only; editing and scrolling keys also repeat while
/// held. Everything else is ignored.
pub fn translate_event(event: &WindowEvent) -> Option<ConsoleInputEvent> {
    match *event {
        WindowEvent::Char(c) => Some(ConsoleInputEvent::Char(c)),
        WindowEvent::Key(Key::Enter | Key::KpEnter, _, Action::Press, _) => {
            Some(ConsoleInputEvent::Key(ConsoleKey::Enter))
        }
        WindowEvent::Key(key, _, Action::Press | Action::Repeat, _) => match key {
            Key::Backspace => Some(ConsoleInputEvent::Key(ConsoleKey::Backspace)),
            Key::Up => Some(ConsoleInputEvent::Key(ConsoleKey::ScrollUp)),
            Key::Down => Some(ConsoleInputEvent::Key(ConsoleKey::ScrollDown)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::glfw::Modifiers;

    fn key(key: Key, action: Action) -> WindowEvent {
        WindowEvent::Key(key, 0, action, Modifiers::empty())
    }

    #[test]
    fn test_enter_only_on_press() {
        assert_eq!(
            translate_event(&key(Key::Enter, Action::Press)),
            Some(ConsoleInputEvent::Key(ConsoleKey::Enter))
        );
        assert_eq!(translate_event(&key(Key::Enter, Action::Repeat)), None);
        assert_eq!(translate_event(&key(Key::Enter, Action::Release)), None);
    }

    #[test]
    fn test_editing_keys_repeat() {
        assert_eq!(
            translate_event(&key(Key::Backspace, Action::Repeat)),
            Some(ConsoleInputEvent::Key(ConsoleKey::Backspace))
        );
        assert_eq!(
            translate_event(&key(Key::Up, Action::Press)),
            Some(ConsoleInputEvent::Key(ConsoleKey::ScrollUp))
        );
        assert_eq!(
            translate_event(&key(Key::Down, Action::Repeat)),
            Some(ConsoleInputEvent::Key(ConsoleKey::ScrollDown))
        );
        assert_eq!(translate_event(&key(Key::A, Action::Press)), None);
    }

    #[test]
    fn test_characters_pass_through() {
        assert_eq!(
            translate_event(&WindowEvent::Char('ä')),
            Some(ConsoleInputEvent::Char('ä'))
        );
    }
}
