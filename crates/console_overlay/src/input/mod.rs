//! Console input handling
//!
//! Maps host keyboard events onto console operations. Hosts translate their
//! window events into [`ConsoleInputEvent`]s (see [`glfw`] with the `glfw`
//! feature) and feed them to [`Console::handle_input`].

#[cfg(feature = "glfw")]
pub mod glfw;

use crate::console::Console;

/// Keys the console reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleKey {
    /// Submit the input line
    Enter,
    /// Delete the last input character
    Backspace,
    /// Show older output
    ScrollUp,
    /// Show newer output
    ScrollDown,
}

/// Console input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInputEvent {
    /// A character was typed
    Char(char),
    /// A console key was pressed
    Key(ConsoleKey),
}

impl Console {
    /// Apply one input event
    ///
    /// Returns true when the console changed and should be redrawn.
    pub fn handle_input(&mut self, event: ConsoleInputEvent) -> bool {
        match event {
            ConsoleInputEvent::Char(c) => {
                self.append_input_char(c);
                true
            }
            ConsoleInputEvent::Key(ConsoleKey::Enter) => {
                self.trigger_enter();
                true
            }
            ConsoleInputEvent::Key(ConsoleKey::Backspace) => self.pop_input_char() != 0,
            ConsoleInputEvent::Key(ConsoleKey::ScrollUp) => {
                self.scroll_by(self.scroll_step());
                true
            }
            ConsoleInputEvent::Key(ConsoleKey::ScrollDown) => {
                self.scroll_by(-self.scroll_step());
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::CallbackFlow;
    use crate::text::CodepointBuffer;

    #[test]
    fn test_typing_and_backspace() {
        let mut console = Console::new();
        for c in "hi!".chars() {
            assert!(console.handle_input(ConsoleInputEvent::Char(c)));
        }
        assert!(console.handle_input(ConsoleInputEvent::Key(ConsoleKey::Backspace)));
        assert_eq!(console.input().to_string(), "hi");

        console.clear_input();
        assert!(!console.handle_input(ConsoleInputEvent::Key(ConsoleKey::Backspace)));
    }

    #[test]
    fn test_scroll_keys_use_scroll_step() {
        let mut console = Console::new();
        console.set_scroll_step(12);

        console.handle_input(ConsoleInputEvent::Key(ConsoleKey::ScrollUp));
        console.handle_input(ConsoleInputEvent::Key(ConsoleKey::ScrollUp));
        assert_eq!(console.scroll_offset(), 24);

        console.handle_input(ConsoleInputEvent::Key(ConsoleKey::ScrollDown));
        assert_eq!(console.scroll_offset(), 12);
    }

    #[test]
    fn test_enter_submits_input() {
        let mut console = Console::new();
        console.register_enter_callback(|console: &mut Console, input: &CodepointBuffer| {
            console.append_output(&input.to_string());
            console.clear_input();
            CallbackFlow::Stop
        });

        console.handle_input(ConsoleInputEvent::Char('x'));
        assert!(console.handle_input(ConsoleInputEvent::Key(ConsoleKey::Enter)));
        assert_eq!(console.output().to_string(), "x");
        assert!(console.input().is_empty());
    }
}
