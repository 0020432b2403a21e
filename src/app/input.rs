//! Key bindings
//!
//! Maps crossterm key events onto session actions. The mapping depends only on
//! focus and input mode, so it stays testable without a terminal.

use crate::session::{Action, Focus, InputMode, Session, ViewMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE: isize = 10;

#[derive(Debug)]
pub enum KeyOutcome {
    Quit,
    Dispatch(Action),
    Ignore,
}

pub fn handle_key_event(session: &Session, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        return match key.code {
            KeyCode::Char('c') => KeyOutcome::Quit,
            KeyCode::Char('e') => KeyOutcome::Dispatch(Action::ApplyCommand),
            KeyCode::Char('r') => KeyOutcome::Dispatch(Action::Run),
            KeyCode::Char('o') => KeyOutcome::Dispatch(Action::PromptFolder),
            _ => KeyOutcome::Ignore,
        };
    }

    match key.code {
        KeyCode::Esc if session.input_mode == InputMode::FolderPath => {
            return KeyOutcome::Dispatch(Action::CancelPrompt)
        }
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::F(1) => return KeyOutcome::Dispatch(Action::SetView(ViewMode::Chat)),
        KeyCode::F(2) => return KeyOutcome::Dispatch(Action::SetView(ViewMode::Editor)),
        KeyCode::PageUp => return KeyOutcome::Dispatch(Action::Scroll(-PAGE)),
        KeyCode::PageDown => return KeyOutcome::Dispatch(Action::Scroll(PAGE)),
        KeyCode::Tab if session.input_mode == InputMode::Prompt => {
            return KeyOutcome::Dispatch(Action::CycleFocus)
        }
        _ => {}
    }

    match session.focus {
        Focus::Input => handle_input_line(key),
        Focus::Tree => handle_tree(key),
    }
}

fn handle_input_line(key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Enter => KeyOutcome::Dispatch(Action::Submit),
        KeyCode::Backspace => KeyOutcome::Dispatch(Action::Backspace),
        KeyCode::Char(c) => KeyOutcome::Dispatch(Action::InsertChar(c)),
        _ => KeyOutcome::Ignore,
    }
}

fn handle_tree(key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => KeyOutcome::Dispatch(Action::MoveCursor(-1)),
        KeyCode::Down | KeyCode::Char('j') => KeyOutcome::Dispatch(Action::MoveCursor(1)),
        KeyCode::Enter | KeyCode::Char(' ') => KeyOutcome::Dispatch(Action::ActivateRow),
        _ => KeyOutcome::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_control_shortcuts() {
        let session = Session::new();
        assert!(matches!(handle_key_event(&session, ctrl('c')), KeyOutcome::Quit));
        assert!(matches!(
            handle_key_event(&session, ctrl('e')),
            KeyOutcome::Dispatch(Action::ApplyCommand)
        ));
        assert!(matches!(
            handle_key_event(&session, ctrl('r')),
            KeyOutcome::Dispatch(Action::Run)
        ));
    }

    #[test]
    fn test_focus_decides_letter_handling() {
        let mut session = Session::new();
        assert!(matches!(
            handle_key_event(&session, key(KeyCode::Char('j'))),
            KeyOutcome::Dispatch(Action::InsertChar('j'))
        ));

        session.focus = Focus::Tree;
        assert!(matches!(
            handle_key_event(&session, key(KeyCode::Char('j'))),
            KeyOutcome::Dispatch(Action::MoveCursor(1))
        ));
        assert!(matches!(
            handle_key_event(&session, key(KeyCode::Char(' '))),
            KeyOutcome::Dispatch(Action::ActivateRow)
        ));
    }

    #[test]
    fn test_escape_cancels_folder_prompt_before_quitting() {
        let mut session = Session::new();
        session.dispatch(Action::PromptFolder);
        assert!(matches!(
            handle_key_event(&session, key(KeyCode::Esc)),
            KeyOutcome::Dispatch(Action::CancelPrompt)
        ));
        assert!(matches!(
            handle_key_event(&session, key(KeyCode::Tab)),
            KeyOutcome::Ignore
        ));

        session.dispatch(Action::CancelPrompt);
        assert!(matches!(
            handle_key_event(&session, key(KeyCode::Esc)),
            KeyOutcome::Quit
        ));
    }
}
