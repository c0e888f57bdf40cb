use crate::engine::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Turn(Direction),
    Restart,
    Quit,
    /// Answer "yes" to a question
    Yes,
    /// Answer "no" to a question
    No,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        let plain = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (m, _) if !plain.contains(m) => None,
            (_, KeyCode::Char('w' | 'W' | 'k') | KeyCode::Up) => Some(Command::Turn(Direction::Up)),
            (_, KeyCode::Char('s' | 'S' | 'j') | KeyCode::Down) => {
                Some(Command::Turn(Direction::Down))
            }
            (_, KeyCode::Char('a' | 'A' | 'h') | KeyCode::Left) => {
                Some(Command::Turn(Direction::Left))
            }
            (_, KeyCode::Char('d' | 'D' | 'l') | KeyCode::Right) => {
                Some(Command::Turn(Direction::Right))
            }
            (_, KeyCode::Char('r') | KeyCode::Enter) => Some(Command::Restart),
            (_, KeyCode::Char('q') | KeyCode::Esc) => Some(Command::Quit),
            (_, KeyCode::Char('y' | 'Y')) => Some(Command::Yes),
            (_, KeyCode::Char('n' | 'N')) => Some(Command::No),
            _ => None,
        }
    }
}
