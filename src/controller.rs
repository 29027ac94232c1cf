use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::domain::{AppConfig, Message, SpotlessError};
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, SpotlessError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        let message = match event::read()? {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                if model.raw_keyevents() {
                    Some(Message::RawKey(key))
                } else {
                    Self::handle_key(key)
                }
            }
            Event::Resize(width, height) => Some(Message::Resize(width as usize, height as usize)),
            _ => None,
        };
        Ok(message)
    }

    pub fn handle_key(key: KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Tab, _) => Some(Message::NextLink),
            (KeyCode::BackTab, _) => Some(Message::PreviousLink),
            (KeyCode::Char('/'), _) => Some(Message::Search),
            (KeyCode::Char(c @ '1'..='9'), _) => {
                Some(Message::SortColumn(c as usize - '1' as usize))
            }
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Some(Message::PreviousPage),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Some(Message::NextPage),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Message::FirstPage),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Message::LastPage),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Some(Message::SelectNext),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Some(Message::SelectPrevious),
            (KeyCode::Char('+'), _) => Some(Message::GrowPageSize),
            (KeyCode::Char('-'), _) => Some(Message::ShrinkPageSize),
            (KeyCode::Char('L'), _) => Some(Message::Logout),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Enter, _) => Some(Message::Enter),
            (KeyCode::Esc, _) => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn digits_select_zero_based_columns() {
        assert_eq!(
            Controller::handle_key(key(KeyCode::Char('1'))),
            Some(Message::SortColumn(0))
        );
        assert_eq!(
            Controller::handle_key(key(KeyCode::Char('9'))),
            Some(Message::SortColumn(8))
        );
        assert_eq!(Controller::handle_key(key(KeyCode::Char('0'))), None);
    }

    #[test]
    fn navigation_keys() {
        assert_eq!(Controller::handle_key(key(KeyCode::Right)), Some(Message::NextPage));
        assert_eq!(Controller::handle_key(key(KeyCode::Char('h'))), Some(Message::PreviousPage));
        assert_eq!(
            Controller::handle_key(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(Message::LastPage)
        );
        assert_eq!(Controller::handle_key(key(KeyCode::Char('q'))), Some(Message::Quit));
    }

    #[test]
    fn row_selection_keys() {
        assert_eq!(Controller::handle_key(key(KeyCode::Down)), Some(Message::SelectNext));
        assert_eq!(Controller::handle_key(key(KeyCode::Char('k'))), Some(Message::SelectPrevious));
        assert_eq!(Controller::handle_key(key(KeyCode::Enter)), Some(Message::Enter));
    }
}
