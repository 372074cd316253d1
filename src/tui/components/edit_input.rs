//! # EditInput
//!
//! Single-line labelled text field used inside dialogs. Holds the buffer
//! and a byte-offset cursor; masked fields display one mask glyph per
//! character.

use unicode_width::UnicodeWidthStr;

use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

pub struct EditInput {
    caption: String,
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary
    cursor: usize,
    mask: Option<char>,
}

impl EditInput {
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            buffer: String::new(),
            cursor: 0,
            mask: None,
        }
    }

    pub fn masked(caption: &str, mask: char) -> Self {
        Self {
            mask: Some(mask),
            ..Self::new(caption)
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn is_masked(&self) -> bool {
        self.mask.is_some()
    }

    pub fn set_value(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    pub fn display_value(&self) -> String {
        match self.mask {
            Some(mask) => std::iter::repeat_n(mask, self.buffer.chars().count()).collect(),
            None => self.buffer.clone(),
        }
    }

    /// Terminal column of the cursor, relative to the start of the caption.
    pub fn cursor_column(&self) -> u16 {
        let before = &self.buffer[..self.cursor];
        let typed = match self.mask {
            Some(_) => before.chars().count(),
            None => before.width(),
        };
        (self.caption.width() + typed) as u16
    }
}

impl EventHandler for EditInput {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(())
            }
            TuiEvent::Paste(text) => {
                let line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.buffer.insert_str(self.cursor, &line);
                self.cursor += line.len();
                Some(())
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| self.cursor = 0),
            TuiEvent::CursorEnd => {
                (self.cursor != self.buffer.len()).then(|| self.cursor = self.buffer.len())
            }
            _ => None,
        }
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut EditInput, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut input = EditInput::new("Name: ");
        type_str(&mut input, "admin");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.value(), "admi");
    }

    #[test]
    fn test_backspace_at_start_not_consumed() {
        let mut input = EditInput::new("Name: ");
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_insert_in_middle_multibyte() {
        let mut input = EditInput::new("");
        type_str(&mut input, "héllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.value(), "hélo");
        assert_eq!(input.cursor_column(), 2);
    }

    #[test]
    fn test_masked_display() {
        let mut input = EditInput::masked("Password: ", '*');
        type_str(&mut input, "sécret");
        assert_eq!(input.value(), "sécret");
        assert_eq!(input.display_value(), "******");
        assert_eq!(input.cursor_column(), 10 + 6);
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut input = EditInput::new("Key: ");
        input.handle_event(&TuiEvent::Paste("abc\ndef\n".to_string()));
        assert_eq!(input.value(), "abcdef");
    }

    #[test]
    fn test_set_value_moves_cursor_to_end() {
        let mut input = EditInput::new("Server: ");
        input.set_value("10.0.0.1");
        input.handle_event(&TuiEvent::InputChar('0'));
        assert_eq!(input.value(), "10.0.0.10");
    }

    #[test]
    fn test_navigation_keys_not_consumed() {
        let mut input = EditInput::new("");
        assert_eq!(input.handle_event(&TuiEvent::CursorDown), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }
}
