//! Key input model and line editing state.
//!
//! [`KeyInput`] decouples the app from crossterm key codes; the runtime
//! does that conversion at the boundary. [`InputState`] is the buffer plus
//! cursor used by the message line and both form fields.

/// Key inputs the app reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// F2 function key; opens the address form.
    F2,
}

/// Line editing state: a text buffer plus a cursor.
///
/// The cursor is a byte offset that always sits on a char boundary, so
/// multi-byte input edits cleanly.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// True when nothing has been typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Cursor offset in display columns (chars before the cursor).
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.buffer[..self.cursor].char_indices().next_back() {
            self.buffer.remove(idx);
            self.cursor = idx;
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    /// Move the cursor one character left.
    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.buffer[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    /// Move the cursor one character right.
    pub fn move_right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Move the cursor to the start of the line.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor past the last character.
    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Take the text out, resetting the input.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Route an editing key to its operation.
    ///
    /// Returns false for keys that do not edit (Enter, Esc, Tab, F2), so
    /// callers can layer their own meaning on those.
    pub fn handle_edit(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => self.insert(c),
            KeyInput::Backspace => self.backspace(),
            KeyInput::Delete => self.delete(),
            KeyInput::Left => self.move_left(),
            KeyInput::Right => self.move_right(),
            KeyInput::Home => self.move_home(),
            KeyInput::End => self.move_end(),
            KeyInput::Enter | KeyInput::Esc | KeyInput::Tab | KeyInput::F2 => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputState {
        let mut input = InputState::new();
        for c in text.chars() {
            input.insert(c);
        }
        input
    }

    #[test]
    fn characters_append_at_the_cursor() {
        let input = typed("hello");
        assert_eq!(input.buffer(), "hello");
        assert_eq!(input.cursor_column(), 5);
    }

    #[test]
    fn backspace_removes_before_the_cursor() {
        let mut input = typed("hey");
        input.backspace();
        assert_eq!(input.buffer(), "he");

        input.move_home();
        input.backspace();
        assert_eq!(input.buffer(), "he", "backspace at start is a no-op");
    }

    #[test]
    fn delete_removes_at_the_cursor() {
        let mut input = typed("abc");
        input.move_home();
        input.delete();
        assert_eq!(input.buffer(), "bc");

        input.move_end();
        input.delete();
        assert_eq!(input.buffer(), "bc", "delete at end is a no-op");
    }

    #[test]
    fn cursor_moves_and_inserts_mid_buffer() {
        let mut input = typed("ac");
        input.move_left();
        input.insert('b');
        assert_eq!(input.buffer(), "abc");
        assert_eq!(input.cursor_column(), 2);
    }

    #[test]
    fn multibyte_characters_edit_cleanly() {
        let mut input = typed("héllo");
        assert_eq!(input.cursor_column(), 5);

        input.move_home();
        input.move_right();
        input.move_right();
        input.backspace();
        assert_eq!(input.buffer(), "hllo");
    }

    #[test]
    fn take_returns_text_and_resets() {
        let mut input = typed("message");
        assert_eq!(input.take(), "message");
        assert!(input.is_empty());
        assert_eq!(input.cursor_column(), 0);
    }

    #[test]
    fn non_editing_keys_are_not_consumed() {
        let mut input = typed("x");
        assert!(!input.handle_edit(KeyInput::Enter));
        assert!(!input.handle_edit(KeyInput::Esc));
        assert!(!input.handle_edit(KeyInput::Tab));
        assert!(!input.handle_edit(KeyInput::F2));
        assert_eq!(input.buffer(), "x");
    }
}
