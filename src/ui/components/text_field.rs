use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line text input with a label and cursor
#[derive(Debug, Clone)]
pub struct TextField {
  label: &'static str,
  buffer: String,
  cursor: usize,
}

impl TextField {
  pub fn new(label: &'static str) -> Self {
    Self {
      label,
      buffer: String::new(),
      cursor: 0,
    }
  }

  /// Create a field with a prefilled value, cursor at the end
  pub fn with_value(label: &'static str, value: String) -> Self {
    let cursor = value.len();
    Self {
      label,
      buffer: value,
      cursor,
    }
  }

  pub fn label(&self) -> &'static str {
    self.label
  }

  pub fn value(&self) -> &str {
    &self.buffer
  }

  /// Byte offset of the cursor, for rendering
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  fn prev_boundary(&self) -> usize {
    self.buffer[..self.cursor]
      .char_indices()
      .next_back()
      .map(|(i, _)| i)
      .unwrap_or(0)
  }

  fn next_boundary(&self) -> usize {
    self.buffer[self.cursor..]
      .chars()
      .next()
      .map(|c| self.cursor + c.len_utf8())
      .unwrap_or(self.cursor)
  }

  /// Handle an editing key. Returns false for keys this field doesn't own
  /// (Enter, Tab, Esc and friends), so the form can route them.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Backspace => {
        if self.cursor > 0 {
          let at = self.prev_boundary();
          self.buffer.remove(at);
          self.cursor = at;
        }
        true
      }
      KeyCode::Delete => {
        if self.cursor < self.buffer.len() {
          self.buffer.remove(self.cursor);
        }
        true
      }
      KeyCode::Left => {
        if self.cursor > 0 {
          self.cursor = self.prev_boundary();
        }
        true
      }
      KeyCode::Right => {
        self.cursor = self.next_boundary();
        true
      }
      KeyCode::Home => {
        self.cursor = 0;
        true
      }
      KeyCode::End => {
        self.cursor = self.buffer.len();
        true
      }
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.buffer = self.buffer[self.cursor..].to_string();
        self.cursor = 0;
        true
      }
      KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
      }
      _ => false,
    }
  }
}
