use crossterm::event::{KeyCode, KeyEvent};
use std::fmt::Display;

/// Optional pick from a fixed set of options, cycled with Left/Right.
///
/// Cycling wraps through "no selection", so every field stays clearable.
#[derive(Debug, Clone)]
pub struct ChoiceField<T: 'static> {
  label: &'static str,
  placeholder: &'static str,
  options: &'static [T],
  selected: Option<usize>,
}

impl<T: Copy + Display> ChoiceField<T> {
  pub fn new(label: &'static str, placeholder: &'static str, options: &'static [T]) -> Self {
    Self {
      label,
      placeholder,
      options,
      selected: None,
    }
  }

  pub fn label(&self) -> &'static str {
    self.label
  }

  pub fn value(&self) -> Option<T> {
    self.selected.map(|i| self.options[i])
  }

  pub fn display(&self) -> String {
    match self.value() {
      Some(value) => value.to_string(),
      None => self.placeholder.to_string(),
    }
  }

  pub fn next(&mut self) {
    self.selected = match self.selected {
      None => Some(0),
      Some(i) if i + 1 < self.options.len() => Some(i + 1),
      Some(_) => None,
    };
  }

  pub fn prev(&mut self) {
    self.selected = match self.selected {
      None => Some(self.options.len() - 1),
      Some(0) => None,
      Some(i) => Some(i - 1),
    };
  }

  /// Handle a key. Returns false for keys this field doesn't own.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Right | KeyCode::Char(' ') => {
        self.next();
        true
      }
      KeyCode::Left => {
        self.prev();
        true
      }
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::types::Year;

  fn field() -> ChoiceField<Year> {
    ChoiceField::new("Year", "student is in year", &Year::ALL)
  }

  #[test]
  fn test_starts_unselected() {
    let field = field();
    assert_eq!(field.value(), None);
    assert_eq!(field.display(), "student is in year");
  }

  #[test]
  fn test_next_cycles_through_options_and_back_to_none() {
    let mut field = field();
    field.next();
    assert_eq!(field.value(), Some(Year::Three));
    field.next();
    field.next();
    assert_eq!(field.value(), Some(Year::Five));
    field.next();
    assert_eq!(field.value(), None);
  }

  #[test]
  fn test_prev_wraps_to_last() {
    let mut field = field();
    field.prev();
    assert_eq!(field.value(), Some(Year::Five));
    field.prev();
    assert_eq!(field.value(), Some(Year::Four));
  }

  #[test]
  fn test_display_shows_selection() {
    let mut field = field();
    field.next();
    assert_eq!(field.display(), "Year 3");
  }
}
