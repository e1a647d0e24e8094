use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::store::types::Student;

/// Case-insensitive name filter used by the `/` search
pub fn matches_filter(student: &Student, filter: &str) -> bool {
  filter.is_empty() || student.name.to_lowercase().contains(&filter.to_lowercase())
}

pub fn draw_student_list(
  frame: &mut Frame,
  area: Rect,
  students: &[&Student],
  selected: usize,
  filter: &str,
  loading: bool,
) {
  let title = if loading {
    " Students (loading...) ".to_string()
  } else if filter.is_empty() {
    format!(" Students ({}) ", students.len())
  } else {
    format!(" Students ({}) /{} ", students.len(), filter)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if students.is_empty() && !loading {
    let content = if filter.is_empty() {
      "No students found. Press 'a' to add one."
    } else {
      "No students match the filter."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = students
    .iter()
    .map(|student| {
      let year = student
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
      let day = student
        .preferred_day
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());

      let line = Line::from(vec![
        Span::styled(
          format!("{:<28}", truncate(&student.name, 28)),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(format!("{:<8}", year), Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(day, Style::default().fg(Color::DarkGray)),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);
}

fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::types::StudentId;

  fn student(name: &str) -> Student {
    Student {
      id: StudentId(1),
      name: name.into(),
      year: None,
      preferred_day: None,
    }
  }

  #[test]
  fn test_empty_filter_matches_everyone() {
    assert!(matches_filter(&student("Alice"), ""));
  }

  #[test]
  fn test_filter_is_case_insensitive() {
    assert!(matches_filter(&student("Alice Smith"), "smith"));
    assert!(!matches_filter(&student("Alice Smith"), "jones"));
  }
}
