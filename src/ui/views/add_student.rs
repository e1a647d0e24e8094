use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::forms::StudentForm;

pub fn draw_add_student(frame: &mut Frame, area: Rect, form: &StudentForm) {
  let block = Block::default()
    .title(" Add New Student ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let focused = form.focus();
  let lines = vec![
    field_line(
      form.name.label(),
      form.name.value(),
      Some(form.name.cursor()),
      focused == 0,
    ),
    Line::default(),
    field_line(form.year.label(), &form.year.display(), None, focused == 1),
    Line::default(),
    field_line(form.day.label(), &form.day.display(), None, focused == 2),
    Line::default(),
    Line::from(Span::styled(
      "Tab:next field  ←/→:choose  Enter:add student  Esc:back",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  frame.render_widget(Paragraph::new(lines), inner);
}

/// One "Label  value" line; the focused field is highlighted, and focused
/// text fields show the cursor at its byte offset.
pub fn field_line(label: &str, value: &str, cursor: Option<usize>, focused: bool) -> Line<'static> {
  let label_style = if focused {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let value_style = if focused {
    Style::default().fg(Color::White)
  } else {
    Style::default().fg(Color::Gray)
  };

  let mut spans = vec![Span::styled(format!("{:<22}", label), label_style)];
  match cursor {
    Some(at) if focused => {
      spans.push(Span::styled(value[..at].to_string(), value_style));
      spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
      spans.push(Span::styled(value[at..].to_string(), value_style));
    }
    _ => spans.push(Span::styled(value.to_string(), value_style)),
  }
  Line::from(spans)
}
