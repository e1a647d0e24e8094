use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::store::types::Student;
use crate::ui::forms::{RecordForm, RecordFocus};

use super::add_student::field_line;

pub fn draw_record(frame: &mut Frame, area: Rect, student: &Student, form: &RecordForm) {
  let block = Block::default()
    .title(format!(" Attendance & Fee: {} ", student.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let focus = form.focus();
  let lines = vec![
    Line::from(Span::styled(
      "Record Attendance",
      Style::default().add_modifier(Modifier::BOLD),
    )),
    field_line(
      form.attendance_date.label(),
      form.attendance_date.value(),
      Some(form.attendance_date.cursor()),
      focus == RecordFocus::AttendanceDate,
    ),
    button_line("Mark Present", focus == RecordFocus::MarkPresent),
    Line::default(),
    Line::from(Span::styled(
      "Record Fee Payment",
      Style::default().add_modifier(Modifier::BOLD),
    )),
    field_line(
      form.fee_date.label(),
      form.fee_date.value(),
      Some(form.fee_date.cursor()),
      focus == RecordFocus::FeeDate,
    ),
    field_line(
      form.fee_amount.label(),
      form.fee_amount.value(),
      Some(form.fee_amount.cursor()),
      focus == RecordFocus::FeeAmount,
    ),
    button_line("Record Fee", focus == RecordFocus::RecordFee),
    Line::default(),
    Line::from(Span::styled(
      "Tab:next field  Enter:submit section  Esc:back",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  frame.render_widget(Paragraph::new(lines), inner);
}

fn button_line(label: &str, focused: bool) -> Line<'static> {
  let style = if focused {
    Style::default()
      .fg(Color::Black)
      .bg(Color::Yellow)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Yellow)
  };
  Line::from(vec![
    Span::raw("  "),
    Span::styled(format!("[ {} ]", label), style),
  ])
}
