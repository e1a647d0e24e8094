use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::store::types::{total_fees, AttendanceRecord, FeePayment, Student};
use crate::ui::forms::format_date;

pub fn draw_student_detail(
  frame: &mut Frame,
  area: Rect,
  student: &Student,
  fees: &[FeePayment],
  attendance: &[AttendanceRecord],
  loading: bool,
) {
  let title = if loading {
    format!(" {} (loading...) ", student.name)
  } else {
    format!(" {} ", student.name)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // Info
      Constraint::Length(2), // Summary
      Constraint::Min(3),    // Histories
      Constraint::Length(1), // Insights
    ])
    .split(inner);

  draw_info(frame, chunks[0], student);
  draw_summary(frame, chunks[1], fees, attendance);
  draw_histories(frame, chunks[2], fees, attendance);
  draw_insights(frame, chunks[3], fees, attendance);
}

fn draw_info(frame: &mut Frame, area: Rect, student: &Student) {
  let year = student
    .year
    .map(|y| y.to_string())
    .unwrap_or_else(|| "-".to_string());
  let day = student
    .preferred_day
    .map(|d| d.to_string())
    .unwrap_or_else(|| "-".to_string());

  let lines = vec![
    Line::from(vec![
      Span::styled("Name          ", Style::default().fg(Color::DarkGray)),
      Span::styled(student.name.as_str(), Style::default().fg(Color::Cyan)),
    ]),
    Line::from(vec![
      Span::styled("Year          ", Style::default().fg(Color::DarkGray)),
      Span::raw(year),
    ]),
    Line::from(vec![
      Span::styled("Preferred day ", Style::default().fg(Color::DarkGray)),
      Span::raw(day),
    ]),
  ];

  frame.render_widget(Paragraph::new(lines), area);
}

fn draw_summary(frame: &mut Frame, area: Rect, fees: &[FeePayment], attendance: &[AttendanceRecord]) {
  let line = Line::from(vec![
    Span::styled("Total fees paid ", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!("£{}", total_fees(fees)),
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ),
    Span::styled(
      format!(" ({} payments)", fees.len()),
      Style::default().fg(Color::DarkGray),
    ),
    Span::raw("    "),
    Span::styled("Classes attended ", Style::default().fg(Color::DarkGray)),
    Span::styled(
      attendance.len().to_string(),
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ),
  ]);

  frame.render_widget(Paragraph::new(line), area);
}

fn draw_histories(
  frame: &mut Frame,
  area: Rect,
  fees: &[FeePayment],
  attendance: &[AttendanceRecord],
) {
  let columns = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  // Fee payment history, newest first
  let fee_block = Block::default()
    .title(" Fee Payment History ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if fees.is_empty() {
    frame.render_widget(
      Paragraph::new("No fee payments recorded yet.")
        .block(fee_block)
        .style(Style::default().fg(Color::DarkGray)),
      columns[0],
    );
  } else {
    let rows: Vec<Row> = fees
      .iter()
      .map(|fee| Row::new(vec![format_date(fee.date), format!("£{}", fee.amount)]))
      .collect();
    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(6)])
      .header(Row::new(vec!["Date", "Amount"]).style(Style::default().fg(Color::DarkGray)))
      .block(fee_block);
    frame.render_widget(table, columns[0]);
  }

  // Attendance history, newest first
  let attendance_block = Block::default()
    .title(" Attendance History ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if attendance.is_empty() {
    frame.render_widget(
      Paragraph::new("No attendance records yet.")
        .block(attendance_block)
        .style(Style::default().fg(Color::DarkGray)),
      columns[1],
    );
  } else {
    let rows: Vec<Row> = attendance
      .iter()
      .map(|record| {
        Row::new(vec![
          format_date(record.date),
          record.date.format("%A").to_string(),
        ])
      })
      .collect();
    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(9)])
      .header(Row::new(vec!["Date", "Day"]).style(Style::default().fg(Color::DarkGray)))
      .block(attendance_block);
    frame.render_widget(table, columns[1]);
  }
}

fn draw_insights(
  frame: &mut Frame,
  area: Rect,
  fees: &[FeePayment],
  attendance: &[AttendanceRecord],
) {
  // Histories are newest-first, so the first entry is the latest
  let (Some(last_class), Some(last_payment)) = (attendance.first(), fees.first()) else {
    return;
  };

  let line = Line::from(vec![
    Span::styled("Last attended ", Style::default().fg(Color::DarkGray)),
    Span::raw(format_date(last_class.date)),
    Span::raw("    "),
    Span::styled("Last payment ", Style::default().fg(Color::DarkGray)),
    Span::raw(format_date(last_payment.date)),
  ]);

  frame.render_widget(Paragraph::new(line), area);
}
