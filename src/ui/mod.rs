mod components;
pub mod forms;
pub mod views;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{App, Banner, Mode, ViewState};
use crate::commands;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app);

  // Draw current view
  if let Some(view) = app.current_view() {
    match view {
      ViewState::StudentList {
        students,
        selected,
        loading,
      } => {
        let visible = app.visible_students(students);
        views::students::draw_student_list(
          frame,
          chunks[1],
          &visible,
          *selected,
          app.search_filter(),
          *loading,
        );
      }
      ViewState::StudentDetail {
        student,
        fees,
        attendance,
        loading,
      } => {
        views::student_detail::draw_student_detail(
          frame,
          chunks[1],
          student,
          fees,
          attendance,
          *loading,
        );
      }
      ViewState::AddStudent { form } => {
        views::add_student::draw_add_student(frame, chunks[1], form);
      }
      ViewState::Record { student, form } => {
        views::record::draw_record(frame, chunks[1], student, form);
      }
    }
  }

  draw_status_bar(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let line = Line::from(vec![
    Span::styled(
      " tutordesk ",
      Style::default().fg(Color::Black).bg(Color::Blue),
    ),
    Span::raw(" "),
    Span::styled(app.title(), Style::default().fg(Color::DarkGray)),
  ]);
  frame.render_widget(Paragraph::new(line), area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.mode() {
    Mode::Command => {
      let suggestions = commands::get_suggestions(app.command_input());
      let hint = match suggestions.first() {
        Some(first) => {
          let names = suggestions.iter().map(|c| c.name).collect::<Vec<_>>().join(" ");
          format!("{}  ({})", names, first.description)
        }
        None => String::new(),
      };
      (
        format!(":{}  {}", app.command_input(), hint),
        Style::default().fg(Color::Yellow),
      )
    }
    Mode::Search => (
      format!("/{}", app.search_filter()),
      Style::default().fg(Color::Cyan),
    ),
    Mode::Normal => match app.banner() {
      Some(Banner::Success(text)) => (format!(" ✓ {}", text), Style::default().fg(Color::Green)),
      Some(Banner::Warning(text)) => (format!(" ! {}", text), Style::default().fg(Color::Yellow)),
      Some(Banner::Error(text)) => (format!(" ✗ {}", text), Style::default().fg(Color::Red)),
      None => (
        " :command  /search  j/k:nav  Enter:open  a:add  r:record  q:back  Ctrl-C:quit".to_string(),
        Style::default().fg(Color::DarkGray),
      ),
    },
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
