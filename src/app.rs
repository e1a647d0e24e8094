use crate::commands;
use crate::config::Config;
use crate::event::{Event, EventHandler, StoreEvent};
use crate::store::types::{AttendanceRecord, FeePayment, Student};
use crate::store::{CachedStoreClient, RecordError, StoreClient};
use crate::ui;
use crate::ui::forms::{format_date, RecordFocus, RecordForm, StudentForm};
use crate::ui::views::students::matches_filter;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
  Search,
}

/// Outcome banner shown in the status bar until the next action
#[derive(Debug, Clone)]
pub enum Banner {
  Success(String),
  Warning(String),
  Error(String),
}

/// View state - each variant owns its data
#[derive(Debug)]
pub enum ViewState {
  /// Root view, always at index 0
  StudentList {
    students: Vec<Student>,
    selected: usize,
    loading: bool,
  },

  // Views pushed on top of the list
  StudentDetail {
    student: Student,
    fees: Vec<FeePayment>,
    attendance: Vec<AttendanceRecord>,
    loading: bool,
  },
  AddStudent {
    form: StudentForm,
  },
  Record {
    student: Student,
    form: RecordForm,
  },
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<ViewState>,

  /// Current input mode
  mode: Mode,

  /// Command input buffer (after pressing :)
  command_input: String,

  /// Student list filter (after pressing /)
  search_filter: String,

  /// Outcome of the last operation, if any
  banner: Option<Banner>,

  /// Header title
  title: String,

  /// Store access with the read cache in front
  store: CachedStoreClient<StoreClient>,

  /// Event sender for async store tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let client = StoreClient::new(&config)?;
    let store = CachedStoreClient::new(client);
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self {
      view_stack: vec![ViewState::StudentList {
        students: Vec::new(),
        selected: 0,
        loading: true,
      }],
      mode: Mode::Normal,
      command_input: String::new(),
      search_filter: String::new(),
      banner: None,
      title: config.display_title(),
      store,
      event_tx: tx,
      should_quit: false,
    })
  }

  pub fn current_view(&self) -> Option<&ViewState> {
    self.view_stack.last()
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn command_input(&self) -> &str {
    &self.command_input
  }

  pub fn search_filter(&self) -> &str {
    &self.search_filter
  }

  pub fn banner(&self) -> Option<&Banner> {
    self.banner.as_ref()
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  /// Students visible under the current filter
  pub fn visible_students<'a>(&self, students: &'a [Student]) -> Vec<&'a Student> {
    students
      .iter()
      .filter(|s| matches_filter(s, &self.search_filter))
      .collect()
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    // Initial data load
    self.load_students();

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      if let Some(event) = events.next().await {
        self.handle_event(event);
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Store(store_event) => self.handle_store_event(store_event),
      Event::Warning(message) => {
        self.banner = Some(Banner::Warning(message));
      }
      Event::Failure(message) => {
        self.banner = Some(Banner::Error(message));
      }
    }
  }

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
      Mode::Search => self.handle_search_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // Form views own the keyboard while open
    match self.view_stack.last_mut() {
      Some(ViewState::AddStudent { form }) => {
        match key.code {
          KeyCode::Esc => {
            self.view_stack.pop();
          }
          KeyCode::Enter => self.submit_add_student(),
          _ => {
            form.handle_key(key);
          }
        }
        return;
      }
      Some(ViewState::Record { form, .. }) => {
        match key.code {
          KeyCode::Esc => {
            self.view_stack.pop();
          }
          KeyCode::Enter => match form.focus() {
            RecordFocus::AttendanceDate | RecordFocus::MarkPresent => self.submit_attendance(),
            RecordFocus::FeeDate | RecordFocus::FeeAmount | RecordFocus::RecordFee => {
              self.submit_fee()
            }
          },
          _ => {
            form.handle_key(key);
          }
        }
        return;
      }
      _ => {}
    }

    match key.code {
      // Quit / back
      KeyCode::Char('q') | KeyCode::Esc => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else if key.code == KeyCode::Char('q') {
          self.should_quit = true;
        }
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
      KeyCode::Enter => self.open_selected_detail(),

      // Actions
      KeyCode::Char('a') => {
        self.banner = None;
        self.view_stack.push(ViewState::AddStudent {
          form: StudentForm::new(),
        });
      }
      KeyCode::Char('r') => self.open_record_for_current(),

      // Mode switches
      KeyCode::Char(':') => {
        self.mode = Mode::Command;
        self.command_input.clear();
      }
      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.search_filter.clear();
      }

      _ => {}
    }
  }

  fn handle_command_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.command_input.clear();
      }
      KeyCode::Enter => {
        self.execute_command();
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.command_input.pop();
      }
      KeyCode::Char(c) => {
        self.command_input.push(c);
      }
      _ => {}
    }
  }

  fn handle_search_mode_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        self.search_filter.clear();
      }
      KeyCode::Enter => {
        // Apply filter and return to normal mode
        self.mode = Mode::Normal;
        self.clamp_selection();
      }
      KeyCode::Backspace => {
        self.search_filter.pop();
      }
      KeyCode::Char(c) => {
        self.search_filter.push(c);
      }
      _ => {}
    }
  }

  fn execute_command(&mut self) {
    let suggestions = commands::get_suggestions(&self.command_input);
    let cmd = suggestions
      .first()
      .map(|c| c.name.to_string())
      .unwrap_or_else(|| self.command_input.trim().to_lowercase());

    match cmd.as_str() {
      "students" => {
        self.view_stack.truncate(1);
        self.search_filter.clear();
        self.load_students();
      }
      "add" => {
        self.banner = None;
        self.view_stack.push(ViewState::AddStudent {
          form: StudentForm::new(),
        });
      }
      "quit" => {
        self.should_quit = true;
      }
      _ => {
        self.banner = Some(Banner::Warning(format!("Unknown command: {}", cmd)));
      }
    }
    self.command_input.clear();
  }

  /// The student under the cursor, honoring the filter
  fn selected_student(&self) -> Option<Student> {
    if let Some(ViewState::StudentList {
      students, selected, ..
    }) = self.view_stack.first()
    {
      let visible = self.visible_students(students);
      visible.get(*selected).map(|s| (*s).clone())
    } else {
      None
    }
  }

  fn move_selection(&mut self, delta: i32) {
    let visible_len = match self.view_stack.first() {
      Some(ViewState::StudentList { students, .. }) => self.visible_students(students).len(),
      _ => return,
    };
    if let Some(ViewState::StudentList { selected, .. }) = self.view_stack.last_mut() {
      if visible_len > 0 {
        *selected = (*selected as i32 + delta).rem_euclid(visible_len as i32) as usize;
      }
    }
  }

  fn clamp_selection(&mut self) {
    let visible_len = match self.view_stack.first() {
      Some(ViewState::StudentList { students, .. }) => self.visible_students(students).len(),
      _ => return,
    };
    if let Some(ViewState::StudentList { selected, .. }) = self.view_stack.last_mut() {
      *selected = (*selected).min(visible_len.saturating_sub(1));
    }
  }

  fn open_selected_detail(&mut self) {
    if !matches!(self.view_stack.last(), Some(ViewState::StudentList { .. })) {
      return;
    }
    let Some(student) = self.selected_student() else {
      return;
    };
    self.banner = None;
    self.view_stack.push(ViewState::StudentDetail {
      student: student.clone(),
      fees: Vec::new(),
      attendance: Vec::new(),
      loading: true,
    });
    self.load_detail(student);
  }

  fn open_record_for_current(&mut self) {
    // From the detail view record for that student, otherwise for the
    // list selection
    let student = match self.view_stack.last() {
      Some(ViewState::StudentDetail { student, .. }) => Some(student.clone()),
      _ => self.selected_student(),
    };
    let Some(student) = student else {
      self.banner = Some(Banner::Warning(
        "No students found. Please add students first.".to_string(),
      ));
      return;
    };

    self.banner = None;
    let today = chrono::Local::now().date_naive();
    self.view_stack.push(ViewState::Record {
      student,
      form: RecordForm::new(today),
    });
  }

  // ----- store tasks -----

  fn load_students(&mut self) {
    if let Some(ViewState::StudentList { loading, .. }) = self.view_stack.first_mut() {
      *loading = true;
    }

    let store = self.store.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      match store.list_students().await {
        Ok(students) => {
          let _ = tx.send(Event::Store(StoreEvent::StudentsLoaded(students)));
        }
        Err(e) => {
          tracing::error!(error = %e, "Error fetching students");
          let _ = tx.send(Event::Failure(
            "Something went wrong while fetching students".to_string(),
          ));
        }
      }
    });
  }

  fn load_detail(&self, student: Student) {
    let store = self.store.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let loaded = async {
        let student = store.fetch_student(student.id).await?;
        let fees = store.fees_for_student(student.id).await?;
        let attendance = store.attendance_for_student(student.id).await?;
        Ok::<_, crate::store::StoreError>((student, fees, attendance))
      }
      .await;

      match loaded {
        Ok((student, fees, attendance)) => {
          let _ = tx.send(Event::Store(StoreEvent::DetailLoaded {
            student,
            fees,
            attendance,
          }));
        }
        Err(e) => {
          tracing::error!(error = %e, student_id = %student.id, "Error loading student details");
          let _ = tx.send(Event::Failure("Error loading student details.".to_string()));
        }
      }
    });
  }

  fn submit_add_student(&mut self) {
    let Some(ViewState::AddStudent { form }) = self.view_stack.last() else {
      return;
    };
    let new = form.to_new_student();
    let name = new.name.clone();

    let store = self.store.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      match store.add_student(new).await {
        Ok(()) => {
          let _ = tx.send(Event::Store(StoreEvent::StudentAdded { name }));
        }
        Err(RecordError::Invalid(e)) => {
          let _ = tx.send(Event::Warning(e.to_string()));
        }
        Err(RecordError::Store(e)) => {
          tracing::error!(error = %e, "Error adding student");
          let _ = tx.send(Event::Failure("Error adding student.".to_string()));
        }
      }
    });
  }

  fn submit_attendance(&mut self) {
    let Some(ViewState::Record { student, form }) = self.view_stack.last() else {
      return;
    };
    let new = match form.to_new_attendance(student.id) {
      Ok(new) => new,
      Err(e) => {
        self.banner = Some(Banner::Warning(e.to_string()));
        return;
      }
    };
    let name = student.name.clone();

    let store = self.store.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let date = new.date;
      match store.record_attendance(new).await {
        Ok(()) => {
          let _ = tx.send(Event::Store(StoreEvent::AttendanceMarked { name, date }));
        }
        Err(RecordError::Invalid(e)) => {
          let _ = tx.send(Event::Warning(e.to_string()));
        }
        Err(RecordError::Store(e)) => {
          tracing::error!(error = %e, "Error marking attendance");
          let _ = tx.send(Event::Failure("Error marking attendance.".to_string()));
        }
      }
    });
  }

  fn submit_fee(&mut self) {
    let Some(ViewState::Record { student, form }) = self.view_stack.last() else {
      return;
    };
    let new = match form.to_new_fee_payment(student.id) {
      Ok(new) => new,
      Err(e) => {
        self.banner = Some(Banner::Warning(e.to_string()));
        return;
      }
    };
    let name = student.name.clone();

    let store = self.store.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let date = new.date;
      let amount = new.amount;
      match store.record_fee_payment(new).await {
        Ok(()) => {
          let _ = tx.send(Event::Store(StoreEvent::FeeRecorded { name, amount, date }));
        }
        Err(RecordError::Invalid(e)) => {
          let _ = tx.send(Event::Warning(e.to_string()));
        }
        Err(RecordError::Store(e)) => {
          tracing::error!(error = %e, "Error recording fee payment");
          let _ = tx.send(Event::Failure("Error recording fee payment.".to_string()));
        }
      }
    });
  }

  fn handle_store_event(&mut self, event: StoreEvent) {
    match event {
      StoreEvent::StudentsLoaded(students) => {
        if let Some(ViewState::StudentList {
          students: ref mut list,
          loading,
          ..
        }) = self.view_stack.first_mut()
        {
          *list = students;
          *loading = false;
        }
        self.clamp_selection();
      }
      StoreEvent::DetailLoaded {
        student,
        fees,
        attendance,
      } => {
        if let Some(ViewState::StudentDetail {
          student: ref mut current,
          fees: ref mut fee_list,
          attendance: ref mut attendance_list,
          loading,
        }) = self.view_stack.last_mut()
        {
          if current.id == student.id {
            *current = student;
            *fee_list = fees;
            *attendance_list = attendance;
            *loading = false;
          }
        }
      }
      StoreEvent::StudentAdded { name } => {
        self.banner = Some(Banner::Success(format!(
          "Student '{}' added successfully!",
          name
        )));
        // Back to the list and reload it in full
        self.view_stack.truncate(1);
        self.load_students();
      }
      StoreEvent::AttendanceMarked { name, date } => {
        self.banner = Some(Banner::Success(format!(
          "Attendance marked for {} on {}",
          name,
          format_date(date)
        )));
        self.load_students();
      }
      StoreEvent::FeeRecorded { name, amount, date } => {
        self.banner = Some(Banner::Success(format!(
          "Fee payment of £{} recorded for {} on {}",
          amount,
          name,
          format_date(date)
        )));
        self.load_students();
      }
    }
  }
}
