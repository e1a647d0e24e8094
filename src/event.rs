use chrono::NaiveDate;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::store::types::{AttendanceRecord, FeePayment, Student};

/// Results coming back from store tasks
#[derive(Debug)]
pub enum StoreEvent {
  StudentsLoaded(Vec<Student>),
  DetailLoaded {
    student: Student,
    fees: Vec<FeePayment>,
    attendance: Vec<AttendanceRecord>,
  },
  StudentAdded {
    name: String,
  },
  AttendanceMarked {
    name: String,
    date: NaiveDate,
  },
  FeeRecorded {
    name: String,
    amount: u32,
    date: NaiveDate,
  },
}

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh
  Tick,
  /// A store operation completed
  Store(StoreEvent),
  /// Recoverable input problem, shown as an inline warning
  Warning(String),
  /// A store operation failed; generic message only, detail is in the log
  Failure(String),
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
  tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        if event::poll(tick_rate).unwrap_or(false) {
          if let Ok(CrosstermEvent::Key(key)) = event::read() {
            if input_tx.send(Event::Key(key)).is_err() {
              break;
            }
          }
        } else {
          // Tick
          if input_tx.send(Event::Tick).is_err() {
            break;
          }
        }
      }
    });

    Self { rx, tx }
  }

  /// Sender for async store tasks to report back on
  pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
    self.tx.clone()
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
