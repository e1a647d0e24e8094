//! Input forms and the parsing from typed text to mutator inputs.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

use crate::store::types::{
  NewAttendance, NewFeePayment, NewStudent, StudentId, Weekday, Year,
};
use crate::store::ValidationError;

use super::components::{ChoiceField, TextField};

/// Dates are shown and typed as DD/MM/YYYY throughout.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
  let input = input.trim();
  if input.is_empty() {
    return Err(ValidationError::MissingDate);
  }
  NaiveDate::parse_from_str(input, DATE_FORMAT)
    .map_err(|_| ValidationError::BadDate(input.to_string()))
}

fn parse_amount(input: &str) -> Result<u32, ValidationError> {
  let input = input.trim();
  // An untouched amount field reads as zero, which the mutator then rejects.
  if input.is_empty() {
    return Ok(0);
  }
  input
    .parse::<u32>()
    .map_err(|_| ValidationError::BadAmount(input.to_string()))
}

/// Form for enrolling a new student
#[derive(Debug, Clone)]
pub struct StudentForm {
  pub name: TextField,
  pub year: ChoiceField<Year>,
  pub day: ChoiceField<Weekday>,
  focus: usize,
}

const STUDENT_FIELDS: usize = 3;

impl StudentForm {
  pub fn new() -> Self {
    Self {
      name: TextField::new("Student name"),
      year: ChoiceField::new("Year", "student is in year", &Year::ALL),
      day: ChoiceField::new("Preferred day", "student attends class on", &Weekday::ALL),
      focus: 0,
    }
  }

  pub fn focus(&self) -> usize {
    self.focus
  }

  /// Route a key to the focused field. Tab/arrow keys move focus; returns
  /// false only for keys the form has no use for (Enter, Esc).
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.focus = (self.focus + 1) % STUDENT_FIELDS;
        true
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = (self.focus + STUDENT_FIELDS - 1) % STUDENT_FIELDS;
        true
      }
      _ => match self.focus {
        0 => self.name.handle_key(key),
        1 => self.year.handle_key(key),
        _ => self.day.handle_key(key),
      },
    }
  }

  /// The entered values as a mutator input. Name validation is the
  /// mutator's job, so an empty name passes through here.
  pub fn to_new_student(&self) -> NewStudent {
    NewStudent {
      name: self.name.value().trim().to_string(),
      year: self.year.value(),
      preferred_day: self.day.value(),
    }
  }
}

impl Default for StudentForm {
  fn default() -> Self {
    Self::new()
  }
}

/// Focusable items on the attendance & fee form, in visual order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFocus {
  AttendanceDate,
  MarkPresent,
  FeeDate,
  FeeAmount,
  RecordFee,
}

const RECORD_ORDER: [RecordFocus; 5] = [
  RecordFocus::AttendanceDate,
  RecordFocus::MarkPresent,
  RecordFocus::FeeDate,
  RecordFocus::FeeAmount,
  RecordFocus::RecordFee,
];

/// Form for recording attendance and fee payments for one student
#[derive(Debug, Clone)]
pub struct RecordForm {
  pub attendance_date: TextField,
  pub fee_date: TextField,
  pub fee_amount: TextField,
  focus: usize,
}

impl RecordForm {
  /// Both date fields start prefilled with today
  pub fn new(today: NaiveDate) -> Self {
    Self {
      attendance_date: TextField::with_value("Date (DD/MM/YYYY)", format_date(today)),
      fee_date: TextField::with_value("Payment date (DD/MM/YYYY)", format_date(today)),
      fee_amount: TextField::new("Amount (GBP)"),
      focus: 0,
    }
  }

  pub fn focus(&self) -> RecordFocus {
    RECORD_ORDER[self.focus]
  }

  /// Route a key to the focused item. Enter is left to the caller, which
  /// submits the section the focus is in.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.focus = (self.focus + 1) % RECORD_ORDER.len();
        true
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = (self.focus + RECORD_ORDER.len() - 1) % RECORD_ORDER.len();
        true
      }
      _ => match self.focus() {
        RecordFocus::AttendanceDate => self.attendance_date.handle_key(key),
        RecordFocus::FeeDate => self.fee_date.handle_key(key),
        RecordFocus::FeeAmount => self.fee_amount.handle_key(key),
        RecordFocus::MarkPresent | RecordFocus::RecordFee => false,
      },
    }
  }

  pub fn to_new_attendance(
    &self,
    student_id: StudentId,
  ) -> Result<NewAttendance, ValidationError> {
    let date = parse_date(self.attendance_date.value())?;
    Ok(NewAttendance { student_id, date })
  }

  pub fn to_new_fee_payment(
    &self,
    student_id: StudentId,
  ) -> Result<NewFeePayment, ValidationError> {
    let date = parse_date(self.fee_date.value())?;
    let amount = parse_amount(self.fee_amount.value())?;
    Ok(NewFeePayment {
      student_id,
      date,
      amount,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_str(form: &mut StudentForm, s: &str) {
    for c in s.chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_parse_date_roundtrip() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    assert_eq!(format_date(date), "10/01/2024");
    assert_eq!(parse_date("10/01/2024"), Ok(date));
  }

  #[test]
  fn test_parse_date_rejects_garbage() {
    assert_eq!(parse_date("  "), Err(ValidationError::MissingDate));
    assert_eq!(
      parse_date("2024-01-10"),
      Err(ValidationError::BadDate("2024-01-10".into()))
    );
    assert_eq!(
      parse_date("31/02/2024"),
      Err(ValidationError::BadDate("31/02/2024".into()))
    );
  }

  #[test]
  fn test_parse_amount() {
    assert_eq!(parse_amount("50"), Ok(50));
    assert_eq!(parse_amount(""), Ok(0));
    assert_eq!(parse_amount("fifty"), Err(ValidationError::BadAmount("fifty".into())));
    assert_eq!(parse_amount("-5"), Err(ValidationError::BadAmount("-5".into())));
  }

  #[test]
  fn test_student_form_collects_all_fields() {
    let mut form = StudentForm::new();
    type_str(&mut form, "Alice Smith");

    // Year field: pick the second option
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Right));
    form.handle_key(key(KeyCode::Right));

    // Preferred day: pick Tuesday
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Right));
    form.handle_key(key(KeyCode::Right));

    let new = form.to_new_student();
    assert_eq!(new.name, "Alice Smith");
    assert_eq!(new.year, Some(Year::Four));
    assert_eq!(new.preferred_day, Some(Weekday::Tuesday));
  }

  #[test]
  fn test_student_form_focus_wraps() {
    let mut form = StudentForm::new();
    assert_eq!(form.focus(), 0);
    form.handle_key(key(KeyCode::BackTab));
    assert_eq!(form.focus(), STUDENT_FIELDS - 1);
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focus(), 0);
  }

  #[test]
  fn test_record_form_prefills_today() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let form = RecordForm::new(today);

    let attendance = form.to_new_attendance(StudentId(1)).unwrap();
    assert_eq!(attendance.date, today);
  }

  #[test]
  fn test_record_form_fee_parses_date_and_amount() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let mut form = RecordForm::new(today);

    // Move focus to the amount field and type a value
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focus(), RecordFocus::FeeAmount);
    form.handle_key(key(KeyCode::Char('5')));
    form.handle_key(key(KeyCode::Char('0')));

    let fee = form.to_new_fee_payment(StudentId(1)).unwrap();
    assert_eq!(fee.amount, 50);
    assert_eq!(fee.date, today);
  }

  #[test]
  fn test_record_form_untouched_amount_reads_zero() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let form = RecordForm::new(today);

    let fee = form.to_new_fee_payment(StudentId(1)).unwrap();
    assert_eq!(fee.amount, 0);
  }
}
