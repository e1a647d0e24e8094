use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValidationError;

/// Opaque row identity assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl fmt::Display for StudentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Year groups the business teaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Year {
  Three,
  Four,
  Five,
}

impl Year {
  pub const ALL: [Year; 3] = [Year::Three, Year::Four, Year::Five];

  pub fn number(self) -> u8 {
    match self {
      Year::Three => 3,
      Year::Four => 4,
      Year::Five => 5,
    }
  }
}

impl TryFrom<u8> for Year {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      3 => Ok(Year::Three),
      4 => Ok(Year::Four),
      5 => Ok(Year::Five),
      other => Err(format!("unknown year group: {}", other)),
    }
  }
}

impl From<Year> for u8 {
  fn from(year: Year) -> Self {
    year.number()
  }
}

impl fmt::Display for Year {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Year {}", self.number())
  }
}

/// Day of the week a student prefers to attend.
///
/// The store holds full English day names, which the serde variant names
/// match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weekday {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl Weekday {
  pub const ALL: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Weekday::Monday => "Monday",
      Weekday::Tuesday => "Tuesday",
      Weekday::Wednesday => "Wednesday",
      Weekday::Thursday => "Thursday",
      Weekday::Friday => "Friday",
      Weekday::Saturday => "Saturday",
      Weekday::Sunday => "Sunday",
    }
  }
}

impl fmt::Display for Weekday {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// An enrolled student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
  pub id: StudentId,
  #[serde(rename = "student_name")]
  pub name: String,
  pub year: Option<Year>,
  pub preferred_day: Option<Weekday>,
}

/// One attended class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub student_id: StudentId,
  #[serde(rename = "class_attended_date")]
  pub date: NaiveDate,
}

/// One fee payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeePayment {
  pub student_id: StudentId,
  #[serde(rename = "date_paid")]
  pub date: NaiveDate,
  #[serde(rename = "fee_amount")]
  pub amount: u32,
}

/// Total paid across a fee history.
pub fn total_fees(fees: &[FeePayment]) -> u64 {
  fees.iter().map(|fee| u64::from(fee.amount)).sum()
}

/// Input for enrolling a student.
#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
  #[serde(rename = "student_name")]
  pub name: String,
  pub year: Option<Year>,
  pub preferred_day: Option<Weekday>,
}

impl NewStudent {
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.name.trim().is_empty() {
      return Err(ValidationError::EmptyName);
    }
    Ok(())
  }
}

/// Input for marking a class as attended.
#[derive(Debug, Clone, Serialize)]
pub struct NewAttendance {
  pub student_id: StudentId,
  #[serde(rename = "class_attended_date")]
  pub date: NaiveDate,
}

/// Input for recording a fee payment.
#[derive(Debug, Clone, Serialize)]
pub struct NewFeePayment {
  pub student_id: StudentId,
  #[serde(rename = "date_paid")]
  pub date: NaiveDate,
  #[serde(rename = "fee_amount")]
  pub amount: u32,
}

impl NewFeePayment {
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.amount == 0 {
      return Err(ValidationError::NonPositiveAmount);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_student_wire_mapping() {
    let row = r#"{"id": 7, "student_name": "Alice Smith", "year": 4, "preferred_day": "Tuesday"}"#;
    let student: Student = serde_json::from_str(row).unwrap();

    assert_eq!(student.id, StudentId(7));
    assert_eq!(student.name, "Alice Smith");
    assert_eq!(student.year, Some(Year::Four));
    assert_eq!(student.preferred_day, Some(Weekday::Tuesday));
  }

  #[test]
  fn test_student_optional_fields_may_be_null() {
    let row = r#"{"id": 2, "student_name": "Bo", "year": null, "preferred_day": null}"#;
    let student: Student = serde_json::from_str(row).unwrap();

    assert_eq!(student.year, None);
    assert_eq!(student.preferred_day, None);
  }

  #[test]
  fn test_unknown_year_group_is_rejected() {
    let row = r#"{"id": 2, "student_name": "Bo", "year": 9, "preferred_day": null}"#;
    assert!(serde_json::from_str::<Student>(row).is_err());
  }

  #[test]
  fn test_fee_payment_wire_mapping() {
    let row = r#"{"student_id": 7, "date_paid": "2024-01-10", "fee_amount": 50}"#;
    let fee: FeePayment = serde_json::from_str(row).unwrap();

    assert_eq!(fee.student_id, StudentId(7));
    assert_eq!(fee.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    assert_eq!(fee.amount, 50);
  }

  #[test]
  fn test_new_student_insert_body() {
    let new = NewStudent {
      name: "Alice Smith".into(),
      year: Some(Year::Four),
      preferred_day: Some(Weekday::Tuesday),
    };
    let body = serde_json::to_value(&new).unwrap();

    assert_eq!(
      body,
      serde_json::json!({
        "student_name": "Alice Smith",
        "year": 4,
        "preferred_day": "Tuesday"
      })
    );
  }

  #[test]
  fn test_new_attendance_insert_body() {
    let new = NewAttendance {
      student_id: StudentId(7),
      date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    };
    let body = serde_json::to_value(&new).unwrap();

    assert_eq!(
      body,
      serde_json::json!({
        "student_id": 7,
        "class_attended_date": "2024-01-10"
      })
    );
  }

  #[test]
  fn test_empty_name_fails_validation() {
    let new = NewStudent {
      name: "   ".into(),
      year: None,
      preferred_day: None,
    };
    assert_eq!(new.validate(), Err(ValidationError::EmptyName));
  }

  #[test]
  fn test_fee_amount_boundary() {
    let mut new = NewFeePayment {
      student_id: StudentId(1),
      date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
      amount: 0,
    };
    assert_eq!(new.validate(), Err(ValidationError::NonPositiveAmount));

    new.amount = 1;
    assert_eq!(new.validate(), Ok(()));
  }

  #[test]
  fn test_total_fees_sums_amounts() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let fees = vec![
      FeePayment {
        student_id: StudentId(1),
        date,
        amount: 50,
      },
      FeePayment {
        student_id: StudentId(1),
        date,
        amount: 25,
      },
    ];

    assert_eq!(total_fees(&fees), 75);
    assert_eq!(total_fees(&[]), 0);
  }
}
