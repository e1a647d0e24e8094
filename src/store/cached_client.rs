//! Store client with the read cache and validation rules layered on top.
//!
//! This is the surface the views call. Reads of the student list go through
//! the cache; every successful write invalidates it before returning, so the
//! next list read hits the store.

use crate::cache::ReadCache;

use super::error::{RecordError, StoreError};
use super::types::{
  AttendanceRecord, FeePayment, NewAttendance, NewFeePayment, NewStudent, Student, StudentId,
};
use super::StoreBackend;

/// Cache key for the student list query. The query takes no parameters, so
/// this is the cache's only resident entry.
const STUDENT_LIST_KEY: &str = "student:list";

#[derive(Clone)]
pub struct CachedStoreClient<S> {
  inner: S,
  students: ReadCache<Student>,
}

impl<S: StoreBackend> CachedStoreClient<S> {
  pub fn new(inner: S) -> Self {
    Self {
      inner,
      students: ReadCache::new(),
    }
  }

  /// All students, ordered by name ascending. Served from cache when fresh.
  pub async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
    self
      .students
      .fetch(STUDENT_LIST_KEY, || async {
        self.inner.fetch_students().await
      })
      .await
  }

  /// A single student by id. `StoreError::NoRows` when the id is unknown.
  pub async fn fetch_student(&self, id: StudentId) -> Result<Student, StoreError> {
    self.inner.fetch_student(id).await
  }

  /// Fee history for a student, newest payment first.
  pub async fn fees_for_student(&self, id: StudentId) -> Result<Vec<FeePayment>, StoreError> {
    self.inner.fetch_student_fees(id).await
  }

  /// Attendance history for a student, newest class first.
  pub async fn attendance_for_student(
    &self,
    id: StudentId,
  ) -> Result<Vec<AttendanceRecord>, StoreError> {
    self.inner.fetch_student_attendance(id).await
  }

  /// Enroll a student. The name is checked locally before any store call;
  /// the cache is only invalidated once the insert went through.
  pub async fn add_student(&self, new: NewStudent) -> Result<(), RecordError> {
    new.validate()?;
    self.inner.insert_student(&new).await?;
    self.students.invalidate(STUDENT_LIST_KEY);
    Ok(())
  }

  /// Mark a class as attended. Attendance does not change the student list,
  /// but writes invalidate it anyway; the policy is deliberately broad.
  pub async fn record_attendance(&self, new: NewAttendance) -> Result<(), RecordError> {
    self.inner.insert_attendance(&new).await?;
    self.students.invalidate(STUDENT_LIST_KEY);
    Ok(())
  }

  /// Record a fee payment. Rejects a non-positive amount before any store
  /// call.
  pub async fn record_fee_payment(&self, new: NewFeePayment) -> Result<(), RecordError> {
    new.validate()?;
    self.inner.insert_fee(&new).await?;
    self.students.invalidate(STUDENT_LIST_KEY);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::types::{Weekday, Year};
  use crate::store::ValidationError;
  use chrono::NaiveDate;
  use std::sync::{Arc, Mutex};

  /// In-memory stand-in for the remote store. Mimics its ordering contracts
  /// (students by name, histories newest-first) and counts calls so tests
  /// can observe caching behavior.
  #[derive(Clone, Default)]
  struct MemoryBackend {
    state: Arc<Mutex<State>>,
  }

  #[derive(Default)]
  struct State {
    students: Vec<Student>,
    fees: Vec<FeePayment>,
    attendance: Vec<AttendanceRecord>,
    next_id: i64,
    student_fetches: usize,
    inserts: usize,
    fail_reads: bool,
    fail_writes: bool,
  }

  impl MemoryBackend {
    fn student_fetches(&self) -> usize {
      self.state.lock().unwrap().student_fetches
    }

    fn inserts(&self) -> usize {
      self.state.lock().unwrap().inserts
    }

    fn set_fail_reads(&self, fail: bool) {
      self.state.lock().unwrap().fail_reads = fail;
    }

    fn set_fail_writes(&self, fail: bool) {
      self.state.lock().unwrap().fail_writes = fail;
    }
  }

  impl StoreBackend for MemoryBackend {
    async fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
      let mut state = self.state.lock().unwrap();
      state.student_fetches += 1;
      if state.fail_reads {
        return Err(StoreError::Unreachable("connection refused".into()));
      }
      let mut students = state.students.clone();
      students.sort_by(|a, b| a.name.cmp(&b.name));
      Ok(students)
    }

    async fn fetch_student(&self, id: StudentId) -> Result<Student, StoreError> {
      let state = self.state.lock().unwrap();
      if state.fail_reads {
        return Err(StoreError::Unreachable("connection refused".into()));
      }
      state
        .students
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or(StoreError::NoRows)
    }

    async fn fetch_student_fees(&self, id: StudentId) -> Result<Vec<FeePayment>, StoreError> {
      let state = self.state.lock().unwrap();
      if state.fail_reads {
        return Err(StoreError::Unreachable("connection refused".into()));
      }
      let mut fees: Vec<FeePayment> = state
        .fees
        .iter()
        .filter(|f| f.student_id == id)
        .cloned()
        .collect();
      fees.sort_by(|a, b| b.date.cmp(&a.date));
      Ok(fees)
    }

    async fn fetch_student_attendance(
      &self,
      id: StudentId,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
      let state = self.state.lock().unwrap();
      if state.fail_reads {
        return Err(StoreError::Unreachable("connection refused".into()));
      }
      let mut records: Vec<AttendanceRecord> = state
        .attendance
        .iter()
        .filter(|a| a.student_id == id)
        .cloned()
        .collect();
      records.sort_by(|a, b| b.date.cmp(&a.date));
      Ok(records)
    }

    async fn insert_student(&self, new: &NewStudent) -> Result<(), StoreError> {
      let mut state = self.state.lock().unwrap();
      state.inserts += 1;
      if state.fail_writes {
        return Err(StoreError::Rejected {
          status: 500,
          body: "insert failed".into(),
        });
      }
      state.next_id += 1;
      let id = StudentId(state.next_id);
      state.students.push(Student {
        id,
        name: new.name.clone(),
        year: new.year,
        preferred_day: new.preferred_day,
      });
      Ok(())
    }

    async fn insert_attendance(&self, new: &NewAttendance) -> Result<(), StoreError> {
      let mut state = self.state.lock().unwrap();
      state.inserts += 1;
      if state.fail_writes {
        return Err(StoreError::Rejected {
          status: 500,
          body: "insert failed".into(),
        });
      }
      state.attendance.push(AttendanceRecord {
        student_id: new.student_id,
        date: new.date,
      });
      Ok(())
    }

    async fn insert_fee(&self, new: &NewFeePayment) -> Result<(), StoreError> {
      let mut state = self.state.lock().unwrap();
      state.inserts += 1;
      if state.fail_writes {
        return Err(StoreError::Rejected {
          status: 500,
          body: "insert failed".into(),
        });
      }
      state.fees.push(FeePayment {
        student_id: new.student_id,
        date: new.date,
        amount: new.amount,
      });
      Ok(())
    }
  }

  fn client() -> (CachedStoreClient<MemoryBackend>, MemoryBackend) {
    let backend = MemoryBackend::default();
    (CachedStoreClient::new(backend.clone()), backend)
  }

  fn new_student(name: &str) -> NewStudent {
    NewStudent {
      name: name.into(),
      year: None,
      preferred_day: None,
    }
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[tokio::test]
  async fn test_list_is_cached_between_calls() {
    let (client, backend) = client();
    client.add_student(new_student("Alice")).await.unwrap();

    let first = client.list_students().await.unwrap();
    let second = client.list_students().await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(backend.student_fetches(), 1);
  }

  #[tokio::test]
  async fn test_added_student_appears_exactly_once_sorted() {
    let (client, _) = client();
    client.add_student(new_student("Cara")).await.unwrap();
    client.add_student(new_student("Alice")).await.unwrap();
    client.list_students().await.unwrap();

    client.add_student(new_student("Bea")).await.unwrap();
    let students = client.list_students().await.unwrap();

    let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bea", "Cara"]);
    assert_eq!(names.iter().filter(|n| **n == "Bea").count(), 1);
  }

  #[tokio::test]
  async fn test_empty_name_never_reaches_store() {
    let (client, backend) = client();

    let result = client.add_student(new_student("  ")).await;

    assert!(matches!(
      result,
      Err(RecordError::Invalid(ValidationError::EmptyName))
    ));
    assert_eq!(backend.inserts(), 0);
  }

  #[tokio::test]
  async fn test_zero_amount_rejected_before_store() {
    let (client, backend) = client();

    let zero = NewFeePayment {
      student_id: StudentId(1),
      date: date(2024, 1, 10),
      amount: 0,
    };
    let result = client.record_fee_payment(zero).await;

    assert!(matches!(
      result,
      Err(RecordError::Invalid(ValidationError::NonPositiveAmount))
    ));
    assert_eq!(backend.inserts(), 0);

    let one = NewFeePayment {
      student_id: StudentId(1),
      date: date(2024, 1, 10),
      amount: 1,
    };
    assert!(client.record_fee_payment(one).await.is_ok());
  }

  #[tokio::test]
  async fn test_read_failure_surfaces_and_is_not_cached() {
    let (client, backend) = client();
    client.add_student(new_student("Alice")).await.unwrap();

    backend.set_fail_reads(true);
    let failed = client.list_students().await;
    assert!(matches!(failed, Err(StoreError::Unreachable(_))));

    backend.set_fail_reads(false);
    let students = client.list_students().await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(backend.student_fetches(), 2);
  }

  #[tokio::test]
  async fn test_failed_write_keeps_cache_intact() {
    let (client, backend) = client();
    client.add_student(new_student("Alice")).await.unwrap();
    client.list_students().await.unwrap();

    backend.set_fail_writes(true);
    let result = client.add_student(new_student("Bea")).await;
    assert!(matches!(result, Err(RecordError::Store(_))));

    // The list is still served from cache; no new store read happened.
    client.list_students().await.unwrap();
    assert_eq!(backend.student_fetches(), 1);
  }

  #[tokio::test]
  async fn test_unknown_student_is_no_rows() {
    let (client, _) = client();

    let result = client.fetch_student(StudentId(42)).await;
    assert!(matches!(result, Err(StoreError::NoRows)));
  }

  #[tokio::test]
  async fn test_no_fees_means_empty_history_and_zero_total() {
    let (client, _) = client();
    client.add_student(new_student("Alice")).await.unwrap();
    let students = client.list_students().await.unwrap();

    let fees = client.fees_for_student(students[0].id).await.unwrap();
    assert!(fees.is_empty());
    assert_eq!(crate::store::types::total_fees(&fees), 0);
  }

  #[tokio::test]
  async fn test_fee_history_is_newest_first() {
    let (client, _) = client();
    client.add_student(new_student("Alice")).await.unwrap();
    let id = client.list_students().await.unwrap()[0].id;

    for (day, amount) in [(5, 30), (20, 40), (12, 50)] {
      client
        .record_fee_payment(NewFeePayment {
          student_id: id,
          date: date(2024, 1, day),
          amount,
        })
        .await
        .unwrap();
    }

    let fees = client.fees_for_student(id).await.unwrap();
    let dates: Vec<NaiveDate> = fees.iter().map(|f| f.date).collect();
    assert_eq!(dates, vec![date(2024, 1, 20), date(2024, 1, 12), date(2024, 1, 5)]);
    assert_eq!(crate::store::types::total_fees(&fees), 120);
  }

  #[tokio::test]
  async fn test_alice_smith_scenario() {
    let (client, _) = client();

    client
      .add_student(NewStudent {
        name: "Alice Smith".into(),
        year: Some(Year::Four),
        preferred_day: Some(Weekday::Tuesday),
      })
      .await
      .unwrap();

    let students = client.list_students().await.unwrap();
    assert_eq!(students.len(), 1);
    let alice = &students[0];
    assert_eq!(alice.name, "Alice Smith");
    assert_eq!(alice.year, Some(Year::Four));
    assert_eq!(alice.preferred_day, Some(Weekday::Tuesday));

    let class_date = date(2024, 1, 10);
    client
      .record_attendance(NewAttendance {
        student_id: alice.id,
        date: class_date,
      })
      .await
      .unwrap();

    let attendance = client.attendance_for_student(alice.id).await.unwrap();
    assert_eq!(attendance.len(), 1);
    assert_eq!(attendance[0].date, class_date);

    client
      .record_fee_payment(NewFeePayment {
        student_id: alice.id,
        date: class_date,
        amount: 50,
      })
      .await
      .unwrap();

    let fees = client.fees_for_student(alice.id).await.unwrap();
    assert_eq!(fees.len(), 1);
    assert_eq!(fees[0].amount, 50);

    assert_eq!(crate::store::types::total_fees(&fees), 50);
    assert_eq!(attendance.len(), 1);
  }
}
