//! Access to the remote student store.
//!
//! `StoreClient` speaks the store's REST protocol; `CachedStoreClient` layers
//! the read cache and the validation rules on top and is what the views use.

pub mod cached_client;
pub mod client;
pub mod error;
pub mod types;

pub use cached_client::CachedStoreClient;
pub use client::StoreClient;
pub use error::{RecordError, StoreError, ValidationError};

use types::{
  AttendanceRecord, FeePayment, NewAttendance, NewFeePayment, NewStudent, Student, StudentId,
};

/// The raw table operations the store exposes.
///
/// `StoreClient` is the production implementation; tests substitute an
/// in-memory one so the service surface can be exercised without a network.
#[allow(async_fn_in_trait)]
pub trait StoreBackend: Clone + Send + Sync {
  async fn fetch_students(&self) -> Result<Vec<Student>, StoreError>;
  async fn fetch_student(&self, id: StudentId) -> Result<Student, StoreError>;
  async fn fetch_student_fees(&self, id: StudentId) -> Result<Vec<FeePayment>, StoreError>;
  async fn fetch_student_attendance(
    &self,
    id: StudentId,
  ) -> Result<Vec<AttendanceRecord>, StoreError>;

  async fn insert_student(&self, new: &NewStudent) -> Result<(), StoreError>;
  async fn insert_attendance(&self, new: &NewAttendance) -> Result<(), StoreError>;
  async fn insert_fee(&self, new: &NewFeePayment) -> Result<(), StoreError>;
}
