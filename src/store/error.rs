//! Error types for the store layer.

use thiserror::Error;

/// Problems detected locally, before any store round-trip.
///
/// These are user-correctable and shown as inline warnings; they are never
/// logged as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("Please enter a student name")]
  EmptyName,
  #[error("Please select a date")]
  MissingDate,
  #[error("Could not read '{0}' as a date (expected DD/MM/YYYY)")]
  BadDate(String),
  #[error("Could not read '{0}' as an amount")]
  BadAmount(String),
  #[error("Please enter an amount greater than 0")]
  NonPositiveAmount,
}

/// Failures from the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The store could not be reached at the transport level.
  #[error("store unreachable: {0}")]
  Unreachable(String),
  /// The store answered with a non-success status.
  #[error("store rejected the request ({status}): {body}")]
  Rejected { status: u16, body: String },
  /// A single-row lookup matched nothing.
  #[error("no matching rows in the store")]
  NoRows,
  /// The response body did not have the expected shape.
  #[error("could not decode store response: {0}")]
  Decode(String),
}

impl StoreError {
  /// Classify a transport-layer failure from reqwest.
  pub fn from_request(err: reqwest::Error) -> Self {
    if err.is_decode() {
      Self::Decode(err.to_string())
    } else {
      Self::Unreachable(err.to_string())
    }
  }
}

/// Why a write did not go through: either the input was rejected locally or
/// the store call itself failed.
#[derive(Debug, Error)]
pub enum RecordError {
  #[error(transparent)]
  Invalid(#[from] ValidationError),
  #[error(transparent)]
  Store(#[from] StoreError),
}
