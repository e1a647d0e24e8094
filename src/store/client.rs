use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RANGE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::Config;

use super::error::StoreError;
use super::types::{
  AttendanceRecord, FeePayment, NewAttendance, NewFeePayment, NewStudent, Student, StudentId,
};
use super::StoreBackend;

/// Rows fetched per request when paging through a select.
const PAGE_SIZE: usize = 500;

/// Sort direction for an ordered select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
  Asc,
  Desc,
}

impl SortDir {
  fn suffix(self) -> &'static str {
    match self {
      SortDir::Asc => "asc",
      SortDir::Desc => "desc",
    }
  }
}

/// A table-scoped select, built up PostgREST-style.
#[derive(Debug, Clone)]
pub struct Select {
  table: &'static str,
  columns: &'static str,
  filters: Vec<(&'static str, String)>,
  order: Option<(&'static str, SortDir)>,
}

impl Select {
  pub fn table(table: &'static str) -> Self {
    Self {
      table,
      columns: "*",
      filters: Vec::new(),
      order: None,
    }
  }

  pub fn columns(mut self, columns: &'static str) -> Self {
    self.columns = columns;
    self
  }

  /// Keep only rows where `column` equals `value`.
  pub fn eq(mut self, column: &'static str, value: impl ToString) -> Self {
    self.filters.push((column, format!("eq.{}", value.to_string())));
    self
  }

  pub fn order(mut self, column: &'static str, dir: SortDir) -> Self {
    self.order = Some((column, dir));
    self
  }

  /// Query-string pairs in the order PostgREST expects them.
  fn query_pairs(&self) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), self.columns.to_string())];
    for (column, filter) in &self.filters {
      pairs.push((column.to_string(), filter.clone()));
    }
    if let Some((column, dir)) = self.order {
      pairs.push(("order".to_string(), format!("{}.{}", column, dir.suffix())));
    }
    pairs
  }
}

/// Client for the remote PostgREST-style store.
///
/// Built once at startup and reused for the process lifetime; holds the
/// endpoint and credentials, nothing else.
#[derive(Clone)]
pub struct StoreClient {
  http: reqwest::Client,
  base: Url,
}

impl StoreClient {
  pub fn new(config: &Config) -> Result<Self> {
    let key = Config::store_key()?;

    let mut headers = HeaderMap::new();
    let mut api_key =
      HeaderValue::from_str(&key).map_err(|e| eyre!("Store API key is not a valid header: {}", e))?;
    api_key.set_sensitive(true);
    headers.insert("apikey", api_key);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key))
      .map_err(|e| eyre!("Store API key is not a valid header: {}", e))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    let base = Url::parse(&config.store.url)
      .and_then(|u| u.join("rest/v1/"))
      .map_err(|e| eyre!("Invalid store URL '{}': {}", config.store.url, e))?;

    Ok(Self { http, base })
  }

  fn endpoint(&self, table: &str) -> Result<Url, StoreError> {
    self
      .base
      .join(table)
      .map_err(|e| StoreError::Unreachable(format!("invalid table endpoint '{}': {}", table, e)))
  }

  /// Run a select, paging with `Range` headers until the store runs dry.
  async fn select_rows<T: DeserializeOwned>(&self, select: &Select) -> Result<Vec<T>, StoreError> {
    let url = self.endpoint(select.table)?;
    let pairs = select.query_pairs();

    let mut rows: Vec<T> = Vec::new();
    let mut start = 0usize;

    loop {
      let response = self
        .http
        .get(url.clone())
        .query(&pairs)
        .header(RANGE, format!("{}-{}", start, start + PAGE_SIZE - 1))
        .send()
        .await
        .map_err(StoreError::from_request)?;

      let status = response.status();
      if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Rejected {
          status: status.as_u16(),
          body,
        });
      }

      let page: Vec<T> = response.json().await.map_err(StoreError::from_request)?;
      let fetched = page.len();
      rows.extend(page);

      if fetched < PAGE_SIZE {
        break;
      }
      start += PAGE_SIZE;
    }

    Ok(rows)
  }

  /// Insert a single row. The store either persists it or rejects it whole.
  async fn insert<T: Serialize>(&self, table: &'static str, row: &T) -> Result<(), StoreError> {
    let url = self.endpoint(table)?;

    let response = self
      .http
      .post(url)
      .header("Prefer", "return=minimal")
      .json(row)
      .send()
      .await
      .map_err(StoreError::from_request)?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
      });
    }

    Ok(())
  }
}

impl StoreBackend for StoreClient {
  async fn fetch_students(&self) -> Result<Vec<Student>, StoreError> {
    self
      .select_rows(
        &Select::table("student")
          .columns("id,student_name,year,preferred_day")
          .order("student_name", SortDir::Asc),
      )
      .await
  }

  async fn fetch_student(&self, id: StudentId) -> Result<Student, StoreError> {
    let rows: Vec<Student> = self
      .select_rows(
        &Select::table("student")
          .columns("id,student_name,year,preferred_day")
          .eq("id", id),
      )
      .await?;

    rows.into_iter().next().ok_or(StoreError::NoRows)
  }

  async fn fetch_student_fees(&self, id: StudentId) -> Result<Vec<FeePayment>, StoreError> {
    self
      .select_rows(
        &Select::table("student_fee")
          .columns("student_id,date_paid,fee_amount")
          .eq("student_id", id)
          .order("date_paid", SortDir::Desc),
      )
      .await
  }

  async fn fetch_student_attendance(
    &self,
    id: StudentId,
  ) -> Result<Vec<AttendanceRecord>, StoreError> {
    self
      .select_rows(
        &Select::table("student_attendance")
          .columns("student_id,class_attended_date")
          .eq("student_id", id)
          .order("class_attended_date", SortDir::Desc),
      )
      .await
  }

  async fn insert_student(&self, new: &NewStudent) -> Result<(), StoreError> {
    self.insert("student", new).await
  }

  async fn insert_attendance(&self, new: &NewAttendance) -> Result<(), StoreError> {
    self.insert("student_attendance", new).await
  }

  async fn insert_fee(&self, new: &NewFeePayment) -> Result<(), StoreError> {
    self.insert("student_fee", new).await
  }
}
