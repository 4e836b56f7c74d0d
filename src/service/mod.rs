//! Operations behind the HTTP handlers. Each mutating call runs in one
//! transaction and checks the role gate itself, so handlers stay thin.

pub mod attendance;
pub mod client;
pub mod dashboard;
pub mod employee;
pub mod expense;
pub mod leave;
pub mod payroll;
pub mod position;
pub mod session;
pub mod settings;

use serde::Deserialize;
use utoipa::IntoParams;

const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 100;

/// 1-based pagination parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Items per page (max 100)
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl From<PageQuery> for Page {
    fn from(q: PageQuery) -> Self {
        Page {
            page: q.page.unwrap_or(1).max(1),
            per_page: q.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }
}

/// Result of an operation that may decline without failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, W> {
    Done(T),
    Warning(W),
}

impl<T, W> Outcome<T, W> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}

/// Helper enum for typed binding of dynamic filters
pub(crate) enum FilterValue {
    I64(i64),
    Str(String),
}

pub(crate) fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}
