use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::error::{AppResult, is_unique_violation};
use crate::model::attendance::AttendanceRecord;
use crate::service::{Outcome, Page};

/// Soft refusal: nothing changed, the caller is told why.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttendanceWarning {
    /// Carries the session that is still open
    AlreadyClockedIn { open: AttendanceRecord },
    NoOpenSession,
}

impl AttendanceWarning {
    pub fn message(&self) -> &'static str {
        match self {
            AttendanceWarning::AlreadyClockedIn { .. } => "You are already clocked in.",
            AttendanceWarning::NoOpenSession => "You are not clocked in.",
        }
    }
}

pub type AttendanceOutcome = Outcome<AttendanceRecord, AttendanceWarning>;

#[derive(Serialize, ToSchema)]
pub struct AttendanceHistory {
    pub data: Vec<AttendanceRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

async fn open_session(pool: &SqlitePool, employee_id: i64) -> AppResult<Option<AttendanceRecord>> {
    let open = sqlx::query_as::<_, AttendanceRecord>(
        "SELECT * FROM attendance WHERE employee_id = ? AND check_out IS NULL",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(open)
}

pub async fn clock_in(pool: &SqlitePool, employee_id: i64) -> AppResult<AttendanceOutcome> {
    clock_in_at(pool, employee_id, Utc::now()).await
}

/// Opens a session unless one is already open, in a single statement.
pub async fn clock_in_at(
    pool: &SqlitePool,
    employee_id: i64,
    now: DateTime<Utc>,
) -> AppResult<AttendanceOutcome> {
    let inserted = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        INSERT INTO attendance (employee_id, check_in)
        SELECT ?, ?
        WHERE NOT EXISTS (
            SELECT 1 FROM attendance WHERE employee_id = ? AND check_out IS NULL
        )
        RETURNING *
        "#,
    )
    .bind(employee_id)
    .bind(now)
    .bind(employee_id)
    .fetch_optional(pool)
    .await;

    let inserted = match inserted {
        Ok(row) => row,
        // the partial unique index caught a concurrent clock-in
        Err(e) if is_unique_violation(&e) => None,
        Err(e) => return Err(e.into()),
    };

    match inserted {
        Some(record) => {
            info!(employee_id, attendance_id = record.id, "Clocked in");
            Ok(Outcome::Done(record))
        }
        None => match open_session(pool, employee_id).await? {
            Some(open) => {
                debug!(employee_id, attendance_id = open.id, "Clock-in refused, session open");
                Ok(Outcome::Warning(AttendanceWarning::AlreadyClockedIn { open }))
            }
            None => {
                // the open session was closed between the two statements
                warn!(employee_id, "Clock-in raced with clock-out");
                Ok(Outcome::Warning(AttendanceWarning::NoOpenSession))
            }
        },
    }
}

pub async fn clock_out(pool: &SqlitePool, employee_id: i64) -> AppResult<AttendanceOutcome> {
    clock_out_at(pool, employee_id, Utc::now()).await
}

pub async fn clock_out_at(
    pool: &SqlitePool,
    employee_id: i64,
    now: DateTime<Utc>,
) -> AppResult<AttendanceOutcome> {
    let closed = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        UPDATE attendance SET check_out = ?
        WHERE employee_id = ? AND check_out IS NULL
        RETURNING *
        "#,
    )
    .bind(now)
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    match closed {
        Some(record) => {
            info!(employee_id, attendance_id = record.id, "Clocked out");
            Ok(Outcome::Done(record))
        }
        None => {
            debug!(employee_id, "Clock-out refused, no open session");
            Ok(Outcome::Warning(AttendanceWarning::NoOpenSession))
        }
    }
}

/// Newest first.
pub async fn history(pool: &SqlitePool, employee_id: i64, page: Page) -> AppResult<AttendanceHistory> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_one(pool)
        .await?;

    let data = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT * FROM attendance
        WHERE employee_id = ?
        ORDER BY check_in DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(employee_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok(AttendanceHistory {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    })
}
