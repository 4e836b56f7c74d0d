use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::leave_request::{LeaveDecision, LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::Capability;
use crate::service::{FilterValue, Page, PageQuery, where_clause};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitLeave {
    pub leave_type: LeaveType,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-04", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Ignored unless the caller is a supervisor
    pub employee_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

pub async fn submit_leave(
    pool: &SqlitePool,
    actor: &AuthUser,
    payload: SubmitLeave,
) -> AppResult<LeaveRequest> {
    if payload.start_date > payload.end_date {
        return Err(AppError::field(
            "end_date",
            "End date must not be before start date.",
        ));
    }

    let mut tx = pool.begin().await?;
    let leave = sqlx::query_as::<_, LeaveRequest>(
        r#"
        INSERT INTO leave_requests (employee_id, leave_type, start_date, end_date, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(actor.employee_id)
    .bind(payload.leave_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(LeaveStatus::Pending)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(leave_id = leave.id, employee_id = actor.employee_id, "Leave request submitted");
    Ok(leave)
}

/// Pending → Approved/Rejected. Nobody decides their own request.
pub async fn decide_leave(
    pool: &SqlitePool,
    actor: &AuthUser,
    leave_id: i64,
    decision: LeaveDecision,
) -> AppResult<LeaveRequest> {
    actor.require(Capability::Supervisor)?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
        .bind(leave_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".into()))?;

    if current.employee_id == actor.employee_id {
        return Err(AppError::Forbidden(
            "You cannot decide your own leave request.".into(),
        ));
    }

    let decided = sqlx::query_as::<_, LeaveRequest>(
        r#"
        UPDATE leave_requests SET status = ?, decided_by = ?
        WHERE id = ? AND status = ?
        RETURNING *
        "#,
    )
    .bind(decision.resulting_status())
    .bind(actor.employee_id)
    .bind(leave_id)
    .bind(LeaveStatus::Pending)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        AppError::Conflict(format!("Leave request is already {}", current.status))
    })?;

    tx.commit().await?;
    info!(
        leave_id,
        status = %decided.status,
        decided_by = actor.employee_id,
        "Leave request decided"
    );
    Ok(decided)
}

pub async fn get_leave(pool: &SqlitePool, actor: &AuthUser, leave_id: i64) -> AppResult<LeaveRequest> {
    let leave = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = ?")
        .bind(leave_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".into()))?;

    actor.require_self_or(leave.employee_id, Capability::Supervisor)?;
    Ok(leave)
}

pub async fn list_leaves(
    pool: &SqlitePool,
    actor: &AuthUser,
    query: LeaveQuery,
) -> AppResult<LeaveListResponse> {
    let page = Page::from(PageQuery {
        page: query.page,
        per_page: query.per_page,
    });

    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if actor.can(Capability::Supervisor) {
        if let Some(employee_id) = query.employee_id {
            conditions.push("employee_id = ?");
            args.push(FilterValue::I64(employee_id));
        }
    } else {
        conditions.push("employee_id = ?");
        args.push(FilterValue::I64(actor.employee_id));
    }

    if let Some(status) = query.status {
        let status = LeaveStatus::from_str(&status)
            .map_err(|_| AppError::field("status", "Not a valid status."))?;
        conditions.push("status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    let where_sql = where_clause(&conditions);

    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.as_str()),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        "SELECT * FROM leave_requests{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in &args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(*v),
            FilterValue::Str(s) => data_q.bind(s.as_str()),
        };
    }
    let data = data_q
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    debug!(total, actor = actor.employee_id, "Listed leave requests");

    Ok(LeaveListResponse {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    })
}
