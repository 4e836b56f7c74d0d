use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::company_settings::CompanySettings;
use crate::model::payroll::{PayrollRecord, PayrollRun};
use crate::model::role::Capability;
use crate::service::{FilterValue, Page, PageQuery, settings, where_clause};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RunPayroll {
    /// Free-text period label, e.g. "March 2026"
    #[validate(length(min = 1, max = 30, message = "Period must be between 1 and 30 characters."))]
    #[schema(example = "March 2026")]
    pub month_year: String,
}

/// Records written by one run.
#[derive(Debug, Serialize, ToSchema)]
pub struct PayrollBatch {
    pub month_year: String,
    pub processed: Vec<PayrollRecord>,
    pub total_paid: f64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayrollQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub month_year: Option<String>,
    /// Ignored unless the caller holds finance rights
    pub employee_id: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollListResponse {
    pub data: Vec<PayrollRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(sqlx::FromRow)]
struct PayslipRow {
    record_id: i64,
    employee_id: i64,
    employee_name: String,
    department: String,
    position_title: Option<String>,
    month_year: String,
    amount_paid: f64,
    processed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Payslip {
    pub company: CompanySettings,
    pub record_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub department: String,
    pub position_title: Option<String>,
    pub month_year: String,
    pub amount_paid: f64,
    #[schema(value_type = String, format = "date-time")]
    pub processed_at: DateTime<Utc>,
}

pub async fn run_payroll(pool: &SqlitePool, actor: &AuthUser, payload: RunPayroll) -> AppResult<PayrollBatch> {
    run_payroll_at(pool, actor, payload, Utc::now()).await
}

/// Pays one twelfth of the annual base salary to every active employee
/// with a position who has no record for the period yet.
#[instrument(name = "payroll_run", skip(pool, actor, payload, now), fields(actor = actor.employee_id))]
pub async fn run_payroll_at(
    pool: &SqlitePool,
    actor: &AuthUser,
    payload: RunPayroll,
    now: DateTime<Utc>,
) -> AppResult<PayrollBatch> {
    actor.require(Capability::Finance)?;

    let payload = RunPayroll {
        month_year: payload.month_year.trim().to_string(),
    };
    payload.validate()?;
    let period = payload.month_year;

    let mut tx = pool.begin().await?;

    // first write takes the database write lock for the rest of the run
    sqlx::query(
        r#"
        INSERT INTO payroll_runs (month_year, last_run_at) VALUES (?, ?)
        ON CONFLICT (month_year) DO UPDATE SET last_run_at = excluded.last_run_at
        "#,
    )
    .bind(&period)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let processed = sqlx::query_as::<_, PayrollRecord>(
        r#"
        INSERT INTO payroll_records (employee_id, amount_paid, processed_at, month_year)
        SELECT e.id, p.base_salary / 12.0, ?, ?
        FROM employees e
        JOIN positions p ON p.id = e.position_id
        WHERE e.status = 'Active'
          AND NOT EXISTS (
              SELECT 1 FROM payroll_records r
              WHERE r.employee_id = e.id AND r.month_year = ?
          )
        ORDER BY e.id
        RETURNING *
        "#,
    )
    .bind(now)
    .bind(&period)
    .bind(&period)
    .fetch_all(&mut *tx)
    .await?;

    if processed.is_empty() {
        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payroll_records WHERE month_year = ?")
                .bind(&period)
                .fetch_one(&mut *tx)
                .await?;

        // dropping the transaction discards the lock row as well
        if existing > 0 {
            info!(period = %period, "Payroll already processed");
            return Err(AppError::Conflict(format!(
                "Payroll for {period} has already been processed."
            )));
        }

        debug!(period = %period, "No eligible employees for payroll");
        return Ok(PayrollBatch {
            month_year: period,
            processed,
            total_paid: 0.0,
        });
    }

    tx.commit().await?;

    let total_paid: f64 = processed.iter().map(|r| r.amount_paid).sum();
    info!(period = %period, records = processed.len(), total_paid, "Payroll processed");

    Ok(PayrollBatch {
        month_year: period,
        processed,
        total_paid,
    })
}

pub async fn list_runs(pool: &SqlitePool, actor: &AuthUser) -> AppResult<Vec<PayrollRun>> {
    actor.require(Capability::Finance)?;

    let runs = sqlx::query_as::<_, PayrollRun>(
        r#"
        SELECT r.month_year,
               r.last_run_at,
               COUNT(p.id) AS records,
               COALESCE(SUM(p.amount_paid), 0.0) AS total_paid
        FROM payroll_runs r
        LEFT JOIN payroll_records p ON p.month_year = r.month_year
        GROUP BY r.month_year, r.last_run_at
        ORDER BY r.last_run_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(runs)
}

pub async fn list_payroll(
    pool: &SqlitePool,
    actor: &AuthUser,
    query: PayrollQuery,
) -> AppResult<PayrollListResponse> {
    let page = Page::from(PageQuery {
        page: query.page,
        per_page: query.per_page,
    });

    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if actor.can(Capability::Finance) {
        if let Some(employee_id) = query.employee_id {
            conditions.push("employee_id = ?");
            args.push(FilterValue::I64(employee_id));
        }
    } else {
        conditions.push("employee_id = ?");
        args.push(FilterValue::I64(actor.employee_id));
    }

    if let Some(period) = query.month_year {
        conditions.push("month_year = ?");
        args.push(FilterValue::Str(period.trim().to_string()));
    }

    let where_sql = where_clause(&conditions);

    let count_sql = format!("SELECT COUNT(*) FROM payroll_records{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.as_str()),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        "SELECT * FROM payroll_records{} ORDER BY processed_at DESC, id DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, PayrollRecord>(&data_sql);
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

    Ok(PayrollListResponse {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    })
}

pub async fn payslip(pool: &SqlitePool, actor: &AuthUser, record_id: i64) -> AppResult<Payslip> {
    let row = sqlx::query_as::<_, PayslipRow>(
        r#"
        SELECT r.id AS record_id,
               e.id AS employee_id,
               e.full_name AS employee_name,
               e.department,
               p.title AS position_title,
               r.month_year,
               r.amount_paid,
               r.processed_at
        FROM payroll_records r
        JOIN employees e ON e.id = r.employee_id
        LEFT JOIN positions p ON p.id = e.position_id
        WHERE r.id = ?
        "#,
    )
    .bind(record_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Payroll record not found".into()))?;

    actor.require_self_or(row.employee_id, Capability::Finance)?;

    let company = settings::load(pool).await?;

    Ok(Payslip {
        company,
        record_id: row.record_id,
        employee_id: row.employee_id,
        employee_name: row.employee_name,
        department: row.department,
        position_title: row.position_title,
        month_year: row.month_year,
        amount_paid: row.amount_paid,
        processed_at: row.processed_at,
    })
}
