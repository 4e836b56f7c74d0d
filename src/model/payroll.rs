use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRecord {
    pub id: i64,
    pub employee_id: i64,
    #[schema(example = 12500.0)]
    pub amount_paid: f64,
    #[schema(value_type = String, format = "date-time")]
    pub processed_at: DateTime<Utc>,
    #[schema(example = "Jan 2026")]
    pub month_year: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRun {
    #[schema(example = "Jan 2026")]
    pub month_year: String,
    #[schema(value_type = String, format = "date-time")]
    pub last_run_at: DateTime<Utc>,
    pub records: i64,
    pub total_paid: f64,
}
