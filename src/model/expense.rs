use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Expense {
    pub id: i64,
    #[schema(example = "Office chairs")]
    pub description: String,
    #[schema(example = "Furniture")]
    pub category: String,
    #[schema(example = 420.5)]
    pub amount: f64,
    #[schema(example = "2026-01-15", format = "date", value_type = String)]
    pub incurred_on: NaiveDate,
}
