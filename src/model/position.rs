use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Position {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "CEO")]
    pub title: String,
    #[schema(example = "Executive")]
    pub department: String,
    /// Annual base salary
    #[schema(example = 150000.0)]
    pub base_salary: f64,
}
