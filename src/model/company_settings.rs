use serde::Serialize;
use utoipa::ToSchema;

/// Singleton row, id is always 1.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct CompanySettings {
    #[serde(skip)]
    pub id: i64,
    #[schema(example = "My Company")]
    pub name: String,
    pub logo_ref: Option<String>,
    pub address: Option<String>,
}
