use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr,
    ToSchema, sqlx::Type,
)]
pub enum EmployeeStatus {
    Pending,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "full_name": "John Doe",
        "email": "john.doe@company.com",
        "role": "Employee",
        "department": "IT",
        "status": "Active",
        "position_id": 3,
        "created_at": "2026-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[serde(skip)]
    pub password_hash: String,

    pub role: Role,

    #[schema(example = "IT")]
    pub department: String,

    pub status: EmployeeStatus,

    #[schema(example = 3, nullable = true)]
    pub position_id: Option<i64>,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}
