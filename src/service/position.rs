use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult, is_unique_violation};
use crate::model::position::Position;
use crate::model::role::Capability;
use crate::utils::db_utils::UpdateSet;

const TITLE_TAKEN: &str = "A position with that title already exists.";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePosition {
    #[validate(length(min = 1, max = 100, message = "Title is required."))]
    #[schema(example = "Developer")]
    pub title: String,
    #[validate(length(min = 1, max = 50, message = "Department is required."))]
    #[schema(example = "IT")]
    pub department: String,
    #[validate(range(min = 0.0, message = "Base salary cannot be negative."))]
    #[schema(example = 90000.0)]
    pub base_salary: f64,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePosition {
    #[validate(length(min = 1, max = 100, message = "Title is required."))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Department is required."))]
    pub department: Option<String>,
    #[validate(range(min = 0.0, message = "Base salary cannot be negative."))]
    pub base_salary: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PositionQuery {
    pub department: Option<String>,
}

pub async fn list_positions(pool: &SqlitePool, query: PositionQuery) -> AppResult<Vec<Position>> {
    let positions = match query.department {
        Some(department) => {
            sqlx::query_as::<_, Position>(
                "SELECT * FROM positions WHERE department = ? ORDER BY title",
            )
            .bind(department)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Position>("SELECT * FROM positions ORDER BY department, title")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(positions)
}

pub async fn list_departments(pool: &SqlitePool) -> AppResult<Vec<String>> {
    let departments =
        sqlx::query_scalar::<_, String>("SELECT DISTINCT department FROM positions ORDER BY department")
            .fetch_all(pool)
            .await?;
    Ok(departments)
}

pub async fn create_position(
    pool: &SqlitePool,
    actor: &AuthUser,
    payload: CreatePosition,
) -> AppResult<Position> {
    actor.require(Capability::Owner)?;
    payload.validate()?;

    let mut tx = pool.begin().await?;
    let created = sqlx::query_as::<_, Position>(
        "INSERT INTO positions (title, department, base_salary) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(payload.title.trim())
    .bind(payload.department.trim())
    .bind(payload.base_salary)
    .fetch_one(&mut *tx)
    .await;

    let position = match created {
        Ok(p) => p,
        Err(e) if is_unique_violation(&e) => return Err(AppError::field("title", TITLE_TAKEN)),
        Err(e) => return Err(e.into()),
    };
    tx.commit().await?;

    info!(position_id = position.id, title = %position.title, "Position created");
    Ok(position)
}

pub async fn update_position(
    pool: &SqlitePool,
    actor: &AuthUser,
    position_id: i64,
    payload: UpdatePosition,
) -> AppResult<Position> {
    actor.require(Capability::Owner)?;
    payload.validate()?;

    let mut set = UpdateSet::new();
    set.set_opt("title", payload.title.map(|t| t.trim().to_string()))
        .set_opt("department", payload.department.map(|d| d.trim().to_string()))
        .set_opt("base_salary", payload.base_salary);

    if set.is_empty() {
        return Err(AppError::field("body", "No fields provided for update"));
    }

    let mut tx = pool.begin().await?;
    let affected = match set.execute(&mut tx, "positions", "id", position_id).await {
        Ok(n) => n,
        Err(e) if is_unique_violation(&e) => return Err(AppError::field("title", TITLE_TAKEN)),
        Err(e) => return Err(e.into()),
    };

    if affected == 0 {
        return Err(AppError::NotFound("Position not found".into()));
    }

    let position = sqlx::query_as::<_, Position>("SELECT * FROM positions WHERE id = ?")
        .bind(position_id)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(position_id, "Position updated");
    Ok(position)
}
