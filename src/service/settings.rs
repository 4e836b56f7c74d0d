use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::company_settings::CompanySettings;
use crate::model::role::Capability;
use crate::utils::db_utils::UpdateSet;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettings {
    #[validate(length(min = 1, max = 100, message = "Company name must be between 1 and 100 characters."))]
    pub name: Option<String>,
    /// Reference to an uploaded logo
    pub logo_ref: Option<String>,
    #[validate(length(max = 255, message = "Address is too long."))]
    pub address: Option<String>,
}

/// The singleton row. Created at startup, so absence is an internal fault.
pub(crate) async fn load(pool: &SqlitePool) -> AppResult<CompanySettings> {
    sqlx::query_as::<_, CompanySettings>("SELECT * FROM company_settings WHERE id = 1")
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::Internal("Company settings row missing".into()))
}

pub async fn get_settings(pool: &SqlitePool, _actor: &AuthUser) -> AppResult<CompanySettings> {
    load(pool).await
}

pub async fn update_settings(
    pool: &SqlitePool,
    actor: &AuthUser,
    payload: UpdateSettings,
) -> AppResult<CompanySettings> {
    actor.require(Capability::Owner)?;
    payload.validate()?;

    let mut set = UpdateSet::new();
    set.set_opt("name", payload.name.map(|n| n.trim().to_string()))
        .set_opt("logo_ref", payload.logo_ref)
        .set_opt("address", payload.address);

    if set.is_empty() {
        return Err(AppError::field("body", "No fields provided for update"));
    }

    let mut tx = pool.begin().await?;
    set.execute(&mut tx, "company_settings", "id", 1).await?;
    let settings = sqlx::query_as::<_, CompanySettings>("SELECT * FROM company_settings WHERE id = 1")
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(updated_by = actor.employee_id, "Company settings updated");
    Ok(settings)
}
