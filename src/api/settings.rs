use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::settings::{self as service, UpdateSettings},
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Company settings", body = crate::model::company_settings::CompanySettings)
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_settings(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let settings = service::get_settings(pool.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = crate::model::company_settings::CompanySettings),
        (status = 403, description = "Company Owner privileges required")
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_settings(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<UpdateSettings>,
) -> Result<HttpResponse, AppError> {
    let settings = service::update_settings(pool.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(settings))
}
