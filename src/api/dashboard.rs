use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::dashboard as service,
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Headline counts", body = crate::service::dashboard::Dashboard)
    ),
    tag = "Dashboard",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn dashboard(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let summary = service::dashboard(pool.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[utoipa::path(
    get,
    path = "/api/org-chart",
    responses(
        (status = 200, description = "Active employees by department", body = [crate::service::dashboard::DepartmentGroup]),
        (status = 403, description = "Manager privileges required")
    ),
    tag = "Dashboard",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn org_chart(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let chart = service::org_chart(pool.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(chart))
}
