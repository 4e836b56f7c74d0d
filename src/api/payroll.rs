use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::payroll::{self as service, PayrollQuery, RunPayroll},
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

/// Run payroll for a period
///
/// Pays one twelfth of the annual base salary to every active employee with a
/// position who has not been paid for the period yet.
#[utoipa::path(
    post,
    path = "/api/payroll/run",
    request_body = RunPayroll,
    responses(
        (status = 200, description = "Records written by this run", body = crate::service::payroll::PayrollBatch),
        (status = 403, description = "Finance privileges required"),
        (status = 409, description = "Payroll already processed for the period"),
        (status = 422, description = "Invalid period label")
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn run_payroll(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<RunPayroll>,
) -> Result<HttpResponse, AppError> {
    let batch = service::run_payroll(pool.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(batch))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "Paginated payroll records", body = crate::service::payroll::PayrollListResponse)
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<PayrollQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service::list_payroll(pool.get_ref(), &auth, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

#[utoipa::path(
    get,
    path = "/api/payroll/runs",
    responses(
        (status = 200, description = "Processed periods", body = [crate::model::payroll::PayrollRun]),
        (status = 403, description = "Finance privileges required")
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_runs(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let runs = service::list_runs(pool.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(runs))
}

#[utoipa::path(
    get,
    path = "/api/payroll/{id}/payslip",
    params(
        ("id", Path, description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "crate::service::payroll::Payslip", body = crate::service::payroll::Payslip),
        (status = 403, description = "Not your payslip"),
        (status = 404, description = "Payroll record not found")
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_payslip(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let slip = service::payslip(pool.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(slip))
}
