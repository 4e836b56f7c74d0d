use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::{
        Outcome, Page, PageQuery,
        attendance::{self as service, AttendanceOutcome},
    },
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

fn render(outcome: AttendanceOutcome, message: &str) -> HttpResponse {
    match outcome {
        Outcome::Done(record) => HttpResponse::Ok().json(json!({
            "message": message,
            "record": record
        })),
        Outcome::Warning(warning) => HttpResponse::Conflict().json(json!({
            "error": "conflict",
            "message": warning.message(),
            "warning": warning
        })),
    }
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/clock-in",
    responses(
        (status = 200, description = "Clocked in", body = Object, example = json!({
            "message": "Clocked in successfully",
            "record": {"id": 1, "employee_id": 3, "check_in": "2026-03-02T09:00:00Z", "check_out": null}
        })),
        (status = 409, description = "A session is already open, nothing changed", body = Object, example = json!({
            "error": "conflict",
            "message": "You are already clocked in."
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let outcome = service::clock_in(pool.get_ref(), auth.employee_id).await?;
    Ok(render(outcome, "Clocked in successfully"))
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/clock-out",
    responses(
        (status = 200, description = "Clocked out", body = Object, example = json!({
            "message": "Clocked out successfully"
        })),
        (status = 409, description = "No open session, nothing changed", body = Object, example = json!({
            "error": "conflict",
            "message": "You are not clocked in."
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let outcome = service::clock_out(pool.get_ref(), auth.employee_id).await?;
    Ok(render(outcome, "Clocked out successfully"))
}

/// Own attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(PageQuery),
    responses(
        (status = 200, description = "Attendance history", body = crate::service::attendance::AttendanceHistory)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::from(query.into_inner());
    let history = service::history(pool.get_ref(), auth.employee_id, page).await?;
    Ok(HttpResponse::Ok().json(history))
}
