use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::leave_request::LeaveDecision,
    service::leave::{self as service, LeaveQuery, SubmitLeave},
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

/// List leave requests
///
/// Supervisors see every request; everyone else sees their own.
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Paginated leave list", body = crate::service::leave::LeaveListResponse)
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<LeaveQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service::list_leaves(pool.get_ref(), &auth, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

#[utoipa::path(
    get,
    path = "/api/leave/{id}",
    params(
        ("id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave request", body = crate::model::leave_request::LeaveRequest),
        (status = 403, description = "Not your request"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let leave = service::get_leave(pool.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/// Apply for leave
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body = SubmitLeave,
    responses(
        (status = 201, description = "Leave request created", body = crate::model::leave_request::LeaveRequest),
        (status = 422, description = "End date before start date")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<SubmitLeave>,
) -> Result<HttpResponse, AppError> {
    let leave = service::submit_leave(pool.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(leave))
}

async fn decide(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    leave_id: i64,
    decision: LeaveDecision,
) -> Result<HttpResponse, AppError> {
    let leave = service::decide_leave(pool.get_ref(), &auth, leave_id, decision).await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    put,
    path = "/api/leave/{id}/approve",
    params(
        ("id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave approved", body = crate::model::leave_request::LeaveRequest),
        (status = 403, description = "Supervisor privileges required, or own request"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already decided")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    decide(auth, pool, path.into_inner(), LeaveDecision::Approve).await
}

#[utoipa::path(
    put,
    path = "/api/leave/{id}/reject",
    params(
        ("id", Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = crate::model::leave_request::LeaveRequest),
        (status = 403, description = "Supervisor privileges required, or own request"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already decided")
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    decide(auth, pool, path.into_inner(), LeaveDecision::Reject).await
}
