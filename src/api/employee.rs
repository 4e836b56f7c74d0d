use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::employee::{self as service, EmployeeQuery, UpdateEmployee},
    utils::EmailIndex,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = crate::service::employee::EmployeeListResponse),
        (status = 403, description = "HR, Manager or Owner privileges required")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, AppError> {
    let list = service::list_employees(pool.get_ref(), &auth, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = crate::model::employee::Employee),
        (status = 403, description = "Not your record"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "not_found",
            "message": "Employee not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee = service::get_employee(pool.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = crate::model::employee::Employee),
        (status = 403, description = "HR privileges required, Owner for role changes"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee =
        service::update_employee(pool.get_ref(), &auth, path.into_inner(), payload.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Approve a pending registration
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}/approve",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee is now Active", body = crate::model::employee::Employee),
        (status = 403, description = "HR privileges required"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee is not pending")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn approve_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee = service::approve(pool.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Reject a pending registration
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}/reject",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Registration removed", body = Object, example = json!({
            "message": "Registration rejected"
        })),
        (status = 403, description = "HR privileges required"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee is not pending")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reject_employee(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    index: web::Data<EmailIndex>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    service::reject(pool.get_ref(), index.get_ref(), &auth, employee_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Registration rejected",
        "employee_id": employee_id
    })))
}

/// Activate or deactivate an employee
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}/toggle-status",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Status flipped", body = crate::model::employee::Employee),
        (status = 403, description = "HR, Manager or Owner privileges required"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee has not been approved yet")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_status(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let employee = service::toggle_status(pool.get_ref(), &auth, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}
