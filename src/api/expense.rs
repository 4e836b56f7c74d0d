use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::expense::{self as service, ExpenseQuery, LogExpense},
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

#[utoipa::path(
    get,
    path = "/api/expenses",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Matching expenses and their total", body = crate::service::expense::ExpenseReport),
        (status = 403, description = "Finance privileges required")
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_expenses(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<ExpenseQuery>,
) -> Result<HttpResponse, AppError> {
    let report = service::list_expenses(pool.get_ref(), &auth, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = LogExpense,
    responses(
        (status = 201, description = "Expense logged", body = crate::model::expense::Expense),
        (status = 403, description = "Finance privileges required"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Expense",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn log_expense(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<LogExpense>,
) -> Result<HttpResponse, AppError> {
    let expense = service::log_expense(pool.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(expense))
}
