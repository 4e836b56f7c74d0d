use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::position::{self as service, CreatePosition, PositionQuery, UpdatePosition},
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

/// Positions, optionally narrowed to one department
///
/// Public so the registration form can fill its position dropdown.
#[utoipa::path(
    get,
    path = "/positions",
    params(PositionQuery),
    responses(
        (status = 200, description = "Positions", body = [crate::model::position::Position])
    ),
    tag = "Position"
)]
pub async fn list_positions(
    pool: web::Data<SqlitePool>,
    query: web::Query<PositionQuery>,
) -> Result<HttpResponse, AppError> {
    let positions = service::list_positions(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(positions))
}

#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "Distinct departments", body = [String])
    ),
    tag = "Position"
)]
pub async fn list_departments(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let departments = service::list_departments(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(departments))
}

#[utoipa::path(
    post,
    path = "/api/positions",
    request_body = CreatePosition,
    responses(
        (status = 201, description = "Position created", body = crate::model::position::Position),
        (status = 403, description = "Company Owner privileges required"),
        (status = 422, description = "Validation failed or title taken")
    ),
    tag = "Position",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_position(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreatePosition>,
) -> Result<HttpResponse, AppError> {
    let position = service::create_position(pool.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(position))
}

#[utoipa::path(
    put,
    path = "/api/positions/{id}",
    params(
        ("id", Path, description = "Position ID")
    ),
    request_body = UpdatePosition,
    responses(
        (status = 200, description = "Position updated", body = crate::model::position::Position),
        (status = 403, description = "Company Owner privileges required"),
        (status = 404, description = "Position not found")
    ),
    tag = "Position",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_position(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdatePosition>,
) -> Result<HttpResponse, AppError> {
    let position =
        service::update_position(pool.get_ref(), &auth, path.into_inner(), payload.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(position))
}
