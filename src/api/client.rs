use crate::{
    auth::auth::AuthUser,
    error::AppError,
    service::client::{self as service, ClientStatusChange, CreateClient},
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

#[utoipa::path(
    get,
    path = "/api/clients",
    responses(
        (status = 200, description = "All clients", body = [crate::model::client::Client]),
        (status = 403, description = "Manager privileges required")
    ),
    tag = "Client",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_clients(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let clients = service::list_clients(pool.get_ref(), &auth).await?;
    Ok(HttpResponse::Ok().json(clients))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = crate::model::client::Client),
        (status = 403, description = "Company Owner privileges required"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Client",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_client(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateClient>,
) -> Result<HttpResponse, AppError> {
    let client = service::create_client(pool.get_ref(), &auth, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(client))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}/status",
    params(
        ("id", Path, description = "Client ID")
    ),
    request_body = ClientStatusChange,
    responses(
        (status = 200, description = "Status changed", body = crate::model::client::Client),
        (status = 403, description = "Company Owner privileges required"),
        (status = 404, description = "Client not found")
    ),
    tag = "Client",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_client_status(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<ClientStatusChange>,
) -> Result<HttpResponse, AppError> {
    let client =
        service::update_client_status(pool.get_ref(), &auth, path.into_inner(), payload.status)
            .await?;
    Ok(HttpResponse::Ok().json(client))
}
