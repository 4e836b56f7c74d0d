use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppError,
    models::LoginReqDto,
    service::{
        employee::{self as employees, ChangePassword, RegisterEmployee, UpdateProfile},
        session,
    },
    utils::EmailIndex,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info};

// auth end points

fn bearer(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Self-registration. The account stays Pending until HR approves it.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterEmployee,
    responses(
        (status = 201, description = "Registered, awaiting approval", body = crate::model::employee::Employee),
        (status = 422, description = "Validation failed", body = Object, example = json!({
            "error": "validation_error",
            "message": "Request validation failed",
            "details": [{"field": "email", "message": "That email is already taken."}]
        }))
    ),
    tag = "Auth"
)]
pub async fn register(
    payload: web::Json<RegisterEmployee>,
    pool: web::Data<SqlitePool>,
    index: web::Data<EmailIndex>,
) -> Result<HttpResponse, AppError> {
    let employee = employees::register(pool.get_ref(), index.get_ref(), payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Registration successful. Please wait for HR approval.",
        "employee": employee
    })))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = crate::models::Session),
        (status = 401, description = "Invalid credentials, pending or inactive account")
    ),
    tag = "Auth"
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    if user.email.trim().is_empty() || user.password.is_empty() {
        debug!("Validation failed: empty email or password");
        return Err(AppError::field("email", "Email and password are required."));
    }

    let session = session::authenticate(pool.get_ref(), config.get_ref(), user.email.trim(), &user.password)
        .await?;
    Ok(HttpResponse::Ok().json(session))
}

/// Exchange a refresh token (sent as the bearer token) for a new pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Rotated tokens", body = crate::models::Session),
        (status = 401, description = "Invalid, revoked or expired refresh token")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let token = bearer(&req).ok_or_else(|| AppError::Authentication("Missing token".into()))?;
    let session = session::refresh(pool.get_ref(), config.get_ref(), token).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// Revoke the refresh token sent as the bearer token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Logged out (also when the token was unknown)")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    if let Some(token) = bearer(&req) {
        session::logout(pool.get_ref(), config.get_ref(), token).await?;
    }
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "The logged-in employee", body = crate::model::employee::Employee)
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(auth: AuthUser, pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let employee = employees::find_by_id(pool.get_ref(), auth.employee_id).await?;
    Ok(HttpResponse::Ok().json(employee))
}

#[utoipa::path(
    put,
    path = "/api/me/profile",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = crate::model::employee::Employee),
        (status = 422, description = "Validation failed or email taken")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    index: web::Data<EmailIndex>,
    payload: web::Json<UpdateProfile>,
) -> Result<HttpResponse, AppError> {
    let employee =
        employees::update_profile(pool.get_ref(), index.get_ref(), &auth, payload.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(employee))
}

#[utoipa::path(
    put,
    path = "/api/me/password",
    request_body = ChangePassword,
    responses(
        (status = 200, description = "Password changed", body = Object, example = json!({
            "message": "Password updated"
        })),
        (status = 422, description = "Current password incorrect or confirmation mismatch")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<ChangePassword>,
) -> Result<HttpResponse, AppError> {
    employees::change_password(pool.get_ref(), &auth, payload.into_inner()).await?;
    info!(employee_id = auth.employee_id, "Password updated via API");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password updated"
    })))
}
