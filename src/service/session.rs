use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, instrument};

use crate::auth::auth::AuthUser;
use crate::auth::jwt::{generate_access_token, generate_refresh_token, verify_token};
use crate::auth::password::verify_password;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::models::{Session, TokenType};
use crate::service::employee::fetch;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn status_gate(employee: &Employee) -> AppResult<()> {
    match employee.status {
        EmployeeStatus::Active => Ok(()),
        EmployeeStatus::Pending => Err(AppError::Authentication(
            "Account pending approval. Please wait for HR to approve your registration.".into(),
        )),
        EmployeeStatus::Inactive => Err(AppError::Authentication(
            "Account is inactive. Please contact HR.".into(),
        )),
    }
}

/// Issues an access token and stores a fresh refresh session.
async fn open_session(
    tx: &mut Transaction<'_, Sqlite>,
    config: &Config,
    employee: Employee,
) -> AppResult<Session> {
    let access_token = generate_access_token(
        employee.id,
        employee.email.clone(),
        employee.role,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(format!("Token encoding failed: {e}")))?;

    let (refresh_token, refresh_claims) = generate_refresh_token(
        employee.id,
        employee.email.clone(),
        employee.role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    )
    .map_err(|e| AppError::Internal(format!("Token encoding failed: {e}")))?;

    debug!(employee_id = employee.id, jti = %refresh_claims.jti, "Storing refresh session");

    sqlx::query("INSERT INTO sessions (employee_id, jti, expires_at) VALUES (?, ?, ?)")
        .bind(employee.id)
        .bind(&refresh_claims.jti)
        .bind(refresh_claims.exp as i64)
        .execute(&mut **tx)
        .await?;

    Ok(Session {
        access_token,
        refresh_token,
        employee,
    })
}

#[instrument(name = "auth_login", skip(pool, config, password), fields(email = %email))]
pub async fn authenticate(
    pool: &SqlitePool,
    config: &Config,
    email: &str,
    password: &str,
) -> AppResult<Session> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    let employee = match employee {
        Some(e) => e,
        None => {
            info!("Invalid credentials: unknown email");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.into()));
        }
    };

    if let Err(e) = verify_password(password, &employee.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Err(AppError::Authentication(INVALID_CREDENTIALS.into()));
    }

    // status is only revealed once the password checks out
    status_gate(&employee)?;

    let mut tx = pool.begin().await?;
    let session = open_session(&mut tx, config, employee).await?;
    tx.commit().await?;

    info!(employee_id = session.employee.id, "Login successful");
    Ok(session)
}

/// Re-reads the token holder so deactivation and role changes apply to
/// access tokens that are still within their TTL.
pub async fn resolve_actor(pool: &SqlitePool, employee_id: i64) -> AppResult<AuthUser> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::Authentication("Account no longer exists".into()))?;

    status_gate(&employee)?;

    Ok(AuthUser {
        employee_id: employee.id,
        email: employee.email,
        role: employee.role,
    })
}

/// Rotates a refresh token: the presented one is revoked and a new pair issued.
pub async fn refresh(pool: &SqlitePool, config: &Config, refresh_token: &str) -> AppResult<Session> {
    let claims = match verify_token(refresh_token, &config.jwt_secret) {
        Ok(c) if c.token_type == TokenType::Refresh => c,
        _ => return Err(AppError::Authentication("Invalid refresh token".into())),
    };

    let mut tx = pool.begin().await?;

    let revoked = sqlx::query(
        "UPDATE sessions SET revoked = 1 WHERE jti = ? AND employee_id = ? AND revoked = 0",
    )
    .bind(&claims.jti)
    .bind(claims.employee_id)
    .execute(&mut *tx)
    .await?;

    if revoked.rows_affected() == 0 {
        return Err(AppError::Authentication("Refresh token revoked".into()));
    }

    let employee = fetch(&mut tx, claims.employee_id)
        .await
        .map_err(|_| AppError::Authentication("Invalid refresh token".into()))?;
    status_gate(&employee)?;

    let session = open_session(&mut tx, config, employee).await?;
    tx.commit().await?;

    debug!(employee_id = session.employee.id, old_jti = %claims.jti, "Refresh token rotated");
    Ok(session)
}

/// Revokes the refresh session. Unknown or malformed tokens are ignored.
pub async fn logout(pool: &SqlitePool, config: &Config, refresh_token: &str) -> AppResult<()> {
    let claims = match verify_token(refresh_token, &config.jwt_secret) {
        Ok(c) if c.token_type == TokenType::Refresh => c,
        _ => return Ok(()),
    };

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE sessions SET revoked = 1 WHERE jti = ?")
        .bind(&claims.jti)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(employee_id = claims.employee_id, "Logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use crate::service::employee::{approve, register, RegisterEmployee};
    use crate::test_support::{self, PASSWORD, actor, active, count, employee};
    use crate::utils::EmailIndex;

    fn auth_message(err: AppError) -> String {
        match err {
            AppError::Authentication(msg) => msg,
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let pool = test_support::pool().await;
        let config = Config::for_tests();
        active(&pool, "a@x.com", Role::Employee).await;

        let unknown = authenticate(&pool, &config, "nobody@x.com", PASSWORD).await.unwrap_err();
        let wrong = authenticate(&pool, &config, "a@x.com", "nope").await.unwrap_err();

        assert_eq!(auth_message(unknown), INVALID_CREDENTIALS);
        assert_eq!(auth_message(wrong), INVALID_CREDENTIALS);
        assert_eq!(count(&pool, "sessions").await, 0);
    }

    #[actix_web::test]
    async fn inactive_accounts_cannot_log_in() {
        let pool = test_support::pool().await;
        let config = Config::for_tests();
        employee(&pool, "i@x.com", Role::Employee, EmployeeStatus::Inactive, None).await;

        let err = authenticate(&pool, &config, "i@x.com", PASSWORD).await.unwrap_err();
        assert!(auth_message(err).starts_with("Account is inactive"));
    }

    #[actix_web::test]
    async fn pending_then_approved_then_login() {
        let pool = test_support::pool().await;
        let config = Config::for_tests();
        let index = EmailIndex::default();
        let hr = active(&pool, "hr@x.com", Role::HrTeam).await;

        let pending = register(
            &pool,
            &index,
            RegisterEmployee {
                full_name: "Newcomer".into(),
                email: "new@x.com".into(),
                department: "IT".into(),
                role: "Employee".into(),
                position_id: None,
                password: "pw".into(),
                confirm_password: "pw".into(),
            },
        )
        .await
        .unwrap();

        let err = authenticate(&pool, &config, "new@x.com", "pw").await.unwrap_err();
        assert!(auth_message(err).starts_with("Account pending approval"));
        assert_eq!(count(&pool, "sessions").await, 0);

        approve(&pool, &actor(&hr), pending.id).await.unwrap();

        let session = authenticate(&pool, &config, "new@x.com", "pw").await.unwrap();
        assert_eq!(session.employee.id, pending.id);
        assert_eq!(count(&pool, "sessions").await, 1);

        let claims = verify_token(&session.access_token, &config.jwt_secret).unwrap();
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.employee_id, pending.id);
    }

    #[actix_web::test]
    async fn refresh_rotates_and_old_token_dies() {
        let pool = test_support::pool().await;
        let config = Config::for_tests();
        active(&pool, "a@x.com", Role::Employee).await;

        let first = authenticate(&pool, &config, "a@x.com", PASSWORD).await.unwrap();
        let second = refresh(&pool, &config, &first.refresh_token).await.unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);

        let replay = refresh(&pool, &config, &first.refresh_token).await.unwrap_err();
        assert!(matches!(replay, AppError::Authentication(_)));

        // access tokens are not accepted for rotation
        let wrong_kind = refresh(&pool, &config, &second.access_token).await.unwrap_err();
        assert!(matches!(wrong_kind, AppError::Authentication(_)));
    }

    #[actix_web::test]
    async fn logout_revokes_refresh() {
        let pool = test_support::pool().await;
        let config = Config::for_tests();
        active(&pool, "a@x.com", Role::Employee).await;

        let session = authenticate(&pool, &config, "a@x.com", PASSWORD).await.unwrap();
        logout(&pool, &config, &session.refresh_token).await.unwrap();
        logout(&pool, &config, "garbage").await.unwrap();

        assert!(refresh(&pool, &config, &session.refresh_token).await.is_err());
    }

    #[actix_web::test]
    async fn actor_is_resolved_from_the_current_row() {
        let pool = test_support::pool().await;
        let worker = active(&pool, "w@x.com", Role::Employee).await;

        let user = resolve_actor(&pool, worker.id).await.unwrap();
        assert_eq!(user.role, Role::Employee);

        sqlx::query("UPDATE employees SET role = ? WHERE id = ?")
            .bind(Role::Manager)
            .bind(worker.id)
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(resolve_actor(&pool, worker.id).await.unwrap().role, Role::Manager);

        sqlx::query("UPDATE employees SET status = ? WHERE id = ?")
            .bind(EmployeeStatus::Inactive)
            .bind(worker.id)
            .execute(&pool)
            .await
            .unwrap();
        let err = resolve_actor(&pool, worker.id).await.unwrap_err();
        assert!(auth_message(err).starts_with("Account is inactive"));

        let err = resolve_actor(&pool, 9999).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[actix_web::test]
    async fn deactivation_ends_refresh() {
        let pool = test_support::pool().await;
        let config = Config::for_tests();
        let manager = active(&pool, "m@x.com", Role::Manager).await;
        let worker = active(&pool, "w@x.com", Role::Employee).await;

        let session = authenticate(&pool, &config, "w@x.com", PASSWORD).await.unwrap();
        crate::service::employee::toggle_status(&pool, &actor(&manager), worker.id)
            .await
            .unwrap();

        assert!(refresh(&pool, &config, &session.refresh_token).await.is_err());
    }
}
