#![allow(dead_code)]

use actix_web::test::TestRequest;
use anyhow::{Context, Result};
use hrms::auth::auth::AuthUser;
use hrms::config::{BootstrapOwner, Config};
use hrms::db::{bootstrap, init_db};
use hrms::model::employee::Employee;
use hrms::model::role::Role;
use hrms::service::{employee, session};
use hrms::utils::EmailIndex;
use sqlx::SqlitePool;

pub const OWNER_EMAIL: &str = "owner@hrms.test";
pub const OWNER_PASSWORD: &str = "owner-pass";
pub const PASSWORD: &str = "staff-pass";

pub struct TestState {
    pub pool: SqlitePool,
    pub config: Config,
    pub index: EmailIndex,
}

/// Builds the full application over the given state.
macro_rules! hrms_app {
    ($state:expr) => {
        actix_web::App::new()
            .app_data(actix_web::web::Data::new($state.pool.clone()))
            .app_data(actix_web::web::Data::new($state.config.clone()))
            .app_data(actix_web::web::Data::new($state.index.clone()))
            .configure(|cfg| hrms::routes::configure(cfg, &$state.config))
    };
}

pub async fn setup() -> Result<TestState> {
    let mut config = Config::for_tests();
    config.bootstrap_owner = Some(BootstrapOwner {
        email: OWNER_EMAIL.into(),
        password: OWNER_PASSWORD.into(),
    });

    let pool = init_db(&config.database_url, config.db_max_connections).await?;
    bootstrap(&pool, &config).await?;

    Ok(TestState {
        pool,
        config,
        index: EmailIndex::default(),
    })
}

/// The governor limiter keys on the peer address, so every request needs one.
pub fn request() -> TestRequest {
    TestRequest::default().peer_addr("127.0.0.1:8080".parse().unwrap())
}

pub fn authed(token: &str) -> TestRequest {
    request().insert_header(("Authorization", format!("Bearer {token}")))
}

pub async fn owner(state: &TestState) -> Result<AuthUser> {
    let session = session::authenticate(&state.pool, &state.config, OWNER_EMAIL, OWNER_PASSWORD)
        .await
        .context("bootstrap owner cannot log in")?;
    Ok(AuthUser {
        employee_id: session.employee.id,
        email: session.employee.email,
        role: session.employee.role,
    })
}

/// Registers and approves an employee, returning them with an access token.
pub async fn hire(state: &TestState, email: &str, role: Role, position_id: Option<i64>) -> Result<(Employee, String)> {
    let owner = owner(state).await?;
    let pending = employee::register(
        &state.pool,
        &state.index,
        employee::RegisterEmployee {
            full_name: format!("Staff {email}"),
            email: email.into(),
            department: "Executive".into(),
            role: role.to_string(),
            position_id,
            password: PASSWORD.into(),
            confirm_password: PASSWORD.into(),
        },
    )
    .await?;
    employee::approve(&state.pool, &owner, pending.id).await?;

    let session = session::authenticate(&state.pool, &state.config, email, PASSWORD).await?;
    Ok((session.employee, session.access_token))
}

pub async fn ceo_position(pool: &SqlitePool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT id FROM positions WHERE title = 'CEO'")
        .fetch_one(pool)
        .await?)
}
