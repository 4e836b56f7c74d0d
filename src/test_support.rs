//! Fixtures shared by the unit tests.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::config::Config;
use crate::db;
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::role::Role;

pub const PASSWORD: &str = "correct horse";

/// Fresh in-memory store with migrations and bootstrap rows.
pub async fn pool() -> SqlitePool {
    let pool = db::init_db("sqlite::memory:", 1).await.unwrap();
    db::bootstrap(&pool, &Config::for_tests()).await.unwrap();
    pool
}

/// File-backed store with several connections, so concurrent writers really
/// race. The directory must outlive the pool.
pub async fn file_pool() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("hrms.db").display());
    let pool = db::init_db(&url, 8).await.unwrap();
    db::bootstrap(&pool, &Config::for_tests()).await.unwrap();
    (dir, pool)
}

pub async fn position(pool: &SqlitePool, title: &str, department: &str, base_salary: f64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO positions (title, department, base_salary) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(title)
    .bind(department)
    .bind(base_salary)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn ceo_position(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT id FROM positions WHERE title = 'CEO'")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn employee(
    pool: &SqlitePool,
    email: &str,
    role: Role,
    status: EmployeeStatus,
    position_id: Option<i64>,
) -> Employee {
    sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (full_name, email, password_hash, role, department, status, position_id, created_at)
        VALUES (?, ?, ?, ?, 'Executive', ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(format!("Test {email}"))
    .bind(email)
    .bind(hash_password(PASSWORD).unwrap())
    .bind(role)
    .bind(status)
    .bind(position_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn active(pool: &SqlitePool, email: &str, role: Role) -> Employee {
    employee(pool, email, role, EmployeeStatus::Active, None).await
}

pub fn actor(employee: &Employee) -> AuthUser {
    AuthUser {
        employee_id: employee.id,
        email: employee.email.clone(),
        role: employee.role,
    }
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
