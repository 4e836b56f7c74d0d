use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::auth::password::hash_password;
use crate::config::Config;
use crate::model::role::Role;

const DEFAULT_COMPANY_NAME: &str = "My Company";

/// Opens the pool and applies embedded migrations.
pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database url: {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    if !in_memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        // every connection to :memory: is a separate database, keep exactly one alive
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    info!(database_url, "Database ready");
    Ok(pool)
}

/// Rows that must exist before the first request is served.
pub async fn bootstrap(pool: &SqlitePool, config: &Config) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO company_settings (id, name) VALUES (1, ?)")
        .bind(DEFAULT_COMPANY_NAME)
        .execute(pool)
        .await
        .context("Failed to create company settings")?;

    let ceo = sqlx::query(
        "INSERT OR IGNORE INTO positions (title, department, base_salary) VALUES ('CEO', 'Executive', 150000.0)",
    )
    .execute(pool)
    .await
    .context("Failed to seed CEO position")?;
    if ceo.rows_affected() > 0 {
        info!("Seeded default CEO position");
    }

    if let Some(owner) = &config.bootstrap_owner {
        let employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(pool)
            .await?;

        if employees == 0 {
            let hash = hash_password(&owner.password)
                .map_err(|e| anyhow::anyhow!("Failed to hash owner password: {e}"))?;
            sqlx::query(
                r#"
                INSERT INTO employees (full_name, email, password_hash, role, department, status, position_id, created_at)
                VALUES ('Company Owner', ?, ?, ?, 'Executive', 'Active',
                        (SELECT id FROM positions WHERE title = 'CEO'), ?)
                "#,
            )
            .bind(&owner.email)
            .bind(hash)
            .bind(Role::CompanyOwner)
            .bind(Utc::now())
            .execute(pool)
            .await
            .context("Failed to create bootstrap owner")?;
            info!(email = %owner.email, "Created bootstrap owner account");
        }
    }

    Ok(())
}
