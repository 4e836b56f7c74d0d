use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult, is_unique_violation};
use crate::model::client::{Client, ClientStatus};
use crate::model::employee::EmployeeStatus;
use crate::model::role::Capability;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 100, message = "Company name is required."))]
    #[schema(example = "Acme Ltd")]
    pub company_name: String,
    pub contact_person: Option<String>,
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub assigned_manager_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClientStatusChange {
    pub status: ClientStatus,
}

pub async fn create_client(
    pool: &SqlitePool,
    actor: &AuthUser,
    payload: CreateClient,
) -> AppResult<Client> {
    actor.require(Capability::Owner)?;
    payload.validate()?;

    let mut tx = pool.begin().await?;

    if let Some(manager_id) = payload.assigned_manager_id {
        let status: Option<EmployeeStatus> =
            sqlx::query_scalar("SELECT status FROM employees WHERE id = ?")
                .bind(manager_id)
                .fetch_optional(&mut *tx)
                .await?;

        if status != Some(EmployeeStatus::Active) {
            return Err(AppError::field(
                "assigned_manager_id",
                "Assigned manager must be an active employee.",
            ));
        }
    }

    let created = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (company_name, contact_person, email, phone, status, assigned_manager_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(payload.company_name.trim())
    .bind(payload.contact_person)
    .bind(payload.email)
    .bind(payload.phone)
    .bind(ClientStatus::Active)
    .bind(payload.assigned_manager_id)
    .fetch_one(&mut *tx)
    .await;

    let client = match created {
        Ok(c) => c,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::field("email", "A client with that email already exists."));
        }
        Err(e) => return Err(e.into()),
    };
    tx.commit().await?;

    info!(client_id = client.id, created_by = actor.employee_id, "Client created");
    Ok(client)
}

pub async fn list_clients(pool: &SqlitePool, actor: &AuthUser) -> AppResult<Vec<Client>> {
    actor.require(Capability::Manager)?;

    let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY company_name")
        .fetch_all(pool)
        .await?;
    Ok(clients)
}

pub async fn update_client_status(
    pool: &SqlitePool,
    actor: &AuthUser,
    client_id: i64,
    status: ClientStatus,
) -> AppResult<Client> {
    actor.require(Capability::Owner)?;

    let mut tx = pool.begin().await?;
    let client = sqlx::query_as::<_, Client>("UPDATE clients SET status = ? WHERE id = ? RETURNING *")
        .bind(status)
        .bind(client_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".into()))?;
    tx.commit().await?;

    info!(client_id, status = %status, "Client status changed");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use crate::test_support::{self, actor, active, employee};

    fn acme(manager: Option<i64>) -> CreateClient {
        CreateClient {
            company_name: "Acme Ltd".into(),
            contact_person: Some("Wile E.".into()),
            email: Some("ops@acme.test".into()),
            phone: None,
            assigned_manager_id: manager,
        }
    }

    #[actix_web::test]
    async fn owner_creates_and_managers_list() {
        let pool = test_support::pool().await;
        let owner = active(&pool, "o@x.com", Role::CompanyOwner).await;
        let manager = active(&pool, "m@x.com", Role::Manager).await;
        let worker = active(&pool, "w@x.com", Role::Employee).await;

        assert!(matches!(
            create_client(&pool, &actor(&manager), acme(None)).await.unwrap_err(),
            AppError::Forbidden(_)
        ));

        let client = create_client(&pool, &actor(&owner), acme(Some(manager.id))).await.unwrap();
        assert_eq!(client.status, ClientStatus::Active);
        assert_eq!(client.assigned_manager_id, Some(manager.id));

        assert_eq!(list_clients(&pool, &actor(&manager)).await.unwrap().len(), 1);
        assert!(list_clients(&pool, &actor(&worker)).await.is_err());
    }

    #[actix_web::test]
    async fn manager_must_be_active_and_email_unique() {
        let pool = test_support::pool().await;
        let owner = active(&pool, "o@x.com", Role::CompanyOwner).await;
        let gone = employee(&pool, "g@x.com", Role::Manager, EmployeeStatus::Inactive, None).await;

        let err = create_client(&pool, &actor(&owner), acme(Some(gone.id))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        create_client(&pool, &actor(&owner), acme(None)).await.unwrap();
        let dup = create_client(&pool, &actor(&owner), acme(None)).await.unwrap_err();
        assert!(matches!(dup, AppError::Validation(_)));
    }

    #[actix_web::test]
    async fn status_changes() {
        let pool = test_support::pool().await;
        let owner = active(&pool, "o@x.com", Role::CompanyOwner).await;
        let client = create_client(&pool, &actor(&owner), acme(None)).await.unwrap();

        let off = update_client_status(&pool, &actor(&owner), client.id, ClientStatus::Inactive)
            .await
            .unwrap();
        assert_eq!(off.status, ClientStatus::Inactive);

        let missing = update_client_status(&pool, &actor(&owner), 404, ClientStatus::Active)
            .await
            .unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }
}
