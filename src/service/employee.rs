use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use tracing::{debug, info, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::auth::AuthUser;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult, FieldError, field_errors, is_unique_violation};
use crate::model::employee::{Employee, EmployeeStatus};
use crate::model::position::Position;
use crate::model::role::{Capability, Role};
use crate::service::{FilterValue, Page, PageQuery, where_clause};
use crate::utils::EmailIndex;
use crate::utils::db_utils::UpdateSet;

const EMAIL_TAKEN: &str = "That email is already taken.";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterEmployee {
    #[validate(length(min = 2, max = 100, message = "Full name must be between 2 and 100 characters."))]
    #[schema(example = "John Doe")]
    pub full_name: String,

    #[validate(email(message = "Invalid email address."))]
    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "Department is required."))]
    #[schema(example = "IT")]
    pub department: String,

    /// One of Employee, HR Team, Manager, Finance, Company Owner
    #[schema(example = "Employee")]
    pub role: String,

    #[schema(example = 1, nullable = true)]
    pub position_id: Option<i64>,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords must match."))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 2, max = 100, message = "Full name must be between 2 and 100 characters."))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePassword {
    pub old_password: String,
    #[validate(length(min = 1, message = "New password is required."))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords must match."))]
    pub confirm_password: String,
}

/// HR-side edit. Any omitted field is left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    #[validate(length(min = 2, max = 100, message = "Full name must be between 2 and 100 characters."))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Department is required."))]
    pub department: Option<String>,
    pub position_id: Option<i64>,
    /// Changing the role requires the Company Owner
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department: Option<String>,
    pub status: Option<String>,
    /// Search by name or email
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

fn parse_role(raw: &str) -> Result<Role, FieldError> {
    Role::from_str(raw).map_err(|_| FieldError::new("role", "Not a valid choice."))
}

pub(crate) async fn fetch(
    tx: &mut Transaction<'_, Sqlite>,
    employee_id: i64,
) -> AppResult<Employee> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))
}

pub async fn find_by_id(pool: &SqlitePool, employee_id: i64) -> AppResult<Employee> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".into()))
}

/// The position must exist and sit in `department`.
async fn check_position(
    tx: &mut Transaction<'_, Sqlite>,
    position_id: i64,
    department: &str,
) -> Result<(), FieldError> {
    let position = sqlx::query_as::<_, Position>("SELECT * FROM positions WHERE id = ?")
        .bind(position_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            warn!(error = %e, position_id, "Position lookup failed");
            FieldError::new("position_id", "Not a valid choice.")
        })?;

    match position {
        None => Err(FieldError::new("position_id", "Not a valid choice.")),
        Some(p) if p.department != department => Err(FieldError::new(
            "position_id",
            "Position does not belong to the selected department.",
        )),
        Some(_) => Ok(()),
    }
}

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn email_available(pool: &SqlitePool, index: &EmailIndex, email: &str) -> AppResult<bool> {
    // filter miss is a definite "free"
    if !index.filter.might_exist(email) {
        return Ok(true);
    }

    if index.cache.is_taken(email).await {
        return Ok(false);
    }

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? LIMIT 1)")
            .bind(email)
            .fetch_one(pool)
            .await?;

    if exists {
        index.cache.mark_taken(email).await;
    }

    Ok(!exists)
}

/// Public sign-up. The new employee waits in Pending until HR approves.
pub async fn register(
    pool: &SqlitePool,
    index: &EmailIndex,
    payload: RegisterEmployee,
) -> AppResult<Employee> {
    let payload = RegisterEmployee {
        full_name: payload.full_name.trim().to_string(),
        department: payload.department.trim().to_string(),
        ..payload
    };

    let mut errors = match payload.validate() {
        Ok(()) => Vec::new(),
        Err(e) => field_errors(&e),
    };

    let role = match parse_role(&payload.role) {
        Ok(role) => Some(role),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    if errors.is_empty() && !email_available(pool, index, &payload.email).await? {
        errors.push(FieldError::new("email", EMAIL_TAKEN));
    }

    let role = match role {
        Some(role) if errors.is_empty() => role,
        _ => return Err(AppError::Validation(errors)),
    };

    let mut tx = pool.begin().await?;

    if let Some(position_id) = payload.position_id {
        check_position(&mut tx, position_id, &payload.department)
            .await
            .map_err(|e| AppError::Validation(vec![e]))?;
    }

    let hashed = hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let inserted = sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (full_name, email, password_hash, role, department, status, position_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(hashed)
    .bind(role)
    .bind(&payload.department)
    .bind(EmployeeStatus::Pending)
    .bind(payload.position_id)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await;

    let employee = match inserted {
        Ok(e) => e,
        // lost a race with a concurrent registration
        Err(e) if is_unique_violation(&e) => return Err(AppError::field("email", EMAIL_TAKEN)),
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;
    index.mark_taken(&employee.email).await;

    info!(employee_id = employee.id, role = %employee.role, "Employee registered, pending approval");
    Ok(employee)
}

/// Pending → Active.
pub async fn approve(pool: &SqlitePool, actor: &AuthUser, employee_id: i64) -> AppResult<Employee> {
    actor.require(Capability::Hr)?;

    let mut tx = pool.begin().await?;
    let current = fetch(&mut tx, employee_id).await?;

    if current.status != EmployeeStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Employee is already {}",
            current.status
        )));
    }

    let employee = sqlx::query_as::<_, Employee>(
        "UPDATE employees SET status = ? WHERE id = ? RETURNING *",
    )
    .bind(EmployeeStatus::Active)
    .bind(employee_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(employee_id, approved_by = actor.employee_id, "Employee approved");
    Ok(employee)
}

/// Deletes a Pending employee together with anything that references it.
pub async fn reject(
    pool: &SqlitePool,
    index: &EmailIndex,
    actor: &AuthUser,
    employee_id: i64,
) -> AppResult<Employee> {
    actor.require(Capability::Hr)?;

    let mut tx = pool.begin().await?;
    let current = fetch(&mut tx, employee_id).await?;

    if current.status != EmployeeStatus::Pending {
        return Err(AppError::Conflict(
            "Only pending registrations can be rejected".into(),
        ));
    }

    for sql in [
        "DELETE FROM sessions WHERE employee_id = ?",
        "DELETE FROM attendance WHERE employee_id = ?",
        "DELETE FROM leave_requests WHERE employee_id = ?",
        "DELETE FROM employees WHERE id = ?",
    ] {
        sqlx::query(sql).bind(employee_id).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    index.release(&current.email).await;

    info!(employee_id, rejected_by = actor.employee_id, "Pending registration rejected");
    Ok(current)
}

/// Active ↔ Inactive. Deactivation also revokes refresh sessions.
pub async fn toggle_status(
    pool: &SqlitePool,
    actor: &AuthUser,
    employee_id: i64,
) -> AppResult<Employee> {
    actor.require(Capability::Supervisor)?;

    let mut tx = pool.begin().await?;
    let current = fetch(&mut tx, employee_id).await?;

    let next = match current.status {
        EmployeeStatus::Active => EmployeeStatus::Inactive,
        EmployeeStatus::Inactive => EmployeeStatus::Active,
        EmployeeStatus::Pending => {
            return Err(AppError::Conflict(
                "Employee has not been approved yet".into(),
            ));
        }
    };

    let employee = sqlx::query_as::<_, Employee>(
        "UPDATE employees SET status = ? WHERE id = ? RETURNING *",
    )
    .bind(next)
    .bind(employee_id)
    .fetch_one(&mut *tx)
    .await?;

    if next == EmployeeStatus::Inactive {
        sqlx::query("UPDATE sessions SET revoked = 1 WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!(employee_id, status = %next, changed_by = actor.employee_id, "Employee status toggled");
    Ok(employee)
}

pub async fn update_profile(
    pool: &SqlitePool,
    index: &EmailIndex,
    actor: &AuthUser,
    payload: UpdateProfile,
) -> AppResult<Employee> {
    payload.validate()?;

    let current = find_by_id(pool, actor.employee_id).await?;
    let email_changed = payload.email != current.email;

    if email_changed && !email_available(pool, index, &payload.email).await? {
        return Err(AppError::field("email", EMAIL_TAKEN));
    }

    let mut tx = pool.begin().await?;
    let updated = sqlx::query_as::<_, Employee>(
        "UPDATE employees SET full_name = ?, email = ? WHERE id = ? RETURNING *",
    )
    .bind(&payload.full_name)
    .bind(&payload.email)
    .bind(actor.employee_id)
    .fetch_one(&mut *tx)
    .await;

    let employee = match updated {
        Ok(e) => e,
        Err(e) if is_unique_violation(&e) => return Err(AppError::field("email", EMAIL_TAKEN)),
        Err(e) => return Err(e.into()),
    };
    tx.commit().await?;

    if email_changed {
        index.release(&current.email).await;
        index.mark_taken(&employee.email).await;
    }

    debug!(employee_id = employee.id, "Profile updated");
    Ok(employee)
}

pub async fn change_password(
    pool: &SqlitePool,
    actor: &AuthUser,
    payload: ChangePassword,
) -> AppResult<()> {
    payload.validate()?;

    let current = find_by_id(pool, actor.employee_id).await?;
    if verify_password(&payload.old_password, &current.password_hash).is_err() {
        return Err(AppError::field("old_password", "Current password incorrect."));
    }

    let hashed = hash_password(&payload.new_password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE employees SET password_hash = ? WHERE id = ?")
        .bind(hashed)
        .bind(actor.employee_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(employee_id = actor.employee_id, "Password changed");
    Ok(())
}

pub async fn update_employee(
    pool: &SqlitePool,
    actor: &AuthUser,
    employee_id: i64,
    payload: UpdateEmployee,
) -> AppResult<Employee> {
    actor.require(Capability::Hr)?;
    payload.validate()?;

    let role = match payload.role.as_deref() {
        Some(raw) => {
            actor.require(Capability::Owner)?;
            Some(parse_role(raw).map_err(|e| AppError::Validation(vec![e]))?)
        }
        None => None,
    };

    let mut tx = pool.begin().await?;
    let current = fetch(&mut tx, employee_id).await?;

    let department = payload
        .department
        .as_deref()
        .map(str::trim)
        .unwrap_or(current.department.as_str())
        .to_string();

    if payload.department.is_some() || payload.position_id.is_some() {
        if let Some(position_id) = payload.position_id.or(current.position_id) {
            check_position(&mut tx, position_id, &department)
                .await
                .map_err(|e| AppError::Validation(vec![e]))?;
        }
    }

    let mut set = UpdateSet::new();
    set.set_opt("full_name", payload.full_name.map(|n| n.trim().to_string()))
        .set_opt("department", payload.department.map(|_| department.clone()))
        .set_opt("position_id", payload.position_id)
        .set_opt("role", role.map(|r| r.to_string()));

    if set.is_empty() {
        return Err(AppError::field("body", "No fields provided for update"));
    }

    set.execute(&mut tx, "employees", "id", employee_id).await?;
    let employee = fetch(&mut tx, employee_id).await?;
    tx.commit().await?;

    info!(employee_id, updated_by = actor.employee_id, "Employee record updated");
    Ok(employee)
}

pub async fn get_employee(pool: &SqlitePool, actor: &AuthUser, employee_id: i64) -> AppResult<Employee> {
    actor.require_self_or(employee_id, Capability::Supervisor)?;
    find_by_id(pool, employee_id).await
}

pub async fn list_employees(
    pool: &SqlitePool,
    actor: &AuthUser,
    query: EmployeeQuery,
) -> AppResult<EmployeeListResponse> {
    actor.require(Capability::Supervisor)?;

    let page = Page::from(PageQuery {
        page: query.page,
        per_page: query.per_page,
    });

    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(department) = query.department {
        conditions.push("department = ?");
        args.push(FilterValue::Str(department));
    }

    if let Some(status) = query.status {
        let status = EmployeeStatus::from_str(&status)
            .map_err(|_| AppError::field("status", "Not a valid status."))?;
        conditions.push("status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(search) = query.search {
        conditions.push("(full_name LIKE ? OR email LIKE ?)");
        let like = format!("%{}%", search);
        args.push(FilterValue::Str(like.clone()));
        args.push(FilterValue::Str(like));
    }

    let where_sql = where_clause(&conditions);

    let count_sql = format!("SELECT COUNT(*) FROM employees{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::I64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(s.as_str()),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        "SELECT * FROM employees{} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut data_q = sqlx::query_as::<_, Employee>(&data_sql);
    for arg in &args {
        data_q = match arg {
            FilterValue::I64(v) => data_q.bind(*v),
            FilterValue::Str(s) => data_q.bind(s.as_str()),
        };
    }
    let data = data_q
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    debug!(total, page = page.page, "Listed employees");

    Ok(EmployeeListResponse {
        data,
        page: page.page,
        per_page: page.per_page,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, actor, active, count, employee, position};

    fn registration(email: &str) -> RegisterEmployee {
        RegisterEmployee {
            full_name: "Alice Example".into(),
            email: email.into(),
            department: "IT".into(),
            role: "Employee".into(),
            position_id: None,
            password: "pw-123456".into(),
            confirm_password: "pw-123456".into(),
        }
    }

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(details) => details.into_iter().map(|d| d.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn registration_starts_pending_and_hashes_password() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();

        let emp = register(&pool, &index, registration("a@x.com")).await.unwrap();

        assert_eq!(emp.status, EmployeeStatus::Pending);
        assert_eq!(emp.role, Role::Employee);
        assert_ne!(emp.password_hash, "pw-123456");
        assert!(verify_password("pw-123456", &emp.password_hash).is_ok());
    }

    #[actix_web::test]
    async fn duplicate_email_persists_nothing() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();
        register(&pool, &index, registration("a@x.com")).await.unwrap();
        let before = count(&pool, "employees").await;

        let err = register(&pool, &index, registration("a@x.com")).await.unwrap_err();
        assert_eq!(fields(err), vec!["email"]);

        // a cold index must still find the row in the database
        let err = register(&pool, &EmailIndex::default(), registration("a@x.com"))
            .await
            .unwrap_err();
        assert_eq!(fields(err), vec!["email"]);

        assert_eq!(count(&pool, "employees").await, before);
    }

    #[actix_web::test]
    async fn email_match_is_case_sensitive() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();
        register(&pool, &index, registration("a@x.com")).await.unwrap();

        assert!(register(&pool, &index, registration("A@x.com")).await.is_ok());
    }

    #[actix_web::test]
    async fn field_rules_are_reported_together() {
        let pool = test_support::pool().await;
        let mut payload = registration("not-an-email");
        payload.full_name = "A".into();
        payload.confirm_password = "different".into();
        payload.role = "Admin".into();

        let err = register(&pool, &EmailIndex::default(), payload).await.unwrap_err();
        assert_eq!(
            fields(err),
            vec!["confirm_password", "email", "full_name", "role"]
        );
        assert_eq!(count(&pool, "employees").await, 0);
    }

    #[actix_web::test]
    async fn position_must_belong_to_department() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();
        let dev = position(&pool, "Developer", "IT", 90_000.0).await;
        let recruiter = position(&pool, "Recruiter", "HR", 60_000.0).await;

        let mut ok = registration("dev@x.com");
        ok.position_id = Some(dev);
        assert_eq!(register(&pool, &index, ok).await.unwrap().position_id, Some(dev));

        let mut wrong_dept = registration("rec@x.com");
        wrong_dept.position_id = Some(recruiter);
        assert_eq!(
            fields(register(&pool, &index, wrong_dept).await.unwrap_err()),
            vec!["position_id"]
        );

        let mut missing = registration("ghost@x.com");
        missing.position_id = Some(9999);
        assert_eq!(
            fields(register(&pool, &index, missing).await.unwrap_err()),
            vec!["position_id"]
        );
        assert_eq!(count(&pool, "employees").await, 1);
    }

    #[actix_web::test]
    async fn department_is_trimmed_before_checks() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();
        let ceo = test_support::ceo_position(&pool).await;

        let mut padded = registration("exec@x.com");
        padded.department = "Executive ".into();
        padded.position_id = Some(ceo);
        let created = register(&pool, &index, padded).await.unwrap();
        assert_eq!(created.department, "Executive");
        assert_eq!(created.position_id, Some(ceo));

        let mut blank = registration("blank@x.com");
        blank.department = "   ".into();
        assert_eq!(
            fields(register(&pool, &index, blank).await.unwrap_err()),
            vec!["department"]
        );
        assert_eq!(count(&pool, "employees").await, 1);
    }

    #[actix_web::test]
    async fn approval_is_hr_only_and_pending_only() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();
        let hr = active(&pool, "hr@x.com", Role::HrTeam).await;
        let manager = active(&pool, "m@x.com", Role::Manager).await;
        let pending = register(&pool, &index, registration("a@x.com")).await.unwrap();

        let denied = approve(&pool, &actor(&manager), pending.id).await.unwrap_err();
        assert!(matches!(denied, AppError::Forbidden(_)));

        let approved = approve(&pool, &actor(&hr), pending.id).await.unwrap();
        assert_eq!(approved.status, EmployeeStatus::Active);

        let again = approve(&pool, &actor(&hr), pending.id).await.unwrap_err();
        assert!(matches!(again, AppError::Conflict(_)));

        let missing = approve(&pool, &actor(&hr), 4242).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn rejection_deletes_pending_employee() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();
        let owner = active(&pool, "owner@x.com", Role::CompanyOwner).await;
        let pending = register(&pool, &index, registration("a@x.com")).await.unwrap();

        let removed = reject(&pool, &index, &actor(&owner), pending.id).await.unwrap();
        assert_eq!(removed.id, pending.id);
        assert!(matches!(
            find_by_id(&pool, pending.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        // the address is free again
        assert!(register(&pool, &index, registration("a@x.com")).await.is_ok());
    }

    #[actix_web::test]
    async fn active_employees_cannot_be_rejected() {
        let pool = test_support::pool().await;
        let hr = active(&pool, "hr@x.com", Role::HrTeam).await;
        let worker = active(&pool, "w@x.com", Role::Employee).await;

        let err = reject(&pool, &EmailIndex::default(), &actor(&hr), worker.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(find_by_id(&pool, worker.id).await.is_ok());
    }

    #[actix_web::test]
    async fn toggle_flips_between_active_and_inactive() {
        let pool = test_support::pool().await;
        let manager = active(&pool, "m@x.com", Role::Manager).await;
        let worker = active(&pool, "w@x.com", Role::Employee).await;
        let pending = employee(&pool, "p@x.com", Role::Employee, EmployeeStatus::Pending, None).await;

        let off = toggle_status(&pool, &actor(&manager), worker.id).await.unwrap();
        assert_eq!(off.status, EmployeeStatus::Inactive);
        let on = toggle_status(&pool, &actor(&manager), worker.id).await.unwrap();
        assert_eq!(on.status, EmployeeStatus::Active);

        let err = toggle_status(&pool, &actor(&manager), pending.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = toggle_status(&pool, &actor(&worker), manager.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[actix_web::test]
    async fn profile_update_keeps_email_unique() {
        let pool = test_support::pool().await;
        let index = EmailIndex::default();
        let a = active(&pool, "a@x.com", Role::Employee).await;
        active(&pool, "b@x.com", Role::Employee).await;

        // own address is not a conflict
        let same = update_profile(
            &pool,
            &index,
            &actor(&a),
            UpdateProfile {
                full_name: "Alice Renamed".into(),
                email: "a@x.com".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(same.full_name, "Alice Renamed");

        let err = update_profile(
            &pool,
            &index,
            &actor(&a),
            UpdateProfile {
                full_name: "Alice".into(),
                email: "b@x.com".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(fields(err), vec!["email"]);
    }

    #[actix_web::test]
    async fn password_change_requires_current_password() {
        let pool = test_support::pool().await;
        let a = active(&pool, "a@x.com", Role::Employee).await;

        let err = change_password(
            &pool,
            &actor(&a),
            ChangePassword {
                old_password: "wrong".into(),
                new_password: "next".into(),
                confirm_password: "next".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(fields(err), vec!["old_password"]);

        change_password(
            &pool,
            &actor(&a),
            ChangePassword {
                old_password: test_support::PASSWORD.into(),
                new_password: "next".into(),
                confirm_password: "next".into(),
            },
        )
        .await
        .unwrap();

        let stored = find_by_id(&pool, a.id).await.unwrap();
        assert!(verify_password("next", &stored.password_hash).is_ok());
    }

    #[actix_web::test]
    async fn role_changes_need_the_owner() {
        let pool = test_support::pool().await;
        let hr = active(&pool, "hr@x.com", Role::HrTeam).await;
        let owner = active(&pool, "o@x.com", Role::CompanyOwner).await;
        let worker = active(&pool, "w@x.com", Role::Employee).await;

        let promote = || UpdateEmployee {
            role: Some("Manager".into()),
            ..Default::default()
        };

        let err = update_employee(&pool, &actor(&hr), worker.id, promote())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = update_employee(&pool, &actor(&owner), worker.id, promote())
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Manager);

        let renamed = update_employee(
            &pool,
            &actor(&hr),
            worker.id,
            UpdateEmployee {
                full_name: Some("Walter".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.full_name, "Walter");
    }

    #[actix_web::test]
    async fn listing_filters_by_status() {
        let pool = test_support::pool().await;
        let hr = active(&pool, "hr@x.com", Role::HrTeam).await;
        employee(&pool, "p1@x.com", Role::Employee, EmployeeStatus::Pending, None).await;
        employee(&pool, "p2@x.com", Role::Employee, EmployeeStatus::Pending, None).await;

        let pending = list_employees(
            &pool,
            &actor(&hr),
            EmployeeQuery {
                status: Some("Pending".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(pending.total, 2);
        assert!(pending.data.iter().all(|e| e.status == EmployeeStatus::Pending));
    }

    #[actix_web::test]
    async fn employees_read_only_their_own_record() {
        let pool = test_support::pool().await;
        let a = active(&pool, "a@x.com", Role::Employee).await;
        let b = active(&pool, "b@x.com", Role::Employee).await;

        assert!(get_employee(&pool, &actor(&a), a.id).await.is_ok());
        assert!(matches!(
            get_employee(&pool, &actor(&a), b.id).await.unwrap_err(),
            AppError::Forbidden(_)
        ));
    }
}
