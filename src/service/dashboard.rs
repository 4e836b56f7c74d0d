use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppResult;
use crate::model::employee::Employee;
use crate::model::role::Capability;

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub employees: i64,
    pub clients: i64,
    pub positions: i64,
    /// All pending requests for supervisors, own pending requests otherwise
    pub pending_leave: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentGroup {
    pub department: String,
    pub employees: Vec<Employee>,
}

async fn scalar(pool: &SqlitePool, sql: &str) -> AppResult<i64> {
    Ok(sqlx::query_scalar(sql).fetch_one(pool).await?)
}

pub async fn dashboard(pool: &SqlitePool, actor: &AuthUser) -> AppResult<Dashboard> {
    let pending_leave: i64 = if actor.can(Capability::Supervisor) {
        scalar(pool, "SELECT COUNT(*) FROM leave_requests WHERE status = 'Pending'").await?
    } else {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM leave_requests WHERE status = 'Pending' AND employee_id = ?",
        )
        .bind(actor.employee_id)
        .fetch_one(pool)
        .await?
    };

    Ok(Dashboard {
        employees: scalar(pool, "SELECT COUNT(*) FROM employees").await?,
        clients: scalar(pool, "SELECT COUNT(*) FROM clients").await?,
        positions: scalar(pool, "SELECT COUNT(*) FROM positions").await?,
        pending_leave,
    })
}

/// Active employees grouped by department, departments in name order.
pub async fn org_chart(pool: &SqlitePool, actor: &AuthUser) -> AppResult<Vec<DepartmentGroup>> {
    actor.require(Capability::Manager)?;

    let employees = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE status = 'Active' ORDER BY department, full_name",
    )
    .fetch_all(pool)
    .await?;

    let mut groups: BTreeMap<String, Vec<Employee>> = BTreeMap::new();
    for employee in employees {
        groups
            .entry(employee.department.clone())
            .or_default()
            .push(employee);
    }

    Ok(groups
        .into_iter()
        .map(|(department, employees)| DepartmentGroup {
            department,
            employees,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;
    use crate::model::role::Role;
    use crate::service::leave::{SubmitLeave, submit_leave};
    use crate::model::leave_request::LeaveType;
    use crate::test_support::{self, actor, active, employee};
    use chrono::NaiveDate;

    #[actix_web::test]
    async fn pending_leave_count_depends_on_role() {
        let pool = test_support::pool().await;
        let hr = active(&pool, "hr@x.com", Role::HrTeam).await;
        let a = active(&pool, "a@x.com", Role::Employee).await;
        let b = active(&pool, "b@x.com", Role::Employee).await;

        let day = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        for who in [&a, &b] {
            submit_leave(
                &pool,
                &actor(who),
                SubmitLeave {
                    leave_type: LeaveType::Sick,
                    start_date: day,
                    end_date: day,
                },
            )
            .await
            .unwrap();
        }

        let supervisor = dashboard(&pool, &actor(&hr)).await.unwrap();
        assert_eq!(supervisor.pending_leave, 2);
        assert_eq!(supervisor.employees, 3);
        assert_eq!(supervisor.positions, 1);

        assert_eq!(dashboard(&pool, &actor(&a)).await.unwrap().pending_leave, 1);
    }

    #[actix_web::test]
    async fn org_chart_groups_active_employees() {
        let pool = test_support::pool().await;
        let manager = active(&pool, "m@x.com", Role::Manager).await;
        active(&pool, "a@x.com", Role::Employee).await;
        employee(&pool, "p@x.com", Role::Employee, EmployeeStatus::Pending, None).await;

        let chart = org_chart(&pool, &actor(&manager)).await.unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].department, "Executive");
        assert_eq!(chart[0].employees.len(), 2);

        let worker = active(&pool, "w@x.com", Role::Employee).await;
        assert!(org_chart(&pool, &actor(&worker)).await.is_err());
    }
}
