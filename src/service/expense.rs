use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::expense::Expense;
use crate::model::role::Capability;
use crate::service::{FilterValue, where_clause};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LogExpense {
    #[validate(length(min = 1, max = 255, message = "Description is required."))]
    pub description: String,
    #[validate(length(min = 1, max = 50, message = "Category is required."))]
    pub category: String,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero."))]
    pub amount: f64,
    #[schema(example = "2026-01-15", format = "date", value_type = String)]
    pub incurred_on: NaiveDate,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpenseQuery {
    pub category: Option<String>,
    #[param(value_type = Option<String>, format = "date")]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date")]
    pub to: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct ExpenseReport {
    pub items: Vec<Expense>,
    pub total: f64,
}

pub async fn log_expense(pool: &SqlitePool, actor: &AuthUser, payload: LogExpense) -> AppResult<Expense> {
    actor.require(Capability::Finance)?;
    payload.validate()?;

    let mut tx = pool.begin().await?;
    let expense = sqlx::query_as::<_, Expense>(
        r#"
        INSERT INTO expenses (description, category, amount, incurred_on)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(payload.description.trim())
    .bind(payload.category.trim())
    .bind(payload.amount)
    .bind(payload.incurred_on)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    info!(expense_id = expense.id, amount = expense.amount, "Expense logged");
    Ok(expense)
}

pub async fn list_expenses(
    pool: &SqlitePool,
    actor: &AuthUser,
    query: ExpenseQuery,
) -> AppResult<ExpenseReport> {
    actor.require(Capability::Finance)?;

    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(AppError::field("to", "End date must not be before start date."));
        }
    }

    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(category) = query.category {
        conditions.push("category = ?");
        args.push(FilterValue::Str(category));
    }
    if let Some(from) = query.from {
        conditions.push("incurred_on >= ?");
        args.push(FilterValue::Str(from.to_string()));
    }
    if let Some(to) = query.to {
        conditions.push("incurred_on <= ?");
        args.push(FilterValue::Str(to.to_string()));
    }

    let sql = format!(
        "SELECT * FROM expenses{} ORDER BY incurred_on DESC, id DESC",
        where_clause(&conditions)
    );
    let mut q = sqlx::query_as::<_, Expense>(&sql);
    for arg in &args {
        q = match arg {
            FilterValue::I64(v) => q.bind(*v),
            FilterValue::Str(s) => q.bind(s.as_str()),
        };
    }
    let items = q.fetch_all(pool).await?;
    let total = items.iter().map(|e| e.amount).sum();

    Ok(ExpenseReport { items, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use crate::test_support::{self, actor, active};

    fn expense(category: &str, amount: f64, day: u32) -> LogExpense {
        LogExpense {
            description: format!("{category} purchase"),
            category: category.into(),
            amount,
            incurred_on: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
        }
    }

    #[actix_web::test]
    async fn report_filters_and_totals() {
        let pool = test_support::pool().await;
        let finance = active(&pool, "f@x.com", Role::Finance).await;
        let who = actor(&finance);

        log_expense(&pool, &who, expense("Travel", 100.0, 5)).await.unwrap();
        log_expense(&pool, &who, expense("Travel", 50.5, 20)).await.unwrap();
        log_expense(&pool, &who, expense("Office", 30.0, 10)).await.unwrap();

        let all = list_expenses(&pool, &who, ExpenseQuery::default()).await.unwrap();
        assert_eq!(all.items.len(), 3);
        assert_eq!(all.total, 180.5);

        let travel_early = list_expenses(
            &pool,
            &who,
            ExpenseQuery {
                category: Some("Travel".into()),
                to: NaiveDate::from_ymd_opt(2026, 1, 10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(travel_early.items.len(), 1);
        assert_eq!(travel_early.total, 100.0);
    }

    #[actix_web::test]
    async fn amount_must_be_positive_and_caller_finance() {
        let pool = test_support::pool().await;
        let finance = active(&pool, "f@x.com", Role::Finance).await;
        let manager = active(&pool, "m@x.com", Role::Manager).await;

        let err = log_expense(&pool, &actor(&finance), expense("Travel", 0.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = log_expense(&pool, &actor(&manager), expense("Travel", 10.0, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
