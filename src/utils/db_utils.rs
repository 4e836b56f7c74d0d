use sqlx::{Sqlite, Transaction};

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Null,
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::I64(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::F64(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// ===============================
/// Partial update builder
/// ===============================
/// Column names are `'static` so only compile-time identifiers reach the SQL text.
#[derive(Debug, Default)]
pub struct UpdateSet {
    assignments: Vec<(&'static str, SqlValue)>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        self.assignments.push((column, value.into()));
        self
    }

    /// Adds the assignment only when a value was supplied.
    pub fn set_opt<T: Into<SqlValue>>(&mut self, column: &'static str, value: Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.set(column, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn to_sql(&self, table: &str, id_column: &str) -> String {
        let set_clause = self
            .assignments
            .iter()
            .map(|(k, _)| format!("{} = ?", k))
            .collect::<Vec<_>>()
            .join(", ");

        format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column)
    }

    /// ===============================
    /// Execute the update
    /// ===============================
    pub async fn execute(
        self,
        tx: &mut Transaction<'_, Sqlite>,
        table: &str,
        id_column: &str,
        id_value: i64,
    ) -> Result<u64, sqlx::Error> {
        let sql = self.to_sql(table, id_column);
        let mut query = sqlx::query(&sql);

        for (_, value) in self.assignments {
            query = match value {
                SqlValue::String(v) => query.bind(v),
                SqlValue::I64(v) => query.bind(v),
                SqlValue::F64(v) => query.bind(v),
                SqlValue::Null => query.bind(None::<String>),
            };
        }

        let result = query.bind(id_value).execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_set_clause_in_call_order() {
        let mut set = UpdateSet::new();
        set.set("full_name", "Jane".to_string())
            .set_opt("position_id", None::<i64>)
            .set_opt("department", Some("HR".to_string()))
            .set("logo_ref", None::<String>);

        assert_eq!(
            set.to_sql("employees", "id"),
            "UPDATE employees SET full_name = ?, department = ?, logo_ref = ? WHERE id = ?"
        );
    }

    #[test]
    fn empty_set() {
        assert!(UpdateSet::new().is_empty());
    }
}
