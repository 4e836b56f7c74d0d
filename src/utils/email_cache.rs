use anyhow::Result;
use futures::StreamExt;
use moka::future::Cache;
use sqlx::SqlitePool;
use std::time::Duration;

/// Recently confirmed taken emails.
#[derive(Clone)]
pub struct EmailCache {
    inner: Cache<String, ()>,
}

impl Default for EmailCache {
    fn default() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(500_000)
                .time_to_live(Duration::from_secs(86400)) // 24h TTL
                .build(),
        }
    }
}

impl EmailCache {
    pub async fn mark_taken(&self, email: &str) {
        self.inner.insert(email.to_string(), ()).await;
    }

    pub async fn is_taken(&self, email: &str) -> bool {
        self.inner.get(email).await.is_some()
    }

    pub async fn release(&self, email: &str) {
        self.inner.invalidate(email).await;
    }

    async fn batch_mark(&self, emails: &[String]) {
        let inserts: Vec<_> = emails
            .iter()
            .map(|e| self.inner.insert(e.clone(), ()))
            .collect();

        futures::future::join_all(inserts).await;
    }

    /// Load emails of employees created in the last `days` days (batched)
    pub async fn warmup(&self, pool: &SqlitePool, days: u32, batch_size: usize) -> Result<()> {
        let since = chrono::Utc::now() - chrono::Duration::days(i64::from(days));
        let mut stream = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT email
            FROM employees
            WHERE created_at >= ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(since)
        .fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            let (email,) = row?;
            batch.push(email);
            total += 1;

            if batch.len() >= batch_size {
                self.batch_mark(&batch).await;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.batch_mark(&batch).await;
        }

        tracing::info!(total, days, "Email cache warmup complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn mark_and_release() {
        let cache = EmailCache::default();
        assert!(!cache.is_taken("a@x.com").await);

        cache.mark_taken("a@x.com").await;
        assert!(cache.is_taken("a@x.com").await);
        // exact match only
        assert!(!cache.is_taken("A@x.com").await);

        cache.release("a@x.com").await;
        assert!(!cache.is_taken("a@x.com").await);
    }
}
