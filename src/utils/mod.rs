pub mod db_utils;
pub mod email_cache;
pub mod email_filter;

use sqlx::SqlitePool;

pub use email_cache::EmailCache;
pub use email_filter::EmailFilter;

/// In-memory fast paths in front of the `employees.email` unique column.
#[derive(Clone, Default)]
pub struct EmailIndex {
    pub filter: EmailFilter,
    pub cache: EmailCache,
}

impl EmailIndex {
    pub async fn warmup(&self, pool: &SqlitePool) -> anyhow::Result<()> {
        self.filter.warmup(pool, 100).await?;
        self.cache.warmup(pool, 30, 250).await?;
        Ok(())
    }

    pub async fn mark_taken(&self, email: &str) {
        self.filter.insert(email);
        self.cache.mark_taken(email).await;
    }

    pub async fn release(&self, email: &str) {
        self.filter.remove(email);
        self.cache.release(email).await;
    }
}
