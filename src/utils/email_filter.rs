use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use sqlx::SqlitePool;
use std::sync::{Arc, RwLock};

/// Expected capacity and false-positive rate.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Probabilistic set of registered emails. A miss means the email is free;
/// a hit must be confirmed elsewhere.
#[derive(Clone)]
pub struct EmailFilter {
    inner: Arc<RwLock<CuckooFilter<String>>>,
}

impl Default for EmailFilter {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CuckooFilter::new(
                FILTER_CAPACITY,
                FALSE_POSITIVE_RATE,
            ))),
        }
    }
}

impl EmailFilter {
    /// Check if an email might be registered (false positives possible)
    pub fn might_exist(&self, email: &str) -> bool {
        let email = email.to_string();
        // a poisoned lock degrades to "maybe", which falls through to the database
        match self.inner.read() {
            Ok(filter) => filter.contains(&email),
            Err(_) => true,
        }
    }

    pub fn insert(&self, email: &str) {
        let email = email.to_string();
        if let Ok(mut filter) = self.inner.write() {
            filter.add(&email);
        }
    }

    pub fn remove(&self, email: &str) {
        let email = email.to_string();
        if let Ok(mut filter) = self.inner.write() {
            filter.remove(&email);
        }
    }

    /// Load every registered email using streaming + batching
    pub async fn warmup(&self, pool: &SqlitePool, batch_size: usize) -> Result<()> {
        let mut stream = sqlx::query_as::<_, (String,)>("SELECT email FROM employees").fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total = 0usize;

        while let Some(row) = stream.next().await {
            let (email,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

            batch.push(email);
            total += 1;

            if batch.len() == batch_size {
                self.insert_batch(&batch);
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.insert_batch(&batch);
        }

        tracing::info!(total, "Email filter warmup complete");
        Ok(())
    }

    fn insert_batch(&self, emails: &[String]) {
        if let Ok(mut filter) = self.inner.write() {
            for email in emails {
                filter.add(email);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserted_emails_might_exist() {
        let filter = EmailFilter::default();
        assert!(!filter.might_exist("a@x.com"));

        filter.insert("a@x.com");
        assert!(filter.might_exist("a@x.com"));

        filter.remove("a@x.com");
        assert!(!filter.might_exist("a@x.com"));
    }
}
