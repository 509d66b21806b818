use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::employee::EmployeeProfile;

/// Employee profiles by id, so list endpoints don't hit the directory per row.
#[derive(Clone)]
pub struct EmployeeCache {
    profiles: Cache<u64, EmployeeProfile>,
}

impl EmployeeCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            profiles: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, employee_id: u64) -> Option<EmployeeProfile> {
        self.profiles.get(&employee_id).await
    }

    pub async fn insert(&self, profile: EmployeeProfile) {
        self.profiles.insert(profile.id, profile).await;
    }

    /// Insert a batch of profiles concurrently
    pub async fn insert_batch(&self, profiles: &[EmployeeProfile]) {
        let futures: Vec<_> = profiles
            .iter()
            .map(|p| self.profiles.insert(p.id, p.clone()))
            .collect();

        futures::future::join_all(futures).await;
    }

    /// Load the active roster into the cache (streamed, batched)
    pub async fn warmup(&self, pool: &MySqlPool, batch_size: usize) -> Result<()> {
        let mut stream = sqlx::query_as::<_, EmployeeProfile>(
            r#"
            SELECT id, employee_code, first_name, last_name, email, status
            FROM employees
            WHERE status = 'active'
            ORDER BY id
            "#,
        )
        .fetch(pool);

        let mut batch = Vec::with_capacity(batch_size);
        let mut total_count = 0usize;

        while let Some(row) = stream.next().await {
            batch.push(row?);
            total_count += 1;

            if batch.len() >= batch_size {
                self.insert_batch(&batch).await;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            self.insert_batch(&batch).await;
        }

        tracing::info!(total_count, "Employee cache warmup complete");

        Ok(())
    }
}
