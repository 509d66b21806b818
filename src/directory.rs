//! Read-only view of the employee roster.

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::model::employee::EmployeeProfile;
use crate::persistence::PersistenceResult;
use crate::utils::employee_cache::EmployeeCache;

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Active employees only.
    async fn get_employees(&self) -> PersistenceResult<Vec<EmployeeProfile>>;

    async fn get_employee(&self, employee_id: u64) -> PersistenceResult<Option<EmployeeProfile>>;
}

/// Directory over the `employees` table with cached single-profile lookups.
#[derive(Clone)]
pub struct MySqlEmployeeDirectory {
    pool: MySqlPool,
    cache: EmployeeCache,
}

impl MySqlEmployeeDirectory {
    pub fn new(pool: MySqlPool, cache: EmployeeCache) -> Self {
        Self { pool, cache }
    }
}

#[async_trait]
impl EmployeeDirectory for MySqlEmployeeDirectory {
    async fn get_employees(&self) -> PersistenceResult<Vec<EmployeeProfile>> {
        let employees = sqlx::query_as::<_, EmployeeProfile>(
            r#"
            SELECT id, employee_code, first_name, last_name, email, status
            FROM employees
            WHERE status = 'active'
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.cache.insert_batch(&employees).await;
        Ok(employees)
    }

    async fn get_employee(&self, employee_id: u64) -> PersistenceResult<Option<EmployeeProfile>> {
        if let Some(profile) = self.cache.get(employee_id).await {
            return Ok(Some(profile));
        }

        let profile = sqlx::query_as::<_, EmployeeProfile>(
            r#"
            SELECT id, employee_code, first_name, last_name, email, status
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(profile) = &profile {
            self.cache.insert(profile.clone()).await;
        }

        Ok(profile)
    }
}
