use sqlx::MySqlPool;

use crate::error::AppError;
use crate::persistence::mysql::MySqlUnitOfWork;

pub mod leave_allocation;
pub mod leave_request;
pub mod leave_type;

/// Open the unit of work for one request.
async fn begin(pool: &MySqlPool) -> Result<MySqlUnitOfWork, AppError> {
    MySqlUnitOfWork::begin(pool).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to open transaction");
        AppError::from(e)
    })
}
