use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1000,
        "leave_type_id": 1,
        "period": 2026,
        "number_of_days": 10,
        "date_created": "2026-01-01T00:00:00Z"
    })
)]
pub struct LeaveAllocation {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub leave_type_id: u64,

    /// Year the allocation applies to
    #[schema(example = 2026)]
    pub period: i32,

    /// Remaining days, debited when a request is approved
    #[schema(example = 10)]
    pub number_of_days: i32,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub date_created: DateTime<Utc>,
}

impl LeaveAllocation {
    /// A not-yet-persisted allocation; the store assigns the id.
    pub fn new(employee_id: u64, leave_type_id: u64, period: i32, number_of_days: i32) -> Self {
        Self {
            id: 0,
            employee_id,
            leave_type_id,
            period,
            number_of_days,
            date_created: Utc::now(),
        }
    }
}
