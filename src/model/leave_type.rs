use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Vacation",
        "default_days": 10,
        "date_created": "2026-01-01T00:00:00Z"
    })
)]
pub struct LeaveType {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Vacation")]
    pub name: String,

    /// Number of days every employee is allocated per period
    #[schema(example = 10)]
    pub default_days: i32,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub date_created: DateTime<Utc>,
}
