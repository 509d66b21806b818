use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub requesting_employee_id: u64,

    #[schema(example = 1)]
    pub leave_type_id: u64,

    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,

    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,

    /// null = pending, true = approved, false = declined
    pub approved: Option<bool>,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub date_requested: DateTime<Utc>,

    #[schema(format = "date-time", value_type = Option<String>, nullable = true)]
    pub date_actioned: Option<DateTime<Utc>>,

    #[schema(example = "Family trip", nullable = true)]
    pub request_comments: Option<String>,
}

impl LeaveRequest {
    pub fn status(&self) -> ApprovalStatus {
        ApprovalStatus::from(self.approved)
    }

    pub fn is_pending(&self) -> bool {
        self.approved.is_none()
    }

    /// Whole days between start and end date.
    pub fn days_requested(&self) -> i32 {
        (self.end_date - self.start_date).num_days() as i32
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Declined,
}

impl From<Option<bool>> for ApprovalStatus {
    fn from(approved: Option<bool>) -> Self {
        match approved {
            None => ApprovalStatus::Pending,
            Some(true) => ApprovalStatus::Approved,
            Some(false) => ApprovalStatus::Declined,
        }
    }
}

impl ApprovalStatus {
    pub fn matches(&self, approved: Option<bool>) -> bool {
        *self == ApprovalStatus::from(approved)
    }
}
