//! Leave commands and queries. Each function takes its unit of work by
//! value and commits it as its last step.

use chrono::{Datelike, Utc};

pub mod leave_allocations;
pub mod leave_requests;
pub mod leave_types;

/// The allocation period for "now": the current calendar year.
pub fn current_period() -> i32 {
    Utc::now().year()
}
