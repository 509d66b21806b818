//! Input checks run before a command touches the stores.

use crate::error::AppError;
use crate::features::leave_allocations::{CreateLeaveAllocationDto, UpdateLeaveAllocationDto};
use crate::features::leave_requests::LeaveRequestFields;
use crate::features::leave_types::LeaveTypeDto;
use crate::persistence::{PersistenceResult, Repository, UnitOfWork};

const LEAVE_TYPE_NAME_MAX_LEN: usize = 50;
const MAX_DEFAULT_DAYS: i32 = 100;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    fn check(&mut self, passed: bool, message: impl Into<String>) {
        if !passed {
            self.errors.push(message.into());
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Raise the collected messages as [`AppError::Validation`].
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

pub fn validate_leave_type(dto: &LeaveTypeDto) -> ValidationResult {
    let mut result = ValidationResult::default();
    let name = dto.name.trim();

    result.check(!name.is_empty(), "Name is required.");
    result.check(
        name.chars().count() <= LEAVE_TYPE_NAME_MAX_LEN,
        format!("Name must not exceed {LEAVE_TYPE_NAME_MAX_LEN} characters."),
    );
    result.check(dto.default_days >= 1, "Default Days must be at least 1.");
    result.check(
        dto.default_days < MAX_DEFAULT_DAYS,
        format!("Default Days must be less than {MAX_DEFAULT_DAYS}."),
    );

    result
}

/// The leave type must exist and carry a quota that can be handed out.
pub async fn validate_create_allocation<U: UnitOfWork>(
    uow: &mut U,
    dto: &CreateLeaveAllocationDto,
) -> PersistenceResult<ValidationResult> {
    let mut result = ValidationResult::default();

    if dto.leave_type_id == 0 {
        result.check(false, "Leave Type is required.");
        return Ok(result);
    }

    match uow.leave_types().get(dto.leave_type_id).await? {
        Some(leave_type) => result.check(
            leave_type.default_days >= 0,
            format!(
                "Leave Type '{}' has a negative default day quota.",
                leave_type.name
            ),
        ),
        None => result.check(false, "Leave Type does not exist."),
    }

    Ok(result)
}

pub async fn validate_update_allocation<U: UnitOfWork>(
    uow: &mut U,
    dto: &UpdateLeaveAllocationDto,
    current_period: i32,
) -> PersistenceResult<ValidationResult> {
    let mut result = ValidationResult::default();

    result.check(
        dto.number_of_days >= 0,
        "Number Of Days must not be negative.",
    );
    result.check(
        dto.period >= current_period,
        format!("Period must be {current_period} or later."),
    );
    result.check(
        dto.leave_type_id > 0 && uow.leave_types().exists(dto.leave_type_id).await?,
        "Leave Type does not exist.",
    );

    Ok(result)
}

/// Shared by request creation and detail updates.
pub async fn validate_leave_request<U: UnitOfWork>(
    uow: &mut U,
    fields: &LeaveRequestFields,
) -> PersistenceResult<ValidationResult> {
    let mut result = ValidationResult::default();

    result.check(
        fields.start_date <= fields.end_date,
        "Start Date must not be after End Date.",
    );
    result.check(
        fields.leave_type_id > 0 && uow.leave_types().exists(fields.leave_type_id).await?,
        "Leave Type does not exist.",
    );

    Ok(result)
}
