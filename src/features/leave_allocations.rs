use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::directory::EmployeeDirectory;
use crate::error::AppError;
use crate::model::{leave_allocation::LeaveAllocation, leave_type::LeaveType};
use crate::models::CommandResponse;
use crate::persistence::{Entity, LeaveAllocationRepository, Repository, UnitOfWork};
use crate::validation::{validate_create_allocation, validate_update_allocation};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateLeaveAllocationDto {
    #[schema(example = 1)]
    pub leave_type_id: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateLeaveAllocationDto {
    #[schema(example = 12)]
    pub number_of_days: i32,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = 2026)]
    pub period: i32,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LeaveAllocationFilter {
    /// Only the calling employee's allocations
    #[schema(example = false)]
    pub is_logged_in_user: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveAllocationView {
    #[serde(flatten)]
    pub allocation: LeaveAllocation,
    pub leave_type: Option<LeaveType>,
}

/// Give every active employee one allocation of `leave_type_id` for `period`.
///
/// Employees that already hold an allocation for the type and period are
/// skipped, so calling this twice leaves one row per employee. The new rows
/// go to the store in a single batch.
pub async fn create_allocations<U, D>(
    mut uow: U,
    directory: &D,
    dto: &CreateLeaveAllocationDto,
    period: i32,
) -> Result<CommandResponse, AppError>
where
    U: UnitOfWork,
    D: EmployeeDirectory + ?Sized,
{
    let validation = validate_create_allocation(&mut uow, dto).await?;
    if !validation.is_valid() {
        warn!(leave_type_id = dto.leave_type_id, "Allocation request rejected by validation");
        return Ok(CommandResponse::failed(
            "Allocations Failed",
            validation.into_errors(),
        ));
    }

    let leave_type = uow
        .leave_types()
        .get(dto.leave_type_id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveType::NAME, dto.leave_type_id))?;
    let employees = directory.get_employees().await?;

    let mut allocations = Vec::with_capacity(employees.len());
    for employee in &employees {
        if uow
            .leave_allocations()
            .allocation_exists(employee.id, leave_type.id, period)
            .await?
        {
            continue;
        }

        allocations.push(LeaveAllocation::new(
            employee.id,
            leave_type.id,
            period,
            leave_type.default_days,
        ));
    }

    let created = allocations.len();
    uow.leave_allocations().add_allocations(allocations).await?;
    uow.save().await?;

    info!(
        leave_type_id = leave_type.id,
        period,
        roster = employees.len(),
        created,
        "Allocations created"
    );
    Ok(CommandResponse::succeeded("Allocations Successful", None))
}

pub async fn update_leave_allocation<U: UnitOfWork>(
    mut uow: U,
    id: u64,
    dto: &UpdateLeaveAllocationDto,
    current_period: i32,
) -> Result<(), AppError> {
    validate_update_allocation(&mut uow, dto, current_period)
        .await?
        .into_result()?;

    let mut allocation = uow
        .leave_allocations()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveAllocation::NAME, id))?;

    allocation.number_of_days = dto.number_of_days;
    allocation.leave_type_id = dto.leave_type_id;
    allocation.period = dto.period;

    uow.leave_allocations().update(&allocation).await?;
    uow.save().await?;

    info!(allocation_id = id, "Leave allocation updated");
    Ok(())
}

pub async fn delete_leave_allocation<U: UnitOfWork>(mut uow: U, id: u64) -> Result<(), AppError> {
    let allocation = uow
        .leave_allocations()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveAllocation::NAME, id))?;

    uow.leave_allocations().delete(&allocation).await?;
    uow.save().await?;

    info!(allocation_id = id, "Leave allocation deleted");
    Ok(())
}

/// All allocations, or one employee's when `employee_id` is given.
pub async fn get_leave_allocations<U: UnitOfWork>(
    mut uow: U,
    employee_id: Option<u64>,
) -> Result<Vec<LeaveAllocationView>, AppError> {
    let allocations = match employee_id {
        Some(employee_id) => {
            uow.leave_allocations()
                .get_employee_allocations(employee_id)
                .await?
        }
        None => uow.leave_allocations().get_all().await?,
    };

    let leave_types = uow.leave_types().get_all().await?;
    Ok(allocations
        .into_iter()
        .map(|allocation| {
            let leave_type = leave_types
                .iter()
                .find(|t| t.id == allocation.leave_type_id)
                .cloned();
            LeaveAllocationView {
                allocation,
                leave_type,
            }
        })
        .collect())
}

pub async fn get_leave_allocation_detail<U: UnitOfWork>(
    mut uow: U,
    id: u64,
) -> Result<LeaveAllocationView, AppError> {
    let allocation = uow
        .leave_allocations()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveAllocation::NAME, id))?;
    let leave_type = uow.leave_types().get(allocation.leave_type_id).await?;

    Ok(LeaveAllocationView {
        allocation,
        leave_type,
    })
}
