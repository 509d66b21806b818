use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::leave_type::LeaveType;
use crate::models::CommandResponse;
use crate::persistence::{Entity, Repository, UnitOfWork};
use crate::validation::validate_leave_type;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LeaveTypeDto {
    #[schema(example = "Vacation")]
    pub name: String,
    #[schema(example = 10)]
    pub default_days: i32,
}

pub async fn create_leave_type<U: UnitOfWork>(
    mut uow: U,
    dto: &LeaveTypeDto,
) -> Result<CommandResponse, AppError> {
    let validation = validate_leave_type(dto);
    if !validation.is_valid() {
        warn!(name = %dto.name, "Leave type rejected by validation");
        return Ok(CommandResponse::failed(
            "Creation Failed",
            validation.into_errors(),
        ));
    }

    let leave_type = uow
        .leave_types()
        .add(LeaveType {
            id: 0,
            name: dto.name.trim().to_string(),
            default_days: dto.default_days,
            date_created: Utc::now(),
        })
        .await?;
    uow.save().await?;

    info!(leave_type_id = leave_type.id, "Leave type created");
    Ok(CommandResponse::succeeded(
        "Creation Successful",
        Some(leave_type.id),
    ))
}

pub async fn update_leave_type<U: UnitOfWork>(
    mut uow: U,
    id: u64,
    dto: &LeaveTypeDto,
) -> Result<(), AppError> {
    validate_leave_type(dto).into_result()?;

    let mut leave_type = uow
        .leave_types()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveType::NAME, id))?;

    leave_type.name = dto.name.trim().to_string();
    leave_type.default_days = dto.default_days;

    uow.leave_types().update(&leave_type).await?;
    uow.save().await?;

    info!(leave_type_id = id, "Leave type updated");
    Ok(())
}

pub async fn delete_leave_type<U: UnitOfWork>(mut uow: U, id: u64) -> Result<(), AppError> {
    let leave_type = uow
        .leave_types()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveType::NAME, id))?;

    uow.leave_types().delete(&leave_type).await?;
    uow.save().await?;

    info!(leave_type_id = id, "Leave type deleted");
    Ok(())
}

pub async fn get_leave_types<U: UnitOfWork>(mut uow: U) -> Result<Vec<LeaveType>, AppError> {
    Ok(uow.leave_types().get_all().await?)
}

pub async fn get_leave_type_detail<U: UnitOfWork>(
    mut uow: U,
    id: u64,
) -> Result<LeaveType, AppError> {
    uow.leave_types()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveType::NAME, id))
}
