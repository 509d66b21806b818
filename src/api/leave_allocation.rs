use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

use super::begin;
use crate::auth::auth::AuthUser;
use crate::directory::MySqlEmployeeDirectory;
use crate::error::AppError;
use crate::features::current_period;
use crate::features::leave_allocations::{
    self, CreateLeaveAllocationDto, LeaveAllocationFilter, UpdateLeaveAllocationDto,
};

/// List leave allocations
#[utoipa::path(
    get,
    path = "/api/leave-allocations",
    params(LeaveAllocationFilter),
    responses(
        (status = 200, description = "Leave allocations with their leave type", body = [LeaveAllocationView]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Allocation"
)]
pub async fn list_allocations(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveAllocationFilter>,
) -> actix_web::Result<impl Responder> {
    // employees only ever see their own balance
    let employee_id = if query.is_logged_in_user.unwrap_or(false) || auth.is_employee() {
        Some(auth.require_employee_id()?)
    } else {
        None
    };

    let uow = begin(pool.get_ref()).await?;
    let allocations = leave_allocations::get_leave_allocations(uow, employee_id).await?;

    Ok(HttpResponse::Ok().json(allocations))
}

/// Get a leave allocation
#[utoipa::path(
    get,
    path = "/api/leave-allocations/{allocation_id}",
    params(
        ("allocation_id" = u64, Path, description = "Leave allocation ID")
    ),
    responses(
        (status = 200, description = "Leave allocation found", body = LeaveAllocationView),
        (status = 404, description = "Leave allocation not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Allocation"
)]
pub async fn get_allocation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let allocation_id = path.into_inner();

    let uow = begin(pool.get_ref()).await?;
    let view = leave_allocations::get_leave_allocation_detail(uow, allocation_id).await?;

    if auth.is_employee() && auth.employee_id != Some(view.allocation.employee_id) {
        return Err(AppError::not_found("LeaveAllocation", allocation_id).into());
    }

    Ok(HttpResponse::Ok().json(view))
}

/// Allocate a leave type to every active employee for the current year (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/leave-allocations",
    request_body = CreateLeaveAllocationDto,
    responses(
        (status = 200, description = "Command result; success=false carries validation errors", body = CommandResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Allocation"
)]
pub async fn create_allocations(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    directory: web::Data<MySqlEmployeeDirectory>,
    payload: web::Json<CreateLeaveAllocationDto>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let uow = begin(pool.get_ref()).await?;
    let response = leave_allocations::create_allocations(
        uow,
        directory.get_ref(),
        &payload,
        current_period(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Update a leave allocation (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/leave-allocations/{allocation_id}",
    params(
        ("allocation_id" = u64, Path, description = "Leave allocation ID")
    ),
    request_body = UpdateLeaveAllocationDto,
    responses(
        (status = 200, description = "Leave allocation updated", body = Object, example = json!({
            "message": "Leave allocation updated"
        })),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Leave allocation not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Allocation"
)]
pub async fn update_allocation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeaveAllocationDto>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let uow = begin(pool.get_ref()).await?;
    leave_allocations::update_leave_allocation(uow, path.into_inner(), &payload, current_period())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave allocation updated"
    })))
}

/// Delete a leave allocation (HR/Admin)
#[utoipa::path(
    delete,
    path = "/api/leave-allocations/{allocation_id}",
    params(
        ("allocation_id" = u64, Path, description = "Leave allocation ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Leave allocation not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Allocation"
)]
pub async fn delete_allocation(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let uow = begin(pool.get_ref()).await?;
    leave_allocations::delete_leave_allocation(uow, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
