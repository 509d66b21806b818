use crate::auth::auth::AuthUser;
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

use super::begin;
use crate::directory::MySqlEmployeeDirectory;
use crate::error::AppError;
use crate::features::current_period;
use crate::features::leave_requests::{
    self, ChangeLeaveRequestApprovalDto, CreateLeaveRequestDto, LeaveRequestFilter,
    LeaveRequestUpdate, UpdateLeaveRequestDto,
};
use crate::persistence::mysql::MySqlUnitOfWork;
use crate::persistence::{Repository, UnitOfWork};

/// Employees may only touch their own requests; others' read as missing.
async fn ensure_own_request(
    uow: &mut MySqlUnitOfWork,
    auth: &AuthUser,
    leave_request_id: u64,
) -> Result<(), AppError> {
    if !auth.is_employee() {
        return Ok(());
    }

    let owner = uow
        .leave_requests()
        .get(leave_request_id)
        .await?
        .map(|request| request.requesting_employee_id);

    match owner {
        Some(owner) if Some(owner) != auth.employee_id => {
            Err(AppError::not_found("LeaveRequest", leave_request_id))
        }
        _ => Ok(()),
    }
}

/// List leave requests
#[utoipa::path(
    get,
    path = "/api/leave-requests",
    params(LeaveRequestFilter),
    responses(
        (status = 200, description = "Leave requests with leave type and employee", body = [LeaveRequestView]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn list_leave_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    directory: web::Data<MySqlEmployeeDirectory>,
    query: web::Query<LeaveRequestFilter>,
) -> actix_web::Result<impl Responder> {
    let mut filter = query.into_inner();

    // Employees can only see their own requests
    if auth.is_employee() {
        filter.employee_id = Some(auth.require_employee_id()?);
    }

    let uow = begin(pool.get_ref()).await?;
    let requests =
        leave_requests::get_leave_requests(uow, directory.get_ref(), &filter).await?;

    Ok(HttpResponse::Ok().json(requests))
}

/// Get a leave request
#[utoipa::path(
    get,
    path = "/api/leave-requests/{leave_request_id}",
    params(
        ("leave_request_id" = u64, Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequestView),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "LeaveRequest (1) was not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn get_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    directory: web::Data<MySqlEmployeeDirectory>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_request_id = path.into_inner();

    let uow = begin(pool.get_ref()).await?;
    let view =
        leave_requests::get_leave_request_detail(uow, directory.get_ref(), leave_request_id)
            .await?;

    if auth.is_employee() && auth.employee_id != Some(view.request.requesting_employee_id) {
        return Err(AppError::not_found("LeaveRequest", leave_request_id).into());
    }

    Ok(HttpResponse::Ok().json(view))
}

/// Apply for leave
#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body = CreateLeaveRequestDto,
    responses(
        (status = 200, description = "Command result; success=false carries validation errors", body = CommandResponse, example = json!({
            "success": true,
            "message": "Request Created",
            "id": 1,
            "errors": []
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller has no employee profile")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn create_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveRequestDto>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee_id()?;

    let uow = begin(pool.get_ref()).await?;
    let response =
        leave_requests::create_leave_request(uow, employee_id, &payload, current_period()).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Edit a pending leave request
#[utoipa::path(
    put,
    path = "/api/leave-requests/{leave_request_id}",
    params(
        ("leave_request_id" = u64, Path, description = "Leave request ID")
    ),
    request_body = UpdateLeaveRequestDto,
    responses(
        (status = 200, description = "Leave request updated", body = Object, example = json!({
            "message": "Leave request updated"
        })),
        (status = 400, description = "Validation failed or request already processed"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn update_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeaveRequestDto>,
) -> actix_web::Result<impl Responder> {
    let leave_request_id = path.into_inner();

    let mut uow = begin(pool.get_ref()).await?;
    ensure_own_request(&mut uow, &auth, leave_request_id).await?;
    leave_requests::update_leave_request(
        uow,
        leave_request_id,
        LeaveRequestUpdate::Details(payload.into_inner()),
        current_period(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request updated"
    })))
}

/// Approve or decline a leave request (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/leave-requests/{leave_request_id}/approval",
    params(
        ("leave_request_id" = u64, Path, description = "Leave request ID")
    ),
    request_body = ChangeLeaveRequestApprovalDto,
    responses(
        (status = 200, description = "Approval recorded", body = Object, example = json!({
            "message": "Leave request approved"
        })),
        (status = 400, description = "Request already processed or allocation too small"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request or allocation not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn change_approval(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ChangeLeaveRequestApprovalDto>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let dto = payload.into_inner();
    let message = if dto.approved {
        "Leave request approved"
    } else {
        "Leave request declined"
    };

    let uow = begin(pool.get_ref()).await?;
    leave_requests::update_leave_request(
        uow,
        path.into_inner(),
        LeaveRequestUpdate::Approval(dto),
        current_period(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

/// Delete a leave request
#[utoipa::path(
    delete,
    path = "/api/leave-requests/{leave_request_id}",
    params(
        ("leave_request_id" = u64, Path, description = "Leave request ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Request"
)]
pub async fn delete_leave_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_request_id = path.into_inner();

    let mut uow = begin(pool.get_ref()).await?;
    ensure_own_request(&mut uow, &auth, leave_request_id).await?;
    leave_requests::delete_leave_request(uow, leave_request_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
