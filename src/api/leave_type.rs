use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use sqlx::MySqlPool;

use super::begin;
use crate::auth::auth::AuthUser;
use crate::features::leave_types::{self, LeaveTypeDto};

/// List leave types
#[utoipa::path(
    get,
    path = "/api/leave-types",
    responses(
        (status = 200, description = "All leave types", body = [LeaveType]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Type"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let uow = begin(pool.get_ref()).await?;
    let all = leave_types::get_leave_types(uow).await?;

    Ok(HttpResponse::Ok().json(all))
}

/// Get a leave type
#[utoipa::path(
    get,
    path = "/api/leave-types/{leave_type_id}",
    params(
        ("leave_type_id" = u64, Path, description = "Leave type ID")
    ),
    responses(
        (status = 200, description = "Leave type found", body = LeaveType),
        (status = 404, description = "Leave type not found", body = Object, example = json!({
            "message": "LeaveType (1) was not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Type"
)]
pub async fn get_leave_type(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let uow = begin(pool.get_ref()).await?;
    let leave_type = leave_types::get_leave_type_detail(uow, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(leave_type))
}

/// Create a leave type (Admin)
#[utoipa::path(
    post,
    path = "/api/leave-types",
    request_body = LeaveTypeDto,
    responses(
        (status = 200, description = "Command result; success=false carries validation errors", body = CommandResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Type"
)]
pub async fn create_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<LeaveTypeDto>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let uow = begin(pool.get_ref()).await?;
    let response = leave_types::create_leave_type(uow, &payload).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Update a leave type (Admin)
#[utoipa::path(
    put,
    path = "/api/leave-types/{leave_type_id}",
    params(
        ("leave_type_id" = u64, Path, description = "Leave type ID")
    ),
    request_body = LeaveTypeDto,
    responses(
        (status = 200, description = "Leave type updated", body = Object, example = json!({
            "message": "Leave type updated"
        })),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Leave type not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Type"
)]
pub async fn update_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<LeaveTypeDto>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let uow = begin(pool.get_ref()).await?;
    leave_types::update_leave_type(uow, path.into_inner(), &payload).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave type updated"
    })))
}

/// Delete a leave type (Admin)
#[utoipa::path(
    delete,
    path = "/api/leave-types/{leave_type_id}",
    params(
        ("leave_type_id" = u64, Path, description = "Leave type ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Leave type not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave Type"
)]
pub async fn delete_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let uow = begin(pool.get_ref()).await?;
    leave_types::delete_leave_type(uow, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
