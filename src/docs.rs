use crate::features::leave_allocations::{
    CreateLeaveAllocationDto, LeaveAllocationFilter, LeaveAllocationView, UpdateLeaveAllocationDto,
};
use crate::features::leave_requests::{
    ChangeLeaveRequestApprovalDto, CreateLeaveRequestDto, LeaveRequestFilter, LeaveRequestView,
    UpdateLeaveRequestDto,
};
use crate::features::leave_types::LeaveTypeDto;
use crate::model::employee::EmployeeProfile;
use crate::model::leave_allocation::LeaveAllocation;
use crate::model::leave_request::{ApprovalStatus, LeaveRequest};
use crate::model::leave_type::LeaveType;
use crate::models::CommandResponse;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave Management

This API tracks **leave types**, yearly **leave allocations** per employee, and **leave requests** with their approval.

### 🔹 Key Features
- **Leave Types**
  - Define categories of leave with a default number of days per year
- **Leave Allocations**
  - Allocate a leave type to every active employee for the current year in one call
  - Adjust an individual allocation
- **Leave Requests**
  - Apply for leave, edit pending requests, approve or decline them
  - Approval debits the requested days from the employee's allocation

### 🔐 Security
All endpoints are protected using **JWT Bearer authentication**.
Only **Admin** can manage leave types; **HR** and **Admin** manage allocations and approve requests.

### 📦 Response Format
- JSON-based RESTful responses
- Commands answer with `success`, `message`, `id` and `errors`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_type::list_leave_types,
        crate::api::leave_type::get_leave_type,
        crate::api::leave_type::create_leave_type,
        crate::api::leave_type::update_leave_type,
        crate::api::leave_type::delete_leave_type,

        crate::api::leave_allocation::list_allocations,
        crate::api::leave_allocation::get_allocation,
        crate::api::leave_allocation::create_allocations,
        crate::api::leave_allocation::update_allocation,
        crate::api::leave_allocation::delete_allocation,

        crate::api::leave_request::list_leave_requests,
        crate::api::leave_request::get_leave_request,
        crate::api::leave_request::create_leave_request,
        crate::api::leave_request::update_leave_request,
        crate::api::leave_request::change_approval,
        crate::api::leave_request::delete_leave_request
    ),
    components(
        schemas(
            LeaveType,
            LeaveTypeDto,
            LeaveAllocation,
            LeaveAllocationView,
            LeaveAllocationFilter,
            CreateLeaveAllocationDto,
            UpdateLeaveAllocationDto,
            LeaveRequest,
            LeaveRequestView,
            LeaveRequestFilter,
            CreateLeaveRequestDto,
            UpdateLeaveRequestDto,
            ChangeLeaveRequestApprovalDto,
            ApprovalStatus,
            EmployeeProfile,
            CommandResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave Type", description = "Leave type management APIs"),
        (name = "Leave Allocation", description = "Leave allocation APIs"),
        (name = "Leave Request", description = "Leave request and approval APIs"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
