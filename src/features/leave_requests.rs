use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::directory::EmployeeDirectory;
use crate::error::AppError;
use crate::model::{
    employee::EmployeeProfile,
    leave_allocation::LeaveAllocation,
    leave_request::{ApprovalStatus, LeaveRequest},
    leave_type::LeaveType,
};
use crate::models::CommandResponse;
use crate::persistence::{
    Entity, LeaveAllocationRepository, LeaveRequestRepository, Repository, UnitOfWork,
};
use crate::validation::validate_leave_request;

/// The fields an employee chooses when filing or editing a request.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequestFields {
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateLeaveRequestDto {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "Family trip")]
    pub request_comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateLeaveRequestDto {
    #[schema(example = "2026-01-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-06", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "Moved by a day")]
    pub request_comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ChangeLeaveRequestApprovalDto {
    #[schema(example = true)]
    pub approved: bool,
}

impl CreateLeaveRequestDto {
    fn fields(&self) -> LeaveRequestFields {
        LeaveRequestFields {
            leave_type_id: self.leave_type_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

impl UpdateLeaveRequestDto {
    fn fields(&self) -> LeaveRequestFields {
        LeaveRequestFields {
            leave_type_id: self.leave_type_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// The two ways a request can be changed; one per call.
#[derive(Debug, Clone)]
pub enum LeaveRequestUpdate {
    Details(UpdateLeaveRequestDto),
    Approval(ChangeLeaveRequestApprovalDto),
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LeaveRequestFilter {
    /// Filter by requesting employee
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Filter by approval status
    #[schema(example = "pending")]
    pub status: Option<ApprovalStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveRequestView {
    #[serde(flatten)]
    pub request: LeaveRequest,
    pub status: ApprovalStatus,
    pub leave_type: Option<LeaveType>,
    pub employee: Option<EmployeeProfile>,
}

/// File a pending request for `employee_id`.
///
/// The employee must hold an allocation of the leave type for `period` with
/// enough days left to cover the request.
pub async fn create_leave_request<U: UnitOfWork>(
    mut uow: U,
    employee_id: u64,
    dto: &CreateLeaveRequestDto,
    period: i32,
) -> Result<CommandResponse, AppError> {
    let mut validation = validate_leave_request(&mut uow, &dto.fields()).await?.into_errors();

    if validation.is_empty() {
        let allocation = uow
            .leave_allocations()
            .get_user_allocation(employee_id, dto.leave_type_id, period)
            .await?;
        let days_requested = (dto.end_date - dto.start_date).num_days();

        match allocation {
            None => validation.push("You do not have any allocations for this leave type.".into()),
            Some(a) if days_requested > i64::from(a.number_of_days) => {
                validation.push("You do not have enough days for this request.".into())
            }
            Some(_) => {}
        }
    }

    if !validation.is_empty() {
        warn!(employee_id, leave_type_id = dto.leave_type_id, "Leave request rejected");
        return Ok(CommandResponse::failed("Request Failed", validation));
    }

    let request = uow
        .leave_requests()
        .add(LeaveRequest {
            id: 0,
            requesting_employee_id: employee_id,
            leave_type_id: dto.leave_type_id,
            start_date: dto.start_date,
            end_date: dto.end_date,
            approved: None,
            date_requested: Utc::now(),
            date_actioned: None,
            request_comments: dto.request_comments.clone(),
        })
        .await?;
    uow.save().await?;

    info!(leave_request_id = request.id, employee_id, "Leave request submitted");
    Ok(CommandResponse::succeeded("Request Created", Some(request.id)))
}

/// Edit a pending request's details, or decide it.
///
/// Deciding is write-once: a request that is already approved or declined
/// is rejected with [`AppError::BadRequest`]. Approval debits the requested
/// days from the employee's allocation for `period`; a missing or too-small
/// allocation fails the whole unit of work.
pub async fn update_leave_request<U: UnitOfWork>(
    mut uow: U,
    id: u64,
    update: LeaveRequestUpdate,
    period: i32,
) -> Result<(), AppError> {
    let mut request = uow
        .leave_requests()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveRequest::NAME, id))?;

    match update {
        LeaveRequestUpdate::Details(dto) => {
            if !request.is_pending() {
                return Err(AppError::BadRequest(format!(
                    "Leave request {id} is already {} and can no longer be edited",
                    request.status()
                )));
            }
            validate_leave_request(&mut uow, &dto.fields())
                .await?
                .into_result()?;

            request.start_date = dto.start_date;
            request.end_date = dto.end_date;
            request.leave_type_id = dto.leave_type_id;
            request.request_comments = dto.request_comments;
            let updated = uow.leave_requests().update_pending_details(&request).await?;
            if !updated {
                warn!(leave_request_id = id, "Leave request decided before edit");
                return Err(AppError::BadRequest(format!(
                    "Leave request {id} has already been processed and can no longer be edited"
                )));
            }

            info!(leave_request_id = id, "Leave request details updated");
        }
        LeaveRequestUpdate::Approval(dto) => {
            let changed = uow
                .leave_requests()
                .change_approval_status(&mut request, dto.approved)
                .await?;
            if !changed {
                warn!(leave_request_id = id, "Leave request already processed");
                return Err(AppError::BadRequest(
                    "Leave request has already been processed".into(),
                ));
            }

            if dto.approved {
                debit_allocation(&mut uow, &request, period).await?;
            }

            info!(leave_request_id = id, status = %request.status(), "Leave request decided");
        }
    }

    uow.save().await?;
    Ok(())
}

async fn debit_allocation<U: UnitOfWork>(
    uow: &mut U,
    request: &LeaveRequest,
    period: i32,
) -> Result<LeaveAllocation, AppError> {
    let mut allocation = uow
        .leave_allocations()
        .get_user_allocation(request.requesting_employee_id, request.leave_type_id, period)
        .await?
        .ok_or_else(|| {
            AppError::not_found(
                LeaveAllocation::NAME,
                format!(
                    "employee {}, leave type {}, period {period}",
                    request.requesting_employee_id, request.leave_type_id
                ),
            )
        })?;

    let days_requested = request.days_requested();
    // the store re-checks the balance in the same statement it subtracts in
    let debited = uow
        .leave_allocations()
        .debit(allocation.id, days_requested)
        .await?;
    if !debited {
        return Err(AppError::BadRequest(format!(
            "Allocation has {} days left, request needs {days_requested}",
            allocation.number_of_days
        )));
    }

    allocation.number_of_days -= days_requested;
    Ok(allocation)
}

pub async fn delete_leave_request<U: UnitOfWork>(mut uow: U, id: u64) -> Result<(), AppError> {
    let request = uow
        .leave_requests()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveRequest::NAME, id))?;

    uow.leave_requests().delete(&request).await?;
    uow.save().await?;

    info!(leave_request_id = id, "Leave request deleted");
    Ok(())
}

pub async fn get_leave_request_detail<U, D>(
    mut uow: U,
    directory: &D,
    id: u64,
) -> Result<LeaveRequestView, AppError>
where
    U: UnitOfWork,
    D: EmployeeDirectory + ?Sized,
{
    let request = uow
        .leave_requests()
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(LeaveRequest::NAME, id))?;
    let leave_type = uow.leave_types().get(request.leave_type_id).await?;
    let employee = directory
        .get_employee(request.requesting_employee_id)
        .await?;

    Ok(LeaveRequestView {
        status: request.status(),
        request,
        leave_type,
        employee,
    })
}

pub async fn get_leave_requests<U, D>(
    mut uow: U,
    directory: &D,
    filter: &LeaveRequestFilter,
) -> Result<Vec<LeaveRequestView>, AppError>
where
    U: UnitOfWork,
    D: EmployeeDirectory + ?Sized,
{
    let requests = match filter.employee_id {
        Some(employee_id) => {
            uow.leave_requests()
                .get_employee_requests(employee_id)
                .await?
        }
        None => uow.leave_requests().get_all().await?,
    };
    let leave_types = uow.leave_types().get_all().await?;

    let mut views = Vec::with_capacity(requests.len());
    for request in requests {
        if filter
            .status
            .is_some_and(|status| !status.matches(request.approved))
        {
            continue;
        }

        let leave_type = leave_types
            .iter()
            .find(|t| t.id == request.leave_type_id)
            .cloned();
        let employee = directory
            .get_employee(request.requesting_employee_id)
            .await?;

        views.push(LeaveRequestView {
            status: request.status(),
            request,
            leave_type,
            employee,
        });
    }

    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::memory::MemoryDirectory;
    use crate::features::leave_allocations::{CreateLeaveAllocationDto, create_allocations};
    use crate::persistence::memory::MemoryDatabase;

    const PERIOD: i32 = 2026;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(PERIOD, 6, d).expect("valid date")
    }

    fn pending(employee_id: u64, leave_type_id: u64, start: u32, end: u32) -> LeaveRequest {
        LeaveRequest {
            id: 0,
            requesting_employee_id: employee_id,
            leave_type_id,
            start_date: day(start),
            end_date: day(end),
            approved: None,
            date_requested: Utc::now(),
            date_actioned: None,
            request_comments: None,
        }
    }

    fn approve(approved: bool) -> LeaveRequestUpdate {
        LeaveRequestUpdate::Approval(ChangeLeaveRequestApprovalDto { approved })
    }

    fn balance(db: &MemoryDatabase, employee_id: u64, leave_type_id: u64) -> Option<i32> {
        db.snapshot()
            .leave_allocations
            .values()
            .find(|a| {
                a.employee_id == employee_id && a.leave_type_id == leave_type_id && a.period == PERIOD
            })
            .map(|a| a.number_of_days)
    }

    /// Vacation with 10 days, employees 1 and 2 allocated for PERIOD.
    async fn vacation_setup() -> (MemoryDatabase, LeaveType) {
        let db = MemoryDatabase::default();
        let vacation = db.seed_leave_type("Vacation", 10);
        let directory = MemoryDirectory::with_employees(&[1, 2]);
        create_allocations(
            db.begin(),
            &directory,
            &CreateLeaveAllocationDto {
                leave_type_id: vacation.id,
            },
            PERIOD,
        )
        .await
        .expect("allocate");
        (db, vacation)
    }

    #[actix_web::test]
    async fn approving_debits_only_the_requesters_allocation() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(1, vacation.id, 1, 5));

        update_leave_request(db.begin(), request.id, approve(true), PERIOD)
            .await
            .expect("approve");

        assert_eq!(balance(&db, 1, vacation.id), Some(6));
        assert_eq!(balance(&db, 2, vacation.id), Some(10));
        let state = db.snapshot();
        let stored = &state.leave_requests[&request.id];
        assert_eq!(stored.approved, Some(true));
        assert!(stored.date_actioned.is_some());
    }

    #[actix_web::test]
    async fn declining_leaves_the_allocation_alone() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(1, vacation.id, 1, 5));

        update_leave_request(db.begin(), request.id, approve(false), PERIOD)
            .await
            .expect("decline");

        assert_eq!(balance(&db, 1, vacation.id), Some(10));
        assert_eq!(
            db.snapshot().leave_requests[&request.id].status(),
            ApprovalStatus::Declined
        );
    }

    #[actix_web::test]
    async fn second_decision_is_rejected_without_debit() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(1, vacation.id, 1, 5));

        update_leave_request(db.begin(), request.id, approve(true), PERIOD)
            .await
            .expect("approve");
        let commits = db.commits();

        let err = update_leave_request(db.begin(), request.id, approve(true), PERIOD)
            .await
            .expect_err("already approved");
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = update_leave_request(db.begin(), request.id, approve(false), PERIOD)
            .await
            .expect_err("already approved");
        assert!(matches!(err, AppError::BadRequest(_)));

        assert_eq!(balance(&db, 1, vacation.id), Some(6));
        assert_eq!(db.commits(), commits);
    }

    #[actix_web::test]
    async fn approval_without_allocation_rolls_back() {
        let db = MemoryDatabase::default();
        let sick = db.seed_leave_type("Sick", 5);
        let request = db.seed_request(pending(1, sick.id, 1, 2));

        let err = update_leave_request(db.begin(), request.id, approve(true), PERIOD)
            .await
            .expect_err("no allocation");

        assert!(matches!(err, AppError::NotFound { entity: "LeaveAllocation", .. }));
        assert!(db.snapshot().leave_requests[&request.id].is_pending());
        assert_eq!(db.commits(), 0);
    }

    #[actix_web::test]
    async fn approval_cannot_overdraw_the_allocation() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(2, vacation.id, 1, 20));

        let err = update_leave_request(db.begin(), request.id, approve(true), PERIOD)
            .await
            .expect_err("19 days > 10");

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(balance(&db, 2, vacation.id), Some(10));
        assert!(db.snapshot().leave_requests[&request.id].is_pending());
    }

    #[actix_web::test]
    async fn allocation_from_another_period_is_not_debited() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(1, vacation.id, 1, 3));

        let err = update_leave_request(db.begin(), request.id, approve(true), PERIOD + 1)
            .await
            .expect_err("no allocation for next period");

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(balance(&db, 1, vacation.id), Some(10));
    }

    #[actix_web::test]
    async fn unknown_request_is_not_found_and_writes_nothing() {
        let (db, _) = vacation_setup().await;
        let commits = db.commits();
        let before = db.snapshot();

        let err = update_leave_request(db.begin(), 404, approve(true), PERIOD)
            .await
            .expect_err("missing");
        assert!(matches!(err, AppError::NotFound { entity: "LeaveRequest", .. }));

        let details = LeaveRequestUpdate::Details(UpdateLeaveRequestDto {
            start_date: day(1),
            end_date: day(2),
            leave_type_id: 1,
            request_comments: None,
        });
        let err = update_leave_request(db.begin(), 404, details, PERIOD)
            .await
            .expect_err("missing");
        assert!(matches!(err, AppError::NotFound { .. }));

        assert_eq!(db.commits(), commits);
        assert_eq!(db.snapshot().leave_allocations, before.leave_allocations);
    }

    #[actix_web::test]
    async fn detail_update_validates_then_merges() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(1, vacation.id, 1, 5));
        let commits = db.commits();

        let reversed = LeaveRequestUpdate::Details(UpdateLeaveRequestDto {
            start_date: day(9),
            end_date: day(3),
            leave_type_id: vacation.id,
            request_comments: None,
        });
        let err = update_leave_request(db.begin(), request.id, reversed, PERIOD)
            .await
            .expect_err("reversed dates");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(db.commits(), commits);
        {
            let state = db.snapshot();
            let untouched = &state.leave_requests[&request.id];
            assert_eq!(untouched.start_date, day(1));
            assert_eq!(untouched.end_date, day(5));
        }

        let moved = LeaveRequestUpdate::Details(UpdateLeaveRequestDto {
            start_date: day(2),
            end_date: day(6),
            leave_type_id: vacation.id,
            request_comments: Some("Moved by a day".into()),
        });
        update_leave_request(db.begin(), request.id, moved, PERIOD)
            .await
            .expect("update");

        let state = db.snapshot();
        let stored = &state.leave_requests[&request.id];
        assert_eq!(stored.start_date, day(2));
        assert_eq!(stored.end_date, day(6));
        assert_eq!(stored.request_comments.as_deref(), Some("Moved by a day"));
        assert!(stored.is_pending());
    }

    #[actix_web::test]
    async fn successive_approvals_draw_down_one_balance() {
        let (db, vacation) = vacation_setup().await;
        let first = db.seed_request(pending(1, vacation.id, 1, 5));
        let second = db.seed_request(pending(1, vacation.id, 10, 14));
        let third = db.seed_request(pending(1, vacation.id, 20, 23));

        update_leave_request(db.begin(), first.id, approve(true), PERIOD)
            .await
            .expect("first");
        update_leave_request(db.begin(), second.id, approve(true), PERIOD)
            .await
            .expect("second");
        assert_eq!(balance(&db, 1, vacation.id), Some(2));

        let commits = db.commits();
        let err = update_leave_request(db.begin(), third.id, approve(true), PERIOD)
            .await
            .expect_err("only 2 days left");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(db.commits(), commits);
        assert_eq!(balance(&db, 1, vacation.id), Some(2));
        assert!(db.snapshot().leave_requests[&third.id].is_pending());
    }

    #[actix_web::test]
    async fn decided_requests_cannot_be_edited() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(1, vacation.id, 1, 5));
        update_leave_request(db.begin(), request.id, approve(false), PERIOD)
            .await
            .expect("decline");

        let edit = LeaveRequestUpdate::Details(UpdateLeaveRequestDto {
            start_date: day(2),
            end_date: day(3),
            leave_type_id: vacation.id,
            request_comments: None,
        });
        let err = update_leave_request(db.begin(), request.id, edit, PERIOD)
            .await
            .expect_err("declined");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[actix_web::test]
    async fn create_checks_dates_and_remaining_days() {
        let (db, vacation) = vacation_setup().await;

        let too_long = CreateLeaveRequestDto {
            start_date: day(1),
            end_date: day(20),
            leave_type_id: vacation.id,
            request_comments: None,
        };
        let response = create_leave_request(db.begin(), 1, &too_long, PERIOD)
            .await
            .expect("response");
        assert!(!response.success);
        assert_eq!(
            response.errors,
            vec!["You do not have enough days for this request.".to_string()]
        );

        let short = CreateLeaveRequestDto {
            end_date: day(2),
            ..too_long.clone()
        };
        let unallocated = create_leave_request(db.begin(), 9, &short, PERIOD)
            .await
            .expect("response");
        assert!(!unallocated.success);

        let ok = CreateLeaveRequestDto {
            end_date: day(5),
            ..too_long
        };
        let response = create_leave_request(db.begin(), 1, &ok, PERIOD)
            .await
            .expect("response");
        assert!(response.success);

        let id = response.id.expect("new id");
        let state = db.snapshot();
        let stored = &state.leave_requests[&id];
        assert_eq!(stored.requesting_employee_id, 1);
        assert!(stored.is_pending());
    }

    #[actix_web::test]
    async fn list_filters_by_employee_and_status() {
        let (db, vacation) = vacation_setup().await;
        let directory = MemoryDirectory::with_employees(&[1, 2]);
        let first = db.seed_request(pending(1, vacation.id, 1, 2));
        db.seed_request(pending(1, vacation.id, 3, 4));
        db.seed_request(pending(2, vacation.id, 1, 2));
        update_leave_request(db.begin(), first.id, approve(true), PERIOD)
            .await
            .expect("approve");

        let all = get_leave_requests(db.begin(), &directory, &LeaveRequestFilter::default())
            .await
            .expect("all");
        assert_eq!(all.len(), 3);

        let filter = LeaveRequestFilter {
            employee_id: Some(1),
            status: Some(ApprovalStatus::Pending),
        };
        let mine = get_leave_requests(db.begin(), &directory, &filter)
            .await
            .expect("mine");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, ApprovalStatus::Pending);
        assert_eq!(mine[0].employee.as_ref().map(|e| e.id), Some(1));

        let detail = get_leave_request_detail(db.begin(), &directory, first.id)
            .await
            .expect("detail");
        assert_eq!(detail.status, ApprovalStatus::Approved);
        assert_eq!(detail.leave_type.map(|t| t.name), Some("Vacation".into()));
    }

    #[actix_web::test]
    async fn delete_is_independent_of_allocations() {
        let (db, vacation) = vacation_setup().await;
        let request = db.seed_request(pending(1, vacation.id, 1, 5));
        update_leave_request(db.begin(), request.id, approve(true), PERIOD)
            .await
            .expect("approve");

        delete_leave_request(db.begin(), request.id)
            .await
            .expect("delete");

        assert!(db.snapshot().leave_requests.is_empty());
        assert_eq!(balance(&db, 1, vacation.id), Some(6));
        let err = delete_leave_request(db.begin(), request.id)
            .await
            .expect_err("gone");
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
