//! Storage contracts shared by the leave commands.
//!
//! Every command runs against one [`UnitOfWork`]: it reaches the three
//! stores through the accessor methods, and nothing it writes is visible
//! until [`UnitOfWork::save`] commits. Dropping a unit of work without
//! saving discards its writes.

use async_trait::async_trait;

use crate::model::{
    leave_allocation::LeaveAllocation, leave_request::LeaveRequest, leave_type::LeaveType,
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub type PersistenceResult<T> = Result<T, sqlx::Error>;

/// Entity stored under an integer id.
pub trait Entity: Clone + Send + Sync + 'static {
    const NAME: &'static str;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

impl Entity for LeaveType {
    const NAME: &'static str = "LeaveType";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Entity for LeaveAllocation {
    const NAME: &'static str = "LeaveAllocation";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Entity for LeaveRequest {
    const NAME: &'static str = "LeaveRequest";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

/// Single-entity CRUD by id.
#[async_trait]
pub trait Repository<T: Entity>: Send {
    async fn get(&mut self, id: u64) -> PersistenceResult<Option<T>>;

    async fn get_all(&mut self) -> PersistenceResult<Vec<T>>;

    /// Stores a new entity and returns it with its assigned id.
    async fn add(&mut self, entity: T) -> PersistenceResult<T>;

    async fn update(&mut self, entity: &T) -> PersistenceResult<()>;

    async fn delete(&mut self, entity: &T) -> PersistenceResult<()>;

    async fn exists(&mut self, id: u64) -> PersistenceResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

#[async_trait]
pub trait LeaveAllocationRepository: Repository<LeaveAllocation> {
    async fn allocation_exists(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        period: i32,
    ) -> PersistenceResult<bool>;

    /// Inserts the batch in one statement. Rows whose
    /// `(employee_id, leave_type_id, period)` already exists are skipped.
    async fn add_allocations(&mut self, allocations: Vec<LeaveAllocation>) -> PersistenceResult<()>;

    async fn get_user_allocation(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        period: i32,
    ) -> PersistenceResult<Option<LeaveAllocation>>;

    async fn get_employee_allocations(
        &mut self,
        employee_id: u64,
    ) -> PersistenceResult<Vec<LeaveAllocation>>;

    /// Subtracts `days` from the stored balance in place. Returns `false`
    /// without writing if the balance is smaller than `days`.
    async fn debit(&mut self, allocation_id: u64, days: i32) -> PersistenceResult<bool>;
}

#[async_trait]
pub trait LeaveRequestRepository: Repository<LeaveRequest> {
    /// Moves a pending request to approved/declined and mirrors the change
    /// onto `request`. Returns `false` without writing if the stored request
    /// has already been decided.
    async fn change_approval_status(
        &mut self,
        request: &mut LeaveRequest,
        approved: bool,
    ) -> PersistenceResult<bool>;

    async fn get_employee_requests(&mut self, employee_id: u64)
    -> PersistenceResult<Vec<LeaveRequest>>;

    /// Writes dates, leave type and comments only while the stored request
    /// is still pending. Returns `false` if it has been decided.
    async fn update_pending_details(&mut self, request: &LeaveRequest) -> PersistenceResult<bool>;
}

/// The stores of one transaction plus its commit.
#[async_trait]
pub trait UnitOfWork: Send + Sized {
    type LeaveTypes<'a>: Repository<LeaveType>
    where
        Self: 'a;
    type LeaveAllocations<'a>: LeaveAllocationRepository
    where
        Self: 'a;
    type LeaveRequests<'a>: LeaveRequestRepository
    where
        Self: 'a;

    fn leave_types(&mut self) -> Self::LeaveTypes<'_>;

    fn leave_allocations(&mut self) -> Self::LeaveAllocations<'_>;

    fn leave_requests(&mut self) -> Self::LeaveRequests<'_>;

    async fn save(self) -> PersistenceResult<()>;
}
