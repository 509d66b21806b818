//! In-process stand-in for the MySQL stores, used by the command tests.
//!
//! A unit of work copies the committed state, mutates the copy and writes it
//! back on `save`, so a dropped unit of work leaves no trace.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::{
    Entity, LeaveAllocationRepository, LeaveRequestRepository, PersistenceResult, Repository,
    UnitOfWork,
};
use crate::model::{
    leave_allocation::LeaveAllocation, leave_request::LeaveRequest, leave_type::LeaveType,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub leave_types: BTreeMap<u64, LeaveType>,
    pub leave_allocations: BTreeMap<u64, LeaveAllocation>,
    pub leave_requests: BTreeMap<u64, LeaveRequest>,
    next_id: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    commits: Arc<Mutex<usize>>,
}

impl MemoryDatabase {
    pub fn begin(&self) -> MemoryUnitOfWork {
        MemoryUnitOfWork {
            db: self.clone(),
            working: self.snapshot(),
        }
    }

    pub fn snapshot(&self) -> MemoryState {
        self.state.lock().expect("memory state poisoned").clone()
    }

    /// Number of committed units of work.
    pub fn commits(&self) -> usize {
        *self.commits.lock().expect("commit counter poisoned")
    }

    pub fn seed_leave_type(&self, name: &str, default_days: i32) -> LeaveType {
        let mut state = self.state.lock().expect("memory state poisoned");
        let id = state.allocate_id();
        let leave_type = LeaveType {
            id,
            name: name.to_string(),
            default_days,
            date_created: Utc::now(),
        };
        state.leave_types.insert(id, leave_type.clone());
        leave_type
    }

    pub fn seed_allocation(&self, mut allocation: LeaveAllocation) -> LeaveAllocation {
        let mut state = self.state.lock().expect("memory state poisoned");
        allocation.id = state.allocate_id();
        state
            .leave_allocations
            .insert(allocation.id, allocation.clone());
        allocation
    }

    pub fn seed_request(&self, mut request: LeaveRequest) -> LeaveRequest {
        let mut state = self.state.lock().expect("memory state poisoned");
        request.id = state.allocate_id();
        state.leave_requests.insert(request.id, request.clone());
        request
    }
}

impl MemoryState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct MemoryUnitOfWork {
    db: MemoryDatabase,
    working: MemoryState,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    type LeaveTypes<'a> = MemoryTable<'a, LeaveType>;
    type LeaveAllocations<'a> = MemoryTable<'a, LeaveAllocation>;
    type LeaveRequests<'a> = MemoryTable<'a, LeaveRequest>;

    fn leave_types(&mut self) -> MemoryTable<'_, LeaveType> {
        MemoryTable {
            rows: &mut self.working.leave_types,
            next_id: &mut self.working.next_id,
        }
    }

    fn leave_allocations(&mut self) -> MemoryTable<'_, LeaveAllocation> {
        MemoryTable {
            rows: &mut self.working.leave_allocations,
            next_id: &mut self.working.next_id,
        }
    }

    fn leave_requests(&mut self) -> MemoryTable<'_, LeaveRequest> {
        MemoryTable {
            rows: &mut self.working.leave_requests,
            next_id: &mut self.working.next_id,
        }
    }

    async fn save(self) -> PersistenceResult<()> {
        *self.db.state.lock().expect("memory state poisoned") = self.working;
        *self.db.commits.lock().expect("commit counter poisoned") += 1;
        Ok(())
    }
}

/// One entity table of the working copy.
pub struct MemoryTable<'a, T> {
    rows: &'a mut BTreeMap<u64, T>,
    next_id: &'a mut u64,
}

#[async_trait]
impl<'a, T: Entity> Repository<T> for MemoryTable<'a, T> {
    async fn get(&mut self, id: u64) -> PersistenceResult<Option<T>> {
        Ok(self.rows.get(&id).cloned())
    }

    async fn get_all(&mut self) -> PersistenceResult<Vec<T>> {
        Ok(self.rows.values().cloned().collect())
    }

    async fn add(&mut self, mut entity: T) -> PersistenceResult<T> {
        *self.next_id += 1;
        entity.set_id(*self.next_id);
        self.rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&mut self, entity: &T) -> PersistenceResult<()> {
        if let Some(row) = self.rows.get_mut(&entity.id()) {
            *row = entity.clone();
        }
        Ok(())
    }

    async fn delete(&mut self, entity: &T) -> PersistenceResult<()> {
        self.rows.remove(&entity.id());
        Ok(())
    }
}

#[async_trait]
impl<'a> LeaveAllocationRepository for MemoryTable<'a, LeaveAllocation> {
    async fn allocation_exists(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        period: i32,
    ) -> PersistenceResult<bool> {
        Ok(self
            .get_user_allocation(employee_id, leave_type_id, period)
            .await?
            .is_some())
    }

    async fn add_allocations(&mut self, allocations: Vec<LeaveAllocation>) -> PersistenceResult<()> {
        for allocation in allocations {
            let duplicate = self.rows.values().any(|row| {
                row.employee_id == allocation.employee_id
                    && row.leave_type_id == allocation.leave_type_id
                    && row.period == allocation.period
            });
            if !duplicate {
                self.add(allocation).await?;
            }
        }
        Ok(())
    }

    async fn get_user_allocation(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        period: i32,
    ) -> PersistenceResult<Option<LeaveAllocation>> {
        Ok(self
            .rows
            .values()
            .find(|row| {
                row.employee_id == employee_id
                    && row.leave_type_id == leave_type_id
                    && row.period == period
            })
            .cloned())
    }

    async fn get_employee_allocations(
        &mut self,
        employee_id: u64,
    ) -> PersistenceResult<Vec<LeaveAllocation>> {
        Ok(self
            .rows
            .values()
            .filter(|row| row.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn debit(&mut self, allocation_id: u64, days: i32) -> PersistenceResult<bool> {
        match self.rows.get_mut(&allocation_id) {
            Some(row) if row.number_of_days >= days => {
                row.number_of_days -= days;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl<'a> LeaveRequestRepository for MemoryTable<'a, LeaveRequest> {
    async fn change_approval_status(
        &mut self,
        request: &mut LeaveRequest,
        approved: bool,
    ) -> PersistenceResult<bool> {
        let Some(row) = self.rows.get_mut(&request.id) else {
            return Ok(false);
        };
        if row.approved.is_some() {
            return Ok(false);
        }

        row.approved = Some(approved);
        row.date_actioned = Some(Utc::now());
        request.approved = row.approved;
        request.date_actioned = row.date_actioned;
        Ok(true)
    }

    async fn get_employee_requests(
        &mut self,
        employee_id: u64,
    ) -> PersistenceResult<Vec<LeaveRequest>> {
        Ok(self
            .rows
            .values()
            .filter(|row| row.requesting_employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn update_pending_details(&mut self, request: &LeaveRequest) -> PersistenceResult<bool> {
        match self.rows.get_mut(&request.id) {
            Some(row) if row.approved.is_none() => {
                row.leave_type_id = request.leave_type_id;
                row.start_date = request.start_date;
                row.end_date = request.end_date;
                row.request_comments = request.request_comments.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[actix_web::test]
    async fn debit_never_takes_the_balance_below_zero() {
        let db = MemoryDatabase::default();
        let allocation = db.seed_allocation(LeaveAllocation::new(1, 1, 2026, 10));

        let mut uow = db.begin();
        assert!(!uow.leave_allocations().debit(allocation.id, 11).await.expect("debit"));
        assert!(uow.leave_allocations().debit(allocation.id, 4).await.expect("debit"));
        assert!(uow.leave_allocations().debit(allocation.id, 4).await.expect("debit"));
        assert!(!uow.leave_allocations().debit(allocation.id, 3).await.expect("debit"));
        assert!(!uow.leave_allocations().debit(999, 1).await.expect("debit"));
        uow.save().await.expect("save");

        assert_eq!(db.snapshot().leave_allocations[&allocation.id].number_of_days, 2);
    }

    #[actix_web::test]
    async fn detail_write_is_refused_once_decided() {
        let db = MemoryDatabase::default();
        let date = |d| NaiveDate::from_ymd_opt(2026, 6, d).expect("valid date");
        let seeded = db.seed_request(LeaveRequest {
            id: 0,
            requesting_employee_id: 1,
            leave_type_id: 1,
            start_date: date(1),
            end_date: date(5),
            approved: None,
            date_requested: Utc::now(),
            date_actioned: None,
            request_comments: None,
        });

        let mut uow = db.begin();
        // an edit prepared from a copy read before the decision
        let mut stale = seeded.clone();
        stale.end_date = date(9);

        let mut decided = seeded.clone();
        assert!(
            uow.leave_requests()
                .change_approval_status(&mut decided, true)
                .await
                .expect("approve")
        );
        assert!(
            !uow.leave_requests()
                .update_pending_details(&stale)
                .await
                .expect("update")
        );
        uow.save().await.expect("save");

        let state = db.snapshot();
        let stored = &state.leave_requests[&seeded.id];
        assert_eq!(stored.end_date, date(5));
        assert_eq!(stored.approved, Some(true));
    }
}
