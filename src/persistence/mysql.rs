use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder, Transaction};

use super::{
    LeaveAllocationRepository, LeaveRequestRepository, PersistenceResult, Repository, UnitOfWork,
};
use crate::model::{
    leave_allocation::LeaveAllocation, leave_request::LeaveRequest, leave_type::LeaveType,
};

const LEAVE_TYPE_COLUMNS: &str = "id, name, default_days, date_created";
const ALLOCATION_COLUMNS: &str =
    "id, employee_id, leave_type_id, `period`, number_of_days, date_created";
const REQUEST_COLUMNS: &str = "id, requesting_employee_id, leave_type_id, start_date, end_date, \
     approved, date_requested, date_actioned, request_comments";

/// One MySQL transaction shared by the three stores.
pub struct MySqlUnitOfWork {
    tx: Transaction<'static, MySql>,
}

impl MySqlUnitOfWork {
    pub async fn begin(pool: &MySqlPool) -> PersistenceResult<Self> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    type LeaveTypes<'a> = MySqlLeaveTypes<'a>;
    type LeaveAllocations<'a> = MySqlLeaveAllocations<'a>;
    type LeaveRequests<'a> = MySqlLeaveRequests<'a>;

    fn leave_types(&mut self) -> MySqlLeaveTypes<'_> {
        MySqlLeaveTypes {
            conn: &mut *self.tx,
        }
    }

    fn leave_allocations(&mut self) -> MySqlLeaveAllocations<'_> {
        MySqlLeaveAllocations {
            conn: &mut *self.tx,
        }
    }

    fn leave_requests(&mut self) -> MySqlLeaveRequests<'_> {
        MySqlLeaveRequests {
            conn: &mut *self.tx,
        }
    }

    async fn save(self) -> PersistenceResult<()> {
        self.tx.commit().await
    }
}

/* =========================
Leave types
========================= */
pub struct MySqlLeaveTypes<'a> {
    conn: &'a mut MySqlConnection,
}

#[async_trait]
impl<'a> Repository<LeaveType> for MySqlLeaveTypes<'a> {
    async fn get(&mut self, id: u64) -> PersistenceResult<Option<LeaveType>> {
        let sql = format!("SELECT {LEAVE_TYPE_COLUMNS} FROM leave_types WHERE id = ?");
        sqlx::query_as::<_, LeaveType>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    async fn get_all(&mut self) -> PersistenceResult<Vec<LeaveType>> {
        let sql = format!("SELECT {LEAVE_TYPE_COLUMNS} FROM leave_types ORDER BY id");
        sqlx::query_as::<_, LeaveType>(&sql)
            .fetch_all(&mut *self.conn)
            .await
    }

    async fn add(&mut self, mut entity: LeaveType) -> PersistenceResult<LeaveType> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_types (name, default_days, date_created)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&entity.name)
        .bind(entity.default_days)
        .bind(entity.date_created)
        .execute(&mut *self.conn)
        .await?;

        entity.id = result.last_insert_id();
        Ok(entity)
    }

    async fn update(&mut self, entity: &LeaveType) -> PersistenceResult<()> {
        sqlx::query("UPDATE leave_types SET name = ?, default_days = ? WHERE id = ?")
            .bind(&entity.name)
            .bind(entity.default_days)
            .bind(entity.id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, entity: &LeaveType) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM leave_types WHERE id = ?")
            .bind(entity.id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

/* =========================
Leave allocations
========================= */
pub struct MySqlLeaveAllocations<'a> {
    conn: &'a mut MySqlConnection,
}

#[async_trait]
impl<'a> Repository<LeaveAllocation> for MySqlLeaveAllocations<'a> {
    async fn get(&mut self, id: u64) -> PersistenceResult<Option<LeaveAllocation>> {
        let sql = format!("SELECT {ALLOCATION_COLUMNS} FROM leave_allocations WHERE id = ?");
        sqlx::query_as::<_, LeaveAllocation>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    async fn get_all(&mut self) -> PersistenceResult<Vec<LeaveAllocation>> {
        let sql = format!("SELECT {ALLOCATION_COLUMNS} FROM leave_allocations ORDER BY id");
        sqlx::query_as::<_, LeaveAllocation>(&sql)
            .fetch_all(&mut *self.conn)
            .await
    }

    async fn add(&mut self, mut entity: LeaveAllocation) -> PersistenceResult<LeaveAllocation> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_allocations
                (employee_id, leave_type_id, `period`, number_of_days, date_created)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entity.employee_id)
        .bind(entity.leave_type_id)
        .bind(entity.period)
        .bind(entity.number_of_days)
        .bind(entity.date_created)
        .execute(&mut *self.conn)
        .await?;

        entity.id = result.last_insert_id();
        Ok(entity)
    }

    async fn update(&mut self, entity: &LeaveAllocation) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            UPDATE leave_allocations
            SET leave_type_id = ?, `period` = ?, number_of_days = ?
            WHERE id = ?
            "#,
        )
        .bind(entity.leave_type_id)
        .bind(entity.period)
        .bind(entity.number_of_days)
        .bind(entity.id)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, entity: &LeaveAllocation) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM leave_allocations WHERE id = ?")
            .bind(entity.id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<'a> LeaveAllocationRepository for MySqlLeaveAllocations<'a> {
    async fn allocation_exists(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        period: i32,
    ) -> PersistenceResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM leave_allocations
                WHERE employee_id = ? AND leave_type_id = ? AND `period` = ?
                LIMIT 1
            )
            "#,
        )
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(period)
        .fetch_one(&mut *self.conn)
        .await
    }

    async fn add_allocations(&mut self, allocations: Vec<LeaveAllocation>) -> PersistenceResult<()> {
        if allocations.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<MySql>::new(
            "INSERT INTO leave_allocations \
             (employee_id, leave_type_id, `period`, number_of_days, date_created) ",
        );
        builder.push_values(allocations.iter(), |mut row, allocation| {
            row.push_bind(allocation.employee_id)
                .push_bind(allocation.leave_type_id)
                .push_bind(allocation.period)
                .push_bind(allocation.number_of_days)
                .push_bind(allocation.date_created);
        });
        // uq_allocation_employee_type_period turns a racing duplicate into a no-op
        builder.push(" ON DUPLICATE KEY UPDATE id = id");

        builder.build().execute(&mut *self.conn).await?;
        Ok(())
    }

    async fn get_user_allocation(
        &mut self,
        employee_id: u64,
        leave_type_id: u64,
        period: i32,
    ) -> PersistenceResult<Option<LeaveAllocation>> {
        let sql = format!(
            "SELECT {ALLOCATION_COLUMNS} FROM leave_allocations \
             WHERE employee_id = ? AND leave_type_id = ? AND `period` = ?"
        );
        sqlx::query_as::<_, LeaveAllocation>(&sql)
            .bind(employee_id)
            .bind(leave_type_id)
            .bind(period)
            .fetch_optional(&mut *self.conn)
            .await
    }

    async fn get_employee_allocations(
        &mut self,
        employee_id: u64,
    ) -> PersistenceResult<Vec<LeaveAllocation>> {
        let sql = format!(
            "SELECT {ALLOCATION_COLUMNS} FROM leave_allocations \
             WHERE employee_id = ? ORDER BY `period` DESC, leave_type_id"
        );
        sqlx::query_as::<_, LeaveAllocation>(&sql)
            .bind(employee_id)
            .fetch_all(&mut *self.conn)
            .await
    }

    async fn debit(&mut self, allocation_id: u64, days: i32) -> PersistenceResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE leave_allocations
            SET number_of_days = number_of_days - ?
            WHERE id = ?
            AND number_of_days >= ?
            "#,
        )
        .bind(days)
        .bind(allocation_id)
        .bind(days)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/* =========================
Leave requests
========================= */
pub struct MySqlLeaveRequests<'a> {
    conn: &'a mut MySqlConnection,
}

#[async_trait]
impl<'a> Repository<LeaveRequest> for MySqlLeaveRequests<'a> {
    async fn get(&mut self, id: u64) -> PersistenceResult<Option<LeaveRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE id = ?");
        sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
    }

    async fn get_all(&mut self) -> PersistenceResult<Vec<LeaveRequest>> {
        let sql =
            format!("SELECT {REQUEST_COLUMNS} FROM leave_requests ORDER BY date_requested DESC");
        sqlx::query_as::<_, LeaveRequest>(&sql)
            .fetch_all(&mut *self.conn)
            .await
    }

    async fn add(&mut self, mut entity: LeaveRequest) -> PersistenceResult<LeaveRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (requesting_employee_id, leave_type_id, start_date, end_date,
                 approved, date_requested, request_comments)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entity.requesting_employee_id)
        .bind(entity.leave_type_id)
        .bind(entity.start_date)
        .bind(entity.end_date)
        .bind(entity.approved)
        .bind(entity.date_requested)
        .bind(&entity.request_comments)
        .execute(&mut *self.conn)
        .await?;

        entity.id = result.last_insert_id();
        Ok(entity)
    }

    async fn update(&mut self, entity: &LeaveRequest) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            UPDATE leave_requests
            SET leave_type_id = ?, start_date = ?, end_date = ?, request_comments = ?
            WHERE id = ?
            "#,
        )
        .bind(entity.leave_type_id)
        .bind(entity.start_date)
        .bind(entity.end_date)
        .bind(&entity.request_comments)
        .bind(entity.id)
        .execute(&mut *self.conn)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, entity: &LeaveRequest) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(entity.id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<'a> LeaveRequestRepository for MySqlLeaveRequests<'a> {
    async fn change_approval_status(
        &mut self,
        request: &mut LeaveRequest,
        approved: bool,
    ) -> PersistenceResult<bool> {
        let actioned_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET approved = ?, date_actioned = ?
            WHERE id = ?
            AND approved IS NULL
            "#,
        )
        .bind(approved)
        .bind(actioned_at)
        .bind(request.id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        request.approved = Some(approved);
        request.date_actioned = Some(actioned_at);
        Ok(true)
    }

    async fn get_employee_requests(
        &mut self,
        employee_id: u64,
    ) -> PersistenceResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests \
             WHERE requesting_employee_id = ? ORDER BY date_requested DESC"
        );
        sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .fetch_all(&mut *self.conn)
            .await
    }

    async fn update_pending_details(&mut self, request: &LeaveRequest) -> PersistenceResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET leave_type_id = ?, start_date = ?, end_date = ?, request_comments = ?
            WHERE id = ?
            AND approved IS NULL
            "#,
        )
        .bind(request.leave_type_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.request_comments)
        .bind(request.id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
