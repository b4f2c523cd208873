use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{FromRow, MySql, MySqlPool, error::ErrorKind, mysql::MySqlArguments, query::QueryAs};

use crate::db::repository::{
    AttendanceRepository, DecisionEffect, EmployeeRepository, RepoError, ReportFilter,
    RequestFilter, RequestRepository, ScheduleRepository, ShiftRepository,
};
use crate::model::{
    approval::{ApprovalStatus, Decision, RequestKind},
    attendance::{
        AttendanceRecord, AttendanceReportRow, AttendanceStatus, CheckOutUpdate, NewAttendance,
        StatusFlags,
    },
    employee::Employee,
    leave_request::{LeaveRequest, NewLeaveRequest},
    schedule::{NewScheduleAssignment, ScheduleAssignment},
    schedule_change::{NewScheduleChange, ScheduleChangeRequest},
    shift::Shift,
    timesheet_adjustment::{NewTimesheetAdjustment, TimesheetAdjustmentRequest},
};

/// MySQL-backed implementation of every repository trait.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(&'static str),
    Date(NaiveDate),
}

fn bind_filters<'q, O>(
    mut q: QueryAs<'q, MySql, O, MySqlArguments>,
    args: &[FilterValue],
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for arg in args {
        q = match arg {
            FilterValue::U64(v) => q.bind(*v),
            FilterValue::Str(s) => q.bind(*s),
            FilterValue::Date(d) => q.bind(*d),
        };
    }
    q
}

fn map_write_error(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.kind() {
            ErrorKind::UniqueViolation => return RepoError::Duplicate,
            ErrorKind::ForeignKeyViolation | ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                return RepoError::Constraint(db_err.message().to_string());
            }
            _ => {}
        }
    }
    RepoError::Database(e)
}

fn parse_enum<T: FromStr>(value: &str, column: &str) -> Result<T, RepoError> {
    T::from_str(value).map_err(|_| RepoError::Decode(format!("{column} = {value:?}")))
}

fn decision_from(
    status: ApprovalStatus,
    decided_by: Option<u64>,
    decided_at: Option<NaiveDateTime>,
    admin_note: Option<String>,
) -> Option<Decision> {
    if status.is_pending() {
        return None;
    }
    Some(Decision {
        status,
        decided_by: decided_by?,
        decided_at: decided_at?,
        admin_note,
    })
}

fn request_table(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::TimesheetAdjustment => "timesheet_adjustment_requests",
        RequestKind::Leave => "leave_requests",
        RequestKind::ScheduleChange => "schedule_change_requests",
    }
}

fn request_where(filter: &RequestFilter) -> (String, Vec<FilterValue>) {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args = Vec::new();

    if let Some(emp_id) = filter.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }
    if let Some(status) = filter.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.into()));
    }
    (where_sql, args)
}

const UPSERT_SCHEDULE_SQL: &str = r#"
    INSERT INTO schedules (employee_id, work_date, shift_id, note)
    VALUES (?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE
        shift_id = VALUES(shift_id),
        note = VALUES(note),
        id = LAST_INSERT_ID(id)
"#;

/* =========================
Row types
========================= */

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    work_date: NaiveDate,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    status: String,
    status_flags: u8,
    note: Option<String>,
    overtime_minutes: u32,
    approval_status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = RepoError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            work_date: row.work_date,
            check_in: row.check_in,
            check_out: row.check_out,
            status: parse_enum::<AttendanceStatus>(&row.status, "attendance.status")?,
            flags: StatusFlags::from_bits(row.status_flags),
            note: row.note,
            overtime_minutes: row.overtime_minutes,
            approval_status: parse_enum(&row.approval_status, "attendance.approval_status")?,
        })
    }
}

const ATTENDANCE_COLUMNS: &str = "id, employee_id, work_date, check_in, check_out, status, \
     status_flags, note, overtime_minutes, approval_status";

#[derive(FromRow)]
struct ReportRowSql {
    employee_id: u64,
    full_name: String,
    username: String,
    department_name: Option<String>,
    shift_name: Option<String>,
    break_minutes: Option<u32>,
    work_date: NaiveDate,
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    status: String,
    status_flags: u8,
    overtime_minutes: u32,
    note: Option<String>,
}

impl TryFrom<ReportRowSql> for AttendanceReportRow {
    type Error = RepoError;

    fn try_from(row: ReportRowSql) -> Result<Self, Self::Error> {
        Ok(Self {
            employee_id: row.employee_id,
            full_name: row.full_name,
            username: row.username,
            department_name: row.department_name,
            shift_name: row.shift_name,
            break_minutes: row.break_minutes.unwrap_or(0),
            work_date: row.work_date,
            check_in: row.check_in,
            check_out: row.check_out,
            status: parse_enum(&row.status, "attendance.status")?,
            flags: StatusFlags::from_bits(row.status_flags),
            overtime_minutes: row.overtime_minutes,
            note: row.note,
        })
    }
}

#[derive(FromRow)]
struct AdjustmentRow {
    id: u64,
    employee_id: u64,
    work_date: NaiveDate,
    requested_check_in: Option<NaiveTime>,
    requested_check_out: Option<NaiveTime>,
    requested_note: Option<String>,
    status: String,
    created_at: NaiveDateTime,
    decided_by: Option<u64>,
    decided_at: Option<NaiveDateTime>,
    admin_note: Option<String>,
}

impl TryFrom<AdjustmentRow> for TimesheetAdjustmentRequest {
    type Error = RepoError;

    fn try_from(row: AdjustmentRow) -> Result<Self, Self::Error> {
        let status = parse_enum(&row.status, "timesheet_adjustment_requests.status")?;
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            work_date: row.work_date,
            requested_check_in: row.requested_check_in,
            requested_check_out: row.requested_check_out,
            requested_note: row.requested_note,
            status,
            created_at: row.created_at,
            decision: decision_from(status, row.decided_by, row.decided_at, row.admin_note),
        })
    }
}

#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
    status: String,
    created_at: NaiveDateTime,
    decided_by: Option<u64>,
    decided_at: Option<NaiveDateTime>,
    admin_note: Option<String>,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = RepoError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let status = parse_enum(&row.status, "leave_requests.status")?;
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status,
            created_at: row.created_at,
            decision: decision_from(status, row.decided_by, row.decided_at, row.admin_note),
        })
    }
}

#[derive(FromRow)]
struct ScheduleChangeRow {
    id: u64,
    employee_id: u64,
    work_date: NaiveDate,
    requested_shift_id: u64,
    requested_note: String,
    status: String,
    created_at: NaiveDateTime,
    decided_by: Option<u64>,
    decided_at: Option<NaiveDateTime>,
    admin_note: Option<String>,
}

impl TryFrom<ScheduleChangeRow> for ScheduleChangeRequest {
    type Error = RepoError;

    fn try_from(row: ScheduleChangeRow) -> Result<Self, Self::Error> {
        let status = parse_enum(&row.status, "schedule_change_requests.status")?;
        Ok(Self {
            id: row.id,
            employee_id: row.employee_id,
            work_date: row.work_date,
            requested_shift_id: row.requested_shift_id,
            requested_note: row.requested_note,
            status,
            created_at: row.created_at,
            decision: decision_from(status, row.decided_by, row.decided_at, row.admin_note),
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, RepoError>
where
    T: TryFrom<R, Error = RepoError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/* =========================
Shift catalog / employees
========================= */

#[async_trait]
impl ShiftRepository for MySqlStore {
    async fn find_shift(&self, id: u64) -> Result<Option<Shift>, RepoError> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, name, start_time, end_time, grace_minutes, early_leave_minutes, break_minutes
            FROM shifts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    async fn list_shifts(&self) -> Result<Vec<Shift>, RepoError> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, name, start_time, end_time, grace_minutes, early_leave_minutes, break_minutes
            FROM shifts
            ORDER BY start_time, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }
}

#[async_trait]
impl EmployeeRepository for MySqlStore {
    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, RepoError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT e.id, e.full_name, e.username, e.department_id,
                   d.name AS department_name, e.default_shift_id
            FROM employees e
            LEFT JOIN departments d ON d.id = e.department_id
            WHERE e.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}

/* =========================
Schedules
========================= */

#[async_trait]
impl ScheduleRepository for MySqlStore {
    async fn find_assignment(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<ScheduleAssignment>, RepoError> {
        let assignment = sqlx::query_as::<_, ScheduleAssignment>(
            r#"
            SELECT id, employee_id, work_date, shift_id, note
            FROM schedules
            WHERE employee_id = ? AND work_date = ?
            "#,
        )
        .bind(employee_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    async fn upsert_assignment(&self, new: &NewScheduleAssignment) -> Result<u64, RepoError> {
        let result = sqlx::query(UPSERT_SCHEDULE_SQL)
            .bind(new.employee_id)
            .bind(new.work_date)
            .bind(new.shift_id)
            .bind(new.note.as_deref())
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.last_insert_id())
    }

    async fn delete_assignment(&self, id: u64) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_assignments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<u64>,
    ) -> Result<Vec<ScheduleAssignment>, RepoError> {
        let mut sql = String::from(
            r#"
            SELECT id, employee_id, work_date, shift_id, note
            FROM schedules
            WHERE work_date BETWEEN ? AND ?
            "#,
        );
        if employee_id.is_some() {
            sql.push_str(" AND employee_id = ?");
        }
        sql.push_str(" ORDER BY work_date, employee_id");

        let mut q = sqlx::query_as::<_, ScheduleAssignment>(&sql).bind(start).bind(end);
        if let Some(emp_id) = employee_id {
            q = q.bind(emp_id);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }
}

/* =========================
Attendance ledger
========================= */

#[async_trait]
impl AttendanceRepository for MySqlStore {
    async fn find_record(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepoError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? AND work_date = ?"
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .bind(work_date)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn find_record_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, RepoError> {
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn insert_check_in(&self, new: &NewAttendance) -> Result<AttendanceRecord, RepoError> {
        // uq_attendance_employee_date turns a concurrent duplicate into a clean error
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (employee_id, work_date, check_in, status, status_flags, note, approval_status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.work_date)
        .bind(new.check_in)
        .bind(new.status.as_ref())
        .bind(new.flags.to_bits())
        .bind(new.note.as_deref())
        .bind(new.approval_status.as_ref())
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(AttendanceRecord {
            id: result.last_insert_id(),
            employee_id: new.employee_id,
            work_date: new.work_date,
            check_in: Some(new.check_in),
            check_out: None,
            status: new.status,
            flags: new.flags,
            note: new.note.clone(),
            overtime_minutes: 0,
            approval_status: new.approval_status,
        })
    }

    async fn record_check_out(&self, id: u64, update: &CheckOutUpdate) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET check_out = ?, status = ?, status_flags = ?, note = ?, overtime_minutes = ?
            WHERE id = ?
            AND check_out IS NULL
            "#,
        )
        .bind(update.check_out)
        .bind(update.status.as_ref())
        .bind(update.flags.to_bits())
        .bind(update.note.as_deref())
        .bind(update.overtime_minutes)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn decide_record(&self, id: u64, status: ApprovalStatus) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET approval_status = ?
            WHERE id = ?
            AND approval_status = 'PENDING'
            "#,
        )
        .bind(status.as_ref())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotPending);
        }
        Ok(())
    }

    async fn recent_records(
        &self,
        employee_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, RepoError> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? \
             ORDER BY work_date DESC, id DESC LIMIT ?"
        );
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(employee_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        convert_all(rows)
    }

    async fn report_rows(&self, filter: &ReportFilter) -> Result<Vec<AttendanceReportRow>, RepoError> {
        let mut where_sql = String::from(" WHERE a.work_date BETWEEN ? AND ?");
        let mut args = vec![FilterValue::Date(filter.start), FilterValue::Date(filter.end)];

        if let Some(emp_id) = filter.employee_id {
            where_sql.push_str(" AND a.employee_id = ?");
            args.push(FilterValue::U64(emp_id));
        }
        if let Some(dept_id) = filter.department_id {
            where_sql.push_str(" AND e.department_id = ?");
            args.push(FilterValue::U64(dept_id));
        }

        // The shift that applied is the day's assignment, else the default shift.
        let sql = format!(
            r#"
            SELECT a.employee_id, e.full_name, e.username,
                   d.name AS department_name, sh.name AS shift_name,
                   sh.break_minutes AS break_minutes,
                   a.work_date, a.check_in, a.check_out, a.status, a.status_flags,
                   a.overtime_minutes, a.note
            FROM attendance a
            JOIN employees e ON e.id = a.employee_id
            LEFT JOIN departments d ON d.id = e.department_id
            LEFT JOIN schedules s ON s.employee_id = a.employee_id AND s.work_date = a.work_date
            LEFT JOIN shifts sh ON sh.id = COALESCE(s.shift_id, e.default_shift_id)
            {}
            ORDER BY a.work_date, a.employee_id
            "#,
            where_sql
        );

        let q = bind_filters(sqlx::query_as::<_, ReportRowSql>(&sql), &args);

        let rows = q.fetch_all(&self.pool).await?;
        convert_all(rows)
    }
}

/* =========================
Requests
========================= */

#[async_trait]
impl RequestRepository for MySqlStore {
    async fn insert_timesheet_adjustment(&self, new: &NewTimesheetAdjustment) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO timesheet_adjustment_requests
                (employee_id, work_date, requested_check_in, requested_check_out, requested_note, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.work_date)
        .bind(new.requested_check_in)
        .bind(new.requested_check_out)
        .bind(new.requested_note.as_deref())
        .bind(new.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.last_insert_id())
    }

    async fn find_timesheet_adjustment(
        &self,
        id: u64,
    ) -> Result<Option<TimesheetAdjustmentRequest>, RepoError> {
        let row = sqlx::query_as::<_, AdjustmentRow>(
            r#"
            SELECT id, employee_id, work_date, requested_check_in, requested_check_out,
                   requested_note, status, created_at, decided_by, decided_at, admin_note
            FROM timesheet_adjustment_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TimesheetAdjustmentRequest::try_from).transpose()
    }

    async fn list_timesheet_adjustments(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<TimesheetAdjustmentRequest>, RepoError> {
        let (where_sql, args) = request_where(filter);
        let sql = format!(
            r#"
            SELECT id, employee_id, work_date, requested_check_in, requested_check_out,
                   requested_note, status, created_at, decided_by, decided_at, admin_note
            FROM timesheet_adjustment_requests
            {}
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
            where_sql
        );

        let q = bind_filters(sqlx::query_as::<_, AdjustmentRow>(&sql), &args);

        let rows = q.bind(filter.limit).fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn insert_leave(&self, new: &NewLeaveRequest) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, start_date, end_date, reason, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.reason)
        .bind(new.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.last_insert_id())
    }

    async fn find_leave(&self, id: u64) -> Result<Option<LeaveRequest>, RepoError> {
        let row = sqlx::query_as::<_, LeaveRow>(
            r#"
            SELECT id, employee_id, start_date, end_date, reason, status, created_at,
                   decided_by, decided_at, admin_note
            FROM leave_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LeaveRequest::try_from).transpose()
    }

    async fn list_leaves(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, RepoError> {
        let (where_sql, args) = request_where(filter);
        let sql = format!(
            r#"
            SELECT id, employee_id, start_date, end_date, reason, status, created_at,
                   decided_by, decided_at, admin_note
            FROM leave_requests
            {}
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
            where_sql
        );

        let q = bind_filters(sqlx::query_as::<_, LeaveRow>(&sql), &args);

        let rows = q.bind(filter.limit).fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn insert_schedule_change(&self, new: &NewScheduleChange) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO schedule_change_requests
                (employee_id, work_date, requested_shift_id, requested_note, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.work_date)
        .bind(new.requested_shift_id)
        .bind(&new.requested_note)
        .bind(new.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.last_insert_id())
    }

    async fn find_schedule_change(&self, id: u64) -> Result<Option<ScheduleChangeRequest>, RepoError> {
        let row = sqlx::query_as::<_, ScheduleChangeRow>(
            r#"
            SELECT id, employee_id, work_date, requested_shift_id, requested_note, status,
                   created_at, decided_by, decided_at, admin_note
            FROM schedule_change_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ScheduleChangeRequest::try_from).transpose()
    }

    async fn list_schedule_changes(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<ScheduleChangeRequest>, RepoError> {
        let (where_sql, args) = request_where(filter);
        let sql = format!(
            r#"
            SELECT id, employee_id, work_date, requested_shift_id, requested_note, status,
                   created_at, decided_by, decided_at, admin_note
            FROM schedule_change_requests
            {}
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
            where_sql
        );

        let q = bind_filters(sqlx::query_as::<_, ScheduleChangeRow>(&sql), &args);

        let rows = q.bind(filter.limit).fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn decide(
        &self,
        kind: RequestKind,
        id: u64,
        decision: &Decision,
        effect: Option<&DecisionEffect>,
    ) -> Result<(), RepoError> {
        // Dropping `tx` before commit rolls everything back.
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE {}
            SET status = ?, decided_by = ?, decided_at = ?, admin_note = ?
            WHERE id = ?
            AND status = 'PENDING'
            "#,
            request_table(kind)
        );
        let result = sqlx::query(&sql)
            .bind(decision.status.as_ref())
            .bind(decision.decided_by)
            .bind(decision.decided_at)
            .bind(decision.admin_note.as_deref())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotPending);
        }

        match effect {
            Some(DecisionEffect::AdjustAttendance {
                record_id,
                check_in,
                check_out,
                note,
            }) => {
                let result = sqlx::query(
                    r#"
                    UPDATE attendance
                    SET check_in = ?, check_out = ?, note = ?, approval_status = 'APPROVED'
                    WHERE id = ?
                    "#,
                )
                .bind(*check_in)
                .bind(*check_out)
                .bind(note.as_deref())
                .bind(*record_id)
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;

                if result.rows_affected() == 0 {
                    return Err(RepoError::Constraint(format!(
                        "attendance record {record_id} no longer exists"
                    )));
                }
            }
            Some(DecisionEffect::AssignSchedule(new)) => {
                sqlx::query(UPSERT_SCHEDULE_SQL)
                    .bind(new.employee_id)
                    .bind(new.work_date)
                    .bind(new.shift_id)
                    .bind(new.note.as_deref())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_write_error)?;
            }
            None => {}
        }

        tx.commit().await?;
        Ok(())
    }
}
