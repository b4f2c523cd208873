use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::model::{
    approval::{ApprovalStatus, Decision, RequestKind},
    attendance::{AttendanceRecord, AttendanceReportRow, CheckOutUpdate, NewAttendance},
    employee::Employee,
    leave_request::{LeaveRequest, NewLeaveRequest},
    schedule::{NewScheduleAssignment, ScheduleAssignment},
    schedule_change::{NewScheduleChange, ScheduleChangeRequest},
    shift::Shift,
    timesheet_adjustment::{NewTimesheetAdjustment, TimesheetAdjustmentRequest},
};

#[derive(Debug, Error)]
pub enum RepoError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate entry")]
    Duplicate,

    /// The request is missing or no longer PENDING.
    #[error("request not found or already decided")]
    NotPending,

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("undecodable row: {0}")]
    Decode(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Write applied together with an approval, in the same unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionEffect {
    AdjustAttendance {
        record_id: u64,
        check_in: Option<NaiveDateTime>,
        check_out: Option<NaiveDateTime>,
        note: Option<String>,
    },
    AssignSchedule(NewScheduleAssignment),
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub employee_id: Option<u64>,
    pub status: Option<ApprovalStatus>,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub employee_id: Option<u64>,
    pub department_id: Option<u64>,
}

#[async_trait]
pub trait ShiftRepository: Send + Sync {
    async fn find_shift(&self, id: u64) -> Result<Option<Shift>, RepoError>;
    async fn list_shifts(&self) -> Result<Vec<Shift>, RepoError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, RepoError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn find_assignment(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<ScheduleAssignment>, RepoError>;

    /// Insert or replace the assignment for (employee, date); returns its id.
    async fn upsert_assignment(&self, new: &NewScheduleAssignment) -> Result<u64, RepoError>;

    async fn delete_assignment(&self, id: u64) -> Result<bool, RepoError>;

    async fn list_assignments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<u64>,
    ) -> Result<Vec<ScheduleAssignment>, RepoError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_record(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepoError>;

    async fn find_record_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, RepoError>;

    /// Fails with [`RepoError::Duplicate`] when a record already exists for
    /// the same (employee, work date).
    async fn insert_check_in(&self, new: &NewAttendance) -> Result<AttendanceRecord, RepoError>;

    /// Closes an open record. Returns `false` if it was already closed.
    async fn record_check_out(&self, id: u64, update: &CheckOutUpdate) -> Result<bool, RepoError>;

    /// Moves a PENDING record to APPROVED or REJECTED.
    async fn decide_record(&self, id: u64, status: ApprovalStatus) -> Result<(), RepoError>;

    async fn recent_records(
        &self,
        employee_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, RepoError>;

    async fn report_rows(&self, filter: &ReportFilter) -> Result<Vec<AttendanceReportRow>, RepoError>;
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn insert_timesheet_adjustment(&self, new: &NewTimesheetAdjustment) -> Result<u64, RepoError>;
    async fn find_timesheet_adjustment(
        &self,
        id: u64,
    ) -> Result<Option<TimesheetAdjustmentRequest>, RepoError>;
    async fn list_timesheet_adjustments(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<TimesheetAdjustmentRequest>, RepoError>;

    async fn insert_leave(&self, new: &NewLeaveRequest) -> Result<u64, RepoError>;
    async fn find_leave(&self, id: u64) -> Result<Option<LeaveRequest>, RepoError>;
    async fn list_leaves(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, RepoError>;

    async fn insert_schedule_change(&self, new: &NewScheduleChange) -> Result<u64, RepoError>;
    async fn find_schedule_change(&self, id: u64) -> Result<Option<ScheduleChangeRequest>, RepoError>;
    async fn list_schedule_changes(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<ScheduleChangeRequest>, RepoError>;

    /// Records the decision on a PENDING request and applies `effect` as one
    /// atomic unit. On any error nothing is persisted and the request stays
    /// PENDING. Fails with [`RepoError::NotPending`] if the request is
    /// missing or already decided.
    async fn decide(
        &self,
        kind: RequestKind,
        id: u64,
        decision: &Decision,
        effect: Option<&DecisionEffect>,
    ) -> Result<(), RepoError>;
}
