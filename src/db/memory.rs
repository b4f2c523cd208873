use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::db::repository::{
    AttendanceRepository, DecisionEffect, EmployeeRepository, RepoError, ReportFilter,
    RequestFilter, RequestRepository, ScheduleRepository, ShiftRepository,
};
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

#[derive(Default)]
struct State {
    next_id: u64,
    shifts: BTreeMap<u64, Shift>,
    employees: BTreeMap<u64, Employee>,
    schedules: Vec<ScheduleAssignment>,
    attendance: Vec<AttendanceRecord>,
    adjustments: Vec<TimesheetAdjustmentRequest>,
    leaves: Vec<LeaveRequest>,
    schedule_changes: Vec<ScheduleChangeRequest>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_assignment(&self, new: &NewScheduleAssignment) -> Result<(), RepoError> {
        if !self.employees.contains_key(&new.employee_id) {
            return Err(RepoError::Constraint(format!("unknown employee {}", new.employee_id)));
        }
        if !self.shifts.contains_key(&new.shift_id) {
            return Err(RepoError::Constraint(format!("unknown shift {}", new.shift_id)));
        }
        Ok(())
    }

    fn upsert_assignment(&mut self, new: &NewScheduleAssignment) -> u64 {
        if let Some(existing) = self
            .schedules
            .iter_mut()
            .find(|s| s.employee_id == new.employee_id && s.work_date == new.work_date)
        {
            existing.shift_id = new.shift_id;
            existing.note = new.note.clone();
            return existing.id;
        }

        let id = self.next_id();
        self.schedules.push(ScheduleAssignment {
            id,
            employee_id: new.employee_id,
            work_date: new.work_date,
            shift_id: new.shift_id,
            note: new.note.clone(),
        });
        id
    }

    fn check_employee(&self, employee_id: u64) -> Result<(), RepoError> {
        if self.employees.contains_key(&employee_id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!("unknown employee {employee_id}")))
        }
    }

    fn pending_status(&self, kind: RequestKind, id: u64) -> Option<ApprovalStatus> {
        match kind {
            RequestKind::TimesheetAdjustment => {
                self.adjustments.iter().find(|r| r.id == id).map(|r| r.status)
            }
            RequestKind::Leave => self.leaves.iter().find(|r| r.id == id).map(|r| r.status),
            RequestKind::ScheduleChange => {
                self.schedule_changes.iter().find(|r| r.id == id).map(|r| r.status)
            }
        }
    }

    /// Validates an effect without applying it.
    fn check_effect(&self, effect: &DecisionEffect) -> Result<(), RepoError> {
        match effect {
            DecisionEffect::AdjustAttendance {
                record_id,
                check_in,
                check_out,
                ..
            } => {
                if !self.attendance.iter().any(|r| r.id == *record_id) {
                    return Err(RepoError::Constraint(format!(
                        "attendance record {record_id} no longer exists"
                    )));
                }
                if let (Some(i), Some(o)) = (check_in, check_out) {
                    if o < i {
                        return Err(RepoError::Constraint("chk_attendance_order".into()));
                    }
                }
                Ok(())
            }
            DecisionEffect::AssignSchedule(new) => self.check_assignment(new),
        }
    }

    fn apply_effect(&mut self, effect: &DecisionEffect) {
        match effect {
            DecisionEffect::AdjustAttendance {
                record_id,
                check_in,
                check_out,
                note,
            } => {
                if let Some(record) = self.attendance.iter_mut().find(|r| r.id == *record_id) {
                    record.check_in = *check_in;
                    record.check_out = *check_out;
                    record.note = note.clone();
                    record.approval_status = ApprovalStatus::Approved;
                }
            }
            DecisionEffect::AssignSchedule(new) => {
                self.upsert_assignment(new);
            }
        }
    }

    fn set_decision(&mut self, kind: RequestKind, id: u64, decision: &Decision) {
        let slot = match kind {
            RequestKind::TimesheetAdjustment => self
                .adjustments
                .iter_mut()
                .find(|r| r.id == id)
                .map(|r| (&mut r.status, &mut r.decision)),
            RequestKind::Leave => self
                .leaves
                .iter_mut()
                .find(|r| r.id == id)
                .map(|r| (&mut r.status, &mut r.decision)),
            RequestKind::ScheduleChange => self
                .schedule_changes
                .iter_mut()
                .find(|r| r.id == id)
                .map(|r| (&mut r.status, &mut r.decision)),
        };
        if let Some((status, stored)) = slot {
            *status = decision.status;
            *stored = Some(decision.clone());
        }
    }
}

fn filtered<T: Clone>(
    items: &[T],
    filter: &RequestFilter,
    key: impl Fn(&T) -> (u64, ApprovalStatus),
) -> Vec<T> {
    // Insertion order is creation order; newest first.
    items
        .iter()
        .rev()
        .filter(|item| {
            let (employee_id, status) = key(item);
            filter.employee_id.is_none_or(|id| id == employee_id)
                && filter.status.is_none_or(|s| s == status)
        })
        .take(filter.limit as usize)
        .cloned()
        .collect()
}

/// In-process store with the same constraints as the MySQL schema. Every
/// operation runs under one lock, so each call is atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shift(&self, shift: Shift) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(shift.id);
        state.shifts.insert(shift.id, shift);
    }

    pub fn add_employee(&self, employee: Employee) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(employee.id);
        state.employees.insert(employee.id, employee);
    }

    pub fn attendance_rows(&self) -> usize {
        self.state.lock().unwrap().attendance.len()
    }

    /// Deletes one attendance record; `false` when it did not exist.
    pub fn remove_record(&self, id: u64) -> bool {
        let mut state = self.state.lock().unwrap();
        let before = state.attendance.len();
        state.attendance.retain(|r| r.id != id);
        state.attendance.len() != before
    }
}

#[async_trait]
impl ShiftRepository for MemoryStore {
    async fn find_shift(&self, id: u64) -> Result<Option<Shift>, RepoError> {
        Ok(self.state.lock().unwrap().shifts.get(&id).cloned())
    }

    async fn list_shifts(&self) -> Result<Vec<Shift>, RepoError> {
        let state = self.state.lock().unwrap();
        let mut shifts: Vec<Shift> = state.shifts.values().cloned().collect();
        shifts.sort_by_key(|s| (s.start_time, s.id));
        Ok(shifts)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn find_employee(&self, id: u64) -> Result<Option<Employee>, RepoError> {
        Ok(self.state.lock().unwrap().employees.get(&id).cloned())
    }
}

#[async_trait]
impl ScheduleRepository for MemoryStore {
    async fn find_assignment(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<ScheduleAssignment>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .schedules
            .iter()
            .find(|s| s.employee_id == employee_id && s.work_date == work_date)
            .cloned())
    }

    async fn upsert_assignment(&self, new: &NewScheduleAssignment) -> Result<u64, RepoError> {
        let mut state = self.state.lock().unwrap();
        state.check_assignment(new)?;
        Ok(state.upsert_assignment(new))
    }

    async fn delete_assignment(&self, id: u64) -> Result<bool, RepoError> {
        let mut state = self.state.lock().unwrap();
        let before = state.schedules.len();
        state.schedules.retain(|s| s.id != id);
        Ok(state.schedules.len() != before)
    }

    async fn list_assignments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<u64>,
    ) -> Result<Vec<ScheduleAssignment>, RepoError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<ScheduleAssignment> = state
            .schedules
            .iter()
            .filter(|s| s.work_date >= start && s.work_date <= end)
            .filter(|s| employee_id.is_none_or(|id| id == s.employee_id))
            .cloned()
            .collect();
        rows.sort_by_key(|s| (s.work_date, s.employee_id));
        Ok(rows)
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn find_record(
        &self,
        employee_id: u64,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attendance
            .iter()
            .find(|r| r.employee_id == employee_id && r.work_date == work_date)
            .cloned())
    }

    async fn find_record_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state.attendance.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_check_in(&self, new: &NewAttendance) -> Result<AttendanceRecord, RepoError> {
        let mut state = self.state.lock().unwrap();
        state.check_employee(new.employee_id)?;
        if state
            .attendance
            .iter()
            .any(|r| r.employee_id == new.employee_id && r.work_date == new.work_date)
        {
            return Err(RepoError::Duplicate);
        }

        let record = AttendanceRecord {
            id: state.next_id(),
            employee_id: new.employee_id,
            work_date: new.work_date,
            check_in: Some(new.check_in),
            check_out: None,
            status: new.status,
            flags: new.flags,
            note: new.note.clone(),
            overtime_minutes: 0,
            approval_status: new.approval_status,
        };
        state.attendance.push(record.clone());
        Ok(record)
    }

    async fn record_check_out(&self, id: u64, update: &CheckOutUpdate) -> Result<bool, RepoError> {
        let mut state = self.state.lock().unwrap();
        let Some(record) = state
            .attendance
            .iter_mut()
            .find(|r| r.id == id && r.check_out.is_none())
        else {
            return Ok(false);
        };
        if record.check_in.is_some_and(|i| update.check_out < i) {
            return Err(RepoError::Constraint("chk_attendance_order".into()));
        }

        record.check_out = Some(update.check_out);
        record.status = update.status;
        record.flags = update.flags;
        record.note = update.note.clone();
        record.overtime_minutes = update.overtime_minutes;
        Ok(true)
    }

    async fn decide_record(&self, id: u64, status: ApprovalStatus) -> Result<(), RepoError> {
        let mut state = self.state.lock().unwrap();
        match state
            .attendance
            .iter_mut()
            .find(|r| r.id == id && r.approval_status.is_pending())
        {
            Some(record) => {
                record.approval_status = status;
                Ok(())
            }
            None => Err(RepoError::NotPending),
        }
    }

    async fn recent_records(
        &self,
        employee_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, RepoError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<AttendanceRecord> = state
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.work_date.cmp(&a.work_date).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn report_rows(&self, filter: &ReportFilter) -> Result<Vec<AttendanceReportRow>, RepoError> {
        let state = self.state.lock().unwrap();
        let mut rows = Vec::new();

        for record in &state.attendance {
            if record.work_date < filter.start || record.work_date > filter.end {
                continue;
            }
            if filter.employee_id.is_some_and(|id| id != record.employee_id) {
                continue;
            }
            let Some(employee) = state.employees.get(&record.employee_id) else {
                continue;
            };
            if filter
                .department_id
                .is_some_and(|d| employee.department_id != Some(d))
            {
                continue;
            }

            let shift = state
                .schedules
                .iter()
                .find(|s| s.employee_id == record.employee_id && s.work_date == record.work_date)
                .map(|s| s.shift_id)
                .or(employee.default_shift_id)
                .and_then(|id| state.shifts.get(&id));

            rows.push(AttendanceReportRow {
                employee_id: record.employee_id,
                full_name: employee.full_name.clone(),
                username: employee.username.clone(),
                department_name: employee.department_name.clone(),
                shift_name: shift.map(|s| s.name.clone()),
                break_minutes: shift.map(|s| s.break_minutes).unwrap_or(0),
                work_date: record.work_date,
                check_in: record.check_in,
                check_out: record.check_out,
                status: record.status,
                flags: record.flags,
                overtime_minutes: record.overtime_minutes,
                note: record.note.clone(),
            });
        }

        rows.sort_by_key(|r| (r.work_date, r.employee_id));
        Ok(rows)
    }
}

#[async_trait]
impl RequestRepository for MemoryStore {
    async fn insert_timesheet_adjustment(&self, new: &NewTimesheetAdjustment) -> Result<u64, RepoError> {
        let mut state = self.state.lock().unwrap();
        state.check_employee(new.employee_id)?;
        let id = state.next_id();
        state.adjustments.push(TimesheetAdjustmentRequest {
            id,
            employee_id: new.employee_id,
            work_date: new.work_date,
            requested_check_in: new.requested_check_in,
            requested_check_out: new.requested_check_out,
            requested_note: new.requested_note.clone(),
            status: ApprovalStatus::Pending,
            created_at: new.created_at,
            decision: None,
        });
        Ok(id)
    }

    async fn find_timesheet_adjustment(
        &self,
        id: u64,
    ) -> Result<Option<TimesheetAdjustmentRequest>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state.adjustments.iter().find(|r| r.id == id).cloned())
    }

    async fn list_timesheet_adjustments(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<TimesheetAdjustmentRequest>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(filtered(&state.adjustments, filter, |r| (r.employee_id, r.status)))
    }

    async fn insert_leave(&self, new: &NewLeaveRequest) -> Result<u64, RepoError> {
        let mut state = self.state.lock().unwrap();
        state.check_employee(new.employee_id)?;
        if new.end_date < new.start_date {
            return Err(RepoError::Constraint("chk_leave_range".into()));
        }
        let id = state.next_id();
        state.leaves.push(LeaveRequest {
            id,
            employee_id: new.employee_id,
            start_date: new.start_date,
            end_date: new.end_date,
            reason: new.reason.clone(),
            status: ApprovalStatus::Pending,
            created_at: new.created_at,
            decision: None,
        });
        Ok(id)
    }

    async fn find_leave(&self, id: u64) -> Result<Option<LeaveRequest>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state.leaves.iter().find(|r| r.id == id).cloned())
    }

    async fn list_leaves(&self, filter: &RequestFilter) -> Result<Vec<LeaveRequest>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(filtered(&state.leaves, filter, |r| (r.employee_id, r.status)))
    }

    async fn insert_schedule_change(&self, new: &NewScheduleChange) -> Result<u64, RepoError> {
        let mut state = self.state.lock().unwrap();
        state.check_employee(new.employee_id)?;
        let id = state.next_id();
        state.schedule_changes.push(ScheduleChangeRequest {
            id,
            employee_id: new.employee_id,
            work_date: new.work_date,
            requested_shift_id: new.requested_shift_id,
            requested_note: new.requested_note.clone(),
            status: ApprovalStatus::Pending,
            created_at: new.created_at,
            decision: None,
        });
        Ok(id)
    }

    async fn find_schedule_change(&self, id: u64) -> Result<Option<ScheduleChangeRequest>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state.schedule_changes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_schedule_changes(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<ScheduleChangeRequest>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(filtered(&state.schedule_changes, filter, |r| (r.employee_id, r.status)))
    }

    async fn decide(
        &self,
        kind: RequestKind,
        id: u64,
        decision: &Decision,
        effect: Option<&DecisionEffect>,
    ) -> Result<(), RepoError> {
        let mut state = self.state.lock().unwrap();
        if state.pending_status(kind, id) != Some(ApprovalStatus::Pending) {
            return Err(RepoError::NotPending);
        }
        if let Some(effect) = effect {
            state.check_effect(effect)?;
        }

        state.set_decision(kind, id, decision);
        if let Some(effect) = effect {
            state.apply_effect(effect);
        }
        Ok(())
    }
}
