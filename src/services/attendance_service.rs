use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::db::repository::{AttendanceRepository, RepoError};
use crate::error::AppError;
use crate::model::{
    approval::ApprovalStatus,
    attendance::{AttendanceRecord, AttendanceView, CheckOutUpdate, NewAttendance},
    role::Actor,
    shift::DEFAULT_GRACE_MINUTES,
};
use crate::services::{
    decision::{checkin_work_date, decide_checkin, decide_checkout},
    rejected,
    schedule_resolver::ScheduleResolver,
};
use crate::utils::validators::non_blank;

/// Check-in / check-out against the attendance ledger.
pub struct AttendanceService {
    attendance: Arc<dyn AttendanceRepository>,
    resolver: Arc<ScheduleResolver>,
    history_limit: u32,
}

fn join_notes(first: Option<&str>, second: &str) -> String {
    match first.filter(|s| !s.is_empty()) {
        Some(first) => format!("{first} | {second}"),
        None => second.to_string(),
    }
}

impl AttendanceService {
    pub fn new(
        attendance: Arc<dyn AttendanceRepository>,
        resolver: Arc<ScheduleResolver>,
        history_limit: u32,
    ) -> Self {
        Self {
            attendance,
            resolver,
            history_limit,
        }
    }

    /// Records the first check-in of a work day.
    ///
    /// A non-blank `explanation` leaves the record PENDING for an
    /// administrator; otherwise it is final at creation.
    pub async fn check_in(
        &self,
        actor: &Actor,
        now: NaiveDateTime,
        explanation: Option<&str>,
    ) -> Result<AttendanceRecord, AppError> {
        let employee_id = actor.require_employee()?;
        let today = now.date();

        let (work_date, shift) = match today.pred_opt() {
            Some(yesterday) => {
                let yesterday_shift = self.resolver.resolve(employee_id, yesterday).await?;
                let yesterday_record = self.attendance.find_record(employee_id, yesterday).await?;
                // Last night's shift is still running: that record is today's.
                if let (Some(shift), Some(record)) = (&yesterday_shift, &yesterday_record) {
                    if shift.is_overnight() && now < shift.end_on(yesterday) {
                        warn!(employee_id, work_date = %yesterday, "Check-in rejected: overnight shift in progress");
                        return Err(if record.is_checked_out() {
                            AppError::validation("Already checked out today")
                        } else {
                            AppError::validation("Already checked in today")
                        });
                    }
                }
                let work_date =
                    checkin_work_date(now, yesterday_shift.as_ref(), yesterday_record.is_some());
                if work_date == yesterday {
                    (work_date, yesterday_shift)
                } else {
                    (today, self.resolver.resolve(employee_id, today).await?)
                }
            }
            None => (today, self.resolver.resolve(employee_id, today).await?),
        };

        if let Some(existing) = self.attendance.find_record(employee_id, work_date).await? {
            return Err(if existing.is_checked_out() {
                AppError::validation("Already checked out today")
            } else {
                AppError::validation("Already checked in today")
            });
        }

        let grace = shift
            .as_ref()
            .map(|s| s.grace_minutes)
            .unwrap_or(DEFAULT_GRACE_MINUTES);
        let decision = decide_checkin(now, work_date, shift.as_ref(), grace);
        if !decision.is_scheduled() {
            warn!(employee_id, work_date = %work_date, "Check-in rejected: no shift scheduled");
            return Err(AppError::validation("No shift scheduled for today"));
        }

        let explanation = non_blank(explanation);
        let approval_status = if explanation.is_some() {
            ApprovalStatus::Pending
        } else {
            ApprovalStatus::Approved
        };
        let note = match &explanation {
            Some(text) => join_notes(Some(&decision.note), text),
            None => decision.note.clone(),
        };

        let record = self
            .attendance
            .insert_check_in(&NewAttendance {
                employee_id,
                work_date,
                check_in: now,
                status: decision.status,
                flags: decision.flags,
                note: Some(note),
                approval_status,
            })
            .await
            .map_err(|e| rejected(e, "Already checked in today"))?;

        info!(
            employee_id,
            work_date = %work_date,
            status = %record.status,
            late_minutes = decision.late_minutes,
            approval_status = %record.approval_status,
            "Checked in"
        );

        Ok(record)
    }

    /// Closes today's open record, or last night's when it belongs to an
    /// overnight shift.
    pub async fn check_out(&self, actor: &Actor, now: NaiveDateTime) -> Result<AttendanceRecord, AppError> {
        let employee_id = actor.require_employee()?;
        let record = self.open_record(employee_id, now).await?;

        let shift = self.resolver.resolve(employee_id, record.work_date).await?;
        let decision = decide_checkout(now, record.work_date, shift.as_ref(), record.status, record.flags);
        let update = CheckOutUpdate {
            check_out: now,
            status: decision.status,
            flags: decision.flags,
            note: Some(join_notes(record.note.as_deref(), &decision.note)),
            overtime_minutes: decision.overtime_minutes,
        };

        let closed = match self.attendance.record_check_out(record.id, &update).await {
            Ok(closed) => closed,
            Err(RepoError::Constraint(detail)) => {
                warn!(employee_id, record_id = record.id, detail = %detail, "Check-out rejected by ledger");
                return Err(AppError::validation("Check-out time is earlier than check-in"));
            }
            Err(e) => return Err(e.into()),
        };
        if !closed {
            return Err(AppError::validation("Already checked out today"));
        }

        info!(
            employee_id,
            work_date = %record.work_date,
            status = %update.status,
            overtime_minutes = update.overtime_minutes,
            "Checked out"
        );

        Ok(AttendanceRecord {
            check_out: Some(update.check_out),
            status: update.status,
            flags: update.flags,
            note: update.note,
            overtime_minutes: update.overtime_minutes,
            ..record
        })
    }

    async fn open_record(&self, employee_id: u64, now: NaiveDateTime) -> Result<AttendanceRecord, AppError> {
        let today = now.date();
        match self.attendance.find_record(employee_id, today).await? {
            Some(record) if record.is_checked_out() => {
                Err(AppError::validation("Already checked out today"))
            }
            Some(record) => Ok(record),
            None => self
                .overnight_record(employee_id, today)
                .await?
                .ok_or_else(|| AppError::validation("Not checked in today")),
        }
    }

    /// Yesterday's still-open record, if yesterday's shift ran overnight.
    async fn overnight_record(
        &self,
        employee_id: u64,
        today: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let Some(yesterday) = today.pred_opt() else {
            return Ok(None);
        };
        let overnight = self
            .resolver
            .resolve(employee_id, yesterday)
            .await?
            .is_some_and(|s| s.is_overnight());
        if !overnight {
            return Ok(None);
        }

        Ok(self
            .attendance
            .find_record(employee_id, yesterday)
            .await?
            .filter(|r| !r.is_checked_out()))
    }

    /// The caller's record for the current work day.
    pub async fn today(&self, actor: &Actor, now: NaiveDateTime) -> Result<Option<AttendanceView>, AppError> {
        let employee_id = actor.require_employee()?;
        let today = now.date();

        let record = match self.attendance.find_record(employee_id, today).await? {
            Some(record) => Some(record),
            None => self.overnight_record(employee_id, today).await?,
        };
        Ok(record.as_ref().map(AttendanceView::from))
    }

    /// Most recent records first, bounded by the configured history size.
    pub async fn history(&self, actor: &Actor) -> Result<Vec<AttendanceView>, AppError> {
        let employee_id = actor.require_employee()?;
        let rows = self
            .attendance
            .recent_records(employee_id, self.history_limit)
            .await?;
        Ok(rows.iter().map(AttendanceView::from).collect())
    }

    /// Approve or reject a record that was submitted with an explanation.
    pub async fn decide_record(
        &self,
        actor: &Actor,
        record_id: u64,
        status: ApprovalStatus,
    ) -> Result<AttendanceRecord, AppError> {
        actor.require_administrator()?;
        if status.is_pending() {
            return Err(AppError::validation("Decision must be APPROVED or REJECTED"));
        }

        const GONE: &str = "Attendance record not found or already decided";
        let Some(record) = self.attendance.find_record_by_id(record_id).await? else {
            return Err(AppError::validation(GONE));
        };

        self.attendance
            .decide_record(record_id, status)
            .await
            .map_err(|e| rejected(e, GONE))?;

        info!(
            record_id,
            employee_id = record.employee_id,
            decision = %status,
            decided_by = actor.user_id,
            "Attendance record decided"
        );

        Ok(AttendanceRecord {
            approval_status: status,
            ..record
        })
    }
}
