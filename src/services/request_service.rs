use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::db::repository::{
    AttendanceRepository, DecisionEffect, RepoError, RequestFilter, RequestRepository,
    ShiftRepository,
};
use crate::error::AppError;
use crate::model::{
    approval::{ApprovalStatus, Decision, RequestKind},
    leave_request::{LeaveRequest, NewLeaveRequest},
    role::Actor,
    schedule::NewScheduleAssignment,
    schedule_change::{NewScheduleChange, ScheduleChangeRequest},
    timesheet_adjustment::{NewTimesheetAdjustment, TimesheetAdjustmentRequest},
};
use crate::services::schedule_resolver::ScheduleResolver;
use crate::utils::validators::{non_blank, parse_optional_time, require_non_empty};

pub const DEFAULT_LIST_LIMIT: u32 = 200;
pub const MAX_LIST_LIMIT: u32 = 500;

/// Listing filters as received from callers.
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    pub employee_id: Option<u64>,
    pub status: Option<ApprovalStatus>,
    pub limit: Option<u32>,
}

/// Everything still waiting for an administrator.
#[derive(Debug, Serialize, ToSchema)]
pub struct PendingOverview {
    pub timesheet_adjustments: Vec<TimesheetAdjustmentRequest>,
    pub leaves: Vec<LeaveRequest>,
    pub schedule_changes: Vec<ScheduleChangeRequest>,
}

fn gone(kind: RequestKind) -> String {
    let name = match kind {
        RequestKind::TimesheetAdjustment => "Timesheet adjustment",
        RequestKind::Leave => "Leave",
        RequestKind::ScheduleChange => "Schedule change",
    };
    format!("{name} request not found or already processed")
}

/// Submission and one-shot decisions for the three request kinds.
pub struct RequestService {
    requests: Arc<dyn RequestRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    shifts: Arc<dyn ShiftRepository>,
    resolver: Arc<ScheduleResolver>,
}

impl RequestService {
    pub fn new(
        requests: Arc<dyn RequestRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        shifts: Arc<dyn ShiftRepository>,
        resolver: Arc<ScheduleResolver>,
    ) -> Self {
        Self {
            requests,
            attendance,
            shifts,
            resolver,
        }
    }

    /* =========================
    Create
    ========================= */

    pub async fn create_timesheet_adjustment(
        &self,
        actor: &Actor,
        now: NaiveDateTime,
        work_date: NaiveDate,
        requested_check_in: Option<&str>,
        requested_check_out: Option<&str>,
        requested_note: Option<&str>,
    ) -> Result<TimesheetAdjustmentRequest, AppError> {
        let employee_id = actor.require_employee()?;

        let requested_check_in = parse_optional_time(requested_check_in)?;
        let requested_check_out = parse_optional_time(requested_check_out)?;
        let requested_note = non_blank(requested_note);
        if requested_check_in.is_none() && requested_check_out.is_none() && requested_note.is_none() {
            return Err(AppError::validation(
                "At least one of check-in, check-out or note is required",
            ));
        }

        if self.attendance.find_record(employee_id, work_date).await?.is_none() {
            return Err(AppError::validation("No attendance record to adjust"));
        }

        let new = NewTimesheetAdjustment {
            employee_id,
            work_date,
            requested_check_in,
            requested_check_out,
            requested_note,
            created_at: now,
        };
        let id = self.requests.insert_timesheet_adjustment(&new).await?;

        info!(request_id = id, employee_id, work_date = %work_date, "Timesheet adjustment requested");

        Ok(TimesheetAdjustmentRequest {
            id,
            employee_id,
            work_date,
            requested_check_in: new.requested_check_in,
            requested_check_out: new.requested_check_out,
            requested_note: new.requested_note,
            status: ApprovalStatus::Pending,
            created_at: now,
            decision: None,
        })
    }

    pub async fn create_leave(
        &self,
        actor: &Actor,
        now: NaiveDateTime,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
    ) -> Result<LeaveRequest, AppError> {
        let employee_id = actor.require_employee()?;
        if start_date > end_date {
            return Err(AppError::validation("start date must not be after end date"));
        }
        let reason = require_non_empty(reason, "reason")?;

        let new = NewLeaveRequest {
            employee_id,
            start_date,
            end_date,
            reason,
            created_at: now,
        };
        let id = self.requests.insert_leave(&new).await?;

        info!(
            request_id = id,
            employee_id,
            start_date = %start_date,
            end_date = %end_date,
            "Leave requested"
        );

        Ok(LeaveRequest {
            id,
            employee_id,
            start_date,
            end_date,
            reason: new.reason,
            status: ApprovalStatus::Pending,
            created_at: now,
            decision: None,
        })
    }

    pub async fn create_schedule_change(
        &self,
        actor: &Actor,
        now: NaiveDateTime,
        work_date: NaiveDate,
        requested_shift_id: u64,
        requested_note: &str,
    ) -> Result<ScheduleChangeRequest, AppError> {
        let employee_id = actor.require_employee()?;
        let requested_note = require_non_empty(requested_note, "note")?;
        if self.shifts.find_shift(requested_shift_id).await?.is_none() {
            return Err(AppError::validation("Shift not found"));
        }

        let new = NewScheduleChange {
            employee_id,
            work_date,
            requested_shift_id,
            requested_note,
            created_at: now,
        };
        let id = self.requests.insert_schedule_change(&new).await?;

        info!(
            request_id = id,
            employee_id,
            work_date = %work_date,
            shift_id = requested_shift_id,
            "Schedule change requested"
        );

        Ok(ScheduleChangeRequest {
            id,
            employee_id,
            work_date,
            requested_shift_id,
            requested_note: new.requested_note,
            status: ApprovalStatus::Pending,
            created_at: now,
            decision: None,
        })
    }

    /* =========================
    Decide
    ========================= */

    /// Approves a PENDING request and applies its effect in the same unit of
    /// work. If the effect cannot be applied the request stays PENDING.
    pub async fn approve(
        &self,
        actor: &Actor,
        now: NaiveDateTime,
        kind: RequestKind,
        id: u64,
        admin_note: Option<&str>,
    ) -> Result<(), AppError> {
        actor.require_administrator()?;

        let effect = match kind {
            RequestKind::TimesheetAdjustment => Some(self.adjustment_effect(id).await?),
            RequestKind::Leave => {
                self.pending_leave(id).await?;
                None
            }
            RequestKind::ScheduleChange => Some(self.schedule_effect(id).await?),
        };

        self.decide(actor, now, kind, id, ApprovalStatus::Approved, admin_note, effect)
            .await
    }

    pub async fn reject(
        &self,
        actor: &Actor,
        now: NaiveDateTime,
        kind: RequestKind,
        id: u64,
        admin_note: Option<&str>,
    ) -> Result<(), AppError> {
        actor.require_administrator()?;
        self.decide(actor, now, kind, id, ApprovalStatus::Rejected, admin_note, None)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn decide(
        &self,
        actor: &Actor,
        now: NaiveDateTime,
        kind: RequestKind,
        id: u64,
        status: ApprovalStatus,
        admin_note: Option<&str>,
        effect: Option<DecisionEffect>,
    ) -> Result<(), AppError> {
        let decision = Decision {
            status,
            decided_by: actor.user_id,
            decided_at: now,
            admin_note: non_blank(admin_note),
        };

        match self.requests.decide(kind, id, &decision, effect.as_ref()).await {
            Ok(()) => {
                info!(
                    request_id = id,
                    kind = %kind,
                    decision = %status,
                    decided_by = actor.user_id,
                    "Request decided"
                );
                Ok(())
            }
            Err(RepoError::NotPending) => Err(AppError::validation(gone(kind))),
            Err(RepoError::Constraint(detail)) => {
                warn!(request_id = id, kind = %kind, detail = %detail, "Approval effect rejected");
                Err(AppError::validation(format!(
                    "The {kind} could not be applied; the request is still pending"
                )))
            }
            Err(e) => {
                warn!(request_id = id, kind = %kind, error = %e, "Decision rolled back");
                Err(e.into())
            }
        }
    }

    async fn adjustment_effect(&self, id: u64) -> Result<DecisionEffect, AppError> {
        let kind = RequestKind::TimesheetAdjustment;
        let request = self
            .requests
            .find_timesheet_adjustment(id)
            .await?
            .filter(|r| r.status.is_pending())
            .ok_or_else(|| AppError::validation(gone(kind)))?;

        let record = self
            .attendance
            .find_record(request.employee_id, request.work_date)
            .await?
            .ok_or_else(|| AppError::validation("No attendance record to adjust"))?;

        let work_date = request.work_date;
        let check_in = request
            .requested_check_in
            .map(|t| work_date.and_time(t))
            .or(record.check_in);

        let mut check_out = request
            .requested_check_out
            .map(|t| work_date.and_time(t))
            .or(record.check_out);

        // An early-morning check-out on a night shift belongs to the next day.
        if let (Some(_), Some(i), Some(o)) = (request.requested_check_out, check_in, check_out) {
            if o < i {
                let overnight = self
                    .resolver
                    .resolve(request.employee_id, work_date)
                    .await?
                    .is_some_and(|s| s.is_overnight());
                if overnight {
                    check_out = Some(o + Duration::days(1));
                }
            }
        }

        if let (Some(i), Some(o)) = (check_in, check_out) {
            if o < i {
                return Err(AppError::validation("Check-out time is earlier than check-in"));
            }
        }

        Ok(DecisionEffect::AdjustAttendance {
            record_id: record.id,
            check_in,
            check_out,
            note: request.requested_note.or(record.note),
        })
    }

    /// Leave has no side effect; it only has to exist and still be PENDING.
    async fn pending_leave(&self, id: u64) -> Result<LeaveRequest, AppError> {
        self.requests
            .find_leave(id)
            .await?
            .filter(|r| r.status.is_pending())
            .ok_or_else(|| AppError::validation(gone(RequestKind::Leave)))
    }

    async fn schedule_effect(&self, id: u64) -> Result<DecisionEffect, AppError> {
        let request = self
            .requests
            .find_schedule_change(id)
            .await?
            .filter(|r| r.status.is_pending())
            .ok_or_else(|| AppError::validation(gone(RequestKind::ScheduleChange)))?;

        Ok(DecisionEffect::AssignSchedule(NewScheduleAssignment {
            employee_id: request.employee_id,
            work_date: request.work_date,
            shift_id: request.requested_shift_id,
            note: Some(request.requested_note),
        }))
    }

    /* =========================
    List
    ========================= */

    fn filter(actor: &Actor, query: &RequestQuery) -> Result<RequestFilter, AppError> {
        Ok(RequestFilter {
            employee_id: actor.scope_employee(query.employee_id)?,
            status: query.status,
            limit: query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT),
        })
    }

    pub async fn list_timesheet_adjustments(
        &self,
        actor: &Actor,
        query: &RequestQuery,
    ) -> Result<Vec<TimesheetAdjustmentRequest>, AppError> {
        let filter = Self::filter(actor, query)?;
        Ok(self.requests.list_timesheet_adjustments(&filter).await?)
    }

    pub async fn list_leaves(&self, actor: &Actor, query: &RequestQuery) -> Result<Vec<LeaveRequest>, AppError> {
        let filter = Self::filter(actor, query)?;
        Ok(self.requests.list_leaves(&filter).await?)
    }

    pub async fn list_schedule_changes(
        &self,
        actor: &Actor,
        query: &RequestQuery,
    ) -> Result<Vec<ScheduleChangeRequest>, AppError> {
        let filter = Self::filter(actor, query)?;
        Ok(self.requests.list_schedule_changes(&filter).await?)
    }

    pub async fn pending_overview(&self, actor: &Actor) -> Result<PendingOverview, AppError> {
        actor.require_administrator()?;
        let filter = RequestFilter {
            employee_id: None,
            status: Some(ApprovalStatus::Pending),
            limit: MAX_LIST_LIMIT,
        };

        Ok(PendingOverview {
            timesheet_adjustments: self.requests.list_timesheet_adjustments(&filter).await?,
            leaves: self.requests.list_leaves(&filter).await?,
            schedule_changes: self.requests.list_schedule_changes(&filter).await?,
        })
    }
}
