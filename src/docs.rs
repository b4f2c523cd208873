use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::{
    DecisionPayload, MessageResponse, RequestListQuery,
    attendance::{AttendanceResponse, CheckInPayload},
    leave_request::CreateLeave,
    schedule::{ResolvedShift, UpsertSchedule},
    schedule_change::CreateScheduleChange,
    timesheet_adjustment::CreateTimesheetAdjustment,
};
use crate::model::{
    approval::ApprovalStatus,
    attendance::{AttendanceRecord, AttendanceStatus, AttendanceView, StatusFlags},
    leave_request::LeaveRequest,
    schedule::ScheduleAssignment,
    schedule_change::ScheduleChangeRequest,
    shift::ShiftResponse,
    timesheet_adjustment::TimesheetAdjustmentRequest,
};
use crate::services::{
    report_service::{AttendanceReport, EmployeeTotal, ReportRow},
    request_service::PendingOverview,
};

/// Registers the `bearer_auth` scheme every protected path refers to.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Shift-aware attendance

Tracks daily check-in and check-out against each employee's scheduled shift.

### 🔹 Key Features
- **Shift scheduling**
  - Per-day assignments with a default shift fallback, overnight shifts included
- **Attendance**
  - Check-in/check-out with late, early-leave and overtime evaluation
- **Requests**
  - Timesheet adjustments, leave and schedule changes, approved or rejected by HR
- **Reports**
  - Worked hours per record and per employee

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.
Only **Admin** or **HR** can assign schedules and decide requests.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::history,
        crate::api::attendance::approve_record,
        crate::api::attendance::reject_record,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::leave_list,

        crate::api::timesheet_adjustment::create_adjustment,
        crate::api::timesheet_adjustment::approve_adjustment,
        crate::api::timesheet_adjustment::reject_adjustment,
        crate::api::timesheet_adjustment::list_adjustments,

        crate::api::schedule_change::create_schedule_change,
        crate::api::schedule_change::approve_schedule_change,
        crate::api::schedule_change::reject_schedule_change,
        crate::api::schedule_change::list_schedule_changes,

        crate::api::requests::pending,

        crate::api::schedule::upsert_schedule,
        crate::api::schedule::delete_schedule,
        crate::api::schedule::list_schedules,
        crate::api::schedule::resolve_schedule,

        crate::api::shift::list_shifts,
        crate::api::shift::get_shift,

        crate::api::report::attendance_report
    ),
    components(
        schemas(
            MessageResponse,
            DecisionPayload,
            RequestListQuery,
            ApprovalStatus,
            CheckInPayload,
            AttendanceResponse,
            AttendanceRecord,
            AttendanceView,
            AttendanceStatus,
            StatusFlags,
            CreateLeave,
            LeaveRequest,
            CreateTimesheetAdjustment,
            TimesheetAdjustmentRequest,
            CreateScheduleChange,
            ScheduleChangeRequest,
            PendingOverview,
            UpsertSchedule,
            ScheduleAssignment,
            ResolvedShift,
            ShiftResponse,
            AttendanceReport,
            ReportRow,
            EmployeeTotal
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in, check-out and history"),
        (name = "Leave", description = "Leave requests"),
        (name = "Timesheet Adjustment", description = "Timesheet adjustment requests"),
        (name = "Schedule Change", description = "Schedule change requests"),
        (name = "Requests", description = "Pending request overview"),
        (name = "Schedule", description = "Shift assignments"),
        (name = "Shift", description = "Shift catalog"),
        (name = "Report", description = "Worked-hours reporting"),
    )
)]
pub struct ApiDoc;
