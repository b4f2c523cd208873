use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::approval::{ApprovalStatus, Decision};

/// Employee-proposed correction of one day's check-in, check-out or note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimesheetAdjustmentRequest {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date", example = "2026-02-01")]
    pub work_date: NaiveDate,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub requested_check_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "17:00:00")]
    pub requested_check_out: Option<NaiveTime>,
    pub requested_note: Option<String>,
    pub status: ApprovalStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimesheetAdjustment {
    pub employee_id: u64,
    pub work_date: NaiveDate,
    pub requested_check_in: Option<NaiveTime>,
    pub requested_check_out: Option<NaiveTime>,
    pub requested_note: Option<String>,
    pub created_at: NaiveDateTime,
}
