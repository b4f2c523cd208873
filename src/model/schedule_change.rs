use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::approval::{ApprovalStatus, Decision};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleChangeRequest {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date", example = "2026-02-01")]
    pub work_date: NaiveDate,
    pub requested_shift_id: u64,
    /// Business justification, always present.
    pub requested_note: String,
    pub status: ApprovalStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduleChange {
    pub employee_id: u64,
    pub work_date: NaiveDate,
    pub requested_shift_id: u64,
    pub requested_note: String,
    pub created_at: NaiveDateTime,
}
