use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::approval::{ApprovalStatus, Decision};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date", example = "2026-01-01")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date", example = "2026-01-03")]
    pub end_date: NaiveDate,
    #[schema(example = "Family event")]
    pub reason: String,
    pub status: ApprovalStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub created_at: NaiveDateTime,
}
