use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Binds one employee to one shift on one date. Unique per (employee, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ScheduleAssignment {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date", example = "2026-02-01")]
    pub work_date: NaiveDate,
    pub shift_id: u64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduleAssignment {
    pub employee_id: u64,
    pub work_date: NaiveDate,
    pub shift_id: u64,
    pub note: Option<String>,
}
