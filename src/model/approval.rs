use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Pending → Approved | Rejected. Shared by requests and attendance records.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    IntoStaticStr,
    Display,
    EnumString,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn is_pending(self) -> bool {
        self == ApprovalStatus::Pending
    }
}

/// The three independently tracked request kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RequestKind {
    #[strum(serialize = "timesheet adjustment")]
    TimesheetAdjustment,
    #[strum(serialize = "leave")]
    Leave,
    #[strum(serialize = "schedule change")]
    ScheduleChange,
}

/// Who decided a request, when, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Decision {
    pub status: ApprovalStatus,
    pub decided_by: u64,
    #[schema(value_type = String, format = "date-time")]
    pub decided_at: NaiveDateTime,
    pub admin_note: Option<String>,
}
