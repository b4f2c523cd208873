use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::model::approval::ApprovalStatus;

/// Closed set of attendance outcomes stored with every record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    OnTime,
    Late,
    EarlyLeave,
    Absent,
    Unknown,
}

impl AttendanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::OnTime => "On time",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::EarlyLeave => "Left early",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Unknown => "Unknown",
        }
    }
}

/// Every signal observed for one day; none of them overwrites another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusFlags {
    pub late: bool,
    pub early_leave: bool,
    pub overtime: bool,
}

impl StatusFlags {
    const LATE: u8 = 0b001;
    const EARLY_LEAVE: u8 = 0b010;
    const OVERTIME: u8 = 0b100;

    pub fn to_bits(self) -> u8 {
        let mut bits = 0;
        if self.late {
            bits |= Self::LATE;
        }
        if self.early_leave {
            bits |= Self::EARLY_LEAVE;
        }
        if self.overtime {
            bits |= Self::OVERTIME;
        }
        bits
    }

    pub fn from_bits(bits: u8) -> Self {
        Self {
            late: bits & Self::LATE != 0,
            early_leave: bits & Self::EARLY_LEAVE != 0,
            overtime: bits & Self::OVERTIME != 0,
        }
    }

    /// Canonical single status for a completed set of flags.
    pub fn canonical_status(self) -> AttendanceStatus {
        if self.early_leave {
            AttendanceStatus::EarlyLeave
        } else if self.late {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::OnTime
        }
    }

    /// Display label joining every flag, e.g. "Late, Left early".
    pub fn label(self, status: AttendanceStatus) -> String {
        if matches!(status, AttendanceStatus::Absent | AttendanceStatus::Unknown) {
            return status.label().to_string();
        }

        let mut parts = Vec::with_capacity(3);
        if self.late {
            parts.push(AttendanceStatus::Late.label());
        }
        if self.early_leave {
            parts.push(AttendanceStatus::EarlyLeave.label());
        }
        if parts.is_empty() {
            parts.push(AttendanceStatus::OnTime.label());
        }
        if self.overtime {
            parts.push("Overtime");
        }
        parts.join(", ")
    }
}

/// One row of the attendance ledger, unique per (employee, work date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    #[schema(value_type = String, format = "date")]
    pub work_date: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    pub note: Option<String>,
    pub overtime_minutes: u32,
    pub approval_status: ApprovalStatus,
}

impl AttendanceRecord {
    pub fn is_checked_out(&self) -> bool {
        self.check_out.is_some()
    }

    pub fn label(&self) -> String {
        self.flags.label(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub work_date: NaiveDate,
    pub check_in: NaiveDateTime,
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    pub note: Option<String>,
    pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutUpdate {
    pub check_out: NaiveDateTime,
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    pub note: Option<String>,
    pub overtime_minutes: u32,
}

/// Read model joining the ledger with employee, department and the shift
/// that applied that day.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceReportRow {
    pub employee_id: u64,
    pub full_name: String,
    pub username: String,
    pub department_name: Option<String>,
    pub shift_name: Option<String>,
    pub break_minutes: u32,
    pub work_date: NaiveDate,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    pub overtime_minutes: u32,
    pub note: Option<String>,
}

/// UI-ready row for personal history. Carries no markup.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceView {
    pub id: u64,
    #[schema(example = "2026-02-01")]
    pub date: String,
    #[schema(example = "08:10:00")]
    pub check_in: String,
    #[schema(example = "-")]
    pub check_out: String,
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    #[schema(example = "Late, Left early")]
    pub label: String,
    pub approval_status: ApprovalStatus,
    pub overtime_minutes: u32,
    pub note: Option<String>,
}

impl From<&AttendanceRecord> for AttendanceView {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            id: r.id,
            date: r.work_date.format("%Y-%m-%d").to_string(),
            check_in: r
                .check_in
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            check_out: r
                .check_out
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: r.status,
            flags: r.flags,
            label: r.label(),
            approval_status: r.approval_status,
            overtime_minutes: r.overtime_minutes,
            note: r.note.clone(),
        }
    }
}
