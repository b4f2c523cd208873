use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::repository::{AttendanceRepository, ReportFilter};
use crate::error::AppError;
use crate::model::{
    attendance::{AttendanceReportRow, AttendanceStatus, StatusFlags},
    role::Actor,
};
use crate::services::decision::overtime_multiplier;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportRow {
    pub employee_id: u64,
    pub full_name: String,
    pub username: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Morning")]
    pub shift: String,
    #[schema(example = "2026-02-02")]
    pub work_date: String,
    #[schema(example = "08:10")]
    pub check_in: String,
    #[schema(example = "17:00")]
    pub check_out: String,
    pub worked_minutes: i64,
    #[schema(example = "07:50")]
    pub worked: String,
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    pub label: String,
    pub overtime_minutes: u32,
    #[schema(example = 1.5)]
    pub overtime_multiplier: f64,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeTotal {
    pub employee_id: u64,
    pub full_name: String,
    pub username: String,
    pub total_minutes: i64,
    #[schema(example = "38:45")]
    pub total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceReport {
    #[schema(value_type = String, format = "date")]
    pub start: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end: NaiveDate,
    pub rows: Vec<ReportRow>,
    pub summary: Vec<EmployeeTotal>,
}

/// `(check_out - check_in) - break`, floored at zero. Open records count 0.
pub fn worked_minutes(
    check_in: Option<NaiveDateTime>,
    check_out: Option<NaiveDateTime>,
    break_minutes: u32,
) -> i64 {
    match (check_in, check_out) {
        (Some(i), Some(o)) => ((o - i).num_minutes() - i64::from(break_minutes)).max(0),
        _ => 0,
    }
}

pub fn format_hhmm(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn clock_or_dash(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl From<AttendanceReportRow> for ReportRow {
    fn from(r: AttendanceReportRow) -> Self {
        let worked = worked_minutes(r.check_in, r.check_out, r.break_minutes);
        Self {
            employee_id: r.employee_id,
            full_name: r.full_name,
            username: r.username,
            department: r.department_name.unwrap_or_else(|| "-".to_string()),
            shift: r.shift_name.unwrap_or_else(|| "-".to_string()),
            work_date: r.work_date.format("%Y-%m-%d").to_string(),
            check_in: clock_or_dash(r.check_in),
            check_out: clock_or_dash(r.check_out),
            worked_minutes: worked,
            worked: format_hhmm(worked),
            status: r.status,
            flags: r.flags,
            label: r.flags.label(r.status),
            overtime_minutes: r.overtime_minutes,
            overtime_multiplier: overtime_multiplier(r.work_date),
            note: r.note,
        }
    }
}

/// Per-employee totals, largest first.
pub fn summarize(rows: &[ReportRow]) -> Vec<EmployeeTotal> {
    let mut totals: HashMap<u64, EmployeeTotal> = HashMap::new();
    for row in rows {
        totals
            .entry(row.employee_id)
            .or_insert_with(|| EmployeeTotal {
                employee_id: row.employee_id,
                full_name: row.full_name.clone(),
                username: row.username.clone(),
                total_minutes: 0,
                total: String::new(),
            })
            .total_minutes += row.worked_minutes;
    }

    let mut summary: Vec<EmployeeTotal> = totals
        .into_values()
        .map(|mut t| {
            t.total = format_hhmm(t.total_minutes);
            t
        })
        .collect();
    summary.sort_by(|a, b| {
        b.total_minutes
            .cmp(&a.total_minutes)
            .then(a.employee_id.cmp(&b.employee_id))
    });
    summary
}

/// Read-only worked-time projection over the ledger.
pub struct ReportService {
    attendance: Arc<dyn AttendanceRepository>,
    default_days: u32,
}

impl ReportService {
    pub fn new(attendance: Arc<dyn AttendanceRepository>, default_days: u32) -> Self {
        Self {
            attendance,
            default_days,
        }
    }

    /// Missing bounds default to the `default_days` ending `today`.
    pub async fn build_report(
        &self,
        actor: &Actor,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        employee_id: Option<u64>,
        department_id: Option<u64>,
    ) -> Result<AttendanceReport, AppError> {
        let end = end.unwrap_or(today);
        let span = i64::from(self.default_days.max(1)) - 1;
        let start = start.unwrap_or(end - Duration::days(span));
        if start > end {
            return Err(AppError::validation("start date must not be after end date"));
        }

        let filter = ReportFilter {
            start,
            end,
            employee_id: actor.scope_employee(employee_id)?,
            department_id,
        };

        let rows: Vec<ReportRow> = self
            .attendance
            .report_rows(&filter)
            .await?
            .into_iter()
            .map(ReportRow::from)
            .collect();
        let summary = summarize(&rows);

        Ok(AttendanceReport {
            start,
            end,
            rows,
            summary,
        })
    }
}
