//! Pure attendance rules. Nothing here reads a clock or touches storage:
//! `now` and the resolved shift always come in as arguments.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use crate::model::{
    attendance::{AttendanceStatus, StatusFlags},
    shift::Shift,
};

/// Staying past shift end only counts as overtime beyond this many minutes.
pub const OVERTIME_THRESHOLD_MINUTES: i64 = 30;

pub const OVERTIME_MULTIPLIER: f64 = 1.5;
pub const REST_DAY_OVERTIME_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinDecision {
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    pub late_minutes: i64,
    pub note: String,
}

impl CheckinDecision {
    /// `false` means there is no shift to check in against.
    pub fn is_scheduled(&self) -> bool {
        self.status != AttendanceStatus::Absent
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutDecision {
    pub status: AttendanceStatus,
    pub flags: StatusFlags,
    pub note: String,
    pub overtime_minutes: u32,
    /// Reporting only; never changes `status`.
    pub overtime_multiplier: Option<f64>,
}

/// Classifies a check-in against the shift anchored on `work_date`.
///
/// The caller picks `work_date` (see [`checkin_work_date`]); this function
/// trusts it. With no shift the outcome is `Absent` and the caller must not
/// record anything.
pub fn decide_checkin(
    now: NaiveDateTime,
    work_date: NaiveDate,
    shift: Option<&Shift>,
    grace_minutes: u32,
) -> CheckinDecision {
    let Some(shift) = shift else {
        return CheckinDecision {
            status: AttendanceStatus::Absent,
            flags: StatusFlags::default(),
            late_minutes: 0,
            note: "No shift scheduled".to_string(),
        };
    };

    let shift_start = shift.start_on(work_date);
    let allowed_until = shift_start + Duration::minutes(i64::from(grace_minutes));

    if now <= allowed_until {
        return CheckinDecision {
            status: AttendanceStatus::OnTime,
            flags: StatusFlags::default(),
            late_minutes: 0,
            note: format!("Checked in on time at {}", now.format("%H:%M")),
        };
    }

    // now > start here, so truncation is the floor
    let late_minutes = (now - shift_start).num_minutes();
    CheckinDecision {
        status: AttendanceStatus::Late,
        flags: StatusFlags {
            late: true,
            ..StatusFlags::default()
        },
        late_minutes,
        note: format!("Late by {late_minutes} minutes"),
    }
}

/// Classifies a check-out. Flags already set at check-in are kept, so a late
/// arrival that also leaves early ends up with both.
pub fn decide_checkout(
    now: NaiveDateTime,
    work_date: NaiveDate,
    shift: Option<&Shift>,
    current_status: AttendanceStatus,
    current_flags: StatusFlags,
) -> CheckoutDecision {
    let Some(shift) = shift else {
        return CheckoutDecision {
            status: current_status,
            flags: current_flags,
            note: "No shift found".to_string(),
            overtime_minutes: 0,
            overtime_multiplier: None,
        };
    };

    let shift_end = shift.end_on(work_date);
    let early_threshold = shift_end - Duration::minutes(i64::from(shift.early_leave_minutes));
    let mut flags = current_flags;

    if now < early_threshold {
        flags.early_leave = true;
        let before_end = (shift_end - now).num_minutes();
        return CheckoutDecision {
            status: flags.canonical_status(),
            flags,
            note: format!(
                "Left early at {} ({before_end} minutes before shift end)",
                now.format("%H:%M")
            ),
            overtime_minutes: 0,
            overtime_multiplier: None,
        };
    }

    let past_end = (now - shift_end).num_minutes();
    if now > shift_end && past_end > OVERTIME_THRESHOLD_MINUTES {
        flags.overtime = true;
        let multiplier = overtime_multiplier(work_date);
        return CheckoutDecision {
            status: flags.canonical_status(),
            flags,
            note: format!("Overtime {past_end} minutes (x{multiplier})"),
            overtime_minutes: u32::try_from(past_end).unwrap_or(u32::MAX),
            overtime_multiplier: Some(multiplier),
        };
    }

    CheckoutDecision {
        status: flags.canonical_status(),
        flags,
        note: "Shift completed".to_string(),
        overtime_minutes: 0,
        overtime_multiplier: None,
    }
}

/// Sunday is the weekly rest day.
pub fn overtime_multiplier(work_date: NaiveDate) -> f64 {
    if work_date.weekday() == Weekday::Sun {
        REST_DAY_OVERTIME_MULTIPLIER
    } else {
        OVERTIME_MULTIPLIER
    }
}

/// Work date a check-in at `now` belongs to.
///
/// Normally today. It is yesterday when yesterday's shift runs overnight,
/// `now` is still before that shift's end and nothing was recorded for
/// yesterday yet.
pub fn checkin_work_date(
    now: NaiveDateTime,
    yesterday_shift: Option<&Shift>,
    yesterday_has_record: bool,
) -> NaiveDate {
    let today = now.date();
    let Some(yesterday) = today.pred_opt() else {
        return today;
    };

    match yesterday_shift {
        Some(shift)
            if shift.is_overnight() && !yesterday_has_record && now < shift.end_on(yesterday) =>
        {
            yesterday
        }
        _ => today,
    }
}
