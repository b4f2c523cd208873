use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_GRACE_MINUTES: u32 = 15;

/// A named daily work window.
///
/// When `end_time < start_time` the shift spans midnight and ends on the
/// calendar day after its work date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "Morning",
    "start_time": "08:00:00",
    "end_time": "17:00:00",
    "grace_minutes": 15,
    "early_leave_minutes": 30,
    "break_minutes": 60
}))]
pub struct Shift {
    pub id: u64,
    pub name: String,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
    pub grace_minutes: u32,
    pub early_leave_minutes: u32,
    pub break_minutes: u32,
}

impl Shift {
    pub fn is_overnight(&self) -> bool {
        self.end_time < self.start_time
    }

    pub fn duration_minutes(&self) -> i64 {
        let span = self.end_time - self.start_time;
        if self.is_overnight() {
            (span + Duration::days(1)).num_minutes()
        } else {
            span.num_minutes()
        }
    }

    /// Start of the shift anchored on `work_date`.
    pub fn start_on(&self, work_date: NaiveDate) -> NaiveDateTime {
        work_date.and_time(self.start_time)
    }

    /// End of the shift anchored on `work_date`, rolled to the next day for
    /// overnight shifts.
    pub fn end_on(&self, work_date: NaiveDate) -> NaiveDateTime {
        let end = work_date.and_time(self.end_time);
        if self.is_overnight() {
            end + Duration::days(1)
        } else {
            end
        }
    }
}

/// Catalog entry as exposed by the read API.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftResponse {
    #[serde(flatten)]
    pub shift: Shift,
    pub overnight: bool,
    pub duration_minutes: i64,
}

impl From<Shift> for ShiftResponse {
    fn from(shift: Shift) -> Self {
        Self {
            overnight: shift.is_overnight(),
            duration_minutes: shift.duration_minutes(),
            shift,
        }
    }
}
