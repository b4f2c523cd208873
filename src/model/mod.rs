pub mod approval;
pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod role;
pub mod schedule;
pub mod schedule_change;
pub mod shift;
pub mod timesheet_adjustment;
