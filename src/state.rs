use std::sync::Arc;

use crate::db::repository::{
    AttendanceRepository, EmployeeRepository, RequestRepository, ScheduleRepository,
    ShiftRepository,
};
use crate::services::{
    attendance_service::AttendanceService, clock::Clock, report_service::ReportService,
    request_service::RequestService, schedule_resolver::ScheduleResolver,
};

/// Everything handlers need, wired once at startup.
pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub shifts: Arc<dyn ShiftRepository>,
    pub resolver: Arc<ScheduleResolver>,
    pub attendance: AttendanceService,
    pub requests: RequestService,
    pub reports: ReportService,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>, history_limit: u32, report_default_days: u32) -> Self
    where
        S: ShiftRepository
            + EmployeeRepository
            + ScheduleRepository
            + AttendanceRepository
            + RequestRepository
            + 'static,
    {
        let shifts: Arc<dyn ShiftRepository> = store.clone();
        let attendance: Arc<dyn AttendanceRepository> = store.clone();
        let requests: Arc<dyn RequestRepository> = store.clone();

        let resolver = Arc::new(ScheduleResolver::new(store.clone(), shifts.clone(), store));

        Self {
            clock,
            shifts: shifts.clone(),
            attendance: AttendanceService::new(attendance.clone(), resolver.clone(), history_limit),
            requests: RequestService::new(requests, attendance.clone(), shifts, resolver.clone()),
            reports: ReportService::new(attendance, report_default_days),
            resolver,
        }
    }
}
