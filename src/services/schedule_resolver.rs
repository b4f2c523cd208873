use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::db::repository::{EmployeeRepository, ScheduleRepository, ShiftRepository};
use crate::error::AppError;
use crate::model::{
    role::Actor,
    schedule::{NewScheduleAssignment, ScheduleAssignment},
    shift::Shift,
};
use crate::services::rejected;

/// Decides which shift applies to an employee on a date.
pub struct ScheduleResolver {
    schedules: Arc<dyn ScheduleRepository>,
    shifts: Arc<dyn ShiftRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl ScheduleResolver {
    pub fn new(
        schedules: Arc<dyn ScheduleRepository>,
        shifts: Arc<dyn ShiftRepository>,
        employees: Arc<dyn EmployeeRepository>,
    ) -> Self {
        Self {
            schedules,
            shifts,
            employees,
        }
    }

    /// Explicit assignment for the date, else the employee's default shift,
    /// else `None` ("OFF"). There is no business-hours fallback.
    pub async fn resolve(&self, employee_id: u64, date: NaiveDate) -> Result<Option<Shift>, AppError> {
        if let Some(assignment) = self.schedules.find_assignment(employee_id, date).await? {
            return Ok(self.shifts.find_shift(assignment.shift_id).await?);
        }

        let default_shift = self
            .employees
            .find_employee(employee_id)
            .await?
            .and_then(|e| e.default_shift_id);

        match default_shift {
            Some(shift_id) => Ok(self.shifts.find_shift(shift_id).await?),
            None => Ok(None),
        }
    }

    /// Creates or replaces the assignment for (employee, date).
    pub async fn assign(
        &self,
        actor: &Actor,
        new: NewScheduleAssignment,
    ) -> Result<ScheduleAssignment, AppError> {
        actor.require_administrator()?;

        if self.employees.find_employee(new.employee_id).await?.is_none() {
            return Err(AppError::validation("Employee not found"));
        }
        if self.shifts.find_shift(new.shift_id).await?.is_none() {
            return Err(AppError::validation("Shift not found"));
        }

        let id = self
            .schedules
            .upsert_assignment(&new)
            .await
            .map_err(|e| rejected(e, "Schedule assignment rejected"))?;

        info!(
            schedule_id = id,
            employee_id = new.employee_id,
            work_date = %new.work_date,
            shift_id = new.shift_id,
            decided_by = actor.user_id,
            "Schedule assigned"
        );

        Ok(ScheduleAssignment {
            id,
            employee_id: new.employee_id,
            work_date: new.work_date,
            shift_id: new.shift_id,
            note: new.note,
        })
    }

    pub async fn remove(&self, actor: &Actor, id: u64) -> Result<(), AppError> {
        actor.require_administrator()?;

        if !self.schedules.delete_assignment(id).await? {
            return Err(AppError::not_found("Schedule assignment not found"));
        }
        info!(schedule_id = id, removed_by = actor.user_id, "Schedule assignment removed");
        Ok(())
    }

    /// Employees only ever see their own assignments.
    pub async fn list(
        &self,
        actor: &Actor,
        start: NaiveDate,
        end: NaiveDate,
        employee_id: Option<u64>,
    ) -> Result<Vec<ScheduleAssignment>, AppError> {
        if start > end {
            return Err(AppError::validation("start date must not be after end date"));
        }
        let employee_id = actor.scope_employee(employee_id)?;
        Ok(self.schedules.list_assignments(start, end, employee_id).await?)
    }
}
