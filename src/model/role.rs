use crate::error::AppError;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    /// Admin and HR decide requests; they never submit them.
    pub fn is_administrator(self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}

/// Validated caller identity handed to the services.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: u64,
    pub role: Role,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl Actor {
    /// Admin or HR; everyone else gets an authorization error.
    pub fn require_administrator(&self) -> Result<(), AppError> {
        if self.role.is_administrator() {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin or HR access required"))
        }
    }

    /// Employee-only actions (attendance, submitting requests). Returns the
    /// linked employee id.
    pub fn require_employee(&self) -> Result<u64, AppError> {
        if self.role != Role::Employee {
            return Err(AppError::forbidden("Only employees can perform this action"));
        }
        self.employee_id
            .ok_or_else(|| AppError::forbidden("No employee profile linked to this account"))
    }

    /// Own employee id for employees, `requested` (possibly none) for
    /// administrators.
    pub fn scope_employee(&self, requested: Option<u64>) -> Result<Option<u64>, AppError> {
        if self.role.is_administrator() {
            return Ok(requested);
        }
        let own = self.require_employee()?;
        match requested {
            Some(other) if other != own => {
                Err(AppError::forbidden("Employees can only access their own data"))
            }
            _ => Ok(Some(own)),
        }
    }
}
