//! Fixtures shared by the unit tests.

use std::ops::Deref;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::db::memory::MemoryStore;
use crate::model::{
    employee::Employee,
    role::{Actor, Role},
    shift::Shift,
};
use crate::services::clock::FixedClock;
use crate::state::AppState;

pub const MORNING: u64 = 1;
pub const NIGHT: u64 = 2;
pub const OFFICE: u64 = 3;

pub const ENGINEERING: u64 = 10;
pub const OPERATIONS: u64 = 20;

/// Office 09:00-18:00 by default, Engineering.
pub const ALICE: u64 = 1001;
/// Night 22:00-06:00 by default, Operations.
pub const BOB: u64 = 1002;
/// No department, no default shift.
pub const CAROL: u64 = 1003;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2026-02-02, a Monday.
pub fn monday() -> NaiveDate {
    day(2026, 2, 2)
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

fn shift(id: u64, name: &str, start: (u32, u32), end: (u32, u32), break_minutes: u32) -> Shift {
    Shift {
        id,
        name: name.to_string(),
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        grace_minutes: 15,
        early_leave_minutes: 30,
        break_minutes,
    }
}

fn person(
    id: u64,
    name: &str,
    department: Option<(u64, &str)>,
    default_shift_id: Option<u64>,
) -> Employee {
    Employee {
        id,
        full_name: name.to_string(),
        username: name.to_lowercase().replace(' ', "."),
        department_id: department.map(|d| d.0),
        department_name: department.map(|d| d.1.to_string()),
        default_shift_id,
    }
}

pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.add_shift(shift(MORNING, "Morning", (8, 0), (17, 0), 60));
    store.add_shift(shift(NIGHT, "Night", (22, 0), (6, 0), 30));
    store.add_shift(shift(OFFICE, "Office", (9, 0), (18, 0), 60));

    store.add_employee(person(ALICE, "Alice Nguyen", Some((ENGINEERING, "Engineering")), Some(OFFICE)));
    store.add_employee(person(BOB, "Bob Tran", Some((OPERATIONS, "Operations")), Some(NIGHT)));
    store.add_employee(person(CAROL, "Carol Le", None, None));
    Arc::new(store)
}

pub fn admin() -> Actor {
    Actor {
        user_id: 1,
        role: Role::Admin,
        employee_id: None,
    }
}

pub fn hr() -> Actor {
    Actor {
        user_id: 2,
        role: Role::Hr,
        employee_id: None,
    }
}

pub fn employee(employee_id: u64) -> Actor {
    Actor {
        user_id: employee_id + 5000,
        role: Role::Employee,
        employee_id: Some(employee_id),
    }
}

/// Application state over a seeded in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl Deref for TestApp {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

pub fn services_with(store: Arc<MemoryStore>, history_limit: u32) -> TestApp {
    let clock = Arc::new(FixedClock(at(monday(), 9, 0)));
    TestApp {
        state: AppState::new(Arc::clone(&store), clock, history_limit, 7),
        store,
    }
}

pub fn services() -> TestApp {
    services_with(seeded_store(), 30)
}
