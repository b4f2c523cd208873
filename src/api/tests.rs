use actix_web::{
    App,
    http::StatusCode,
    middleware::from_fn,
    test::{self, TestRequest},
    web::{self, Data},
};
use serde_json::{Value, json};

use crate::auth::jwt::{TokenType, issue_token};
use crate::auth::middleware::auth_middleware;
use crate::config::Config;
use crate::model::role::Role;
use crate::routes;
use crate::test_support::*;

const SECRET: &str = "test-secret";

fn config() -> Config {
    Config {
        database_url: "mysql://unused".to_string(),
        jwt_secret: SECRET.to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        rate_protected_per_min: 1000,
        api_prefix: "/api".to_string(),
        log_dir: "logs".to_string(),
        log_level: "debug".to_string(),
        history_limit: 30,
        report_default_days: 7,
    }
}

fn bearer(user_id: u64, role: Role, employee_id: Option<u64>) -> (&'static str, String) {
    let token = issue_token(user_id, role as u8, employee_id, TokenType::Access, SECRET);
    ("Authorization", format!("Bearer {token}"))
}

fn as_admin() -> (&'static str, String) {
    bearer(1, Role::Admin, None)
}

fn as_employee(id: u64) -> (&'static str, String) {
    bearer(id + 5000, Role::Employee, Some(id))
}

macro_rules! app {
    () => {{
        let TestApp { state, .. } = services();
        test::init_service(
            App::new()
                .app_data(Data::new(config()))
                .app_data(Data::new(state))
                .service(
                    web::scope("/api")
                        .wrap(from_fn(auth_middleware))
                        .configure(routes::register),
                ),
        )
        .await
    }};
}

#[actix_web::test]
async fn requests_without_a_valid_access_token_are_rejected() {
    let app = app!();

    let resp = test::call_service(&app, TestRequest::get().uri("/api/shifts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let refresh = issue_token(6001, Role::Employee as u8, Some(ALICE), TokenType::Refresh, SECRET);
    let req = TestRequest::get()
        .uri("/api/shifts")
        .insert_header(("Authorization", format!("Bearer {refresh}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/api/shifts")
        .insert_header(("Authorization", "Token abc"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Authorization header must start with Bearer");
}

#[actix_web::test]
async fn check_in_twice_reports_the_duplicate() {
    let app = app!();

    let req = TestRequest::post()
        .uri("/api/attendance/check-in")
        .insert_header(as_employee(ALICE))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Checked in successfully");
    assert_eq!(body["record"]["status"], "ON_TIME");

    let req = TestRequest::post()
        .uri("/api/attendance/check-in")
        .insert_header(as_employee(ALICE))
        .set_json(json!({ "explanation": "again" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Already checked in today");

    let req = TestRequest::get()
        .uri("/api/attendance/today")
        .insert_header(as_employee(ALICE))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.is_object());
}

#[actix_web::test]
async fn administrators_cannot_check_in_and_employees_cannot_decide() {
    let app = app!();

    let req = TestRequest::post()
        .uri("/api/attendance/check-in")
        .insert_header(as_admin())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::put()
        .uri("/api/leave/1/approve")
        .insert_header(as_employee(ALICE))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn leave_is_approved_once() {
    let app = app!();

    let req = TestRequest::post()
        .uri("/api/leave")
        .insert_header(as_employee(BOB))
        .set_json(json!({
            "start_date": "2026-02-10",
            "end_date": "2026-02-11",
            "reason": "Family event"
        }))
        .to_request();
    let leave: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(leave["status"], "PENDING");
    let id = leave["id"].as_u64().unwrap();

    let req = TestRequest::get()
        .uri("/api/requests/pending")
        .insert_header(as_admin())
        .to_request();
    let overview: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(overview["leaves"].as_array().map(Vec::len), Some(1));

    let approve = || {
        TestRequest::put()
            .uri(&format!("/api/leave/{id}/approve"))
            .insert_header(as_admin())
            .set_json(json!({ "admin_note": "Enjoy" }))
            .to_request()
    };
    let body: Value = test::call_and_read_body_json(&app, approve()).await;
    assert_eq!(body["message"], format!("Request {id} approved"));

    let resp = test::call_service(&app, approve()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Leave request not found or already processed");
}

#[actix_web::test]
async fn shift_catalog_and_resolution() {
    let app = app!();

    let req = TestRequest::get()
        .uri("/api/shifts")
        .insert_header(as_employee(ALICE))
        .to_request();
    let shifts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shifts.as_array().map(Vec::len), Some(3));

    let req = TestRequest::get()
        .uri("/api/shifts/99")
        .insert_header(as_employee(ALICE))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Shift not found");

    let req = TestRequest::get()
        .uri("/api/schedules/resolve?employee_id=1002&date=2026-02-02")
        .insert_header(as_admin())
        .to_request();
    let resolved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resolved["status"], "SCHEDULED");
    assert_eq!(resolved["shift"]["name"], "Night");

    let req = TestRequest::get()
        .uri("/api/schedules/resolve?employee_id=1003")
        .insert_header(as_admin())
        .to_request();
    let resolved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resolved["status"], "OFF");
    assert!(resolved["shift"].is_null());

    let req = TestRequest::get()
        .uri("/api/schedules/resolve?employee_id=1002")
        .insert_header(as_employee(ALICE))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn schedule_assignment_round_trip_through_the_api() {
    let app = app!();

    let req = TestRequest::put()
        .uri("/api/schedules")
        .insert_header(as_admin())
        .set_json(json!({ "employee_id": ALICE, "work_date": "2026-02-03", "shift_id": MORNING }))
        .to_request();
    let assignment: Value = test::call_and_read_body_json(&app, req).await;
    let id = assignment["id"].as_u64().unwrap();

    let req = TestRequest::get()
        .uri("/api/schedules?start=2026-02-02&end=2026-02-08")
        .insert_header(as_employee(ALICE))
        .to_request();
    let rows: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.as_array().map(Vec::len), Some(1));

    let req = TestRequest::delete()
        .uri(&format!("/api/schedules/{id}"))
        .insert_header(as_admin())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::delete()
        .uri(&format!("/api/schedules/{id}"))
        .insert_header(as_admin())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
