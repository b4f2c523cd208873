use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use tracing::warn;

use crate::{
    api::{
        attendance, leave_request, report, requests, schedule, schedule_change, shift,
        timesheet_adjustment,
    },
    auth::middleware::auth_middleware,
    config::Config,
};

fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

/// Every protected resource, relative to the API prefix.
pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .service(web::resource("/check-in").route(web::post().to(attendance::check_in)))
            .service(web::resource("/check-out").route(web::post().to(attendance::check_out)))
            .service(web::resource("/today").route(web::get().to(attendance::today)))
            .service(web::resource("/history").route(web::get().to(attendance::history)))
            // /attendance/{id}/approve|reject
            .service(
                web::resource("/{id}/approve").route(web::put().to(attendance::approve_record)),
            )
            .service(
                web::resource("/{id}/reject").route(web::put().to(attendance::reject_record)),
            ),
    )
    .service(
        web::scope("/leave")
            .service(
                web::resource("")
                    .route(web::get().to(leave_request::leave_list))
                    .route(web::post().to(leave_request::create_leave)),
            )
            .service(
                web::resource("/{id}/approve").route(web::put().to(leave_request::approve_leave)),
            )
            .service(
                web::resource("/{id}/reject").route(web::put().to(leave_request::reject_leave)),
            ),
    )
    .service(
        web::scope("/timesheet-adjustments")
            .service(
                web::resource("")
                    .route(web::get().to(timesheet_adjustment::list_adjustments))
                    .route(web::post().to(timesheet_adjustment::create_adjustment)),
            )
            .service(
                web::resource("/{id}/approve")
                    .route(web::put().to(timesheet_adjustment::approve_adjustment)),
            )
            .service(
                web::resource("/{id}/reject")
                    .route(web::put().to(timesheet_adjustment::reject_adjustment)),
            ),
    )
    .service(
        web::scope("/schedule-changes")
            .service(
                web::resource("")
                    .route(web::get().to(schedule_change::list_schedule_changes))
                    .route(web::post().to(schedule_change::create_schedule_change)),
            )
            .service(
                web::resource("/{id}/approve")
                    .route(web::put().to(schedule_change::approve_schedule_change)),
            )
            .service(
                web::resource("/{id}/reject")
                    .route(web::put().to(schedule_change::reject_schedule_change)),
            ),
    )
    .service(
        web::scope("/requests")
            .service(web::resource("/pending").route(web::get().to(requests::pending))),
    )
    .service(
        web::scope("/schedules")
            .service(
                web::resource("")
                    .route(web::get().to(schedule::list_schedules))
                    .route(web::put().to(schedule::upsert_schedule)),
            )
            // must precede /{id}
            .service(web::resource("/resolve").route(web::get().to(schedule::resolve_schedule)))
            .service(web::resource("/{id}").route(web::delete().to(schedule::delete_schedule))),
    )
    .service(
        web::scope("/shifts")
            .service(web::resource("").route(web::get().to(shift::list_shifts)))
            .service(web::resource("/{id}").route(web::get().to(shift::get_shift))),
    )
    .service(
        web::scope("/reports")
            .service(web::resource("/attendance").route(web::get().to(report::attendance_report))),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let scope = web::scope(&config.api_prefix).wrap(from_fn(auth_middleware));

    match build_limiter(config.rate_protected_per_min) {
        Some(limiter) => {
            cfg.service(scope.wrap(limiter).configure(register));
        }
        None => {
            warn!(
                per_min = config.rate_protected_per_min,
                "Rate limiter rejected its configuration, serving without it"
            );
            cfg.service(scope.configure(register));
        }
    }
}
