use crate::{
    api::{attendance, client, dashboard, employee, expense, leave_request, payroll, position, settings},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    // both values are clamped to at least 1, so the builder cannot refuse them
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter)
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // registration form lookups
    cfg.service(web::resource("/positions").route(web::get().to(position::list_positions)))
        .service(web::resource("/departments").route(web::get().to(position::list_departments)));

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/me")
                    .service(web::resource("").route(web::get().to(handlers::me)))
                    .service(web::resource("/profile").route(web::put().to(handlers::update_profile)))
                    .service(
                        web::resource("/password").route(web::put().to(handlers::change_password)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(employee::approve_employee)),
                    )
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(employee::reject_employee)),
                    )
                    .service(
                        web::resource("/{id}/toggle-status")
                            .route(web::put().to(employee::toggle_status)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(web::resource("").route(web::get().to(attendance::history)))
                    .service(web::resource("/clock-in").route(web::post().to(attendance::clock_in)))
                    .service(
                        web::resource("/clock-out").route(web::post().to(attendance::clock_out)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::list_payrolls)))
                    .service(web::resource("/run").route(web::post().to(payroll::run_payroll)))
                    .service(web::resource("/runs").route(web::get().to(payroll::list_runs)))
                    // /payroll/{id}/payslip
                    .service(
                        web::resource("/{id}/payslip").route(web::get().to(payroll::get_payslip)),
                    ),
            )
            .service(
                web::scope("/positions")
                    .service(web::resource("").route(web::post().to(position::create_position)))
                    .service(
                        web::resource("/{id}").route(web::put().to(position::update_position)),
                    ),
            )
            .service(
                web::scope("/clients")
                    .service(
                        web::resource("")
                            .route(web::get().to(client::list_clients))
                            .route(web::post().to(client::create_client)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(client::update_client_status)),
                    ),
            )
            .service(
                web::resource("/expenses")
                    .route(web::get().to(expense::list_expenses))
                    .route(web::post().to(expense::log_expense)),
            )
            .service(
                web::resource("/settings")
                    .route(web::get().to(settings::get_settings))
                    .route(web::put().to(settings::update_settings)),
            )
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard)))
            .service(web::resource("/org-chart").route(web::get().to(dashboard::org_chart))),
    );
}

// LOGIN
//  ├─ access_token (ACCESS_TOKEN_TTL)
//  └─ refresh_token (REFRESH_TOKEN_TTL, stored in sessions)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with Authorization: Bearer refresh_token
//       └─ returns a new pair, old refresh token revoked
