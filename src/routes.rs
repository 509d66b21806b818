use crate::{
    api::{leave_allocation, leave_request, leave_type},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let ms_per_request = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        // a zero burst is rejected by the builder; fall back to the crate default
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(ms_per_request)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/leave-types")
                    // /leave-types
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_type::list_leave_types))
                            .route(web::post().to(leave_type::create_leave_type)),
                    )
                    // /leave-types/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_type::get_leave_type))
                            .route(web::put().to(leave_type::update_leave_type))
                            .route(web::delete().to(leave_type::delete_leave_type)),
                    ),
            )
            .service(
                web::scope("/leave-allocations")
                    // /leave-allocations
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_allocation::list_allocations))
                            .route(web::post().to(leave_allocation::create_allocations)),
                    )
                    // /leave-allocations/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_allocation::get_allocation))
                            .route(web::put().to(leave_allocation::update_allocation))
                            .route(web::delete().to(leave_allocation::delete_allocation)),
                    ),
            )
            .service(
                web::scope("/leave-requests")
                    // /leave-requests
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::list_leave_requests))
                            .route(web::post().to(leave_request::create_leave_request)),
                    )
                    // /leave-requests/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave_request))
                            .route(web::put().to(leave_request::update_leave_request))
                            .route(web::delete().to(leave_request::delete_leave_request)),
                    )
                    // /leave-requests/{id}/approval
                    .service(
                        web::resource("/{id}/approval")
                            .route(web::put().to(leave_request::change_approval)),
                    ),
            ),
    );
}
