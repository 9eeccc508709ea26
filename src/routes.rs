use crate::api::{
    attendance,
    crud::{self, Resource},
};
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};
use actix_governor::governor::middleware::NoOpMiddleware;
use actix_web::web;

use crate::model::{Attendance, Employee, Shift};

/// Per-IP limiter for the API scope.
pub fn rate_limit(
    requests_per_min: u32,
) -> anyhow::Result<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit: {requests_per_min} per minute"))
}

fn collection<T: Resource>(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.service(
        web::scope(path)
            // /{collection}
            .service(
                web::resource("")
                    .route(web::get().to(crud::list::<T>))
                    .route(web::post().to(crud::create::<T>)),
            )
            // /{collection}/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(crud::get::<T>))
                    .route(web::put().to(crud::replace::<T>))
                    .route(web::patch().to(crud::modify::<T>))
                    .route(web::delete().to(crud::remove::<T>)),
            ),
    );
}

/// Resource routes, to be mounted under the API prefix.
pub fn configure(cfg: &mut web::ServiceConfig) {
    collection::<Shift>(cfg, "/shifts");
    collection::<Employee>(cfg, "/employees");

    cfg.service(
        web::scope("/attendance")
            // /attendance
            .service(
                web::resource("")
                    .route(web::get().to(crud::list::<Attendance>))
                    .route(web::post().to(attendance::record)),
            )
            // /attendance/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(crud::get::<Attendance>))
                    .route(web::put().to(crud::replace::<Attendance>))
                    .route(web::patch().to(crud::modify::<Attendance>))
                    .route(web::delete().to(crud::remove::<Attendance>)),
            ),
    );
}
