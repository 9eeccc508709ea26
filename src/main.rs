use actix_governor::Governor;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

use hrms::config::Config;
use hrms::db::Store;
use hrms::docs::ApiDoc;
use hrms::{logging, routes};
use tracing::info;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRMS is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    let _guard = logging::init(&config, "app.log");

    info!("Server starting...");

    let store = Store::init(&config).await?;
    let governor_conf = routes::rate_limit(config.rate_per_min)?;

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();
    info!(addr = %server_addr, prefix = %api_prefix, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(store.clone()))
            .service(index)
            .service(
                web::scope(&api_prefix)
                    .wrap(Governor::new(&governor_conf))
                    .configure(routes::configure),
            )
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
