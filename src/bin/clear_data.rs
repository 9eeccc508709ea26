use dotenvy::dotenv;
use hrms::config::Config;
use hrms::db::Store;
use hrms::logging;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    let _guard = logging::init(&config, "clear.log");

    let store = Store::init(&config).await?;
    let teardown = store.clear_all().await?;

    info!(?teardown, "Clearing finished");
    println!(
        "Database cleared successfully! ({} attendance rows, {} employees, {} shifts)",
        teardown.attendance, teardown.employees, teardown.shifts
    );
    Ok(())
}
