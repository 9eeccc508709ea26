use chrono::Local;
use dotenvy::dotenv;
use hrms::config::Config;
use hrms::db::Store;
use hrms::{logging, seed};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    let _guard = logging::init(&config, "seed.log");

    let store = Store::init(&config).await?;
    let summary = seed::seed(&store, Local::now().date_naive()).await?;

    info!(?summary, "Seeding finished");
    println!(
        "Dummy data seeded successfully! ({} shifts, {} employees, {} attendance rows)",
        summary.shifts, summary.employees, summary.attendance
    );
    Ok(())
}
