use tracing_subscriber::EnvFilter;

use dormbook::{config::AppConfig, db, ledger::finance, ledger::inventory};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let pool = db::init_pool(&config.database_url)?;
    db::run_migrations(&pool)?;

    let mut conn = pool
        .get()
        .map_err(|err| anyhow::anyhow!("failed to acquire connection: {err}"))?;

    inventory::setup_initial_inventory(&mut conn, config.standard_bed_price)
        .map_err(|err| anyhow::anyhow!("seeding failed: {err}"))?;

    let stats = finance::system_statistics(&mut conn, config.standard_bed_price)
        .map_err(|err| anyhow::anyhow!("statistics failed: {err}"))?;
    tracing::info!(
        total_beds = stats.total_beds,
        available_beds = stats.available_beds,
        expected_revenue = stats.expected_revenue,
        "inventory seeded"
    );

    for building in inventory::list_buildings(&mut conn)
        .map_err(|err| anyhow::anyhow!("listing failed: {err}"))?
    {
        tracing::info!(
            code = %building.code,
            rooms = building.total_rooms,
            beds = building.total_beds,
            "building ready"
        );
    }

    Ok(())
}
