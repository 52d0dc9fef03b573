//! Database migration command.
//!
//! Migrations live in `crates/server/migrations/` and are embedded into this
//! binary at compile time, so the CLI can migrate any reachable database
//! without the source tree present.

use tracing::info;

use novamart_server::db;

/// Run pending migrations against the configured database.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
