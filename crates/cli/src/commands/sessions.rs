//! Session token maintenance.

use tracing::info;

use novamart_server::db;

/// Delete expired session tokens.
///
/// Meant to run periodically (cron or similar); expired tokens already fail
/// authentication, this just reclaims the rows.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the delete fails.
pub async fn prune() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let pruned = db::sessions::prune_expired(&pool).await?;
    info!(pruned, "Expired sessions removed");
    Ok(())
}
