//! CLI subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod sessions;

use secrecy::SecretString;

/// Database URL from `NOVAMART_DATABASE_URL`, falling back to `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    std::env::var("NOVAMART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "NOVAMART_DATABASE_URL not set".into())
}
