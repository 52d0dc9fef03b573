//! Account creation and demo data seeding.

use rust_decimal::Decimal;
use tracing::info;

use novamart_core::Role;
use novamart_server::db;
use novamart_server::db::products::CreateProduct;
use novamart_server::services::auth;

/// Token lifetime for sessions issued during seeding. The tokens are not
/// printed; accounts log in through the API afterwards.
const SEED_TOKEN_TTL_DAYS: i64 = 1;

/// Create an admin account.
///
/// # Errors
///
/// Returns an error if the database is unreachable, the email is invalid or
/// already registered, or the password is too weak.
pub async fn create_admin(
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let authed = auth::register(&pool, name, email, password, Role::Admin, SEED_TOKEN_TTL_DAYS)
        .await?;

    info!(id = %authed.user.id, email = %authed.user.email, "Admin account created");
    Ok(())
}

/// Seed the database with demo accounts, categories, and products.
///
/// Idempotence is not attempted; running this against a non-empty database
/// fails on the first duplicate email.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub async fn demo_data() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let admin = auth::register(
        &pool,
        "Demo Admin",
        "admin@novamart.test",
        "demo-admin-password",
        Role::Admin,
        SEED_TOKEN_TTL_DAYS,
    )
    .await?;
    info!(id = %admin.user.id, "Seeded admin account");

    let seller = auth::register(
        &pool,
        "Demo Seller",
        "seller@novamart.test",
        "demo-seller-password",
        Role::Seller,
        SEED_TOKEN_TTL_DAYS,
    )
    .await?;
    info!(id = %seller.user.id, "Seeded seller account");

    let shopper = auth::register(
        &pool,
        "Demo Shopper",
        "shopper@novamart.test",
        "demo-shopper-password",
        Role::User,
        SEED_TOKEN_TTL_DAYS,
    )
    .await?;
    info!(id = %shopper.user.id, "Seeded shopper account");

    let electronics = db::categories::create(&pool, "Electronics").await?;
    let apparel = db::categories::create(&pool, "Apparel").await?;
    info!("Seeded categories");

    let demo_products = [
        ("Wireless Earbuds", Decimal::from(2499), 40, electronics.id),
        ("Mechanical Keyboard", Decimal::from(5999), 15, electronics.id),
        ("Cotton T-Shirt", Decimal::from(499), 120, apparel.id),
    ];

    for (name, price, stock, category_id) in demo_products {
        let id = db::products::create(
            &pool,
            CreateProduct {
                name: name.to_string(),
                description: format!("Demo listing for {name}"),
                price,
                stock,
                category_id: Some(category_id),
                image: String::new(),
                seller_id: seller.user.id,
            },
        )
        .await?;
        info!(%id, name, "Seeded product");
    }

    info!("Demo data seeded");
    Ok(())
}
