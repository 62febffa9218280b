use bank_accounts::db::Database;
use rand::Rng;
use sqlx::{AnyPool, any::install_default_drivers};

/// Fresh in-memory SQLite database with the shipped migrations applied.
pub async fn setup_test_db() -> AnyPool {
    install_default_drivers();
    let suffix: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();
    let database_url = format!("sqlite:file:accounts_{}?mode=memory&cache=shared", suffix);

    let pool = AnyPool::connect(&database_url)
        .await
        .expect("Failed to create in-memory SQLite DB");
    Database::migrate(&pool)
        .await
        .expect("Failed to migrate test database");

    pool
}
