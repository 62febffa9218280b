use anyhow::Context;
use bank_accounts::{
    account::{
        controller::AccountController, repository::AccountRepository, service::SqlAccountService,
    },
    config::Config,
    db::Database,
    server::Server,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "bank_accounts=info".into()),
        )
        .init();

    let config = Config::from_env().context("Failed to load config")?;
    let pool = Database::new_pool(&config)
        .await
        .context("Failed to create DB pool")?;
    Database::migrate(&pool)
        .await
        .context("Failed to apply migrations")?;

    let service = SqlAccountService::new(AccountRepository::new(pool));
    let controller = Arc::new(AccountController::new(Arc::new(service)));
    let server = Server::new(controller, config.bind_addr.clone());

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Without a signal handler the server runs until killed.
            error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Ctrl-C received");
        let _ = shutdown_tx.send(());
    });

    server.start(shutdown_rx).await
}
