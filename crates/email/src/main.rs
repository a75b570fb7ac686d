use anyhow::Context;
use email::app::EmailServiceApp;
use shared::{
    config::Config,
    utils::{init_logger, shutdown_signal},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("failed to load config")?;

    init_logger("order-email-service");

    let app = EmailServiceApp::new(config);

    tokio::select! {
        result = app.run() => {
            result.context("email service stopped")?;
        }
        _ = shutdown_signal() => {
            info!("Order Email Service shutdown gracefully.");
        }
    }

    Ok(())
}
