use anyhow::Context;
use dotenv::dotenv;
use medmap::{config, logging, tui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = config::initialize_config().context("Failed to load configuration")?;

    let log_dir = logging::default_log_dir()?;
    let _logger = logging::init_logging(&config.log_level, &log_dir)
        .context("Failed to start logging")?;
    log::info!(
        "medmap {} starting against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url
    );

    tui::run_ui(&config).await?;
    Ok(())
}
