// src/main.rs
use log::{error, info, warn};

use pallet_fit::api;
use pallet_fit::config::{self, AppConfig};

#[tokio::main]
async fn main() {
    let dotenv_result = config::load_dotenv();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(err) = dotenv_result {
        warn!("⚠️ Could not load .env: {}", err);
    }

    let app_config = AppConfig::from_env();
    let api_config = app_config.api.clone();
    let estimator_config = app_config.estimator.estimator_config();

    info!("🚀 Estimation service starting...");
    if let Err(err) = api::start_api_server(api_config, estimator_config).await {
        error!("❌ API server terminated with an error: {err}");
        std::process::exit(1);
    }
}
