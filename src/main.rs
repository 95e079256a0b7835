use anyhow::Context;
use secrecy::ExposeSecret;

use bfhl_service::config::AppConfig;
use bfhl_service::observability::init_tracing;
use bfhl_service::{build_app, run_server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log_level, config.log_format);

    let key_configured = config
        .gemini_api_key
        .as_ref()
        .is_some_and(|key| !key.expose_secret().is_empty());
    if !key_configured {
        tracing::warn!("GEMINI_API_KEY is not set; AI requests will fail");
    }
    tracing::info!(
        model = %config.gemini_model,
        official_email = %config.official_email,
        "starting bfhl-service"
    );

    let state = AppState::from_config(&config).context("failed to build AI client")?;
    run_server(build_app(state), config.port)
        .await
        .context("server failed")?;

    Ok(())
}
